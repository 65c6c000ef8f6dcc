//! The additive drawbar oscillator.
//!
//! Six sine partials at fixed harmonic numbers (1, 2, 3, 4, 6, 8 times the
//! fundamental) are summed with per-drawbar gains. Two transient layers sit on
//! top: a key click (white noise with an exponential decay) and a percussion
//! boost added to harmonic 4 or 8 with a slow linear decay. The sum is scaled,
//! soft clipped and written as Q31.
//!
//! The host drives five entry points: [`init`](Oscillator::init),
//! [`render`](Oscillator::render), [`note_on`](Oscillator::note_on),
//! [`note_off`](Oscillator::note_off) and
//! [`set_parameter`](Oscillator::set_parameter). Calls are never re-entrant
//! and nothing here allocates or blocks.

use log::{debug, trace};
use tonewheel_core::dsp::q31_to_f32;
use tonewheel_core::envelopes::{ExpDecay, LinearDecay};
use tonewheel_core::pitch::split_pitch;

use crate::config::OscConfig;
use crate::host::{Host, PlatformHost};
use crate::params::{OscParams, ParamId};

/// Number of harmonic slots; slot 0 is reserved and never sounds.
pub const HARMONIC_SLOTS: usize = 7;

/// Harmonic multiplier per slot.
pub const HARMONIC_NUMBERS: [u8; HARMONIC_SLOTS] = [0, 1, 2, 3, 4, 6, 8];

/// Drawbar gains after `init`.
pub const DEFAULT_HARMONIC_LEVELS: [f32; HARMONIC_SLOTS] = [0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];

/// Phase accumulator wraps at 8 cycles so the halved partials stay continuous.
pub const PHASE_WRAP: f32 = 8.0;

/// Full scale of a drawbar parameter.
pub const DRAWBAR_MAX: u16 = 8;

const INIT_CLICK_LEVEL: f32 = 0.5;
const INIT_CLICK_ENVELOPE: f32 = 0.5;
const INIT_PERCUSSION_LEVEL: f32 = 1.0;
const PERCUSSION_SLOT_HIGH: u8 = 6;
const PERCUSSION_SLOT_LOW: u8 = 4;

/// Stack scratch used by [`Oscillator::render_f32`].
const F32_BLOCK: usize = 64;

/// Control flags consumed at the start of each render cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Flags = Flags(0);
    /// Restart the phase accumulator at zero.
    pub const RESET: Flags = Flags(1);

    #[inline] pub fn contains(self, other: Flags) -> bool { self.0 & other.0 == other.0 && other.0 != 0 }
    #[inline] pub fn insert(&mut self, other: Flags) { self.0 |= other.0; }
}

/// Read-only snapshot of the oscillator state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OscState {
    pub phase_increment: f32,
    pub phase: f32,
    pub harmonic_level: [f32; HARMONIC_SLOTS],
    pub harmonic_number: [u8; HARMONIC_SLOTS],
    pub click_level: f32,
    pub click_envelope: f32,
    pub percussion_level: f32,
    pub percussion_envelope: f32,
    pub percussion_harmonic: u8,
    pub startup_counter: u8,
    pub flags: Flags,
}

/// Single-voice additive organ oscillator, generic over its host services.
#[derive(Clone, Debug)]
pub struct Oscillator<H: Host = PlatformHost> {
    host: H,
    cfg: OscConfig,

    phase_increment: f32,
    phase: f32,
    harmonic_level: [f32; HARMONIC_SLOTS],
    harmonic_number: [u8; HARMONIC_SLOTS],
    click_level: f32,
    click: ExpDecay,
    percussion_level: f32,
    percussion: LinearDecay,
    percussion_harmonic: u8,
    startup_counter: u8,
    flags: Flags,
}

impl Oscillator<PlatformHost> {
    /// Oscillator on the stock 48 kHz host with default tuning.
    pub fn platform() -> Self {
        Self::new(PlatformHost::default(), OscConfig::default())
    }
}

impl<H: Host> Oscillator<H> {
    /// Construct in the post-`init` state.
    pub fn new(host: H, cfg: OscConfig) -> Self {
        let mut osc = Self {
            host,
            cfg,
            phase_increment: 0.0,
            phase: 0.0,
            harmonic_level: DEFAULT_HARMONIC_LEVELS,
            harmonic_number: HARMONIC_NUMBERS,
            click_level: INIT_CLICK_LEVEL,
            click: ExpDecay::new(INIT_CLICK_ENVELOPE, cfg.click_decay),
            percussion_level: INIT_PERCUSSION_LEVEL,
            percussion: LinearDecay::new(
                cfg.initial_percussion_envelope,
                cfg.percussion_step,
                cfg.exact_percussion_floor,
            ),
            percussion_harmonic: PERCUSSION_SLOT_HIGH,
            startup_counter: 0,
            flags: Flags::NONE,
        };
        osc.reset_state();
        osc
    }

    fn reset_state(&mut self) {
        self.phase_increment = 0.0;
        self.phase = 0.0;
        self.flags = Flags::NONE;
        self.startup_counter = 0;
        self.click_level = INIT_CLICK_LEVEL;
        self.click = ExpDecay::new(INIT_CLICK_ENVELOPE, self.cfg.click_decay);
        self.percussion_harmonic = PERCUSSION_SLOT_HIGH;
        self.percussion_level = INIT_PERCUSSION_LEVEL;
        self.percussion = LinearDecay::new(
            self.cfg.initial_percussion_envelope,
            self.cfg.percussion_step,
            self.cfg.exact_percussion_floor,
        );
        self.harmonic_number = HARMONIC_NUMBERS;
        self.harmonic_level = DEFAULT_HARMONIC_LEVELS;
    }

    /// Reset every field to its power-on value. Platform and API ids are only logged.
    pub fn init(&mut self, platform: u32, api: u32) {
        debug!("tonewheel init: platform={platform:#x} api={api:#x}");
        self.reset_state();
    }

    /// Fill `out` with one Q31 sample per frame.
    pub fn render(&mut self, params: &OscParams, out: &mut [i32]) {
        let flags = core::mem::take(&mut self.flags);
        if flags.contains(Flags::RESET) {
            self.phase = 0.0;
        }

        let (note, fine) = split_pitch(params.pitch);
        let w0 = self.host.phase_increment(note, fine);
        self.phase_increment = w0;
        let freq = self.host.note_hz(note);

        let mut phase = self.phase;
        let mut click = self.click;
        let mut percussion = self.percussion;
        let click_level = self.click_level;
        let boost_slot = usize::from(self.percussion_harmonic);
        let percussion_level = self.percussion_level;
        let foldback_hz = self.cfg.foldback_hz;
        let output_gain = self.cfg.output_gain;

        for y in out.iter_mut() {
            let perc_env = percussion.next();
            let click_env = click.next();

            let mut acc = 0.0;
            let mut foldback = 1.0;
            for slot in 1..HARMONIC_SLOTS {
                let harmonic = f32::from(self.harmonic_number[slot]);
                let mut level = self.harmonic_level[slot];
                if freq * harmonic * foldback > foldback_hz {
                    foldback *= 0.5;
                }
                if slot == boost_slot {
                    level += perc_env * percussion_level;
                }
                acc += self.host.sin(phase * harmonic * foldback) * level;
            }

            acc += self.host.white() * click_env * click_level;

            *y = self.host.to_q31(self.host.sat_cubic(acc * output_gain));

            phase += w0;
            if phase >= PHASE_WRAP {
                phase -= PHASE_WRAP;
            }
        }

        self.phase = phase;
        self.click = click;
        self.percussion = percussion;
    }

    /// Render into floats in [-1, 1] for hosts that do not consume Q31.
    pub fn render_f32(&mut self, params: &OscParams, out: &mut [f32]) {
        let mut scratch = [0_i32; F32_BLOCK];
        for chunk in out.chunks_mut(F32_BLOCK) {
            let q = &mut scratch[..chunk.len()];
            self.render(params, q);
            for (dst, src) in chunk.iter_mut().zip(q.iter()) {
                *dst = q31_to_f32(*src);
            }
        }
    }

    /// Retrigger click and percussion. Pitch is ignored.
    pub fn note_on(&mut self, _params: &OscParams) {
        self.click.trigger(self.cfg.note_on_level);
        self.percussion.trigger(self.cfg.note_on_level);
    }

    /// Both layers decay on their own; release does nothing.
    pub fn note_off(&mut self, _params: &OscParams) {}

    /// Apply a raw control value. The first `startup_debounce` calls after
    /// `init` are swallowed; unknown indices are ignored.
    pub fn set_parameter(&mut self, index: u16, value: u16) {
        if self.startup_counter < self.cfg.startup_debounce {
            self.startup_counter += 1;
            trace!("param {index}={value} swallowed ({}/{})", self.startup_counter, self.cfg.startup_debounce);
            return;
        }

        let Ok(id) = ParamId::try_from(index) else {
            trace!("param {index}={value} ignored: no such parameter");
            return;
        };

        match id {
            ParamId::Shape => {
                let c = self.host.param_to_f32(value);
                self.click_level = c * c;
            }
            ParamId::ShiftShape => {
                let p = 2.0 * self.host.param_to_f32(value) - 1.0;
                self.percussion_harmonic = if p >= 0.0 { PERCUSSION_SLOT_HIGH } else { PERCUSSION_SLOT_LOW };
                self.percussion_level = p * p;
            }
            drawbar => {
                if let Some(slot) = drawbar.drawbar_slot() {
                    let v = f32::from(value) / f32::from(DRAWBAR_MAX);
                    self.harmonic_level[slot] = v * v;
                }
            }
        }
    }

    /// Ask the next render cycle to restart the phase at zero.
    #[inline]
    pub fn request_phase_reset(&mut self) {
        self.flags.insert(Flags::RESET);
    }

    /// True once the startup debounce window has passed.
    #[inline]
    pub fn accepts_parameters(&self) -> bool {
        self.startup_counter >= self.cfg.startup_debounce
    }

    pub fn state(&self) -> OscState {
        OscState {
            phase_increment: self.phase_increment,
            phase: self.phase,
            harmonic_level: self.harmonic_level,
            harmonic_number: self.harmonic_number,
            click_level: self.click_level,
            click_envelope: self.click.value(),
            percussion_level: self.percussion_level,
            percussion_envelope: self.percussion.value(),
            percussion_harmonic: self.percussion_harmonic,
            startup_counter: self.startup_counter,
            flags: self.flags,
        }
    }

    #[inline] pub fn config(&self) -> &OscConfig { &self.cfg }
    #[inline] pub fn host(&self) -> &H { &self.host }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Host with silent noise so render output is deterministic.
    #[derive(Clone, Debug, Default)]
    struct QuietHost(PlatformHost);

    impl Host for QuietHost {
        fn phase_increment(&self, note: u8, fine: u8) -> f32 { self.0.phase_increment(note, fine) }
        fn note_hz(&self, note: u8) -> f32 { self.0.note_hz(note) }
        fn white(&mut self) -> f32 { 0.0 }
    }

    fn settled() -> Oscillator {
        let mut osc = Oscillator::platform();
        for _ in 0..30 {
            osc.set_parameter(0, 0);
        }
        assert!(osc.accepts_parameters());
        osc
    }

    #[test]
    fn init_restores_power_on_state() {
        let mut osc = settled();
        osc.set_parameter(ParamId::Drawbar5.index(), 8);
        osc.note_on(&OscParams::default());
        osc.render(&OscParams::from_note(60, 0), &mut [0; 16]);

        osc.init(0, 0);
        let s = osc.state();
        assert_eq!(s.harmonic_number, [0, 1, 2, 3, 4, 6, 8]);
        assert_eq!(s.harmonic_level, [0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(s.startup_counter, 0);
        assert_eq!(s.phase, 0.0);
        assert_eq!(s.phase_increment, 0.0);
        assert_eq!(s.click_level, 0.5);
        assert_eq!(s.click_envelope, 0.5);
        assert_eq!(s.percussion_level, 1.0);
        assert_eq!(s.percussion_envelope, 0.0);
        assert_eq!(s.percussion_harmonic, 6);
        assert_eq!(s.flags, Flags::NONE);
    }

    #[test]
    fn drawbars_map_to_crossed_slots_with_square_law() {
        let mut osc = settled();
        osc.set_parameter(ParamId::Drawbar2.index(), 4);
        osc.set_parameter(ParamId::Drawbar3.index(), 2);
        osc.set_parameter(ParamId::Drawbar6.index(), 8);
        let s = osc.state();
        assert_eq!(s.harmonic_level[3], 0.25);
        assert_eq!(s.harmonic_level[2], 0.0625);
        assert_eq!(s.harmonic_level[6], 1.0);
    }

    #[test]
    fn shape_sets_click_level_squared() {
        let mut osc = settled();
        osc.set_parameter(ParamId::Shape.index(), 1023);
        assert!((osc.state().click_level - 1.0).abs() < 1e-5);
        osc.set_parameter(ParamId::Shape.index(), 0);
        assert_eq!(osc.state().click_level, 0.0);
    }

    #[test]
    fn shift_shape_sign_picks_percussion_harmonic() {
        let mut osc = settled();
        osc.set_parameter(ParamId::ShiftShape.index(), 0);
        let s = osc.state();
        assert_eq!(s.percussion_harmonic, 4);
        assert!((s.percussion_level - 1.0).abs() < 1e-6);

        osc.set_parameter(ParamId::ShiftShape.index(), 1023);
        let s = osc.state();
        assert_eq!(s.percussion_harmonic, 6);
        assert!((s.percussion_level - 1.0).abs() < 1e-5);
    }

    #[test]
    fn unknown_parameter_changes_nothing() {
        let mut osc = settled();
        let before = osc.state();
        osc.set_parameter(42, 1000);
        assert_eq!(osc.state(), before);
    }

    #[test]
    fn note_off_is_a_no_op() {
        let mut osc = Oscillator::platform();
        osc.note_on(&OscParams::default());
        let before = osc.state();
        osc.note_off(&OscParams::default());
        assert_eq!(osc.state(), before);
    }

    #[test]
    fn render_persists_phase_and_increment() {
        let mut osc = Oscillator::platform();
        let params = OscParams::from_note(69, 0);
        osc.render(&params, &mut [0; 10]);
        let s = osc.state();
        assert!((s.phase_increment - 440.0 / 48_000.0).abs() < 1e-6);
        assert!((s.phase - 10.0 * s.phase_increment).abs() < 1e-5);
    }

    #[test]
    fn phase_reset_flag_restarts_phase_once() {
        let mut osc = Oscillator::platform();
        let params = OscParams::from_note(60, 0);
        osc.render(&params, &mut [0; 32]);
        assert!(osc.state().phase > 0.0);

        osc.request_phase_reset();
        assert!(osc.state().flags.contains(Flags::RESET));
        let mut out = [0; 1];
        osc.render(&params, &mut out);
        let s = osc.state();
        assert_eq!(s.flags, Flags::NONE);
        assert!((s.phase - s.phase_increment).abs() < 1e-7);
    }

    #[test]
    fn silent_host_renders_silence_with_no_drawbars() {
        let mut osc = Oscillator::new(QuietHost::default(), OscConfig::default());
        for _ in 0..30 {
            osc.set_parameter(0, 0);
        }
        for p in [ParamId::Drawbar1, ParamId::Drawbar2, ParamId::Drawbar3] {
            osc.set_parameter(p.index(), 0);
        }
        // percussion envelope starts at zero, so only noise could sound
        let mut out = [1; 64];
        osc.render(&OscParams::from_note(60, 0), &mut out);
        assert!(out.iter().all(|&s| s == 0), "{out:?}");
    }

    #[test]
    fn percussion_boost_is_not_stored_in_gain() {
        let mut osc = Oscillator::new(QuietHost::default(), OscConfig::default());
        osc.note_on(&OscParams::default());
        osc.render(&OscParams::from_note(48, 0), &mut [0; 128]);
        assert_eq!(osc.state().harmonic_level, DEFAULT_HARMONIC_LEVELS);
    }

    #[test]
    fn high_notes_still_sound_after_foldback() {
        let mut osc = Oscillator::new(QuietHost::default(), OscConfig::default());
        let mut out = [0; 256];
        osc.render(&OscParams::from_note(120, 0), &mut out);
        assert!(out.iter().any(|&s| s != 0));
    }

    #[test]
    fn render_f32_matches_q31_render() {
        let mut a = Oscillator::new(QuietHost::default(), OscConfig::default());
        let mut b = a.clone();
        let params = OscParams::from_note(57, 40);
        let mut q = [0_i32; 150];
        let mut f = [0_f32; 150];
        a.render(&params, &mut q);
        b.render_f32(&params, &mut f);
        for (x, y) in q.iter().zip(f.iter()) {
            assert!((q31_to_f32(*x) - *y).abs() < 1e-6);
        }
    }

    #[test]
    fn exact_floor_config_settles_on_zero() {
        let cfg = OscConfig { percussion_step: 0.3, exact_percussion_floor: true, ..OscConfig::default() };
        let mut osc = Oscillator::new(QuietHost::default(), cfg);
        osc.note_on(&OscParams::default());
        osc.render(&OscParams::from_note(60, 0), &mut [0; 7]);
        assert_eq!(osc.state().percussion_envelope, 0.0);
    }
}
