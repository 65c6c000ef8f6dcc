//! Drives an oscillator the way the synth host does: init, parameter flush,
//! registration, note-on, then fixed-size render blocks.

use anyhow::{Context, Result};
use tonewheel_osc::{OscConfig, OscParams, Oscillator, ParamId, PlatformHost};

use crate::args::Voice;

/// Host render block size.
pub const BLOCK: usize = 64;

/// 10-bit raw value for a normalized control position.
fn raw_10bit(x: f32) -> u16 {
    (x.clamp(0.0, 1.0) * 1023.0).round() as u16
}

pub struct Player {
    osc: Oscillator<PlatformHost>,
    params: OscParams,
    gain: f32,
    retrigger_every: Option<usize>,
    since_note: usize,
}

impl Player {
    pub fn new(sample_rate: f32, voice: &Voice) -> Result<Self> {
        let cfg = OscConfig::for_sample_rate(sample_rate);
        cfg.validate()
            .with_context(|| format!("oscillator tuning at {sample_rate} Hz"))?;

        let seed = voice.seed.unwrap_or_else(rand::random::<u32>);
        let host = PlatformHost::new(sample_rate).with_seed(seed);
        let mut osc = Oscillator::new(host, cfg);
        osc.init(0, 0);

        let settings = Self::settings(voice);

        // The host replays its parameter state on load; those calls land in the debounce window.
        let mut flushed = 0;
        while !osc.accepts_parameters() {
            let (id, value) = settings[flushed % settings.len()];
            osc.set_parameter(id.index(), value);
            flushed += 1;
        }
        for (id, value) in settings {
            osc.set_parameter(id.index(), value);
        }
        log::debug!("parameters applied after {flushed} debounced calls: {:?}", osc.state());

        let params = OscParams::from_note(voice.note, voice.fine);
        osc.note_on(&params);

        let retrigger_every = voice
            .retrigger_ms
            .filter(|&ms| ms > 0)
            .map(|ms| ((sample_rate * ms as f32 / 1000.0) as usize).max(BLOCK));

        Ok(Self { osc, params, gain: voice.gain, retrigger_every, since_note: 0 })
    }

    fn settings(voice: &Voice) -> [(ParamId, u16); 8] {
        let d = voice.drawbars;
        [
            (ParamId::Drawbar1, d[0]),
            (ParamId::Drawbar2, d[1]),
            (ParamId::Drawbar3, d[2]),
            (ParamId::Drawbar4, d[3]),
            (ParamId::Drawbar5, d[4]),
            (ParamId::Drawbar6, d[5]),
            (ParamId::Shape, raw_10bit(voice.click)),
            (ParamId::ShiftShape, raw_10bit((voice.perc + 1.0) * 0.5)),
        ]
    }

    /// Fill `out` with mono samples in [-gain, gain], one host block at a time.
    pub fn fill(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(BLOCK) {
            if let Some(every) = self.retrigger_every {
                if self.since_note >= every {
                    self.osc.note_off(&self.params);
                    self.osc.note_on(&self.params);
                    self.since_note = 0;
                }
            }
            self.osc.render_f32(&self.params, chunk);
            for s in chunk.iter_mut() {
                *s *= self.gain;
            }
            self.since_note += chunk.len();
        }
    }

    pub fn oscillator(&self) -> &Oscillator<PlatformHost> { &self.osc }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_survives_the_debounce() {
        let voice = Voice { drawbars: [0, 0, 0, 8, 4, 0], click: 0.0, perc: -1.0, seed: Some(1), ..Voice::default() };
        let p = Player::new(48_000.0, &voice).unwrap();
        let s = p.oscillator().state();
        assert_eq!(s.harmonic_level, [0.0, 0.0, 0.0, 0.0, 1.0, 0.25, 0.0]);
        assert_eq!(s.click_level, 0.0);
        assert_eq!(s.percussion_harmonic, 4);
        assert!((s.percussion_level - 1.0).abs() < 1e-6);
        assert_eq!(s.percussion_envelope, 2.0);
    }

    #[test]
    fn fill_is_bounded_by_gain() {
        let voice = Voice { drawbars: [8; 6], gain: 0.25, seed: Some(2), ..Voice::default() };
        let mut p = Player::new(44_100.0, &voice).unwrap();
        let mut buf = vec![0.0; 4410];
        p.fill(&mut buf);
        assert!(buf.iter().all(|s| s.abs() <= 0.25 + 1e-6));
        assert!(buf.iter().any(|s| s.abs() > 0.01));
    }

    #[test]
    fn retrigger_restores_envelopes() {
        let voice = Voice { retrigger_ms: Some(10), seed: Some(3), ..Voice::default() };
        let mut p = Player::new(48_000.0, &voice).unwrap();
        // 10 ms = 480 samples; render just past it so the next block retriggers
        let mut buf = vec![0.0; 512];
        p.fill(&mut buf);
        let decayed = p.oscillator().state().click_envelope;
        assert!(decayed < 2.0);
        p.fill(&mut buf[..BLOCK]);
        let s = p.oscillator().state();
        assert!(s.click_envelope > decayed, "{} vs {decayed}", s.click_envelope);
    }

    #[test]
    fn unusable_sample_rate_is_an_error() {
        let err = Player::new(1.0, &Voice::default()).err().expect("1 Hz must be rejected");
        assert!(format!("{err:#}").contains("click decay"), "{err:#}");
    }

    #[test]
    fn raw_10bit_covers_the_range() {
        assert_eq!(raw_10bit(0.0), 0);
        assert_eq!(raw_10bit(1.0), 1023);
        assert_eq!(raw_10bit(2.0), 1023);
    }
}
