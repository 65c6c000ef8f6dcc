//! C ABI wrapper for the tonewheel oscillator.
//!
//! Exposes the five host entry points (init, cycle, note on, note off,
//! parameter) on an opaque handle, so a C host can own one oscillator per
//! voice without any global state on the Rust side.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Opaque handle type: `TonewheelOsc` (heap-allocated; you own/delete it).
//! - Render output is Q31 (`int32_t`), one mono sample per frame.
//!
//! Threading
//! - The object is NOT thread-safe; call all functions from the same audio thread.

use tonewheel_osc::{OscConfig, OscParams, Oscillator, PlatformHost};

/// Parameter block passed by the host on render and note events.
///
/// `pitch` is note number in the high byte, fine offset in the low byte.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct TonewheelParams {
    pub shape_lfo: i32,
    pub pitch: u16,
    pub cutoff: u16,
    pub resonance: u16,
    pub reserved0: [u16; 3],
}

impl From<&TonewheelParams> for OscParams {
    fn from(p: &TonewheelParams) -> Self {
        OscParams { shape_lfo: p.shape_lfo, pitch: p.pitch, cutoff: p.cutoff, resonance: p.resonance }
    }
}

/// Opaque oscillator wrapper we hand to C.
pub struct TonewheelOsc {
    inner: Oscillator<PlatformHost>,
}

impl TonewheelOsc {
    fn new(sample_rate: f32) -> Self {
        let sr = if sample_rate.is_finite() { sample_rate.max(1.0) } else { 48_000.0 };
        let host = PlatformHost::new(sr);
        let cfg = OscConfig::for_sample_rate(sr);
        let cfg = match cfg.validate() {
            Ok(()) => cfg,
            Err(e) => {
                log::warn!("tonewheel_create: {e} at sr={sr}; using 48 kHz tuning");
                OscConfig::default()
            }
        };
        Self { inner: Oscillator::new(host, cfg) }
    }
}

/// Borrow the oscillator behind a handle, or `None` for null.
///
/// # Safety
/// `handle` must be null or a live pointer from `tonewheel_create`.
unsafe fn osc_mut<'a>(handle: *mut TonewheelOsc) -> Option<&'a mut TonewheelOsc> {
    handle.as_mut()
}

/// # Safety
/// `params` must be null or point to a valid `TonewheelParams`.
unsafe fn params_or_default(params: *const TonewheelParams) -> OscParams {
    params.as_ref().map(OscParams::from).unwrap_or_default()
}

// --- Creation / destruction -------------------------------------------------------

/// Create an oscillator for the given sample rate, already in its post-init state.
/// Decay constants are rescaled so decay times match the 48 kHz reference.
#[no_mangle]
pub extern "C" fn tonewheel_create(sample_rate: f32) -> *mut TonewheelOsc {
    log::debug!("tonewheel_create sr={sample_rate}");
    Box::into_raw(Box::new(TonewheelOsc::new(sample_rate)))
}

/// Destroy an oscillator previously returned by `tonewheel_create`.
///
/// # Safety
/// `handle` must be null or a pointer from `tonewheel_create` that was not destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn tonewheel_destroy(handle: *mut TonewheelOsc) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

// --- Entry points ----------------------------------------------------------------

/// Reset all oscillator state.
///
/// # Safety
/// `handle` must be null or a live pointer from `tonewheel_create`.
#[no_mangle]
pub unsafe extern "C" fn tonewheel_init(handle: *mut TonewheelOsc, platform: u32, api: u32) {
    if let Some(h) = osc_mut(handle) {
        h.inner.init(platform, api);
    }
}

/// Render `frames` Q31 samples into `out`.
///
/// Returns the number of frames rendered (0 on error).
///
/// # Safety
/// `handle` must be null or live; `params` must be null or valid (null renders
/// note 0); `out` must be null or valid for `frames` writes.
#[no_mangle]
pub unsafe extern "C" fn tonewheel_cycle(
    handle: *mut TonewheelOsc,
    params: *const TonewheelParams,
    out: *mut i32,
    frames: u32,
) -> u32 {
    let Some(h) = osc_mut(handle) else { return 0 };
    if out.is_null() || frames == 0 {
        return 0;
    }
    let out = std::slice::from_raw_parts_mut(out, frames as usize);
    let p = params_or_default(params);
    h.inner.render(&p, out);
    frames
}

/// # Safety
/// `handle` must be null or live; `params` must be null or valid.
#[no_mangle]
pub unsafe extern "C" fn tonewheel_note_on(handle: *mut TonewheelOsc, params: *const TonewheelParams) {
    if let Some(h) = osc_mut(handle) {
        h.inner.note_on(&params_or_default(params));
    }
}

/// # Safety
/// `handle` must be null or live; `params` must be null or valid.
#[no_mangle]
pub unsafe extern "C" fn tonewheel_note_off(handle: *mut TonewheelOsc, params: *const TonewheelParams) {
    if let Some(h) = osc_mut(handle) {
        h.inner.note_off(&params_or_default(params));
    }
}

/// Set a parameter from its raw host value. Unknown indices are ignored.
///
/// # Safety
/// `handle` must be null or a live pointer from `tonewheel_create`.
#[no_mangle]
pub unsafe extern "C" fn tonewheel_param(handle: *mut TonewheelOsc, index: u16, value: u16) {
    if let Some(h) = osc_mut(handle) {
        h.inner.set_parameter(index, value);
    }
}
