#![cfg_attr(not(feature = "std"), no_std)]
//! Tonewheel Oscillator: additive drawbar organ voice for a callback host.
//!
//! Crate layout:
//! - [`host`]       : `Host` trait (services the platform provides) and `PlatformHost`
//! - [`params`]     : host parameter block and parameter identifiers
//! - [`config`]     : per-sample tuning constants and their validation
//! - [`oscillator`] : `Oscillator<H>` with the five host entry points
//!
//! The oscillator owns all of its state and performs no allocation in the
//! render path. One instance per voice; the host serializes every call.

pub mod config;
pub mod host;
pub mod oscillator;
pub mod params;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use config::{ConfigError, OscConfig};
pub use host::{Host, PlatformHost};
pub use oscillator::{Flags, OscState, Oscillator, HARMONIC_NUMBERS, HARMONIC_SLOTS, PHASE_WRAP};
pub use params::{OscParams, ParamId, UnknownParam};
