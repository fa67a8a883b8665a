//! Wire-format parameter conversions for the native haptic driver.
//!
//! The native driver speaks 32-bit integers: whole milliseconds for time
//! spans, an asymmetric attenuation/boost band for gain, and a signed
//! percentage for the frequency shift. This crate owns the mapping from the
//! user-facing continuous domains onto that wire format.
//!
//! Every conversion is a total function: out-of-domain inputs clamp or
//! saturate, they never fail and never wrap.

pub mod options;
pub mod wire;

pub use options::VibrationOptions;
pub use wire::{frequency_factor_to_wire, gain_to_wire, saturating_millis, wire_milliseconds};
