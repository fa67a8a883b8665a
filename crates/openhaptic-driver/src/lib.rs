//! Native backend selection and the vibration motor facade.
//!
//! The vendor's motor driver ships as per-architecture native modules with
//! one fixed C entry-point set. This crate picks the right module for the
//! running process (with a local fallback and explicit overrides), binds it
//! behind the [`MotorBackend`] capability trait, and exposes playback and
//! controller queries through [`VibrationMotor`].
//!
//! # Example
//!
//! ```no_run
//! use openhaptic_codec::VibrationOptions;
//! use openhaptic_driver::VibrationMotor;
//!
//! let motor = VibrationMotor::global();
//! motor.set_init_state(true)?;
//! motor.play_file("effects/heartbeat.he", &VibrationOptions::default())?;
//! # Ok::<(), openhaptic_driver::MotorError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod backend;
pub mod error;
pub mod motor;
pub mod native;
pub mod selector;

pub use backend::{ControllerChangeCallback, MotorBackend};
pub use error::{BackendError, MotorError};
pub use motor::VibrationMotor;
pub use native::NativeBackend;
pub use selector::{Arch, BackendSelector};
