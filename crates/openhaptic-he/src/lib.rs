//! The HE haptic-effect description model.
//!
//! An HE document describes one haptic effect as metadata plus a
//! time-ordered list of pattern entries; each entry anchors a group of
//! events at an absolute offset, and each event carries an opaque waveform
//! tag with optional intensity/frequency parameters and an envelope curve.
//!
//! The model round-trips through the driver's JSON wire format with
//! PascalCase field names. Optional fields are omitted from the output
//! entirely, never emitted as `null`, and unknown fields in the input are
//! ignored so newer driver firmware revisions stay readable.
//!
//! # Example
//!
//! ```
//! use openhaptic_he::{EventParameters, HapticEffect, Metadata, PatternEntry};
//!
//! let mut effect = HapticEffect::new(Metadata {
//!     version: 1,
//!     created: "2024-05-01".into(),
//!     description: None,
//! });
//! let mut entry = PatternEntry::at(0);
//! entry.add_continuous("continuous", 500, 0, 0, Some(EventParameters::new(192, 60)));
//! effect.add_pattern(entry);
//!
//! let json = effect.to_json()?;
//! let parsed: HapticEffect = json.parse()?;
//! assert_eq!(parsed, effect);
//! # Ok::<(), openhaptic_he::EffectError>(())
//! ```

pub mod effect;
pub mod error;
pub mod pattern;

pub use effect::{HapticEffect, Metadata};
pub use error::EffectError;
pub use pattern::{CurvePoint, EffectEvent, EventParameters, PatternEntry, PatternItem};
