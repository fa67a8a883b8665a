//! The root effect description and its metadata.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EffectError;
use crate::pattern::{EventParameters, PatternEntry, PatternItem};

/// Document metadata.
///
/// `created` is a source-defined, free-form timestamp string; it is carried
/// through verbatim and never re-validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Format version of the document.
    #[serde(rename = "Version", default)]
    pub version: i32,

    /// Free-form creation timestamp.
    #[serde(rename = "Created", default)]
    pub created: String,

    /// Optional human-readable description; omitted from the wire form when
    /// absent.
    #[serde(
        rename = "Description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

/// A complete haptic-effect description (an HE document).
///
/// Built in memory, serialized once, and handed to playback as a single
/// string; this layer keeps no further ownership of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HapticEffect {
    /// Document metadata.
    #[serde(rename = "Metadata", default)]
    pub metadata: Metadata,

    /// Time-ordered pattern entries. Order is preserved through
    /// serialization round trips.
    #[serde(rename = "PatternList", default)]
    pub patterns: Vec<PatternEntry>,
}

impl HapticEffect {
    /// Create an empty effect with the given metadata.
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            patterns: Vec::new(),
        }
    }

    /// Append a pattern entry.
    pub fn add_pattern(&mut self, entry: PatternEntry) -> &mut Self {
        self.patterns.push(entry);
        self
    }

    /// Build an event from its parts and append it under the current (last)
    /// pattern entry, creating an anchor-0 entry when none exists yet.
    pub fn add_continuous_pattern(
        &mut self,
        kind: impl Into<String>,
        duration_ms: i32,
        relative_time_ms: i32,
        index: i32,
        parameters: Option<EventParameters>,
    ) -> &mut PatternItem {
        if self.patterns.is_empty() {
            self.patterns.push(PatternEntry::at(0));
        }
        let last = self.patterns.len() - 1;
        self.patterns[last].add_continuous(kind, duration_ms, relative_time_ms, index, parameters)
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> Result<String, EffectError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from the JSON wire form.
    ///
    /// Structurally invalid text fails with [`EffectError::Format`]; unknown
    /// extra fields are ignored so documents from newer firmware revisions
    /// keep parsing.
    pub fn from_json(text: &str) -> Result<Self, EffectError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write the serialized document to a file.
    ///
    /// The file handle is scoped to this call and closed on every path out
    /// of it. I/O failures surface as [`EffectError::Io`], serializer
    /// failures as [`EffectError::Format`].
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), EffectError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read and parse a document from a file, keeping the I/O/format error
    /// split of [`write_to_file`](Self::write_to_file).
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, EffectError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl FromStr for HapticEffect {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

impl fmt::Display for HapticEffect {
    /// Render the JSON wire form.
    ///
    /// This never fails: when the serializer reports an error the output
    /// degrades to the bare type name. Callers that need the failure should
    /// use [`HapticEffect::to_json`] instead; existing playback paths rely
    /// on display-formatting being infallible.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("HapticEffect"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_add_continuous_pattern_creates_anchor_entry() {
        let mut effect = HapticEffect::default();
        effect.add_continuous_pattern("transient", 100, 0, 0, None);

        assert_eq!(effect.patterns.len(), 1);
        assert_eq!(effect.patterns[0].absolute_time_ms, 0);
        assert_eq!(effect.patterns[0].events.len(), 1);
    }

    #[test]
    fn test_add_continuous_pattern_appends_to_last_entry() {
        let mut effect = HapticEffect::default();
        effect.add_pattern(PatternEntry::at(0));
        effect.add_pattern(PatternEntry::at(500));
        effect.add_continuous_pattern("transient", 50, 0, 0, None);

        assert!(effect.patterns[0].events.is_empty());
        assert_eq!(effect.patterns[1].events.len(), 1);
    }

    #[test]
    fn test_display_matches_to_json() {
        let mut effect = HapticEffect::new(Metadata {
            version: 1,
            created: "2024-05-01 12:00:00".into(),
            description: Some("two taps".into()),
        });
        effect.add_continuous_pattern("transient", 30, 0, 0, None);

        assert_eq!(effect.to_string(), effect.to_json().unwrap());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let text = r#"{
            "Metadata": {"Version": 2, "Created": "now", "FirmwareHint": 9},
            "PatternList": [],
            "VendorExtension": {"x": 1}
        }"#;
        let effect = HapticEffect::from_json(text).unwrap();
        assert_eq!(effect.metadata.version, 2);
        assert!(effect.patterns.is_empty());
    }

    #[test]
    fn test_structurally_invalid_text_is_a_format_error() {
        let err = HapticEffect::from_json("{\"PatternList\": 7}").unwrap_err();
        assert!(err.is_format());
        let err = "not json at all".parse::<HapticEffect>().unwrap_err();
        assert!(err.is_format());
    }
}
