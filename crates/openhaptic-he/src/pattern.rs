//! Pattern entries, events, and parameter curves.

use serde::{Deserialize, Serialize};

/// A time-anchored group of events within an effect.
///
/// Entries are ordered in the document and that order is meaningful: it is
/// the temporal ordering of the groups. Every event in the entry executes
/// relative to the entry's anchor time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternEntry {
    /// Effect-relative anchor time in milliseconds, never negative.
    #[serde(rename = "AbsoluteTime", default)]
    pub absolute_time_ms: i32,

    /// The events anchored at this entry, in execution order.
    #[serde(rename = "Patterns", default)]
    pub events: Vec<PatternItem>,
}

impl PatternEntry {
    /// Create an empty entry anchored at `absolute_time_ms`.
    pub fn at(absolute_time_ms: i32) -> Self {
        Self {
            absolute_time_ms,
            events: Vec::new(),
        }
    }

    /// Append a pre-built item.
    pub fn add_item(&mut self, item: PatternItem) -> &mut Self {
        self.events.push(item);
        self
    }

    /// Wrap an event into a new item and append it.
    ///
    /// Returns the appended item so callers can keep refining it.
    pub fn add_event(&mut self, event: EffectEvent) -> &mut PatternItem {
        self.events.push(PatternItem { event });
        let last = self.events.len() - 1;
        &mut self.events[last]
    }

    /// Build an event from its parts and append it.
    pub fn add_continuous(
        &mut self,
        kind: impl Into<String>,
        duration_ms: i32,
        relative_time_ms: i32,
        index: i32,
        parameters: Option<EventParameters>,
    ) -> &mut PatternItem {
        self.add_event(EffectEvent {
            kind: kind.into(),
            duration_ms,
            relative_time_ms,
            parameters,
            index,
        })
    }
}

/// One slot in a pattern entry, wrapping exactly one event.
///
/// The wire format nests each event under an `Event` key; the wrapper is
/// kept rather than flattened so documents round-trip byte-compatibly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternItem {
    /// The wrapped event. 1:1, never shared between items.
    #[serde(rename = "Event", default)]
    pub event: EffectEvent,
}

/// A single vibration event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectEvent {
    /// Waveform class tag. Opaque to this layer and passed through to the
    /// driver as-is.
    #[serde(rename = "Type", default)]
    pub kind: String,

    /// Event duration in milliseconds, never negative.
    #[serde(rename = "Duration", default)]
    pub duration_ms: i32,

    /// Signed offset from the pattern entry's anchor time.
    #[serde(rename = "RelativeTime", default)]
    pub relative_time_ms: i32,

    /// Optional intensity/frequency parameters; omitted from the wire form
    /// when absent.
    #[serde(
        rename = "Parameters",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parameters: Option<EventParameters>,

    /// Actuator/channel selector for multi-actuator hardware.
    #[serde(rename = "Index", default)]
    pub index: i32,
}

/// Intensity and frequency parameters for one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventParameters {
    /// Raw driver-space intensity, 0-255 unless the curve drives it.
    #[serde(rename = "Intensity", default)]
    pub intensity: i32,

    /// Raw driver-space frequency.
    #[serde(rename = "Frequency", default)]
    pub frequency: i32,

    /// Optional envelope curve; omitted from the wire form when absent.
    #[serde(rename = "Curve", default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<Vec<CurvePoint>>,
}

impl EventParameters {
    /// Parameters with no envelope curve.
    pub fn new(intensity: i32, frequency: i32) -> Self {
        Self {
            intensity,
            frequency,
            curve: None,
        }
    }

    /// Parameters with an envelope curve.
    pub fn with_curve(intensity: i32, frequency: i32, curve: Vec<CurvePoint>) -> Self {
        Self {
            intensity,
            frequency,
            curve: Some(curve),
        }
    }
}

/// One point of an event's envelope curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Curve-relative time in milliseconds.
    #[serde(rename = "Time", default)]
    pub time_ms: i32,

    /// Fractional envelope value.
    #[serde(rename = "Intensity", default)]
    pub intensity: f64,

    /// Raw driver-space frequency at this point.
    #[serde(rename = "Frequency", default)]
    pub frequency: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_add_event_preserves_order() {
        let mut entry = PatternEntry::at(100);
        entry.add_continuous("transient", 30, 0, 0, None);
        entry.add_continuous("continuous", 200, 30, 0, None);
        entry.add_continuous("transient", 30, 230, 1, None);

        let kinds: Vec<&str> = entry.events.iter().map(|i| i.event.kind.as_str()).collect();
        assert_eq!(kinds, ["transient", "continuous", "transient"]);
    }

    #[test]
    fn test_add_event_returns_appended_item() {
        let mut entry = PatternEntry::at(0);
        let item = entry.add_event(EffectEvent {
            kind: "transient".into(),
            ..EffectEvent::default()
        });
        item.event.index = 3;
        assert_eq!(entry.events[0].event.index, 3);
    }

    #[test]
    fn test_absent_parameters_not_serialized() {
        let mut entry = PatternEntry::at(0);
        entry.add_continuous("transient", 100, 0, 0, None);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("Parameters"));
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_absent_curve_not_serialized() {
        let params = EventParameters::new(255, 50);
        let json = serde_json::to_string(&params).unwrap();
        assert!(!json.contains("Curve"));
    }

    #[test]
    fn test_wire_field_names() {
        let mut entry = PatternEntry::at(10);
        entry.add_continuous(
            "continuous",
            500,
            0,
            1,
            Some(EventParameters::with_curve(
                192,
                60,
                vec![CurvePoint {
                    time_ms: 0,
                    intensity: 0.5,
                    frequency: 60,
                }],
            )),
        );

        let value: serde_json::Value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["AbsoluteTime"], 10);
        let event = &value["Patterns"][0]["Event"];
        assert_eq!(event["Type"], "continuous");
        assert_eq!(event["Duration"], 500);
        assert_eq!(event["RelativeTime"], 0);
        assert_eq!(event["Index"], 1);
        assert_eq!(event["Parameters"]["Intensity"], 192);
        assert_eq!(event["Parameters"]["Curve"][0]["Time"], 0);
    }
}
