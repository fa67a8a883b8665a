//! The vibration motor facade.

use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use openhaptic_codec::{
    VibrationOptions, frequency_factor_to_wire, gain_to_wire, wire_milliseconds,
};
use openhaptic_he::HapticEffect;
use parking_lot::Mutex;

use crate::error::MotorError;
use crate::selector::BackendSelector;

static GLOBAL: OnceLock<VibrationMotor> = OnceLock::new();

#[derive(Default)]
struct MotorState {
    initialized: bool,
    callback_registered: bool,
}

type Observer = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct ObserverList(Mutex<Vec<Observer>>);

impl ObserverList {
    fn notify(&self) {
        for observer in self.0.lock().iter() {
            observer();
        }
    }

    fn push(&self, observer: Observer) {
        self.0.lock().push(observer);
    }
}

/// The public motor surface: init/teardown, playback, loop tuning,
/// controller enumeration, and attachment-change notification, delegating
/// to whichever backend the selector resolved.
///
/// Every operation is synchronous on the caller's thread. Ordering and
/// atomicity of actual hardware state transitions belong to the native
/// driver; this layer only guards its own state, the cached backend
/// resolution and the `initialized` flag.
///
/// [`VibrationMotor::global`] is the process-wide instance applications
/// share. Independent instances exist so tests can install their own
/// backends without crosstalk.
pub struct VibrationMotor {
    selector: BackendSelector,
    state: Mutex<MotorState>,
    observers: Arc<ObserverList>,
}

impl Default for VibrationMotor {
    fn default() -> Self {
        Self::new()
    }
}

impl VibrationMotor {
    /// A facade over the stock architecture-probing selector.
    pub fn new() -> Self {
        Self::with_selector(BackendSelector::new())
    }

    /// A facade over a caller-supplied selector.
    pub fn with_selector(selector: BackendSelector) -> Self {
        Self {
            selector,
            state: Mutex::new(MotorState::default()),
            observers: Arc::new(ObserverList::default()),
        }
    }

    /// The process-wide facade instance.
    pub fn global() -> &'static VibrationMotor {
        GLOBAL.get_or_init(VibrationMotor::new)
    }

    /// The backend selector, for overrides.
    pub fn selector(&self) -> &BackendSelector {
        &self.selector
    }

    /// Whether the driver is currently initialized through this facade.
    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    /// Initialize or tear down the driver.
    ///
    /// A no-op when already in the requested state. The controller-change
    /// callback registers once, on the first successful initialization, and
    /// stays registered across later teardown/init cycles.
    pub fn set_init_state(&self, initialize: bool) -> Result<(), MotorError> {
        let mut state = self.state.lock();
        if state.initialized == initialize {
            return Ok(());
        }
        let backend = self.selector.resolve();
        if initialize {
            backend
                .initialize()
                .map_err(|e| MotorError::operation("failed to set initialization state", e))?;
            if !state.callback_registered {
                let observers = Arc::clone(&self.observers);
                // The native payload is deliberately dropped here: callers
                // only ever get the "controller set changed" signal.
                match backend.register_callback(Box::new(move |_payload: &[u8]| observers.notify()))
                {
                    Ok(()) => state.callback_registered = true,
                    Err(error) => {
                        tracing::warn!(%error, "controller-change callback registration failed");
                    }
                }
            }
            state.initialized = true;
            tracing::debug!("driver initialized");
        } else {
            backend
                .dispose()
                .map_err(|e| MotorError::operation("failed to set initialization state", e))?;
            state.initialized = false;
            tracing::debug!("driver disposed");
        }
        Ok(())
    }

    /// Subscribe to controller attachment changes.
    ///
    /// Observers fire with no payload; the underlying native callback data
    /// is discarded at the boundary.
    pub fn on_controller_change(&self, observer: impl Fn() + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Play an HE payload. Empty payloads are a silent no-op.
    pub fn play(&self, he: &str, options: &VibrationOptions) -> Result<(), MotorError> {
        if he.is_empty() {
            return Ok(());
        }
        tracing::debug!(bytes = he.len(), "playing effect");
        self.selector
            .resolve()
            .play(
                he,
                options.loop_count_wire(),
                options.loop_interval_wire(),
                options.gain_wire(),
                options.frequency_factor_wire(),
            )
            .map_err(|e| MotorError::operation("failed to play", e))
    }

    /// Play an HE payload from `start` to its end.
    pub fn play_from(
        &self,
        he: &str,
        start: Duration,
        options: &VibrationOptions,
    ) -> Result<(), MotorError> {
        if he.is_empty() {
            return Ok(());
        }
        self.play_section_wire(he, options, wire_milliseconds(start), i32::MAX)
    }

    /// Play the `start..end` window of an HE payload.
    ///
    /// An empty window (`end <= start`) is a silent no-op by contract, not
    /// an error.
    pub fn play_section(
        &self,
        he: &str,
        start: Duration,
        end: Duration,
        options: &VibrationOptions,
    ) -> Result<(), MotorError> {
        if he.is_empty() || end <= start {
            return Ok(());
        }
        self.play_section_wire(
            he,
            options,
            wire_milliseconds(start),
            wire_milliseconds(end),
        )
    }

    /// Play an in-memory effect description.
    ///
    /// The description serializes through its display form, which never
    /// fails, so this has the same error surface as [`play`](Self::play).
    pub fn play_effect(
        &self,
        he: &HapticEffect,
        options: &VibrationOptions,
    ) -> Result<(), MotorError> {
        self.play(&he.to_string(), options)
    }

    /// Play an in-memory effect description from `start` to its end.
    pub fn play_effect_from(
        &self,
        he: &HapticEffect,
        start: Duration,
        options: &VibrationOptions,
    ) -> Result<(), MotorError> {
        self.play_from(&he.to_string(), start, options)
    }

    /// Play the `start..end` window of an in-memory effect description.
    pub fn play_effect_section(
        &self,
        he: &HapticEffect,
        start: Duration,
        end: Duration,
        options: &VibrationOptions,
    ) -> Result<(), MotorError> {
        self.play_section(&he.to_string(), start, end, options)
    }

    /// Play an HE file.
    pub fn play_file(
        &self,
        path: impl AsRef<Path>,
        options: &VibrationOptions,
    ) -> Result<(), MotorError> {
        let he = fs::read_to_string(path)?;
        self.play(&he, options)
    }

    /// Play an HE file from `start` to its end.
    pub fn play_file_from(
        &self,
        path: impl AsRef<Path>,
        start: Duration,
        options: &VibrationOptions,
    ) -> Result<(), MotorError> {
        let he = fs::read_to_string(path)?;
        self.play_from(&he, start, options)
    }

    /// Play the `start..end` window of an HE file.
    pub fn play_file_section(
        &self,
        path: impl AsRef<Path>,
        start: Duration,
        end: Duration,
        options: &VibrationOptions,
    ) -> Result<(), MotorError> {
        let he = fs::read_to_string(path)?;
        self.play_section(&he, start, end, options)
    }

    fn play_section_wire(
        &self,
        he: &str,
        options: &VibrationOptions,
        start_ms: i32,
        end_ms: i32,
    ) -> Result<(), MotorError> {
        tracing::debug!(bytes = he.len(), start_ms, end_ms, "playing effect section");
        self.selector
            .resolve()
            .play_section(
                he,
                options.loop_count_wire(),
                options.loop_interval_wire(),
                options.gain_wire(),
                options.frequency_factor_wire(),
                start_ms,
                end_ms,
            )
            .map_err(|e| MotorError::operation("failed to play", e))
    }

    /// Stop the current playback.
    pub fn stop(&self) -> Result<(), MotorError> {
        self.selector
            .resolve()
            .stop()
            .map_err(|e| MotorError::operation("failed to stop", e))
    }

    /// Retune a looping playback in flight.
    pub fn update_loop_parameters(
        &self,
        interval: Duration,
        gain: f64,
        frequency_factor: f64,
    ) -> Result<(), MotorError> {
        self.selector
            .resolve()
            .send_loop_parameters(
                wire_milliseconds(interval),
                gain_to_wire(gain),
                frequency_factor_to_wire(frequency_factor),
            )
            .map_err(|e| MotorError::operation("failed to update loop parameters", e))
    }

    /// Configure an adaptive trigger over the `start..end` window.
    #[allow(clippy::too_many_arguments)]
    pub fn set_trigger(
        &self,
        index: i32,
        mode: i32,
        amplitude: i32,
        frequency: i32,
        resistive: i32,
        start: Duration,
        end: Duration,
    ) -> Result<(), MotorError> {
        self.selector
            .resolve()
            .set_trigger(
                index,
                mode,
                amplitude,
                frequency,
                resistive,
                wire_milliseconds(start),
                wire_milliseconds(end),
            )
            .map_err(|e| MotorError::operation("failed to set trigger", e))
    }

    /// Set the hardware strength gain for one controller.
    pub fn set_strength_gain(&self, index: i32, value: i32) -> Result<bool, MotorError> {
        self.selector
            .resolve()
            .set_strength_gain(index, value)
            .map_err(|e| MotorError::operation("failed to set strength gain", e))
    }

    /// Toggle the controller's signal converter.
    pub fn set_signal_converter(&self, enabled: bool) -> Result<bool, MotorError> {
        self.selector
            .resolve()
            .set_signal_converter_state(enabled)
            .map_err(|e| MotorError::operation("failed to set signal converter state", e))
    }

    /// Toggle the controller's rumble effect.
    pub fn set_rumble(&self, enabled: bool) -> Result<bool, MotorError> {
        self.selector
            .resolve()
            .set_rumble_state(enabled)
            .map_err(|e| MotorError::operation("failed to set rumble state", e))
    }

    /// Names of the connected game controllers, in driver order.
    ///
    /// Best-effort enumeration: an empty or unparsable payload, or any
    /// backend failure, yields an empty list rather than an error.
    pub fn list_game_controllers(&self) -> Vec<String> {
        match self.selector.resolve().list_game_controllers_raw() {
            Ok(raw) => parse_controller_list(&raw),
            Err(error) => {
                tracing::debug!(%error, "controller enumeration unavailable");
                Vec::new()
            }
        }
    }

    /// The driver's version string.
    pub fn version(&self) -> Result<String, MotorError> {
        self.selector
            .resolve()
            .get_version()
            .map_err(|e| MotorError::operation("failed to query version", e))
    }

    /// Toggle the native debug log. Fire-and-forget: delivery failures are
    /// logged, never surfaced.
    pub fn set_debug_log(&self, enabled: bool) {
        if let Err(error) = self.selector.resolve().set_debug_log(enabled) {
            tracing::debug!(%error, "debug-log toggle not delivered");
        }
    }
}

/// Extract the `controllers` name list from the driver's JSON payload.
/// Anything malformed, including non-string entries, degrades to as many
/// names as could be read.
fn parse_controller_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return Vec::new();
    };
    let Some(names) = value.get("controllers").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    names
        .iter()
        .filter_map(|name| name.as_str().map(str::to_owned))
        .collect()
}
