//! The capability set every backend adapter implements.

use crate::error::BackendError;

/// Callback handed to [`MotorBackend::register_callback`].
///
/// Invoked when the attached game-controller set changes. The slice is the
/// raw payload the native side delivered; the facade deliberately discards
/// it past the "something changed" signal.
pub type ControllerChangeCallback = Box<dyn Fn(&[u8]) + Send + Sync>;

/// One concrete binding to a native motor driver variant.
///
/// Stock implementations bind the per-architecture vendor modules plus the
/// local fallback; anything implementing this set can be installed through
/// [`BackendSelector::use_backend`](crate::BackendSelector::use_backend).
///
/// Payloads cross the boundary as UTF-8 text and every numeric field is a
/// 32-bit integer, matching the fixed native call contract.
pub trait MotorBackend: Send + Sync {
    /// Cheap existence probe. Must not attempt initialization; this runs
    /// during backend selection, possibly against a module that will never
    /// be used.
    fn available(&self) -> bool;

    /// Load the module and run the driver's init routine.
    fn initialize(&self) -> Result<(), BackendError>;

    /// Register the controller-attachment callback with the driver.
    fn register_callback(&self, callback: ControllerChangeCallback) -> Result<(), BackendError>;

    /// Run the driver's teardown routine.
    fn dispose(&self) -> Result<(), BackendError>;

    /// Start playback of an HE payload.
    fn play(
        &self,
        he: &str,
        loop_count: i32,
        interval_ms: i32,
        intensity: i32,
        frequency: i32,
    ) -> Result<(), BackendError>;

    /// Start playback of a time window of an HE payload.
    #[allow(clippy::too_many_arguments)]
    fn play_section(
        &self,
        he: &str,
        loop_count: i32,
        interval_ms: i32,
        intensity: i32,
        frequency: i32,
        start_ms: i32,
        end_ms: i32,
    ) -> Result<(), BackendError>;

    /// Stop the current playback.
    fn stop(&self) -> Result<(), BackendError>;

    /// Retune a looping playback in flight.
    fn send_loop_parameters(
        &self,
        interval_ms: i32,
        intensity: i32,
        frequency: i32,
    ) -> Result<(), BackendError>;

    /// Configure an adaptive trigger.
    #[allow(clippy::too_many_arguments)]
    fn set_trigger(
        &self,
        index: i32,
        mode: i32,
        amplitude: i32,
        frequency: i32,
        resistive: i32,
        start_ms: i32,
        end_ms: i32,
    ) -> Result<(), BackendError>;

    /// Raw connected-controller payload, a JSON object with a `controllers`
    /// name list.
    fn list_game_controllers_raw(&self) -> Result<String, BackendError>;

    /// Set the hardware strength gain for one controller.
    fn set_strength_gain(&self, index: i32, value: i32) -> Result<bool, BackendError>;

    /// Toggle the controller's signal converter.
    fn set_signal_converter_state(&self, enabled: bool) -> Result<bool, BackendError>;

    /// Toggle the controller's rumble effect.
    fn set_rumble_state(&self, enabled: bool) -> Result<bool, BackendError>;

    /// The driver's version string.
    fn get_version(&self) -> Result<String, BackendError>;

    /// Toggle the driver's debug log output.
    fn set_debug_log(&self, enabled: bool) -> Result<(), BackendError>;
}
