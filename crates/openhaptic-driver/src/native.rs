//! libloading-backed adapter over the fixed native entry-point set.
//!
//! One [`NativeBackend`] binds one vendor module variant. The module is
//! loaded on `initialize` and stays loaded for the process lifetime;
//! `dispose` runs the driver's teardown routine without unloading, so an
//! initialize/dispose/initialize sequence does not reload the module.

use std::ffi::{CStr, CString, c_char, c_int};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use parking_lot::Mutex;

use crate::backend::{ControllerChangeCallback, MotorBackend};
use crate::error::BackendError;

#[cfg(windows)]
const MODULE_FILE: &str = "HapticMotorSDK.dll";
#[cfg(all(unix, target_vendor = "apple"))]
const MODULE_FILE: &str = "libHapticMotorSDK.dylib";
#[cfg(all(unix, not(target_vendor = "apple")))]
const MODULE_FILE: &str = "libHapticMotorSDK.so";

type NativeControllerCallback = extern "C" fn(*const c_char, c_int);

type InitFn = unsafe extern "C" fn();
type RegisterCallbackFn = unsafe extern "C" fn(NativeControllerCallback);
type ReleaseFn = unsafe extern "C" fn();
type PlayFn = unsafe extern "C" fn(*const c_char, c_int, c_int, c_int, c_int);
type PlaySectionFn =
    unsafe extern "C" fn(*const c_char, c_int, c_int, c_int, c_int, c_int, c_int);
type StopFn = unsafe extern "C" fn();
type SendLoopParametersFn = unsafe extern "C" fn(c_int, c_int, c_int);
type SetTriggerModeFn = unsafe extern "C" fn(c_int, c_int, c_int, c_int, c_int, c_int, c_int);
type GetTextFn = unsafe extern "C" fn() -> *const c_char;
type SetStrengthGainFn = unsafe extern "C" fn(c_int, c_int) -> bool;
type EnableFn = unsafe extern "C" fn(bool) -> bool;
type EnableLogFn = unsafe extern "C" fn(bool);

/// The registered Rust-side callback. The native contract has no userdata
/// pointer, so dispatch goes through this process-wide slot.
static CONTROLLER_CALLBACK: Mutex<Option<ControllerChangeCallback>> = Mutex::new(None);

extern "C" fn controller_change_trampoline(data: *const c_char, size: c_int) {
    let payload: Vec<u8> = if data.is_null() || size <= 0 {
        Vec::new()
    } else {
        // SAFETY: the driver passes a buffer of `size` bytes that is valid
        // for the duration of the call; it is copied out before returning.
        unsafe { std::slice::from_raw_parts(data.cast::<u8>(), size as usize) }.to_vec()
    };
    if let Some(callback) = CONTROLLER_CALLBACK.lock().as_ref() {
        callback(&payload);
    }
}

/// A libloading-backed adapter over one native driver module.
pub struct NativeBackend {
    path: PathBuf,
    lib: Mutex<Option<Library>>,
}

impl NativeBackend {
    /// The 64-bit module variant (`x64/` next to the process).
    pub fn x64() -> Self {
        Self::at(Path::new("x64").join(MODULE_FILE))
    }

    /// The 32-bit module variant.
    pub fn x86() -> Self {
        Self::at(Path::new("x86").join(MODULE_FILE))
    }

    /// The ARM64 module variant.
    pub fn arm64() -> Self {
        Self::at(Path::new("arm64").join(MODULE_FILE))
    }

    /// The local fallback: the bare module name, resolved against the
    /// process working directory.
    pub fn local() -> Self {
        Self::at(PathBuf::from(MODULE_FILE))
    }

    /// An adapter over an explicit module path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lib: Mutex::new(None),
        }
    }

    /// The module path this adapter binds.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn call<R>(&self, f: impl FnOnce(&Library) -> Result<R, BackendError>) -> Result<R, BackendError> {
        let guard = self.lib.lock();
        match guard.as_ref() {
            Some(lib) => f(lib),
            None => Err(BackendError::NotLoaded),
        }
    }
}

fn symbol<'l, T>(lib: &'l Library, name: &'static str) -> Result<Symbol<'l, T>, BackendError> {
    // SAFETY: the entry points of the vendor module match the signatures
    // declared above; this is the fixed native call contract.
    unsafe { lib.get(name.as_bytes()) }
        .map_err(|source| BackendError::MissingSymbol { symbol: name, source })
}

fn c_payload(text: &str) -> Result<CString, BackendError> {
    Ok(CString::new(text)?)
}

/// Normalize a native string return (possibly null, ANSI/UTF-8 bytes) into
/// plain text.
fn decode_text(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: non-null string returns from the driver are NUL-terminated
    // and stay valid until the next driver call.
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

impl MotorBackend for NativeBackend {
    fn available(&self) -> bool {
        self.path.exists()
    }

    fn initialize(&self) -> Result<(), BackendError> {
        let mut slot = self.lib.lock();
        if slot.is_none() {
            if !self.path.exists() {
                return Err(BackendError::unavailable(&self.path));
            }
            // SAFETY: loading runs the module's own init routines; the
            // module is the vendor driver this adapter exists to bind.
            let lib = unsafe { Library::new(&self.path) }?;
            tracing::info!(path = %self.path.display(), "native driver module loaded");
            *slot = Some(lib);
        }
        let lib = slot.as_ref().ok_or(BackendError::NotLoaded)?;
        let init = symbol::<InitFn>(lib, "Init")?;
        // SAFETY: `Init` takes no arguments and is callable repeatedly.
        unsafe { init() };
        Ok(())
    }

    fn register_callback(&self, callback: ControllerChangeCallback) -> Result<(), BackendError> {
        *CONTROLLER_CALLBACK.lock() = Some(callback);
        self.call(|lib| {
            let register = symbol::<RegisterCallbackFn>(lib, "RegisterCallback")?;
            // SAFETY: the trampoline matches the driver's callback signature
            // and, being a static item, outlives the registration.
            unsafe { register(controller_change_trampoline) };
            Ok(())
        })
    }

    fn dispose(&self) -> Result<(), BackendError> {
        self.call(|lib| {
            let release = symbol::<ReleaseFn>(lib, "Release")?;
            // SAFETY: `Release` takes no arguments.
            unsafe { release() };
            Ok(())
        })
    }

    fn play(
        &self,
        he: &str,
        loop_count: i32,
        interval_ms: i32,
        intensity: i32,
        frequency: i32,
    ) -> Result<(), BackendError> {
        let payload = c_payload(he)?;
        self.call(|lib| {
            let play = symbol::<PlayFn>(lib, "Play")?;
            // SAFETY: the payload outlives the call; numerics are plain c_int.
            unsafe { play(payload.as_ptr(), loop_count, interval_ms, intensity, frequency) };
            Ok(())
        })
    }

    fn play_section(
        &self,
        he: &str,
        loop_count: i32,
        interval_ms: i32,
        intensity: i32,
        frequency: i32,
        start_ms: i32,
        end_ms: i32,
    ) -> Result<(), BackendError> {
        let payload = c_payload(he)?;
        self.call(|lib| {
            let play = symbol::<PlaySectionFn>(lib, "PlaySection")?;
            // SAFETY: the payload outlives the call; numerics are plain c_int.
            unsafe {
                play(
                    payload.as_ptr(),
                    loop_count,
                    interval_ms,
                    intensity,
                    frequency,
                    start_ms,
                    end_ms,
                )
            };
            Ok(())
        })
    }

    fn stop(&self) -> Result<(), BackendError> {
        self.call(|lib| {
            let stop = symbol::<StopFn>(lib, "Stop")?;
            // SAFETY: `Stop` takes no arguments.
            unsafe { stop() };
            Ok(())
        })
    }

    fn send_loop_parameters(
        &self,
        interval_ms: i32,
        intensity: i32,
        frequency: i32,
    ) -> Result<(), BackendError> {
        self.call(|lib| {
            let send = symbol::<SendLoopParametersFn>(lib, "SendLoopParameters")?;
            // SAFETY: numerics are plain c_int.
            unsafe { send(interval_ms, intensity, frequency) };
            Ok(())
        })
    }

    fn set_trigger(
        &self,
        index: i32,
        mode: i32,
        amplitude: i32,
        frequency: i32,
        resistive: i32,
        start_ms: i32,
        end_ms: i32,
    ) -> Result<(), BackendError> {
        self.call(|lib| {
            let set = symbol::<SetTriggerModeFn>(lib, "SetTriggerMode")?;
            // SAFETY: numerics are plain c_int.
            unsafe { set(index, mode, amplitude, frequency, resistive, start_ms, end_ms) };
            Ok(())
        })
    }

    fn list_game_controllers_raw(&self) -> Result<String, BackendError> {
        self.call(|lib| {
            let get = symbol::<GetTextFn>(lib, "GetConnectedGameControllers")?;
            // SAFETY: returns a NUL-terminated string or null.
            let ptr = unsafe { get() };
            Ok(decode_text(ptr))
        })
    }

    fn set_strength_gain(&self, index: i32, value: i32) -> Result<bool, BackendError> {
        self.call(|lib| {
            let set = symbol::<SetStrengthGainFn>(lib, "SetStrengthGain")?;
            // SAFETY: numerics are plain c_int; the return is a C bool.
            Ok(unsafe { set(index, value) })
        })
    }

    fn set_signal_converter_state(&self, enabled: bool) -> Result<bool, BackendError> {
        self.call(|lib| {
            let set = symbol::<EnableFn>(lib, "EnableSignalConverter")?;
            // SAFETY: bool crosses as a C bool both ways.
            Ok(unsafe { set(enabled) })
        })
    }

    fn set_rumble_state(&self, enabled: bool) -> Result<bool, BackendError> {
        self.call(|lib| {
            let set = symbol::<EnableFn>(lib, "EnableRumble")?;
            // SAFETY: bool crosses as a C bool both ways.
            Ok(unsafe { set(enabled) })
        })
    }

    fn get_version(&self) -> Result<String, BackendError> {
        self.call(|lib| {
            let get = symbol::<GetTextFn>(lib, "GetVersionName")?;
            // SAFETY: returns a NUL-terminated string or null.
            let ptr = unsafe { get() };
            Ok(decode_text(ptr))
        })
    }

    fn set_debug_log(&self, enabled: bool) -> Result<(), BackendError> {
        self.call(|lib| {
            let enable = symbol::<EnableLogFn>(lib, "EnableLog")?;
            // SAFETY: bool crosses as a C bool.
            unsafe { enable(enabled) };
            Ok(())
        })
    }
}
