//! Error types for backend loading and motor operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures at the native adapter boundary.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The driver module for this adapter is not present on disk.
    #[error("native driver module not found: {path}")]
    Unavailable {
        /// Path the adapter probed.
        path: PathBuf,
    },

    /// The module exists but could not be loaded.
    #[error("failed to load native driver module: {0}")]
    Load(#[from] libloading::Error),

    /// A required entry point is missing from the module.
    #[error("native driver module is missing entry point `{symbol}`")]
    MissingSymbol {
        /// Name of the absent entry point.
        symbol: &'static str,
        /// Loader error for the lookup.
        #[source]
        source: libloading::Error,
    },

    /// An operation ran before `initialize` loaded the module.
    #[error("native driver module is not loaded")]
    NotLoaded,

    /// The payload cannot cross the C boundary.
    #[error("effect payload contains an interior NUL byte")]
    InvalidPayload(#[from] std::ffi::NulError),
}

impl BackendError {
    /// Create an [`Unavailable`](BackendError::Unavailable) error for `path`.
    pub fn unavailable(path: &Path) -> Self {
        BackendError::Unavailable {
            path: path.to_path_buf(),
        }
    }

    /// Whether this failure means there is no usable backend at all, as
    /// opposed to a failure of one particular call.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            BackendError::Unavailable { .. } | BackendError::NotLoaded
        )
    }
}

/// Operational failures surfaced by [`VibrationMotor`](crate::VibrationMotor).
///
/// Consumers see typed failures only from initialization, playback, stop,
/// loop updates, and effect-file loading; every other facade operation is
/// total over its input domain.
#[derive(Debug, Error)]
pub enum MotorError {
    /// No working native adapter for this process, even after fallback.
    #[error("no usable native backend: {0}")]
    BackendUnavailable(#[source] BackendError),

    /// A native call failed during an operation. Carries the fixed
    /// operation description plus the underlying failure as context.
    #[error("{action}: {source}")]
    OperationFailed {
        /// Short fixed description of the failed operation.
        action: &'static str,
        /// The native-layer failure.
        #[source]
        source: BackendError,
    },

    /// Reading an effect file failed.
    #[error("failed to read effect file: {0}")]
    Io(#[from] std::io::Error),
}

impl MotorError {
    /// Wrap a backend failure from `action`, keeping module absence
    /// distinct from the failure of an individual call.
    pub(crate) fn operation(action: &'static str, source: BackendError) -> Self {
        if source.is_unavailable() {
            MotorError::BackendUnavailable(source)
        } else {
            MotorError::OperationFailed { action, source }
        }
    }

    /// Whether this failure means no usable backend exists.
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, MotorError::BackendUnavailable(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn nul_error() -> std::ffi::NulError {
        std::ffi::CString::new("a\0b").unwrap_err()
    }

    #[test]
    fn test_errors_are_std_errors() {
        let err = BackendError::NotLoaded;
        let _: &dyn std::error::Error = &err;
        let err = MotorError::BackendUnavailable(BackendError::NotLoaded);
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_unavailable_predicate() {
        assert!(BackendError::unavailable(Path::new("x64/driver.dll")).is_unavailable());
        assert!(BackendError::NotLoaded.is_unavailable());
        assert!(!BackendError::InvalidPayload(nul_error()).is_unavailable());
    }

    #[test]
    fn test_operation_wrapping_routes_by_cause() {
        let err = MotorError::operation("failed to play", BackendError::NotLoaded);
        assert!(err.is_backend_unavailable());

        let err = MotorError::operation("failed to play", nul_error().into());
        assert!(matches!(
            err,
            MotorError::OperationFailed {
                action: "failed to play",
                ..
            }
        ));
        assert!(err.to_string().starts_with("failed to play"));
    }
}
