//! Architecture-based backend selection with a local fallback.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::MotorBackend;
use crate::native::NativeBackend;

/// Processor architecture classes the driver ships module variants for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// 64-bit x86.
    X64,
    /// 32-bit x86.
    X86,
    /// 64-bit ARM.
    Arm64,
}

impl Arch {
    /// Classify the running process. Architectures without a dedicated
    /// module variant use the 64-bit default.
    pub fn current() -> Self {
        Self::classify(std::env::consts::ARCH)
    }

    fn classify(arch: &str) -> Self {
        match arch {
            "x86" => Arch::X86,
            "aarch64" => Arch::Arm64,
            _ => Arch::X64,
        }
    }
}

type BackendFactory = Box<dyn Fn() -> Arc<dyn MotorBackend> + Send + Sync>;

/// The process-lifetime backend choice: a lazy, guarded, overridable cell.
///
/// The first [`resolve`](Self::resolve) probes and caches while holding the
/// guard, so concurrent first calls serialize into exactly one selection
/// and every caller observes the same adapter identity. The `use_*`
/// overrides replace the cached choice at any time and take effect for
/// calls issued afterwards.
pub struct BackendSelector {
    resolved: Mutex<Option<Arc<dyn MotorBackend>>>,
    factory: BackendFactory,
}

impl Default for BackendSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendSelector {
    /// A selector using the stock architecture probe.
    pub fn new() -> Self {
        Self::with_factory(|| select(Arch::current()))
    }

    /// A selector with a caller-supplied selection routine.
    pub fn with_factory(
        factory: impl Fn() -> Arc<dyn MotorBackend> + Send + Sync + 'static,
    ) -> Self {
        Self {
            resolved: Mutex::new(None),
            factory: Box::new(factory),
        }
    }

    /// The active backend, resolving on first use.
    pub fn resolve(&self) -> Arc<dyn MotorBackend> {
        let mut slot = self.resolved.lock();
        if let Some(backend) = slot.as_ref() {
            return Arc::clone(backend);
        }
        let backend = (self.factory)();
        *slot = Some(Arc::clone(&backend));
        backend
    }

    /// Force the 64-bit adapter.
    pub fn use_x64(&self) {
        self.use_backend(Arc::new(NativeBackend::x64()));
    }

    /// Force the 32-bit adapter.
    pub fn use_x86(&self) {
        self.use_backend(Arc::new(NativeBackend::x86()));
    }

    /// Force the ARM64 adapter.
    pub fn use_arm64(&self) {
        self.use_backend(Arc::new(NativeBackend::arm64()));
    }

    /// Force the local fallback adapter.
    pub fn use_local(&self) {
        self.use_backend(Arc::new(NativeBackend::local()));
    }

    /// Install an arbitrary adapter, overwriting any cached resolution.
    pub fn use_backend(&self, backend: Arc<dyn MotorBackend>) {
        *self.resolved.lock() = Some(backend);
    }
}

/// Stock selection: the architecture-matched module variant, with the local
/// module as fallback when the match is absent.
pub fn select(arch: Arch) -> Arc<dyn MotorBackend> {
    tracing::debug!(?arch, "resolving native backend");
    let candidate: Arc<dyn MotorBackend> = match arch {
        Arch::X64 => Arc::new(NativeBackend::x64()),
        Arch::X86 => Arc::new(NativeBackend::x86()),
        Arch::Arm64 => Arc::new(NativeBackend::arm64()),
    };
    apply_fallback(candidate, Arc::new(NativeBackend::local()))
}

/// Fallback policy, a pure function of the two probe results: keep the
/// candidate unless its module is absent and the local one is present.
///
/// An unavailable candidate without a usable fallback is kept on purpose so
/// that a later `initialize` fails loudly, rather than silently binding a
/// different still-wrong module.
pub fn apply_fallback(
    candidate: Arc<dyn MotorBackend>,
    local: Arc<dyn MotorBackend>,
) -> Arc<dyn MotorBackend> {
    if candidate.available() {
        return candidate;
    }
    if local.available() {
        tracing::info!("architecture-matched driver module missing, using local fallback");
        return local;
    }
    tracing::warn!("no native driver module found; initialization will fail");
    candidate
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::backend::ControllerChangeCallback;
    use crate::error::BackendError;

    /// Probe-only fake: `available` answers, everything else is unreachable
    /// in these tests and reports `NotLoaded`.
    struct ProbeBackend {
        available: bool,
    }

    impl MotorBackend for ProbeBackend {
        fn available(&self) -> bool {
            self.available
        }
        fn initialize(&self) -> Result<(), BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn register_callback(&self, _: ControllerChangeCallback) -> Result<(), BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn dispose(&self) -> Result<(), BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn play(&self, _: &str, _: i32, _: i32, _: i32, _: i32) -> Result<(), BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn play_section(
            &self,
            _: &str,
            _: i32,
            _: i32,
            _: i32,
            _: i32,
            _: i32,
            _: i32,
        ) -> Result<(), BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn stop(&self) -> Result<(), BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn send_loop_parameters(&self, _: i32, _: i32, _: i32) -> Result<(), BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn set_trigger(
            &self,
            _: i32,
            _: i32,
            _: i32,
            _: i32,
            _: i32,
            _: i32,
            _: i32,
        ) -> Result<(), BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn list_game_controllers_raw(&self) -> Result<String, BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn set_strength_gain(&self, _: i32, _: i32) -> Result<bool, BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn set_signal_converter_state(&self, _: bool) -> Result<bool, BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn set_rumble_state(&self, _: bool) -> Result<bool, BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn get_version(&self) -> Result<String, BackendError> {
            Err(BackendError::NotLoaded)
        }
        fn set_debug_log(&self, _: bool) -> Result<(), BackendError> {
            Err(BackendError::NotLoaded)
        }
    }

    fn probe(available: bool) -> Arc<dyn MotorBackend> {
        Arc::new(ProbeBackend { available })
    }

    #[test]
    fn test_arch_classification() {
        assert_eq!(Arch::classify("x86_64"), Arch::X64);
        assert_eq!(Arch::classify("x86"), Arch::X86);
        assert_eq!(Arch::classify("aarch64"), Arch::Arm64);
        // Anything unrecognized is treated as the 64-bit default.
        assert_eq!(Arch::classify("riscv64"), Arch::X64);
    }

    #[test]
    fn test_available_candidate_wins() {
        let candidate = probe(true);
        let chosen = apply_fallback(Arc::clone(&candidate), probe(true));
        assert!(Arc::ptr_eq(&candidate, &chosen));
    }

    #[test]
    fn test_missing_candidate_falls_back_to_local() {
        let local = probe(true);
        let chosen = apply_fallback(probe(false), Arc::clone(&local));
        assert!(Arc::ptr_eq(&local, &chosen));
    }

    #[test]
    fn test_nothing_available_keeps_the_candidate() {
        let candidate = probe(false);
        let chosen = apply_fallback(Arc::clone(&candidate), probe(false));
        assert!(Arc::ptr_eq(&candidate, &chosen));
    }

    #[test]
    fn test_resolution_is_cached() {
        let selector = BackendSelector::with_factory(|| probe(true));
        let first = selector.resolve();
        let second = selector.resolve();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_override_replaces_cached_resolution() {
        let selector = BackendSelector::with_factory(|| probe(true));
        let resolved = selector.resolve();

        let forced = probe(false);
        selector.use_backend(Arc::clone(&forced));
        let after = selector.resolve();

        assert!(!Arc::ptr_eq(&resolved, &after));
        assert!(Arc::ptr_eq(&forced, &after));
    }
}
