use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::NavConfig;
use crate::errors::ModelResult;
use crate::model::CodeModel;

type Probe = Box<dyn Fn() -> ModelResult<bool> + Send + Sync>;

/// Memoized "is this language's semantic support present" check.
///
/// The probe runs at most once per gate. A probe that errors or panics
/// counts as unavailable and is logged once at `warn`.
pub struct AvailabilityGate {
    language: String,
    probe: Probe,
    cached: OnceCell<bool>,
}

impl AvailabilityGate {
    pub fn new(
        language: impl Into<String>,
        probe: impl Fn() -> ModelResult<bool> + Send + Sync + 'static,
    ) -> Self {
        Self {
            language: language.into(),
            probe: Box::new(probe),
            cached: OnceCell::new(),
        }
    }

    /// A gate with a fixed answer.
    pub fn fixed(language: impl Into<String>, available: bool) -> Self {
        Self::new(language, move || Ok(available))
    }

    /// A gate that asks the code model, honouring `disabled_languages`.
    pub fn for_model(
        language: impl Into<String>,
        model: Arc<dyn CodeModel>,
        config: &NavConfig,
    ) -> Self {
        let language = language.into();
        if config.is_disabled(&language) {
            debug!(language = %language, "language disabled in config");
            return Self::fixed(language, false);
        }
        let probe_language = language.clone();
        Self::new(language, move || model.language_enabled(&probe_language))
    }

    pub fn is_available(&self) -> bool {
        *self.cached.get_or_init(|| {
            match panic::catch_unwind(AssertUnwindSafe(|| (self.probe)())) {
                Ok(Ok(available)) => {
                    debug!(language = %self.language, available, "language support probed");
                    available
                }
                Ok(Err(err)) => {
                    warn!(language = %self.language, error = %err, "language support probe failed");
                    false
                }
                Err(_) => {
                    warn!(language = %self.language, "language support probe panicked");
                    false
                }
            }
        })
    }
}

impl fmt::Debug for AvailabilityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailabilityGate")
            .field("language", &self.language)
            .field("cached", &self.cached.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ModelError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn support_check_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let gate = AvailabilityGate::new("go", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        });
        assert!(gate.is_available());
        assert!(gate.is_available());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_support_check_reports_unavailable() {
        let gate = AvailabilityGate::new("python", || {
            Err(ModelError::Introspection("plugin missing".to_string()))
        });
        assert!(!gate.is_available());
    }

    #[test]
    fn panicking_support_check_reports_unavailable() {
        let gate = AvailabilityGate::new("java", || panic!("host blew up"));
        assert!(!gate.is_available());
    }
}
