use crate::error::AppError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Moves the pointer by a visually negligible offset.
pub trait PointerInjector: Send + Sync {
    fn nudge(&self) -> Result<(), AppError>;
}

impl<T: PointerInjector + ?Sized> PointerInjector for Arc<T> {
    fn nudge(&self) -> Result<(), AppError> {
        (**self).nudge()
    }
}

/// Injector that replays a fixed script of outcomes instead of touching the
/// pointer. The last entry repeats once the script is exhausted.
pub struct ScriptedInjector {
    script: Vec<bool>,
    calls: AtomicUsize,
}

impl ScriptedInjector {
    pub fn new(script: Vec<bool>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(vec![true])
    }

    pub fn failing() -> Self {
        Self::new(vec![false])
    }

    /// Number of nudges attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PointerInjector for ScriptedInjector {
    fn nudge(&self) -> Result<(), AppError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let succeed = self
            .script
            .get(call)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or(false);

        if succeed {
            Ok(())
        } else {
            Err(AppError::Injection(format!("scripted failure on call {}", call + 1)))
        }
    }
}
