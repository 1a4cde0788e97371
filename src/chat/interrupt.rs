use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag observed by the chat loop at cycle boundaries.
#[derive(Debug, Clone, Default)]
pub struct InterruptSignal(Arc<AtomicBool>);

impl InterruptSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Spawns a task that triggers this signal on Ctrl+C.
    ///
    /// The first Ctrl+C is observed by the loop once the in-flight engine
    /// call returns. A second one exits the process immediately.
    /// Must be called from within a Tokio runtime.
    pub fn listen_for_ctrl_c(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to install Ctrl+C handler");
                return;
            }
            signal.trigger();
            tracing::debug!("interrupt requested");

            if tokio::signal::ctrl_c().await.is_ok() {
                super::ui::print_interrupted(&mut std::io::stdout());
                std::process::exit(0);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_starts_clear() {
        assert!(!InterruptSignal::new().is_triggered());
    }

    #[test]
    fn test_trigger_is_shared_between_clones() {
        let signal = InterruptSignal::new();
        let clone = signal.clone();
        clone.trigger();
        assert!(signal.is_triggered());
    }
}
