use crate::error::{Result, TidyError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Receives the human-readable diagnostics rules emit.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, message: &str);
}

/// Forwards diagnostics to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Buffers diagnostics so a driver can print them next to the rule result.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Drains everything collected so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    // A panic in another holder must not cost us diagnostics.
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, message: &str) {
        tracing::debug!("{}", message);
        self.lock().push(message.to_string());
    }
}

/// Per-library metadata every rule can read.
#[derive(Clone)]
pub struct RuleContext {
    library_name: String,
    target_path: PathBuf,
    maturity_states: Vec<String>,
    sink: Arc<dyn DiagnosticSink>,
}

impl RuleContext {
    pub fn new(
        library_name: impl Into<String>,
        target_path: impl Into<PathBuf>,
        maturity_states: Vec<String>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self> {
        if maturity_states.is_empty() {
            return Err(TidyError::Config(
                "the library maturity model must declare at least one state".to_string(),
            ));
        }

        Ok(Self {
            library_name: library_name.into(),
            target_path: target_path.into(),
            maturity_states,
            sink,
        })
    }

    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub fn maturity_states(&self) -> &[String] {
        &self.maturity_states
    }

    pub fn log(&self, message: &str) {
        self.sink.emit(message);
    }
}

impl std::fmt::Debug for RuleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleContext")
            .field("library_name", &self.library_name)
            .field("target_path", &self.target_path)
            .field("maturity_states", &self.maturity_states)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states() -> Vec<String> {
        vec!["UNDER_DEVELOPMENT".to_string(), "RETIRED".to_string()]
    }

    #[test]
    fn test_context_rejects_empty_maturity_model() {
        let result = RuleContext::new("foo", "README.md", Vec::new(), Arc::new(TracingSink));
        assert!(matches!(result, Err(TidyError::Config(_))));
    }

    #[test]
    fn test_context_logs_to_sink() {
        let sink = Arc::new(CollectingSink::new());
        let context = RuleContext::new("foo", "lib/README.md", states(), sink.clone()).unwrap();

        assert_eq!(context.library_name(), "foo");
        assert_eq!(context.target_path(), Path::new("lib/README.md"));
        assert_eq!(context.maturity_states().len(), 2);

        context.log("first");
        context.log("second");
        assert_eq!(sink.messages(), vec!["first", "second"]);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_collecting_sink_survives_poisoned_lock() {
        let sink = Arc::new(CollectingSink::new());
        sink.emit("before");

        let poisoner = sink.clone();
        let result = std::thread::spawn(move || {
            let _guard = poisoner.messages.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(sink.messages.is_poisoned());

        sink.emit("after");
        assert_eq!(sink.messages(), vec!["before", "after"]);
        assert_eq!(sink.take().len(), 2);
    }
}
