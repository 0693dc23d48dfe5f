//! Core logging types: outcome entries, status, and the [`Log`] trait.

/// Result of acting on one dotfile, kept for the run summary.
#[derive(Debug, Clone)]
pub struct OutcomeEntry {
    /// Home-side path of the dotfile.
    pub name: String,
    /// Final status.
    pub status: OutcomeStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed dotfile operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// The change was applied.
    Ok,
    /// Nothing to do; the dotfile was already in the requested state.
    Unchanged,
    /// Dry-run mode; the change was only reported.
    DryRun,
    /// The operation failed.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) writes through `tracing`; tests use a
/// capturing implementation.  The repository core reports rejected
/// candidates through this trait without knowing where the text ends up.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a dotfile outcome for the summary.
    fn record(&self, name: &str, status: OutcomeStatus, message: Option<&str>);
}
