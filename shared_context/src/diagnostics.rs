use crate::source_map::SourceMap;
use crate::Span;
use std::fmt;

/// Severity of a single diagnostic (§6 "Error channel": every diagnostic
/// carries `severity × source-location × message`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
    /// A violated compiler invariant. Distinct from `Error` in that it
    /// should never occur for well-formed input (§7: "always a bug").
    Internal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Internal => "internal error",
        };
        write!(f, "{s}")
    }
}

/// A single diagnostic: a severity, a source location, and a message.
/// Rendered as `path:line:col: severity: message` (§7 user-visible
/// behavior).
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file_name: String,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, file_name: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity,
            file_name: file_name.into(),
            span,
            message: message.into(),
        }
    }

    /// Renders the one-line `path:line:col: severity: message` form.
    pub fn one_liner(&self) -> String {
        let col = self.span.get_start_and_line().0;
        format!(
            "{}:{}:{}: {}: {}",
            self.file_name, self.span.line, col, self.severity, self.message
        )
    }

    /// Renders the caret/tilde excerpt via the owning file's `SourceMap`,
    /// matching the teacher's `SourceMap::format_message`.
    pub fn with_excerpt(&self, source_map: &SourceMap) -> String {
        source_map.format_message(self.message.clone(), self.span)
    }
}

/// Accumulates diagnostics for an entire compilation run. Every pass
/// pushes into the same sink rather than aborting immediately (§7:
/// "Any pass that detects errors still completes its traversal to surface
/// as many as possible").
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.records.push(diagnostic);
    }

    pub fn error(&mut self, file_name: impl Into<String>, span: Span, message: impl Into<String>) {
        self.push(Diagnostic::new(Severity::Error, file_name, span, message));
    }

    pub fn warning(&mut self, file_name: impl Into<String>, span: Span, message: impl Into<String>) {
        self.push(Diagnostic::new(Severity::Warning, file_name, span, message));
    }

    pub fn has_errors(&self) -> bool {
        self.records
            .iter()
            .any(|d| matches!(d.severity, Severity::Error | Severity::Internal))
    }

    pub fn error_count(&self) -> usize {
        self.records
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error | Severity::Internal))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// §6: "Exit code 0 on success; nonzero if any `error` diagnostic was
    /// emitted."
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() { 1 } else { 0 }
    }
}
