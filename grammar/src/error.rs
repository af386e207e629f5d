use std::fmt;

/// A `GrammarError` (spec §7): ambiguity, left-recursion, or an undefined
/// symbol discovered while building one unit's grammar. Grammar errors are
/// unit-scoped (spec §4.8 "Failure semantics") — collected per affected
/// unit rather than aborting the whole build, so `Grammar::build` keeps
/// going and lets every other unit finish.
#[derive(Debug, Clone)]
pub struct GrammarError {
    messages: Vec<String>,
}

impl GrammarError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { messages: vec![message.into()] }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub(crate) fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("\n"))
    }
}

impl std::error::Error for GrammarError {}
