//! Diagnostic system for errors and warnings
//!
//! All lexer, parser, capability, and runtime failures flow through the
//! unified Diagnostic type. Note that diagnostics are internal: the engine
//! collapses them into a single fixed learner-facing message at the run
//! boundary, keeping the rich form for tests and tooling.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Failure that prevents the snippet from running
    Error,
    /// Advisory that does not prevent the snippet from running
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message (error or warning)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Error code (e.g., "SP1000")
    pub code: String,
    /// Main diagnostic message
    pub message: String,
    /// Source span
    pub span: Span,
    /// Line number (1-based)
    pub line: usize,
    /// Source line string
    pub snippet: String,
    /// Short label for the span
    pub label: String,
}

impl Diagnostic {
    /// Create a new error diagnostic with code
    pub fn error_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            code: code.into(),
            message: message.into(),
            span,
            line: 1,
            snippet: String::new(),
            label: String::new(),
        }
    }

    /// Create a new warning diagnostic with code
    pub fn warning_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            code: code.into(),
            message: message.into(),
            span,
            line: 1,
            snippet: String::new(),
            label: String::new(),
        }
    }

    /// Create a new error diagnostic (uses generic error code)
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::error_with_code("SP9999", message, span)
    }

    /// Set the line number
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Set the snippet (source line)
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Set the label (caret description)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Format as human-readable string
    pub fn to_human_string(&self) -> String {
        let mut output = String::new();

        // Header: error[SP1000]: Unexpected character '&'
        output.push_str(&format!(
            "{}[{}]: {}\n",
            self.level, self.code, self.message
        ));

        // Location: --> line 12
        output.push_str(&format!("  --> line {}\n", self.line));

        if !self.snippet.is_empty() {
            output.push_str(&format!("   | {}\n", self.snippet));
        }

        if !self.label.is_empty() {
            output.push_str(&format!("   = {}\n", self.label));
        }

        output
    }
}
