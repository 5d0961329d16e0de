//! Engine: the public run boundary
//!
//! Pipeline per run: detect concepts, lex, parse, capability-check, then
//! interpret. A fresh interpreter is built for every run and dropped after,
//! so nothing leaks between runs.
//!
//! Learners see exactly one failure message no matter what went wrong; the
//! rich diagnostics stay attached to the error value for tests and tooling.

use crate::capabilities::Capabilities;
use crate::concepts::ConceptSet;
use crate::diagnostic::{Diagnostic, DiagnosticLevel};
use crate::interpreter::{Interpreter, DEFAULT_STEP_BUDGET};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::span::Span;
use crate::value::RuntimeError;
use thiserror::Error;

/// The one message learners ever see for a failed run
pub const USER_ERROR_MESSAGE: &str = "could not interpret this snippet";

/// Failure of a snippet run.
///
/// Displays as the fixed learner-facing message; the stage diagnostics ride
/// along for anyone who needs them.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("could not interpret this snippet")]
pub struct SnippetError {
    diagnostics: Vec<Diagnostic>,
}

impl SnippetError {
    fn new(diagnostics: Vec<Diagnostic>) -> Self {
        SnippetError { diagnostics }
    }

    /// The fixed learner-facing message
    pub fn message(&self) -> &'static str {
        USER_ERROR_MESSAGE
    }

    /// Internal diagnostics behind the collapsed message
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// The result of one run action
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Output log on success, collapsed error on failure
    pub output: Result<Vec<String>, SnippetError>,
    /// Concepts the snippet demonstrated, populated regardless of `output`
    pub concepts: ConceptSet,
}

/// Snippet engine, parameterized by capability set and step budget
#[derive(Debug, Clone)]
pub struct Engine {
    capabilities: Capabilities,
    step_budget: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// Engine with the full language unlocked and the default step budget
    pub fn new() -> Self {
        Engine {
            capabilities: Capabilities::full(),
            step_budget: DEFAULT_STEP_BUDGET,
        }
    }

    /// Restrict the engine to a capability set
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Override the execution step budget
    pub fn with_step_budget(mut self, step_budget: u64) -> Self {
        self.step_budget = step_budget;
        self
    }

    /// Run a snippet: concepts are detected from the raw source first, then
    /// the snippet is interpreted. Both halves are independent; a snippet
    /// that fails to run still reports the concepts it demonstrated.
    pub fn run(&self, source: &str) -> RunReport {
        RunReport {
            concepts: ConceptSet::detect(source),
            output: self.interpret(source),
        }
    }

    /// Parse and capability-check without executing. Returns any advisory
    /// warnings the front end produced.
    pub fn check(&self, source: &str) -> Result<Vec<Diagnostic>, SnippetError> {
        self.front_end(source).map(|(_, warnings)| warnings)
    }

    fn interpret(&self, source: &str) -> Result<Vec<String>, SnippetError> {
        let (program, _warnings) = self.front_end(source)?;

        Interpreter::new(self.step_budget)
            .run(&program)
            .map_err(|err| {
                let diag = enrich(source, runtime_error_to_diagnostic(&err));
                SnippetError::new(vec![diag])
            })
    }

    /// Lex, parse, and capability-check. Each stage stops the pipeline if it
    /// reports errors, with every error diagnostic of that stage retained;
    /// warnings accumulate across stages without stopping anything.
    fn front_end(
        &self,
        source: &str,
    ) -> Result<(crate::ast::Program, Vec<Diagnostic>), SnippetError> {
        let mut warnings = Vec::new();

        let mut lexer = Lexer::new(source);
        let (tokens, lex_diagnostics) = lexer.tokenize();
        let errors = split_errors(source, lex_diagnostics, &mut warnings);
        if !errors.is_empty() {
            return Err(SnippetError::new(errors));
        }

        let mut parser = Parser::new(tokens);
        let (program, parse_diagnostics) = parser.parse();
        let errors = split_errors(source, parse_diagnostics, &mut warnings);
        if !errors.is_empty() {
            return Err(SnippetError::new(errors));
        }

        let capability_diagnostics = self.capabilities.check(&program);
        let errors = split_errors(source, capability_diagnostics, &mut warnings);
        if !errors.is_empty() {
            return Err(SnippetError::new(errors));
        }

        Ok((program, warnings))
    }
}

/// Enrich stage diagnostics, keeping errors and moving warnings aside
fn split_errors(
    source: &str,
    diagnostics: Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) -> Vec<Diagnostic> {
    let mut errors = Vec::new();
    for diagnostic in diagnostics {
        let diagnostic = enrich(source, diagnostic);
        match diagnostic.level {
            DiagnosticLevel::Error => errors.push(diagnostic),
            DiagnosticLevel::Warning => warnings.push(diagnostic),
        }
    }
    errors
}

/// Fill in the line number and source line for a span-only diagnostic
fn enrich(source: &str, diagnostic: Diagnostic) -> Diagnostic {
    let (line, snippet) = locate(source, diagnostic.span);
    diagnostic.with_line(line).with_snippet(snippet)
}

fn locate(source: &str, span: Span) -> (usize, String) {
    let mut offset = 0;
    for (i, line) in source.lines().enumerate() {
        let end = offset + line.len();
        if span.start <= end {
            return (i + 1, line.to_string());
        }
        offset = end + 1;
    }
    (source.lines().count().max(1), String::new())
}

/// Map a runtime error onto the diagnostic taxonomy
fn runtime_error_to_diagnostic(err: &RuntimeError) -> Diagnostic {
    let code = match err {
        RuntimeError::TypeError { .. } => "SP0001",
        RuntimeError::UndefinedVariable { .. } => "SP0002",
        RuntimeError::UnknownFunction { .. } => "SP0003",
        RuntimeError::ArityMismatch { .. } => "SP0004",
        RuntimeError::StepBudgetExceeded { .. } => "SP0005",
        RuntimeError::RecursionLimit { .. } => "SP0006",
    };
    Diagnostic::error_with_code(code, err.to_string(), err.span())
}
