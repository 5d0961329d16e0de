//! Heuristic concept detection
//!
//! Challenge checklists light up when a snippet structurally exercises a
//! language feature. Detection is a flat scan over the token stream: it runs
//! whether or not the snippet interprets cleanly, and it is encouragement,
//! not grading. A snippet can demonstrate `uses-loop` and still fail at
//! runtime; both facts are reported independently.

use crate::lexer::Lexer;
use crate::token::TokenKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A language feature a snippet can demonstrate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Concept {
    DefinesFunction,
    UsesParameters,
    ReturnsValue,
    CallsFunction,
    PrintsOutput,
    UsesFString,
    UsesConditional,
    UsesList,
    AppendsToList,
    UsesLoop,
}

impl Concept {
    /// Learner-facing description for checklists
    pub fn describe(&self) -> &'static str {
        match self {
            Concept::DefinesFunction => "define a function with def",
            Concept::UsesParameters => "give a function a parameter",
            Concept::ReturnsValue => "return a value from a function",
            Concept::CallsFunction => "call a function you defined",
            Concept::PrintsOutput => "print some output",
            Concept::UsesFString => "build a message with an f-string",
            Concept::UsesConditional => "branch with if/else",
            Concept::UsesList => "work with a list",
            Concept::AppendsToList => "append to a list",
            Concept::UsesLoop => "repeat with a for loop",
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Concept::DefinesFunction => "defines-function",
            Concept::UsesParameters => "uses-parameters",
            Concept::ReturnsValue => "returns-value",
            Concept::CallsFunction => "calls-function",
            Concept::PrintsOutput => "prints-output",
            Concept::UsesFString => "uses-f-string",
            Concept::UsesConditional => "uses-conditional",
            Concept::UsesList => "uses-list",
            Concept::AppendsToList => "appends-to-list",
            Concept::UsesLoop => "uses-loop",
        };
        write!(f, "{}", name)
    }
}

/// The set of concepts a snippet demonstrates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptSet(BTreeSet<Concept>);

impl ConceptSet {
    /// Empty set
    pub fn new() -> Self {
        ConceptSet::default()
    }

    /// Scan a snippet's token stream for demonstrated concepts. Lexer
    /// diagnostics are ignored here: a snippet that fails later can still
    /// demonstrate the features it used.
    pub fn detect(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        let (tokens, _diagnostics) = lexer.tokenize();

        let mut set = ConceptSet::new();
        let kind_at = |i: usize| tokens.get(i).map(|t| t.kind);

        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Def => {
                    set.insert(Concept::DefinesFunction);
                    // def name ( param ... — an identifier right after the
                    // opening paren means at least one parameter
                    if kind_at(i + 3) == Some(TokenKind::Identifier) {
                        set.insert(Concept::UsesParameters);
                    }
                }
                TokenKind::Return => {
                    if !matches!(kind_at(i + 1), Some(TokenKind::Newline) | None) {
                        set.insert(Concept::ReturnsValue);
                    }
                }
                TokenKind::If => {
                    set.insert(Concept::UsesConditional);
                }
                TokenKind::For => {
                    set.insert(Concept::UsesLoop);
                }
                TokenKind::FString => {
                    set.insert(Concept::UsesFString);
                }
                TokenKind::LeftBracket => {
                    set.insert(Concept::UsesList);
                }
                TokenKind::Dot => {
                    if tokens.get(i + 1).map(|t| t.lexeme.as_str()) == Some("append") {
                        set.insert(Concept::AppendsToList);
                        set.insert(Concept::UsesList);
                    }
                }
                TokenKind::Identifier => {
                    let called = kind_at(i + 1) == Some(TokenKind::LeftParen);
                    let defined_here = i > 0 && tokens[i - 1].kind == TokenKind::Def;
                    if called && !defined_here {
                        if token.lexeme == "print" {
                            set.insert(Concept::PrintsOutput);
                        } else {
                            set.insert(Concept::CallsFunction);
                        }
                    }
                }
                _ => {}
            }
        }

        set
    }

    /// Add a concept
    pub fn insert(&mut self, concept: Concept) {
        self.0.insert(concept);
    }

    /// True if the snippet demonstrated this concept
    pub fn contains(&self, concept: Concept) -> bool {
        self.0.contains(&concept)
    }

    /// Number of demonstrated concepts
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was demonstrated
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in a stable order
    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.0.iter()
    }
}

impl FromIterator<Concept> for ConceptSet {
    fn from_iter<I: IntoIterator<Item = Concept>>(iter: I) -> Self {
        ConceptSet(iter.into_iter().collect())
    }
}
