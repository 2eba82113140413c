//! PDF/A-1 conformance gate.
//!
//! The gate drives a [`ConformanceChecker`] through its two phases, a
//! syntactic parse followed by semantic validation, and reduces the result to
//! one of three terminal outcomes. Callers that only need a pass/fail answer
//! use [`ConformanceGate::validate`].

use crate::error::Result;
use crate::pdfa1::Pdfa1Checker;
use log::{debug, info, warn};
use std::fmt;

/// A single violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Clause of ISO 19005-1 the rule comes from, e.g. `6.1.3`
    pub clause: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(clause: &'static str, message: impl Into<String>) -> Self {
        Self {
            clause,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.clause, self.message)
    }
}

/// Result of the semantic validation phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    pub violations: Vec<Violation>,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn push(&mut self, clause: &'static str, message: impl Into<String>) {
        self.violations.push(Violation::new(clause, message));
    }
}

/// Terminal state of a gate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Valid,
    Invalid(Verdict),
    ParseFailed(String),
}

impl GateOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, GateOutcome::Valid)
    }

    /// One-line description suitable for error messages.
    pub fn summary(&self) -> String {
        match self {
            GateOutcome::Valid => "valid".to_string(),
            GateOutcome::ParseFailed(reason) => format!("parse failed: {reason}"),
            GateOutcome::Invalid(verdict) => {
                let rules: Vec<String> = verdict.violations.iter().map(|v| v.to_string()).collect();
                format!("{} violation(s): {}", rules.len(), rules.join("; "))
            }
        }
    }
}

/// A PDF/A rule checker with a parse phase and a validation phase.
pub trait ConformanceChecker {
    /// The structured representation produced by the parse phase.
    type Parsed;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Parsed>;

    fn validate(&self, parsed: Self::Parsed) -> Result<Verdict>;
}

/// Runs a checker and collapses every failure mode into a [`GateOutcome`].
#[derive(Debug, Clone, Default)]
pub struct ConformanceGate<C = Pdfa1Checker> {
    checker: C,
}

impl<C: ConformanceChecker> ConformanceGate<C> {
    pub fn new(checker: C) -> Self {
        Self { checker }
    }

    /// Runs both phases. Parse errors become `ParseFailed`, validation errors
    /// and violations become `Invalid`.
    pub fn check(&self, bytes: &[u8]) -> GateOutcome {
        debug!("Parsing {} bytes for PDF/A-1 validation", bytes.len());
        let parsed = match self.checker.parse(bytes) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("PDF/A-1 parse failed: {}", e);
                return GateOutcome::ParseFailed(e.to_string());
            }
        };

        // The parsed document is consumed here and released with the verdict.
        let verdict = match self.checker.validate(parsed) {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("PDF/A-1 validation aborted: {}", e);
                let mut verdict = Verdict::default();
                verdict.push("validation", e.to_string());
                return GateOutcome::Invalid(verdict);
            }
        };

        if verdict.is_valid() {
            info!("Input passed PDF/A-1 validation");
            GateOutcome::Valid
        } else {
            for violation in &verdict.violations {
                warn!("PDF/A-1 violation {}", violation);
            }
            GateOutcome::Invalid(verdict)
        }
    }

    /// True iff the input is valid PDF/A-1.
    pub fn validate(&self, bytes: &[u8]) -> bool {
        self.check(bytes).is_valid()
    }
}
