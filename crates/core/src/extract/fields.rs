//! Per-field failure handling.

use serde::Serialize;
use tracing::{Span, warn};

use crate::Result;

/// What happens when one field cannot be extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The first failing field aborts the whole extraction.
    #[default]
    AbortOnError,
    /// Failing fields keep their default value and are reported as issues.
    Partial,
}

/// A field that could not be extracted under [`FailurePolicy::Partial`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Collects field results according to the active policy.
pub(crate) struct Fields<'s> {
    policy: FailurePolicy,
    span: &'s Span,
    issues: Vec<FieldIssue>,
}

impl<'s> Fields<'s> {
    pub(crate) fn new(policy: FailurePolicy, span: &'s Span) -> Self {
        Self { policy, span, issues: Vec::new() }
    }

    /// Passes `result` through, or records it and substitutes the default.
    pub(crate) fn take<T: Default>(&mut self, field: &str, result: Result<T>) -> Result<T> {
        match (result, self.policy) {
            (Ok(value), _) => Ok(value),
            (Err(err), FailurePolicy::AbortOnError) => Err(err),
            (Err(err), FailurePolicy::Partial) => {
                warn!(parent: self.span, field, error = %err, "field unavailable, using default");
                self.issues.push(FieldIssue { field: field.to_string(), message: err.to_string() });
                Ok(T::default())
            }
        }
    }

    pub(crate) fn into_issues(self) -> Vec<FieldIssue> {
        self.issues
    }
}
