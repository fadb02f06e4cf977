// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Outcome of one admission review.

use crate::errors::AdmissionError;

/// What the engine decided about one request.
///
/// Denials carry the [`AdmissionError`] they were denied for; warnings
/// accompany allowed and denied outcomes alike.
#[derive(Clone, Debug, Eq, PartialEq)]
#[must_use]
pub struct Verdict {
    allowed: bool,
    reason: Option<AdmissionError>,
    warnings: Vec<String>,
}

impl Verdict {
    pub(crate) fn allow(warnings: Vec<String>) -> Verdict {
        Verdict {
            allowed: true,
            reason: None,
            warnings,
        }
    }

    pub(crate) fn deny(reason: AdmissionError, warnings: Vec<String>) -> Verdict {
        Verdict {
            allowed: false,
            reason: Some(reason),
            warnings,
        }
    }

    /// True when the request is admitted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Why the request was denied, when it was.
    #[must_use]
    pub fn reason(&self) -> Option<&AdmissionError> {
        self.reason.as_ref()
    }

    /// Warnings to surface to the requester.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
