// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! PF name tokens and VF index ranges.
//!
//! A `pfNames` entry either names a whole physical function (`ens1f0`) or
//! claims a sub-range of its VF indices (`ens1f0#2-5`, inclusive on both
//! ends). [`PfNameToken::parse`] is the only grammar authority; every
//! defect gets its own [`PfNameError`] so admission can report exactly
//! what is wrong with a token.

use std::fmt;

use thiserror::Error;

/// Reasons a PF name token is rejected.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum PfNameError {
    /// More than one `#` in the token.
    #[error("failed to parse PF name '{0}': '#' must split the token into a name and one range")]
    BadSeparator(String),
    /// The part after `#` is not two `-` separated values.
    #[error("failed to parse PF name '{0}': the range must be two '-' separated VF indices")]
    BadRange(String),
    /// The range start is not a non-negative integer.
    #[error("failed to parse PF name '{0}': the range start is not a non-negative integer")]
    BadRangeStart(String),
    /// The range end is not a non-negative integer.
    #[error("failed to parse PF name '{0}': the range end is not a non-negative integer")]
    BadRangeEnd(String),
    /// The range end precedes the range start.
    #[error("failed to parse PF name '{0}': the range end must not precede the start")]
    InvertedRange(String),
    /// The range names VF indices the policy does not create.
    #[error("the range end in PF name '{0}' must be below the requested number of VFs ({1})")]
    EndBeyondCapacity(String, u32),
}

/// Error for a VF range whose end precedes its start.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("VF range end {end} precedes start {start}")]
pub struct InvalidVfRange {
    /// Rejected start index.
    pub start: u32,
    /// Rejected end index.
    pub end: u32,
}

/// An inclusive range of VF indices on one physical function.
///
/// `start <= end` holds by construction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct VfRange {
    start: u32,
    end: u32,
}

impl VfRange {
    /// Creates a range from inclusive bounds.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidVfRange`] when `end < start`.
    pub fn new(start: u32, end: u32) -> Result<VfRange, InvalidVfRange> {
        if end < start {
            return Err(InvalidVfRange { start, end });
        }
        Ok(VfRange { start, end })
    }

    /// The full index range of a function carrying `num_vfs` VFs, or
    /// `None` when there are no VFs to claim.
    #[must_use]
    pub fn full(num_vfs: u32) -> Option<VfRange> {
        (num_vfs > 0).then(|| VfRange {
            start: 0,
            end: num_vfs - 1,
        })
    }

    /// First index of the range.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Last index of the range.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    /// True when the two ranges share at least one index.
    #[must_use]
    pub const fn overlaps(self, other: VfRange) -> bool {
        !(self.end < other.start || self.start > other.end)
    }
}

impl fmt::Display for VfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A parsed `pfNames` entry: an interface name plus an optional VF index
/// range.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PfNameToken {
    name: String,
    range: Option<VfRange>,
}

impl PfNameToken {
    /// Parses a token.
    ///
    /// # Errors
    ///
    /// Returns the [`PfNameError`] naming the defect: stray `#` fields, a
    /// range that is not two `-` separated bounds, non-numeric bounds, or
    /// an inverted range.
    pub fn parse(token: &str) -> Result<PfNameToken, PfNameError> {
        let Some((name, range)) = token.split_once('#') else {
            return Ok(PfNameToken {
                name: token.to_string(),
                range: None,
            });
        };
        if range.contains('#') {
            return Err(PfNameError::BadSeparator(token.to_string()));
        }
        let Some((start, end)) = range.split_once('-') else {
            return Err(PfNameError::BadRange(token.to_string()));
        };
        if end.contains('-') {
            return Err(PfNameError::BadRange(token.to_string()));
        }
        let start = start
            .parse::<u32>()
            .map_err(|_| PfNameError::BadRangeStart(token.to_string()))?;
        let end = end
            .parse::<u32>()
            .map_err(|_| PfNameError::BadRangeEnd(token.to_string()))?;
        let range = VfRange::new(start, end)
            .map_err(|_| PfNameError::InvertedRange(token.to_string()))?;
        Ok(PfNameToken {
            name: name.to_string(),
            range: Some(range),
        })
    }

    /// The interface name of a raw token, with any range suffix stripped.
    /// Never fails, even on tokens [`parse`](PfNameToken::parse) rejects.
    #[must_use]
    pub fn base_name(token: &str) -> &str {
        token.split_once('#').map_or(token, |(name, _)| name)
    }

    /// Interface name the token refers to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicit VF range, if the token carries one.
    #[must_use]
    pub fn range(&self) -> Option<VfRange> {
        self.range
    }

    /// Checks that the explicit range (if any) fits a function configured
    /// for `num_vfs` VFs. Indices are zero-based, so the end must be
    /// strictly below `num_vfs`.
    ///
    /// # Errors
    ///
    /// Returns [`PfNameError::EndBeyondCapacity`] when it does not.
    pub fn check_within(&self, num_vfs: u32) -> Result<(), PfNameError> {
        if let Some(range) = self.range
            && range.end() >= num_vfs
        {
            return Err(PfNameError::EndBeyondCapacity(self.to_string(), num_vfs));
        }
        Ok(())
    }

    /// The VF indices this token claims on a policy requesting `num_vfs`
    /// VFs: the explicit range when present, the whole function
    /// otherwise. `None` when there is nothing to claim.
    #[must_use]
    pub fn claimed_range(&self, num_vfs: u32) -> Option<VfRange> {
        self.range.or_else(|| VfRange::full(num_vfs))
    }
}

impl fmt::Display for PfNameToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some(range) => write!(f, "{}#{}", self.name, range),
            None => write!(f, "{}", self.name),
        }
    }
}
