// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Pairwise VF range conflict detection between policies.

use policy::Policy;
use policy::vfrange::PfNameToken;
use tracing::debug;

use crate::errors::AdmissionError;

/// Checks that `current` claims no VF index another policy already holds.
///
/// The candidate's tokens must parse; the other side is taken as it sits
/// in the cluster, and tokens that do not parse there are skipped since
/// they were ruled on at their own admission. A token without an explicit
/// range claims every index its policy requests, so two bare names on the
/// same PF always collide.
///
/// # Errors
///
/// [`AdmissionError::MalformedPfName`] if a token of `current` does not
/// parse, [`AdmissionError::VfRangeOverlap`] on the first collision.
pub fn check_conflict(current: &Policy, other: &Policy) -> Result<(), AdmissionError> {
    if current.name == other.name {
        return Ok(());
    }
    debug!("checking policy {} against {}", current.name, other.name);
    for token in &current.nic_selector.pf_names {
        let parsed = PfNameToken::parse(token)?;
        let Some(claimed) = parsed.claimed_range(current.num_vfs) else {
            continue;
        };
        for other_token in &other.nic_selector.pf_names {
            let Ok(other_parsed) = PfNameToken::parse(other_token) else {
                continue;
            };
            if parsed.name() != other_parsed.name() {
                continue;
            }
            let Some(other_claimed) = other_parsed.claimed_range(other.num_vfs) else {
                continue;
            };
            if claimed.overlaps(other_claimed) {
                return Err(AdmissionError::VfRangeOverlap {
                    token: parsed.to_string(),
                    policy: current.name.clone(),
                    other_token: other_parsed.to_string(),
                    other_policy: other.name.clone(),
                });
            }
        }
    }
    Ok(())
}
