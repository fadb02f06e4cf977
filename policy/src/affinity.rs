// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Node affinity derived from policies.

use k8s_openapi::api::core::v1::{NodeSelectorRequirement, NodeSelectorTerm};
use tracing::debug;

use crate::policy::Policy;

/// Builds the scheduling terms for the machines any of `policies` selects.
///
/// Each policy with a non-empty node selector contributes one term, in
/// policy order; each of its label pairs becomes an `In` requirement with
/// the single value, in key order. Policies with an empty selector are
/// skipped, since an empty term would otherwise select every machine.
#[must_use]
pub fn node_selector_terms(policies: &[Policy]) -> Vec<NodeSelectorTerm> {
    let mut terms = Vec::with_capacity(policies.len());
    for policy in policies {
        if policy.node_selector.is_empty() {
            continue;
        }
        let expressions: Vec<NodeSelectorRequirement> = policy
            .node_selector
            .iter()
            .map(|(key, value)| NodeSelectorRequirement {
                key: key.clone(),
                operator: "In".to_string(),
                values: Some(vec![value.clone()]),
            })
            .collect();
        debug!(
            "policy {} contributes a term with {} expressions",
            policy.name,
            expressions.len()
        );
        terms.push(NodeSelectorTerm {
            match_expressions: Some(expressions),
            match_fields: None,
        });
    }
    terms
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::policy::PolicyBuilder;
    use crate::selector::NodeSelector;
    use pretty_assertions::assert_eq;

    fn policy(name: &str, selector: &[(&str, &str)]) -> Policy {
        PolicyBuilder::default()
            .name(name)
            .resource_name(name.replace('-', "_"))
            .node_selector(
                selector
                    .iter()
                    .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                    .collect::<NodeSelector>(),
            )
            .build()
            .unwrap()
    }

    fn requirement(key: &str, value: &str) -> NodeSelectorRequirement {
        NodeSelectorRequirement {
            key: key.to_string(),
            operator: "In".to_string(),
            values: Some(vec![value.to_string()]),
        }
    }

    #[test]
    fn one_term_per_policy_with_sorted_keys() {
        let policies = vec![
            policy(
                "intel-25g",
                &[
                    ("node-role.kubernetes.io/worker", ""),
                    ("feature.node.kubernetes.io/network-sriov.capable", "true"),
                ],
            ),
            policy("mlnx-rdma", &[("vendor.example.com/nic", "mellanox")]),
        ];

        let terms = node_selector_terms(&policies);
        assert_eq!(
            terms,
            vec![
                NodeSelectorTerm {
                    match_expressions: Some(vec![
                        requirement(
                            "feature.node.kubernetes.io/network-sriov.capable",
                            "true"
                        ),
                        requirement("node-role.kubernetes.io/worker", ""),
                    ]),
                    match_fields: None,
                },
                NodeSelectorTerm {
                    match_expressions: Some(vec![requirement(
                        "vendor.example.com/nic",
                        "mellanox"
                    )]),
                    match_fields: None,
                },
            ]
        );
    }

    #[test]
    fn empty_selectors_contribute_no_term() {
        let policies = vec![
            policy("catch-all", &[]),
            policy("pinned", &[("sriov", "capable")]),
        ];

        let terms = node_selector_terms(&policies);
        assert_eq!(terms.len(), 1);
        assert_eq!(
            terms[0].match_expressions,
            Some(vec![requirement("sriov", "capable")])
        );
    }

    #[test]
    fn no_policies_means_no_terms() {
        assert_eq!(node_selector_terms(&[]), Vec::<NodeSelectorTerm>::new());
    }
}
