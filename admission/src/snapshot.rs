// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Read-only view of the cluster objects a review consults.

use std::collections::BTreeMap;

use nic::descriptor::{MachineDescriptor, NodeState};
use policy::Policy;
use policy::selector::NodeSelector;
use thiserror::Error;

/// Failure to list one of the object kinds a review needs.
///
/// Reviews fail closed on this: the caller gets an `Err` rather than a
/// denial verdict, so broken retrieval is never reported as a problem
/// with the policy under review.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("failed to list {resource}: {detail}")]
pub struct RetrievalError {
    resource: &'static str,
    detail: String,
}

impl RetrievalError {
    /// Describes a failed listing of `resource`.
    pub fn new(resource: &'static str, detail: impl Into<String>) -> RetrievalError {
        RetrievalError {
            resource,
            detail: detail.into(),
        }
    }
}

/// The cluster objects one review consults.
///
/// Implementations are queried once per review; the engine never caches
/// across invocations.
pub trait ClusterView {
    /// Machines matching `selector`.
    fn machines(&self, selector: &NodeSelector) -> Result<Vec<MachineDescriptor>, RetrievalError>;

    /// Hardware inventories reported in `namespace`.
    fn node_states(&self, namespace: &str) -> Result<Vec<NodeState>, RetrievalError>;

    /// Policies living in `namespace`.
    fn policies(&self, namespace: &str) -> Result<Vec<Policy>, RetrievalError>;
}

/// In-memory [`ClusterView`] assembled by hand.
#[derive(Clone, Debug, Default)]
pub struct StaticClusterView {
    machines: Vec<MachineDescriptor>,
    node_states: BTreeMap<String, Vec<NodeState>>,
    policies: Vec<Policy>,
}

impl StaticClusterView {
    /// An empty view.
    #[must_use]
    pub fn new() -> StaticClusterView {
        StaticClusterView::default()
    }

    /// Adds a machine.
    pub fn add_machine(&mut self, machine: MachineDescriptor) {
        self.machines.push(machine);
    }

    /// Adds a reported inventory under `namespace`.
    pub fn add_node_state(&mut self, namespace: impl Into<String>, state: NodeState) {
        self.node_states
            .entry(namespace.into())
            .or_default()
            .push(state);
    }

    /// Adds a policy. Its own namespace field decides where it is
    /// visible.
    pub fn add_policy(&mut self, policy: Policy) {
        self.policies.push(policy);
    }
}

impl ClusterView for StaticClusterView {
    fn machines(&self, selector: &NodeSelector) -> Result<Vec<MachineDescriptor>, RetrievalError> {
        Ok(self
            .machines
            .iter()
            .filter(|machine| selector.matches(&machine.labels))
            .cloned()
            .collect())
    }

    fn node_states(&self, namespace: &str) -> Result<Vec<NodeState>, RetrievalError> {
        Ok(self.node_states.get(namespace).cloned().unwrap_or_default())
    }

    fn policies(&self, namespace: &str) -> Result<Vec<Policy>, RetrievalError> {
        Ok(self
            .policies
            .iter()
            .filter(|policy| policy.namespace == namespace)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nic::descriptor::MachineDescriptorBuilder;
    use policy::PolicyBuilder;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn machines_filter_by_selector() {
        let mut view = StaticClusterView::new();
        view.add_machine(
            MachineDescriptorBuilder::default()
                .name("worker-0".to_string())
                .labels(BTreeMap::from([(
                    "sriov".to_string(),
                    "capable".to_string(),
                )]))
                .build()
                .unwrap(),
        );
        view.add_machine(
            MachineDescriptorBuilder::default()
                .name("worker-1".to_string())
                .build()
                .unwrap(),
        );

        let all = view.machines(&NodeSelector::default()).unwrap();
        assert_eq!(all.len(), 2);

        let selector: NodeSelector = [("sriov".to_string(), "capable".to_string())]
            .into_iter()
            .collect();
        let capable = view.machines(&selector).unwrap();
        assert_eq!(capable.len(), 1);
        assert_eq!(capable[0].name, "worker-0");
    }

    #[test]
    fn policies_filter_by_namespace() {
        let mut view = StaticClusterView::new();
        view.add_policy(
            PolicyBuilder::default()
                .name("here")
                .namespace("sriovgate-system")
                .resource_name("here")
                .build()
                .unwrap(),
        );
        view.add_policy(
            PolicyBuilder::default()
                .name("elsewhere")
                .namespace("team-a")
                .resource_name("elsewhere")
                .build()
                .unwrap(),
        );

        let listed = view.policies("sriovgate-system").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "here");
        assert_eq!(view.policies("team-b").unwrap().len(), 0);
    }

    #[test]
    fn node_states_are_namespace_scoped() {
        let mut view = StaticClusterView::new();
        view.add_node_state(
            "sriovgate-system",
            NodeState {
                node: "worker-0".to_string(),
                interfaces: Vec::new(),
            },
        );

        assert_eq!(view.node_states("sriovgate-system").unwrap().len(), 1);
        assert_eq!(view.node_states("team-a").unwrap().len(), 0);
    }
}
