// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Policies and operator configuration.

use derive_builder::Builder;
use nic::descriptor::MachineDescriptor;

use crate::device::{DeviceType, EswitchMode, LinkType, VdpaType};
use crate::selector::{NicSelector, NodeSelector};

/// Name of the policy object the operator owns itself.
pub const DEFAULT_POLICY_NAME: &str = "default";

/// Name of the only operator-config object that is honored.
pub const DEFAULT_CONFIG_NAME: &str = "default";

/// A VF allocation request.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
#[builder(setter(into))]
pub struct Policy {
    /// Object name.
    pub name: String,
    /// Namespace the object lives in.
    #[builder(default)]
    pub namespace: String,
    /// Resource-pool name the allocated VFs are exported under.
    pub resource_name: String,
    /// Machines the policy applies to.
    #[builder(default)]
    pub node_selector: NodeSelector,
    /// Interfaces the policy claims on those machines.
    #[builder(default)]
    pub nic_selector: NicSelector,
    /// VFs to create on each claimed interface.
    #[builder(default)]
    pub num_vfs: u32,
    /// Precedence among policies claiming the same interface (0 wins).
    #[builder(default)]
    pub priority: u32,
    /// MTU to configure on the VFs.
    #[builder(default)]
    pub mtu: Option<u32>,
    /// Driver class for the VFs.
    #[builder(default)]
    pub device_type: DeviceType,
    /// Whether the VFs run in RDMA mode.
    #[builder(default)]
    pub is_rdma: bool,
    /// Link layer constraint, if any.
    #[builder(default)]
    pub link_type: Option<LinkType>,
    /// VF datapath acceleration mode.
    #[builder(default)]
    pub vdpa_type: VdpaType,
    /// Embedded switch mode required on the device.
    #[builder(default)]
    pub eswitch_mode: EswitchMode,
}

impl Policy {
    /// True when the node selector matches `machine`. The empty selector
    /// matches every machine.
    #[must_use]
    pub fn selects(&self, machine: &MachineDescriptor) -> bool {
        self.node_selector.matches(&machine.labels)
    }

    /// True for the operator's own policy object.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_POLICY_NAME
    }
}

/// Cluster-wide operator settings.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
#[builder(setter(into))]
pub struct OperatorConfig {
    /// Object name.
    pub name: String,
    /// Namespace the object lives in.
    #[builder(default)]
    pub namespace: String,
    /// Labels a machine must carry to run the config daemon.
    #[builder(default)]
    pub config_daemon_node_selector: NodeSelector,
    /// Skip draining nodes before applying policies.
    #[builder(default)]
    pub disable_drain: bool,
    /// Operator log verbosity.
    #[builder(default)]
    pub log_level: u32,
}
