// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Conversions from raw Kubernetes objects into typed descriptors.
//!
//! Everything the API server hands us is stringly typed and optional. The
//! `TryFrom` impls here are the only place those strings are trusted to
//! become [`VendorId`]s, [`DeviceId`]s and [`PciAddress`]es; past this
//! point malformed input no longer exists.

use k8s_openapi::api::core::v1::Node;
use k8s_types::node_state::{SriovInterface, SriovNodeState};
use thiserror::Error;

use crate::descriptor::{InterfaceDescriptor, MachineDescriptor, NodeState};
use crate::pci::{DeviceId, PciAddress, VendorId};

/// Failure to build a typed descriptor from a raw Kubernetes object.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum FromK8sError {
    /// The object is structurally valid but carries an unusable value.
    #[error("invalid object: {0}")]
    Invalid(String),
    /// A field the conversion needs is absent.
    #[error("missing required data: {0}")]
    MissingData(String),
    /// A field failed to parse into its typed form.
    #[error("could not parse value: {0}")]
    ParseError(String),
}

impl TryFrom<&Node> for MachineDescriptor {
    type Error = FromK8sError;

    fn try_from(node: &Node) -> Result<MachineDescriptor, Self::Error> {
        let name = node
            .metadata
            .name
            .clone()
            .ok_or_else(|| FromK8sError::MissingData("node has no name".to_string()))?;
        let labels = node.metadata.labels.clone().unwrap_or_default();
        let provider_id = node
            .spec
            .as_ref()
            .and_then(|spec| spec.provider_id.clone());
        Ok(MachineDescriptor {
            name,
            labels,
            provider_id,
        })
    }
}

impl TryFrom<&SriovNodeState> for NodeState {
    type Error = FromK8sError;

    fn try_from(state: &SriovNodeState) -> Result<NodeState, Self::Error> {
        let node = state
            .metadata
            .name
            .clone()
            .ok_or_else(|| FromK8sError::MissingData("node state has no name".to_string()))?;
        let reported = state
            .status
            .as_ref()
            .and_then(|status| status.interfaces.as_deref())
            .unwrap_or_default();
        let interfaces = reported
            .iter()
            .map(|interface| typed_interface(&node, interface))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NodeState { node, interfaces })
    }
}

fn typed_interface(
    node: &str,
    interface: &SriovInterface,
) -> Result<InterfaceDescriptor, FromK8sError> {
    let name = interface.name.clone().ok_or_else(|| {
        FromK8sError::MissingData(format!("interface on node {node} has no name"))
    })?;
    let vendor = VendorId::try_from(require(node, &name, "vendor", interface.vendor.as_deref())?)
        .map_err(|e| FromK8sError::ParseError(format!("vendor of {name} on {node}: {e}")))?;
    let device =
        DeviceId::try_from(require(node, &name, "deviceId", interface.device_id.as_deref())?)
            .map_err(|e| FromK8sError::ParseError(format!("device of {name} on {node}: {e}")))?;
    let pci_address = PciAddress::try_new(require(
        node,
        &name,
        "pciAddress",
        interface.pci_address.as_deref(),
    )?)
    .map_err(|e| FromK8sError::ParseError(format!("address of {name} on {node}: {e}")))?;
    Ok(InterfaceDescriptor {
        name,
        vendor,
        device,
        pci_address,
        total_vfs: interface.total_vfs.unwrap_or_default(),
        net_filter: interface.net_filter.clone(),
    })
}

fn require<'a>(
    node: &str,
    interface: &str,
    field: &str,
    value: Option<&'a str>,
) -> Result<&'a str, FromK8sError> {
    value.ok_or_else(|| {
        FromK8sError::MissingData(format!("interface {interface} on node {node} has no {field}"))
    })
}
