// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Reasons a request is denied.

use nic::pci::{DeviceId, VendorId};
use policy::device::DeviceType;
use policy::vfrange::PfNameError;
use thiserror::Error;

use crate::snapshot::RetrievalError;

/// Everything the engine can hold against a request.
///
/// Each variant carries the context it is reported with; the `Display`
/// form is the message surfaced to whoever made the request.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum AdmissionError {
    /// Resource name empty or outside `[a-zA-Z0-9_]`.
    #[error("resource name '{0}' contains invalid characters, only [a-zA-Z0-9_] are accepted")]
    InvalidResourceName(String),
    /// The NIC selector constrains nothing.
    #[error(
        "at least one of vendor, deviceID, pfNames, rootDevices or netFilter must be set in the nicSelector of policy '{0}'"
    )]
    EmptyNicSelector(String),
    /// A `pfNames` token failed to parse or names VFs the policy does not
    /// create.
    #[error(transparent)]
    MalformedPfName(#[from] PfNameError),
    /// No registered model belongs to the selected vendor.
    #[error("vendor {0} is not supported")]
    UnsupportedVendor(VendorId),
    /// The selected vendor/device pair is not a registered model.
    #[error("vendor/device {0}/{1} is not supported")]
    UnsupportedModel(VendorId, DeviceId),
    /// The selected device is not a registered model under any vendor.
    #[error("device {0} is not supported")]
    UnsupportedDevice(DeviceId),
    /// vfio-pci bound VFs cannot run in RDMA mode.
    #[error(
        "'deviceType: vfio-pci' conflicts with 'isRdma: true': bind the VFs to netdevice or disable rdma"
    )]
    VfioPciWithRdma,
    /// InfiniBand links require RDMA mode.
    #[error("'linkType: ib' requires 'isRdma: true'")]
    InfinibandWithoutRdma,
    /// virtio/vdpa requires netdevice bound VFs.
    #[error("'deviceType: {0}' conflicts with 'vdpaType: virtio': virtio/vdpa requires netdevice")]
    VdpaNeedsNetdevice(DeviceType),
    /// virtio/vdpa requires the switchdev eswitch mode.
    #[error("virtio/vdpa requires the device to be configured in switchdev mode")]
    VdpaNeedsSwitchdev,
    /// The matched interface's vendor cannot back virtio/vdpa VFs.
    #[error("vendor {vendor} of interface '{interface}' on node '{node}' does not support virtio/vdpa")]
    VdpaUnsupportedVendor {
        /// Vendor of the matched interface.
        vendor: VendorId,
        /// Matched interface name.
        interface: String,
        /// Node the interface sits on.
        node: String,
    },
    /// A non-default policy asked for zero VFs on a matched interface.
    #[error("numVfs(0) in policy '{0}' is not allowed")]
    ZeroVfRequest(String),
    /// The request exceeds what the matched interface or its vendor
    /// allows.
    #[error(
        "numVfs({requested}) in policy '{policy}' exceeds the maximum allowed value ({limit}) of interface '{interface}' on node '{node}'"
    )]
    TooManyVfs {
        /// VFs the policy asked for.
        requested: u32,
        /// Policy under review.
        policy: String,
        /// Largest admissible request.
        limit: u32,
        /// Matched interface name.
        interface: String,
        /// Node the interface sits on.
        node: String,
    },
    /// Two policies claim overlapping VF indices on one function.
    #[error(
        "VF index range in '{token}' of policy '{policy}' overlaps with '{other_token}' of policy '{other_policy}'"
    )]
    VfRangeOverlap {
        /// Claim of the policy under review.
        token: String,
        /// Policy under review.
        policy: String,
        /// Claim it collides with.
        other_token: String,
        /// Policy holding the colliding claim.
        other_policy: String,
    },
    /// The node selector matches no machine.
    #[error("no matched node is selected by the nodeSelector in policy '{0}'")]
    NoNodeSelected(String),
    /// No matched machine carries an interface the NIC selector picks.
    #[error("no supported NIC is selected by the nicSelector in policy '{0}'")]
    NoNicSelected(String),
    /// The operator's own policy object cannot be removed.
    #[error("the default policy must not be deleted")]
    DefaultPolicyDeletion,
    /// The operator's config object cannot be removed.
    #[error("the default operator config must not be deleted")]
    DefaultConfigDeletion,
    /// Operator config objects other than `default` are never honored.
    #[error("only the operator config named 'default' is honored, not '{0}'")]
    UnknownOperatorConfig(String),
    /// Listing the cluster objects failed; the review could not run.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}
