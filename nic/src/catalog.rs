// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Registries of supported hardware.
//!
//! The admission logic never hardcodes a vendor: everything it knows about
//! devices comes from a [`NicCatalog`] (which models are supported and what
//! device ID their VFs expose), a [`VendorLimits`] table (how many VFs a
//! vendor's firmware tolerates, and whether it can do virtio/vdpa), and a
//! [`PlatformCatalog`] (which cloud platforms count as virtual
//! deployments). Each registry ships a `builtin()` set and can be replaced
//! wholesale for clusters with exotic hardware.

use std::collections::{BTreeMap, BTreeSet};

use crate::pci::{DeviceId, VendorId};

/// Firmware cap on the number of VFs for Mellanox devices.
pub const MELLANOX_MAX_VFS: u32 = 128;

/// One supported NIC model.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NicModel {
    /// Model name, e.g. `Intel E810-XXVDA2`.
    pub name: String,
    /// Vendor of the physical function.
    pub vendor: VendorId,
    /// Device ID of the physical function.
    pub pf: DeviceId,
    /// Device ID the VFs of this model expose.
    pub vf: DeviceId,
}

/// Error returned when a model name is registered twice.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("NIC model '{0}' is already registered")]
pub struct DuplicateModel(String);

const BUILTIN_MODELS: &[(&str, VendorId, DeviceId, DeviceId)] = &[
    ("Intel X710", VendorId::INTEL, DeviceId::new(0x1572), DeviceId::new(0x154c)),
    ("Intel X710 Base T", VendorId::INTEL, DeviceId::new(0x15ff), DeviceId::new(0x154c)),
    ("Intel XL710", VendorId::INTEL, DeviceId::new(0x1583), DeviceId::new(0x154c)),
    ("Intel XXV710", VendorId::INTEL, DeviceId::new(0x158b), DeviceId::new(0x154c)),
    ("Intel E810-CQDA2", VendorId::INTEL, DeviceId::new(0x1592), DeviceId::new(0x1889)),
    ("Intel E810-XXVDA2", VendorId::INTEL, DeviceId::new(0x159b), DeviceId::new(0x1889)),
    ("Intel E810-XXVDA4", VendorId::INTEL, DeviceId::new(0x1593), DeviceId::new(0x1889)),
    ("Intel 82599ES", VendorId::INTEL, DeviceId::new(0x10fb), DeviceId::new(0x10ed)),
    ("Intel X550", VendorId::INTEL, DeviceId::new(0x1563), DeviceId::new(0x1565)),
    ("Mellanox ConnectX-4", VendorId::MELLANOX, DeviceId::new(0x1013), DeviceId::new(0x1014)),
    ("Mellanox ConnectX-4 Lx", VendorId::MELLANOX, DeviceId::new(0x1015), DeviceId::new(0x1016)),
    ("Mellanox ConnectX-5", VendorId::MELLANOX, DeviceId::new(0x1017), DeviceId::new(0x1018)),
    ("Mellanox ConnectX-5 Ex", VendorId::MELLANOX, DeviceId::new(0x1019), DeviceId::new(0x101a)),
    ("Mellanox ConnectX-6", VendorId::MELLANOX, DeviceId::new(0x101b), DeviceId::new(0x101c)),
    ("Mellanox ConnectX-6 Dx", VendorId::MELLANOX, DeviceId::new(0x101d), DeviceId::new(0x101e)),
    ("Mellanox ConnectX-7", VendorId::MELLANOX, DeviceId::new(0x1021), DeviceId::new(0x101e)),
    ("Mellanox BlueField-2", VendorId::MELLANOX, DeviceId::new(0xa2d6), DeviceId::new(0x101e)),
];

/// The set of NIC models admission will accept.
#[derive(Clone, Debug, Default)]
pub struct NicCatalog {
    models: BTreeMap<String, NicModel>,
}

impl NicCatalog {
    /// An empty catalog. Useful as a starting point for clusters that only
    /// want an explicit allow-list.
    #[must_use]
    pub fn empty() -> NicCatalog {
        NicCatalog::default()
    }

    /// The models supported out of the box.
    #[must_use]
    pub fn builtin() -> NicCatalog {
        let models = BUILTIN_MODELS
            .iter()
            .map(|(name, vendor, pf, vf)| {
                let model = NicModel {
                    name: (*name).to_string(),
                    vendor: *vendor,
                    pf: *pf,
                    vf: *vf,
                };
                (model.name.clone(), model)
            })
            .collect();
        NicCatalog { models }
    }

    /// Registers a model.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateModel`] if a model with the same name is already
    /// registered.
    pub fn add(&mut self, model: NicModel) -> Result<(), DuplicateModel> {
        if self.models.contains_key(&model.name) {
            return Err(DuplicateModel(model.name));
        }
        self.models.insert(model.name.clone(), model);
        Ok(())
    }

    /// True if at least one registered model belongs to `vendor`.
    #[must_use]
    pub fn is_supported_vendor(&self, vendor: VendorId) -> bool {
        self.models.values().any(|model| model.vendor == vendor)
    }

    /// True if `vendor`/`device` names a registered physical function.
    #[must_use]
    pub fn is_supported_model(&self, vendor: VendorId, device: DeviceId) -> bool {
        self.models
            .values()
            .any(|model| model.vendor == vendor && model.pf == device)
    }

    /// True if `device` names a registered physical function under any
    /// vendor. Used when a selector pins the device ID but not the vendor.
    #[must_use]
    pub fn is_supported_device(&self, device: DeviceId) -> bool {
        self.models.values().any(|model| model.pf == device)
    }

    /// True if `vendor`/`device` names the virtual function of a registered
    /// model.
    #[must_use]
    pub fn is_supported_vf_model(&self, vendor: VendorId, device: DeviceId) -> bool {
        self.models
            .values()
            .any(|model| model.vendor == vendor && model.vf == device)
    }

    /// Iterates over the registered models in name order.
    pub fn models(&self) -> impl Iterator<Item = &NicModel> {
        self.models.values()
    }

    /// Number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// True if no models are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Upper bound on requested VFs for one vendor's devices.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VfCeiling {
    /// Whatever `sriov_totalvfs` reports for the interface.
    InterfaceTotal,
    /// A fixed count regardless of what the interface reports.
    Fixed(u32),
}

/// Per-vendor VF ceilings and capabilities.
#[derive(Clone, Debug, Default)]
pub struct VendorLimits {
    ceilings: BTreeMap<VendorId, VfCeiling>,
    vdpa_capable: BTreeSet<VendorId>,
}

impl VendorLimits {
    /// A table with no limits and no capabilities.
    #[must_use]
    pub fn empty() -> VendorLimits {
        VendorLimits::default()
    }

    /// The limits shipped out of the box: Intel devices are bounded by the
    /// capacity the interface reports, Mellanox devices by a firmware cap
    /// of [`MELLANOX_MAX_VFS`], and only Mellanox can do virtio/vdpa.
    #[must_use]
    pub fn builtin() -> VendorLimits {
        let mut limits = VendorLimits::empty();
        limits.set_ceiling(VendorId::INTEL, VfCeiling::InterfaceTotal);
        limits.set_ceiling(VendorId::MELLANOX, VfCeiling::Fixed(MELLANOX_MAX_VFS));
        limits.allow_vdpa(VendorId::MELLANOX);
        limits
    }

    /// Sets the VF ceiling for `vendor`, replacing any previous one.
    pub fn set_ceiling(&mut self, vendor: VendorId, ceiling: VfCeiling) {
        self.ceilings.insert(vendor, ceiling);
    }

    /// Marks `vendor` as capable of virtio/vdpa.
    pub fn allow_vdpa(&mut self, vendor: VendorId) {
        self.vdpa_capable.insert(vendor);
    }

    /// The VF ceiling for `vendor`, if one is registered.
    #[must_use]
    pub fn ceiling(&self, vendor: VendorId) -> Option<VfCeiling> {
        self.ceilings.get(&vendor).copied()
    }

    /// True if `vendor` devices can back virtio/vdpa VFs.
    #[must_use]
    pub fn supports_vdpa(&self, vendor: VendorId) -> bool {
        self.vdpa_capable.contains(&vendor)
    }
}

/// Cloud platforms whose machines count as virtual deployments.
#[derive(Clone, Debug, Default)]
pub struct PlatformCatalog {
    platforms: BTreeSet<String>,
}

impl PlatformCatalog {
    /// A catalog with no registered platforms.
    #[must_use]
    pub fn empty() -> PlatformCatalog {
        PlatformCatalog::default()
    }

    /// The platforms recognized out of the box.
    #[must_use]
    pub fn builtin() -> PlatformCatalog {
        let mut catalog = PlatformCatalog::empty();
        catalog.add("openstack");
        catalog
    }

    /// Registers a platform name. Matching is case-insensitive.
    pub fn add(&mut self, platform: impl AsRef<str>) {
        self.platforms
            .insert(platform.as_ref().to_ascii_lowercase());
    }

    /// True when `provider_id` names a machine hosted on one of the
    /// registered platforms.
    #[must_use]
    pub fn is_virtual_platform(&self, provider_id: &str) -> bool {
        let provider_id = provider_id.to_ascii_lowercase();
        self.platforms
            .iter()
            .any(|platform| provider_id.contains(platform.as_str()))
    }
}
