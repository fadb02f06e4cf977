// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Interface selection.

use nic::catalog::{NicCatalog, PlatformCatalog};
use nic::descriptor::{InterfaceDescriptor, MachineDescriptor};
use policy::selector::NicSelector;

/// Decides whether `selector` picks `iface` on `machine`.
///
/// Every supplied selector field must match the interface. A matching
/// interface must also be supported hardware: either its PF model is in
/// `catalog`, or the machine is a recognized virtual deployment whose
/// interface carries the requested platform network tag and a supported
/// VF model. The VF catalog applies there because on such platforms the
/// visible device is a passed-through VF, not the parent function.
#[must_use]
pub fn nic_matches(
    selector: &NicSelector,
    iface: &InterfaceDescriptor,
    machine: &MachineDescriptor,
    catalog: &NicCatalog,
    platforms: &PlatformCatalog,
) -> bool {
    if let Some(vendor) = selector.vendor
        && vendor != iface.vendor
    {
        return false;
    }
    if let Some(device) = selector.device
        && device != iface.device
    {
        return false;
    }
    if !selector.root_devices.is_empty() && !selector.root_devices.contains(&iface.pci_address) {
        return false;
    }
    if !selector.pf_names.is_empty() && !selector.base_pf_names().contains(iface.name.as_str()) {
        return false;
    }
    if catalog.is_supported_model(iface.vendor, iface.device) {
        return true;
    }
    match (&machine.provider_id, &selector.net_filter, &iface.net_filter) {
        (Some(provider), Some(wanted), Some(tagged)) => {
            platforms.is_virtual_platform(provider)
                && wanted == tagged
                && catalog.is_supported_vf_model(iface.vendor, iface.device)
        }
        _ => false,
    }
}
