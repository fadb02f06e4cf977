// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Per-policy validation rules.

use nic::catalog::NicCatalog;
use policy::Policy;
use policy::device::{DeviceType, EswitchMode, LinkType, VdpaType};
use policy::vfrange::PfNameToken;
use tracing::debug;

use crate::errors::AdmissionError;

/// Checks everything about a policy that needs no cluster state.
///
/// Rules run in a fixed order and stop at the first failure, so the
/// requester always sees the most fundamental defect first. `dev_mode`
/// skips only the supported-hardware rule.
///
/// # Errors
///
/// The [`AdmissionError`] of the first rule the policy breaks.
pub fn check_static(
    policy: &Policy,
    catalog: &NicCatalog,
    dev_mode: bool,
) -> Result<(), AdmissionError> {
    check_resource_name(policy)?;
    if policy.nic_selector.is_empty() {
        return Err(AdmissionError::EmptyNicSelector(policy.name.clone()));
    }
    if dev_mode {
        debug!("dev mode enabled: admitting NICs outside the supported catalog");
    } else {
        check_supported_hardware(policy, catalog)?;
    }
    for token in &policy.nic_selector.pf_names {
        let parsed = PfNameToken::parse(token)?;
        parsed.check_within(policy.num_vfs)?;
    }
    check_mode_combinations(policy)
}

fn check_resource_name(policy: &Policy) -> Result<(), AdmissionError> {
    let valid = !policy.resource_name.is_empty()
        && policy
            .resource_name
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_');
    if valid {
        Ok(())
    } else {
        Err(AdmissionError::InvalidResourceName(
            policy.resource_name.clone(),
        ))
    }
}

fn check_supported_hardware(policy: &Policy, catalog: &NicCatalog) -> Result<(), AdmissionError> {
    let selector = &policy.nic_selector;
    if let Some(vendor) = selector.vendor {
        if !catalog.is_supported_vendor(vendor) {
            return Err(AdmissionError::UnsupportedVendor(vendor));
        }
        if let Some(device) = selector.device
            && !catalog.is_supported_model(vendor, device)
        {
            return Err(AdmissionError::UnsupportedModel(vendor, device));
        }
    } else if let Some(device) = selector.device
        && !catalog.is_supported_device(device)
    {
        return Err(AdmissionError::UnsupportedDevice(device));
    }
    Ok(())
}

fn check_mode_combinations(policy: &Policy) -> Result<(), AdmissionError> {
    if policy.device_type == DeviceType::VfioPci && policy.is_rdma {
        return Err(AdmissionError::VfioPciWithRdma);
    }
    if policy.link_type == Some(LinkType::Ib) && !policy.is_rdma {
        return Err(AdmissionError::InfinibandWithoutRdma);
    }
    if policy.vdpa_type == VdpaType::Virtio {
        if policy.device_type != DeviceType::Netdevice {
            return Err(AdmissionError::VdpaNeedsNetdevice(policy.device_type));
        }
        if policy.eswitch_mode != EswitchMode::Switchdev {
            return Err(AdmissionError::VdpaNeedsSwitchdev);
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use nic::pci::{DeviceId, VendorId};
    use policy::PolicyBuilder;
    use policy::selector::NicSelector;
    use policy::vfrange::PfNameError;
    use pretty_assertions::assert_eq;

    fn mellanox_selector() -> NicSelector {
        NicSelector {
            vendor: Some(VendorId::MELLANOX),
            ..NicSelector::default()
        }
    }

    fn base() -> PolicyBuilder {
        let mut builder = PolicyBuilder::default();
        builder
            .name("mlnx-rdma")
            .resource_name("rdma_pool")
            .nic_selector(mellanox_selector())
            .num_vfs(8u32);
        builder
    }

    #[test]
    fn well_formed_policy_passes() {
        let policy = base().build().unwrap();
        assert_eq!(check_static(&policy, &NicCatalog::builtin(), false), Ok(()));
    }

    #[test]
    fn resource_name_rules_run_first() {
        // Bad name and empty selector together: the name is reported.
        let policy = base()
            .resource_name("rdma-pool")
            .nic_selector(NicSelector::default())
            .build()
            .unwrap();
        assert_eq!(
            check_static(&policy, &NicCatalog::builtin(), false),
            Err(AdmissionError::InvalidResourceName("rdma-pool".to_string()))
        );

        let policy = base().resource_name("").build().unwrap();
        assert!(matches!(
            check_static(&policy, &NicCatalog::builtin(), false),
            Err(AdmissionError::InvalidResourceName(_))
        ));
    }

    #[test]
    fn empty_selector_is_rejected() {
        let policy = base().nic_selector(NicSelector::default()).build().unwrap();
        assert_eq!(
            check_static(&policy, &NicCatalog::builtin(), false),
            Err(AdmissionError::EmptyNicSelector("mlnx-rdma".to_string()))
        );
    }

    #[test]
    fn hardware_must_be_in_the_catalog() {
        let exotic = VendorId::new(0x1af4);
        let policy = base()
            .nic_selector(NicSelector {
                vendor: Some(exotic),
                ..NicSelector::default()
            })
            .build()
            .unwrap();
        assert_eq!(
            check_static(&policy, &NicCatalog::builtin(), false),
            Err(AdmissionError::UnsupportedVendor(exotic))
        );

        let policy = base()
            .nic_selector(NicSelector {
                vendor: Some(VendorId::MELLANOX),
                device: Some(DeviceId::new(0x158b)),
                ..NicSelector::default()
            })
            .build()
            .unwrap();
        assert_eq!(
            check_static(&policy, &NicCatalog::builtin(), false),
            Err(AdmissionError::UnsupportedModel(
                VendorId::MELLANOX,
                DeviceId::new(0x158b)
            ))
        );

        let policy = base()
            .nic_selector(NicSelector {
                device: Some(DeviceId::new(0xbeef)),
                ..NicSelector::default()
            })
            .build()
            .unwrap();
        assert_eq!(
            check_static(&policy, &NicCatalog::builtin(), false),
            Err(AdmissionError::UnsupportedDevice(DeviceId::new(0xbeef)))
        );
    }

    #[test]
    fn dev_mode_skips_only_the_hardware_rule() {
        let exotic = NicSelector {
            vendor: Some(VendorId::new(0x1af4)),
            pf_names: vec!["ens1f0#0-banana".to_string()],
            ..NicSelector::default()
        };
        let policy = base().nic_selector(exotic).build().unwrap();
        // The hardware rule is skipped, the token rules are not.
        assert!(matches!(
            check_static(&policy, &NicCatalog::builtin(), true),
            Err(AdmissionError::MalformedPfName(PfNameError::BadRangeEnd(_)))
        ));
    }

    #[test]
    fn pf_tokens_must_parse_and_fit() {
        let policy = base()
            .nic_selector(NicSelector {
                vendor: Some(VendorId::MELLANOX),
                pf_names: vec!["ens1f0#2-5".to_string()],
                ..NicSelector::default()
            })
            .num_vfs(5u32)
            .build()
            .unwrap();
        assert_eq!(
            check_static(&policy, &NicCatalog::builtin(), false),
            Err(AdmissionError::MalformedPfName(
                PfNameError::EndBeyondCapacity("ens1f0#2-5".to_string(), 5)
            ))
        );

        let policy = base()
            .nic_selector(NicSelector {
                vendor: Some(VendorId::MELLANOX),
                pf_names: vec!["ens1f0#2-5".to_string()],
                ..NicSelector::default()
            })
            .num_vfs(6u32)
            .build()
            .unwrap();
        assert_eq!(check_static(&policy, &NicCatalog::builtin(), false), Ok(()));
    }

    #[test]
    fn vfio_pci_conflicts_with_rdma() {
        let policy = base()
            .device_type(DeviceType::VfioPci)
            .is_rdma(true)
            .build()
            .unwrap();
        assert_eq!(
            check_static(&policy, &NicCatalog::builtin(), false),
            Err(AdmissionError::VfioPciWithRdma)
        );
    }

    #[test]
    fn infiniband_requires_rdma() {
        let policy = base().link_type(LinkType::Ib).build().unwrap();
        assert_eq!(
            check_static(&policy, &NicCatalog::builtin(), false),
            Err(AdmissionError::InfinibandWithoutRdma)
        );

        let policy = base()
            .link_type(LinkType::Ib)
            .is_rdma(true)
            .build()
            .unwrap();
        assert_eq!(check_static(&policy, &NicCatalog::builtin(), false), Ok(()));
    }

    #[test]
    fn virtio_vdpa_needs_netdevice_and_switchdev() {
        let policy = base()
            .device_type(DeviceType::VfioPci)
            .vdpa_type(VdpaType::Virtio)
            .eswitch_mode(EswitchMode::Switchdev)
            .build()
            .unwrap();
        assert_eq!(
            check_static(&policy, &NicCatalog::builtin(), false),
            Err(AdmissionError::VdpaNeedsNetdevice(DeviceType::VfioPci))
        );

        let policy = base().vdpa_type(VdpaType::Virtio).build().unwrap();
        assert_eq!(
            check_static(&policy, &NicCatalog::builtin(), false),
            Err(AdmissionError::VdpaNeedsSwitchdev)
        );

        let policy = base()
            .vdpa_type(VdpaType::Virtio)
            .eswitch_mode(EswitchMode::Switchdev)
            .build()
            .unwrap();
        assert_eq!(check_static(&policy, &NicCatalog::builtin(), false), Ok(()));
    }
}
