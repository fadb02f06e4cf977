// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Conversions from CRD objects into the policy model.
//!
//! Mode strings, PCI identifiers and addresses are parsed here; an
//! unknown or malformed value fails the conversion. Empty strings are
//! treated the same as absent fields, matching how the objects are
//! written in practice. The one exception is `pfNames`: tokens stay raw
//! so a malformed token is ruled on by the validation rules, in rule
//! order, rather than at the boundary.

use std::collections::BTreeSet;
use std::str::FromStr;

use k8s_types::node_policy::{SriovNicSelector, SriovNodePolicy};
use k8s_types::operator_config::SriovOperatorConfig;
use nic::convert::FromK8sError;
use nic::pci::{DeviceId, PciAddress, VendorId};

use crate::device::{DeviceType, EswitchMode, LinkType, VdpaType};
use crate::policy::{OperatorConfig, Policy};
use crate::selector::NicSelector;

impl TryFrom<&SriovNodePolicy> for Policy {
    type Error = FromK8sError;

    fn try_from(object: &SriovNodePolicy) -> Result<Policy, Self::Error> {
        let name = object
            .metadata
            .name
            .clone()
            .ok_or_else(|| FromK8sError::MissingData("policy has no name".to_string()))?;
        let spec = &object.spec;
        let nic_selector = spec
            .nic_selector
            .as_ref()
            .map(|selector| typed_nic_selector(&name, selector))
            .transpose()?
            .unwrap_or_default();
        let device_type =
            parse_mode::<DeviceType>(&name, "deviceType", spec.device_type.as_deref())?
                .unwrap_or_default();
        let link_type = parse_mode::<LinkType>(&name, "linkType", spec.link_type.as_deref())?;
        let vdpa_type = parse_mode::<VdpaType>(&name, "vdpaType", spec.vdpa_type.as_deref())?
            .unwrap_or_default();
        let eswitch_mode =
            parse_mode::<EswitchMode>(&name, "eswitchMode", spec.eswitch_mode.as_deref())?
                .unwrap_or_default();
        Ok(Policy {
            namespace: object.metadata.namespace.clone().unwrap_or_default(),
            resource_name: spec.resource_name.clone().unwrap_or_default(),
            node_selector: spec.node_selector.clone().unwrap_or_default().into(),
            nic_selector,
            num_vfs: spec.num_vfs.unwrap_or_default(),
            priority: spec.priority.unwrap_or_default(),
            mtu: spec.mtu,
            device_type,
            is_rdma: spec.is_rdma.unwrap_or_default(),
            link_type,
            vdpa_type,
            eswitch_mode,
            name,
        })
    }
}

impl TryFrom<&SriovOperatorConfig> for OperatorConfig {
    type Error = FromK8sError;

    fn try_from(object: &SriovOperatorConfig) -> Result<OperatorConfig, Self::Error> {
        let name = object
            .metadata
            .name
            .clone()
            .ok_or_else(|| FromK8sError::MissingData("operator config has no name".to_string()))?;
        Ok(OperatorConfig {
            name,
            namespace: object.metadata.namespace.clone().unwrap_or_default(),
            config_daemon_node_selector: object
                .spec
                .config_daemon_node_selector
                .clone()
                .unwrap_or_default()
                .into(),
            disable_drain: object.spec.disable_drain.unwrap_or_default(),
            log_level: object.spec.log_level.unwrap_or_default(),
        })
    }
}

fn typed_nic_selector(
    policy: &str,
    selector: &SriovNicSelector,
) -> Result<NicSelector, FromK8sError> {
    let vendor = match present(selector.vendor.as_deref()) {
        Some(raw) => Some(VendorId::try_from(raw).map_err(|e| {
            FromK8sError::ParseError(format!("vendor in policy {policy}: {e}"))
        })?),
        None => None,
    };
    let device = match present(selector.device_id.as_deref()) {
        Some(raw) => Some(DeviceId::try_from(raw).map_err(|e| {
            FromK8sError::ParseError(format!("deviceID in policy {policy}: {e}"))
        })?),
        None => None,
    };
    let mut root_devices = BTreeSet::new();
    for raw in selector.root_devices.iter().flatten() {
        let address = PciAddress::try_new(raw).map_err(|e| {
            FromK8sError::ParseError(format!("rootDevices in policy {policy}: {e}"))
        })?;
        root_devices.insert(address);
    }
    Ok(NicSelector {
        vendor,
        device,
        pf_names: selector.pf_names.clone().unwrap_or_default(),
        root_devices,
        net_filter: selector.net_filter.clone().filter(|value| !value.is_empty()),
    })
}

fn parse_mode<T>(policy: &str, field: &str, value: Option<&str>) -> Result<Option<T>, FromK8sError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match present(value) {
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| {
            FromK8sError::Invalid(format!("{field} '{raw}' in policy {policy}: {e}"))
        }),
        None => Ok(None),
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ingest(manifest: &str) -> Result<Policy, FromK8sError> {
        let object: SriovNodePolicy = serde_yaml_ng::from_str(manifest).unwrap();
        Policy::try_from(&object)
    }

    #[test]
    fn full_manifest_converts() {
        let policy = ingest(
            r#"
apiVersion: sriovgate.dev/v1
kind: SriovNodePolicy
metadata:
  name: mlnx-vdpa
  namespace: sriovgate-system
spec:
  resourceName: vdpa_pool
  nodeSelector:
    feature.node.kubernetes.io/network-sriov.capable: "true"
  priority: 10
  mtu: 9000
  numVfs: 8
  nicSelector:
    vendor: "15b3"
    deviceId: "101d"
    pfNames:
      - ens1f0#0-3
    rootDevices:
      - "0000:3b:00.0"
  deviceType: netdevice
  linkType: ETH
  vdpaType: virtio
  eswitchMode: switchdev
"#,
        )
        .unwrap();

        assert_eq!(policy.name, "mlnx-vdpa");
        assert_eq!(policy.namespace, "sriovgate-system");
        assert_eq!(policy.resource_name, "vdpa_pool");
        assert_eq!(policy.num_vfs, 8);
        assert_eq!(policy.priority, 10);
        assert_eq!(policy.mtu, Some(9000));
        assert_eq!(policy.nic_selector.vendor, Some(VendorId::MELLANOX));
        assert_eq!(policy.nic_selector.device, Some(DeviceId::new(0x101d)));
        assert_eq!(policy.nic_selector.pf_names, vec!["ens1f0#0-3".to_string()]);
        assert_eq!(policy.nic_selector.root_devices.len(), 1);
        assert_eq!(policy.device_type, DeviceType::Netdevice);
        assert_eq!(policy.link_type, Some(LinkType::Eth));
        assert_eq!(policy.vdpa_type, VdpaType::Virtio);
        assert_eq!(policy.eswitch_mode, EswitchMode::Switchdev);
    }

    #[test]
    fn absent_fields_take_documented_defaults() {
        let policy = ingest(
            r#"
apiVersion: sriovgate.dev/v1
kind: SriovNodePolicy
metadata:
  name: bare
spec: {}
"#,
        )
        .unwrap();

        assert_eq!(policy.namespace, "");
        assert_eq!(policy.resource_name, "");
        assert_eq!(policy.num_vfs, 0);
        assert_eq!(policy.mtu, None);
        assert_eq!(policy.device_type, DeviceType::Netdevice);
        assert_eq!(policy.link_type, None);
        assert_eq!(policy.vdpa_type, VdpaType::None);
        assert_eq!(policy.eswitch_mode, EswitchMode::Legacy);
        assert!(policy.nic_selector.is_empty());
        assert!(policy.node_selector.is_empty());
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let policy = ingest(
            r#"
apiVersion: sriovgate.dev/v1
kind: SriovNodePolicy
metadata:
  name: blanks
spec:
  deviceType: ""
  nicSelector:
    vendor: ""
    netFilter: ""
"#,
        )
        .unwrap();

        assert_eq!(policy.device_type, DeviceType::Netdevice);
        assert_eq!(policy.nic_selector.vendor, None);
        assert_eq!(policy.nic_selector.net_filter, None);
        assert!(policy.nic_selector.is_empty());
    }

    #[test]
    fn unknown_mode_strings_fail_conversion() {
        let converted = ingest(
            r#"
apiVersion: sriovgate.dev/v1
kind: SriovNodePolicy
metadata:
  name: bad-mode
spec:
  deviceType: uio_pci_generic
"#,
        );
        assert!(matches!(converted, Err(FromK8sError::Invalid(_))));
    }

    #[test]
    fn malformed_vendor_fails_conversion() {
        let converted = ingest(
            r#"
apiVersion: sriovgate.dev/v1
kind: SriovNodePolicy
metadata:
  name: bad-vendor
spec:
  nicSelector:
    vendor: intel
"#,
        );
        assert!(matches!(converted, Err(FromK8sError::ParseError(_))));
    }

    #[test]
    fn malformed_pf_tokens_survive_conversion() {
        let policy = ingest(
            r#"
apiVersion: sriovgate.dev/v1
kind: SriovNodePolicy
metadata:
  name: raw-tokens
spec:
  nicSelector:
    pfNames:
      - ens1f0#nonsense
"#,
        )
        .unwrap();
        assert_eq!(
            policy.nic_selector.pf_names,
            vec!["ens1f0#nonsense".to_string()]
        );
    }

    #[test]
    fn operator_config_converts() {
        let manifest = r#"
apiVersion: sriovgate.dev/v1
kind: SriovOperatorConfig
metadata:
  name: default
  namespace: sriovgate-system
spec:
  disableDrain: true
  configDaemonNodeSelector:
    node-role.kubernetes.io/worker: ""
"#;
        let object: SriovOperatorConfig = serde_yaml_ng::from_str(manifest).unwrap();
        let config = OperatorConfig::try_from(&object).unwrap();
        assert_eq!(config.name, "default");
        assert_eq!(config.namespace, "sriovgate-system");
        assert!(config.disable_drain);
        assert_eq!(config.config_daemon_node_selector.len(), 1);
        assert_eq!(config.log_level, 0);
    }
}
