// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Requested VF configuration modes.
//!
//! These enums are the typed forms of the free-text mode fields on the
//! policy CRD. Parsing happens once, during conversion; everything past
//! that point matches on variants instead of comparing strings.

/// Driver class the allocated VFs are bound to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, strum::Display, strum::EnumString)]
pub enum DeviceType {
    /// Kernel netdevice driver.
    #[default]
    #[strum(serialize = "netdevice")]
    Netdevice,
    /// Userspace vfio-pci driver.
    #[strum(serialize = "vfio-pci")]
    VfioPci,
}

/// Link layer of the device.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display, strum::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum LinkType {
    /// Ethernet.
    #[strum(serialize = "eth")]
    Eth,
    /// InfiniBand.
    #[strum(serialize = "ib")]
    Ib,
}

/// VF datapath acceleration mode.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, strum::Display, strum::EnumString)]
pub enum VdpaType {
    /// No acceleration.
    #[default]
    #[strum(serialize = "none")]
    None,
    /// Virtio datapath acceleration.
    #[strum(serialize = "virtio")]
    Virtio,
}

/// Embedded switch mode of the physical function.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, strum::Display, strum::EnumString)]
pub enum EswitchMode {
    /// The device's legacy SR-IOV mode.
    #[default]
    #[strum(serialize = "legacy")]
    Legacy,
    /// Switchdev mode, required for virtio/vdpa.
    #[strum(serialize = "switchdev")]
    Switchdev,
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        assert_eq!(DeviceType::default(), DeviceType::Netdevice);
        assert_eq!(VdpaType::default(), VdpaType::None);
        assert_eq!(EswitchMode::default(), EswitchMode::Legacy);
    }

    #[test]
    fn wire_forms_round_trip() {
        assert_eq!("vfio-pci".parse(), Ok(DeviceType::VfioPci));
        assert_eq!(DeviceType::VfioPci.to_string(), "vfio-pci");
        assert_eq!("virtio".parse(), Ok(VdpaType::Virtio));
        assert_eq!("switchdev".parse(), Ok(EswitchMode::Switchdev));
    }

    #[test]
    fn link_type_parses_case_insensitively() {
        assert_eq!("ib".parse(), Ok(LinkType::Ib));
        assert_eq!("IB".parse(), Ok(LinkType::Ib));
        assert_eq!("ETH".parse(), Ok(LinkType::Eth));
    }

    #[test]
    fn other_modes_require_exact_wire_form() {
        assert!("VFIO-PCI".parse::<DeviceType>().is_err());
        assert!("Virtio".parse::<VdpaType>().is_err());
        assert!("vhost".parse::<VdpaType>().is_err());
    }
}
