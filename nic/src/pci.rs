// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! PCI identifiers.
//!
//! This module provides the [`VendorId`] and [`DeviceId`] types for the
//! 16-bit identifiers assigned by the PCI-SIG, and [`PciAddress`] for a
//! device location in extended bus-device-function notation. All three
//! travel as strings on the wire and reject malformed input on the way in.
//!
//! # Examples
//!
//! ```
//! use sriovgate_nic::pci::VendorId;
//!
//! let intel = VendorId::new(0x8086);
//! assert_eq!(format!("{}", intel), "8086");
//!
//! // Parse from hex string
//! let vendor = VendorId::try_from("15b3".to_string()).unwrap();
//! assert_eq!(vendor, VendorId::MELLANOX);
//! ```

use serde::{Deserialize, Serialize};

/// Error returned when a string does not hold a 16-bit hex PCI identifier.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("'{0}' is not a 16-bit hex PCI identifier")]
pub struct InvalidPciId(String);

/// A 16-bit PCI vendor identifier.
///
/// Vendor IDs are assigned by the PCI-SIG to uniquely identify device
/// manufacturers.
///
/// # Display
///
/// The `Display` and `LowerHex` implementations format the vendor ID
/// as a 4-digit hexadecimal value with leading zeros.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
#[repr(transparent)]
pub struct VendorId(u16);

impl VendorId {
    /// Intel Corporation.
    pub const INTEL: VendorId = VendorId::new(0x8086);
    /// Mellanox Technologies.
    pub const MELLANOX: VendorId = VendorId::new(0x15b3);

    /// Creates a new vendor ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw vendor ID value.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl std::fmt::LowerHex for VendorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

impl std::fmt::Display for VendorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:04x}")
    }
}

impl From<VendorId> for String {
    fn from(value: VendorId) -> String {
        format!("{value}")
    }
}

impl TryFrom<&str> for VendorId {
    type Error = InvalidPciId;

    /// Parses a vendor ID from a string of 1-4 hexadecimal digits.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let id = u16::from_str_radix(value, 16).map_err(|_| InvalidPciId(value.to_string()))?;
        Ok(VendorId(id))
    }
}

impl TryFrom<String> for VendorId {
    type Error = InvalidPciId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        VendorId::try_from(value.as_str())
    }
}

/// A 16-bit PCI device identifier.
///
/// Device IDs are assigned by the vendor and are only meaningful next to a
/// [`VendorId`].
///
/// # Display
///
/// Formats as a 4-digit hexadecimal value with leading zeros, like
/// [`VendorId`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
#[repr(transparent)]
pub struct DeviceId(u16);

impl DeviceId {
    /// Creates a new device ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw device ID value.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl std::fmt::LowerHex for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:04x}")
    }
}

impl From<DeviceId> for String {
    fn from(value: DeviceId) -> String {
        format!("{value}")
    }
}

impl TryFrom<&str> for DeviceId {
    type Error = InvalidPciId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let id = u16::from_str_radix(value, 16).map_err(|_| InvalidPciId(value.to_string()))?;
        Ok(DeviceId(id))
    }
}

impl TryFrom<String> for DeviceId {
    type Error = InvalidPciId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DeviceId::try_from(value.as_str())
    }
}

/// Error returned when a string does not hold a PCI address.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("'{0}' is not a PCI address in DDDD:BB:DD.F notation")]
pub struct InvalidPciAddress(String);

/// A PCI device location in `DDDD:BB:DD.F` notation (hex domain, bus,
/// device, function).
///
/// The address is normalized to lowercase on construction so that
/// addresses compare equal regardless of the case they were written in.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
#[repr(transparent)]
pub struct PciAddress(String);

impl PciAddress {
    /// Parses and normalizes a PCI address.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPciAddress`] if the string is not in
    /// `DDDD:BB:DD.F` notation.
    pub fn try_new(value: impl AsRef<str>) -> Result<Self, InvalidPciAddress> {
        let value = value.as_ref();
        if !PciAddress::well_formed(value) {
            return Err(InvalidPciAddress(value.to_string()));
        }
        Ok(PciAddress(value.to_ascii_lowercase()))
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn well_formed(value: &str) -> bool {
        let Some((domain, rest)) = value.split_once(':') else {
            return false;
        };
        let Some((bus, rest)) = rest.split_once(':') else {
            return false;
        };
        let Some((device, function)) = rest.split_once('.') else {
            return false;
        };
        domain.len() == 4
            && bus.len() == 2
            && device.len() == 2
            && function.len() == 1
            && [domain, bus, device, function]
                .into_iter()
                .all(|part| part.bytes().all(|byte| byte.is_ascii_hexdigit()))
    }
}

impl std::fmt::Display for PciAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PciAddress> for String {
    fn from(value: PciAddress) -> String {
        value.0
    }
}

impl TryFrom<&str> for PciAddress {
    type Error = InvalidPciAddress;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        PciAddress::try_new(value)
    }
}

impl TryFrom<String> for PciAddress {
    type Error = InvalidPciAddress;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PciAddress::try_new(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vendor_id_formats_with_leading_zeros() {
        assert_eq!(format!("{}", VendorId::new(0x86)), "0086");
        assert_eq!(String::from(VendorId::INTEL), "8086");
    }

    #[test]
    fn vendor_id_parses_hex() {
        assert_eq!(VendorId::try_from("8086"), Ok(VendorId::INTEL));
        assert_eq!(VendorId::try_from("15B3"), Ok(VendorId::MELLANOX));
        assert!(VendorId::try_from("zzzz").is_err());
        assert!(VendorId::try_from("10000").is_err());
        assert!(VendorId::try_from("").is_err());
    }

    #[test]
    fn device_id_round_trips_through_serde() {
        let device: DeviceId = serde_json::from_str(r#""158b""#).unwrap();
        assert_eq!(device, DeviceId::new(0x158b));
        assert_eq!(serde_json::to_string(&device).unwrap(), r#""158b""#);
    }

    #[test]
    fn pci_address_accepts_ebdf_notation() {
        let address = PciAddress::try_new("0000:3B:00.0").unwrap();
        assert_eq!(address.as_str(), "0000:3b:00.0");
        assert_eq!(address, PciAddress::try_new("0000:3b:00.0").unwrap());
    }

    #[test]
    fn pci_address_rejects_malformed_input() {
        for bad in ["", "3b:00.0", "0000:3b:00", "0000:3b:00.00", "000g:3b:00.0"] {
            assert!(PciAddress::try_new(bad).is_err(), "{bad} should not parse");
        }
    }
}
