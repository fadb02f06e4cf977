// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Hardware vocabulary for sriovgate.
//!
//! This crate holds the typed view of SR-IOV capable hardware: PCI
//! identifiers, per-machine interface inventories, and the registries of
//! device models and vendor limits the admission logic consults. Nothing
//! here talks to a kernel or an API server; the types are built from
//! `k8s-types` objects (see [`convert`]) or assembled directly in tests.

pub mod catalog;
pub mod convert;
pub mod descriptor;
pub mod pci;
