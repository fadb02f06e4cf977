// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Policy model for sriovgate.
//!
//! A [`Policy`] is a typed VF allocation request: which machines it applies
//! to, which physical functions it claims (including optional VF index
//! ranges), and how the allocated VFs must be configured. This crate owns
//! that model, the PF-name/range grammar, the node-selector merge used for
//! scheduling, and the conversions from the raw CRD objects.

pub mod affinity;
pub mod convert;
pub mod device;
pub mod policy;
pub mod selector;
pub mod vfrange;

pub use policy::{
    DEFAULT_CONFIG_NAME, DEFAULT_POLICY_NAME, OperatorConfig, OperatorConfigBuilder, Policy,
    PolicyBuilder,
};
