// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! CRD type definitions for sriovgate.
//!
//! Wire-facing types only: no client machinery lives here so the crate can
//! be pulled in by anything that needs to read or write the objects.

#![deny(clippy::all, clippy::pedantic)]

pub mod node_policy;
pub mod node_state;
pub mod operator_config;

/// API group all sriovgate CRDs are registered under.
pub const API_GROUP: &str = "sriovgate.dev";

/// CRD schema version served by this build.
pub const API_VERSION: &str = "v1";
