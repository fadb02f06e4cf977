// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! The `SriovOperatorConfig` custom resource.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Cluster-wide operator settings. Only the object named `default` in the
/// operator namespace is honored.
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "sriovgate.dev",
    version = "v1",
    kind = "SriovOperatorConfig",
    plural = "sriovoperatorconfigs",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct SriovOperatorConfigSpec {
    /// Labels a node must carry for the config daemon to be scheduled there.
    pub config_daemon_node_selector: Option<BTreeMap<String, String>>,
    /// Skip draining nodes before applying policies.
    pub disable_drain: Option<bool>,
    /// Operator log verbosity, 0 (errors) to 2 (debug).
    pub log_level: Option<u32>,
}
