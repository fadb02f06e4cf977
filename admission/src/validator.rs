// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! The admission entry points.

use nic::catalog::{NicCatalog, PlatformCatalog, VendorLimits, VfCeiling};
use nic::descriptor::{MachineDescriptor, NodeState};
use policy::device::VdpaType;
use policy::{DEFAULT_CONFIG_NAME, OperatorConfig, Policy};
use tracing::{debug, warn};

use crate::conflict::check_conflict;
use crate::errors::AdmissionError;
use crate::matcher::nic_matches;
use crate::rules::check_static;
use crate::snapshot::{ClusterView, RetrievalError};
use crate::verdict::Verdict;

/// What the requester is doing to the object under review.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    /// The object does not exist yet.
    Create,
    /// The object exists and is being replaced.
    Update,
    /// The object is being removed.
    Delete,
}

/// Deployment-level knobs of the validator.
#[derive(Clone, Debug)]
pub struct EngineSettings {
    /// The namespace whose policies are acted on.
    pub namespace: String,
    /// Admit NICs outside the supported catalog.
    pub dev_mode: bool,
}

impl EngineSettings {
    pub fn new(namespace: impl Into<String>) -> EngineSettings {
        EngineSettings {
            namespace: namespace.into(),
            dev_mode: false,
        }
    }

    /// Reads the settings from `NAMESPACE` and `DEV_MODE`.
    #[must_use]
    pub fn from_env() -> EngineSettings {
        EngineSettings {
            namespace: std::env::var("NAMESPACE").unwrap_or_default(),
            dev_mode: std::env::var("DEV_MODE").is_ok_and(|value| value == "TRUE"),
        }
    }
}

/// Stateless admission engine for policies and operator configs.
///
/// Holds only settings and catalogs, so one instance can serve any number
/// of concurrent reviews. Cluster state enters per call through a
/// [`ClusterView`].
#[derive(Clone, Debug)]
pub struct PolicyValidator {
    settings: EngineSettings,
    catalog: NicCatalog,
    limits: VendorLimits,
    platforms: PlatformCatalog,
}

impl PolicyValidator {
    /// A validator with the built-in catalogs.
    pub fn new(settings: EngineSettings) -> PolicyValidator {
        PolicyValidator {
            settings,
            catalog: NicCatalog::builtin(),
            limits: VendorLimits::builtin(),
            platforms: PlatformCatalog::builtin(),
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: NicCatalog) -> PolicyValidator {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: VendorLimits) -> PolicyValidator {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn with_platforms(mut self, platforms: PlatformCatalog) -> PolicyValidator {
        self.platforms = platforms;
        self
    }

    /// Reviews one policy operation against the cluster.
    ///
    /// The default policy in the configured namespace bypasses validation
    /// except that it must not be deleted. Deletes of other policies are
    /// always admitted. Everything else runs the static rules first and
    /// the cluster-backed checks second.
    ///
    /// # Errors
    ///
    /// [`RetrievalError`] if the cluster view cannot be read. The review
    /// fails closed: the caller must reject the request rather than guess.
    pub fn validate_policy(
        &self,
        view: &impl ClusterView,
        policy: &Policy,
        operation: Operation,
    ) -> Result<Verdict, RetrievalError> {
        debug!("validating {operation:?} of policy {}", policy.name);
        let mut warnings = Vec::new();
        if policy.is_default() && policy.namespace == self.settings.namespace {
            if operation == Operation::Delete {
                return Ok(Verdict::deny(AdmissionError::DefaultPolicyDeletion, warnings));
            }
            // The operator's own object is not validated.
            return Ok(Verdict::allow(warnings));
        }
        if policy.namespace != self.settings.namespace {
            let warning = format!(
                "policy {} is created or updated but not used: only policies in namespace '{}' are respected",
                policy.name, self.settings.namespace,
            );
            warn!("{warning}");
            warnings.push(warning);
        }
        if operation == Operation::Delete {
            return Ok(Verdict::allow(warnings));
        }
        if let Err(reason) = check_static(policy, &self.catalog, self.settings.dev_mode) {
            return Ok(Verdict::deny(reason, warnings));
        }
        match self.check_cluster(view, policy) {
            Ok(()) => Ok(Verdict::allow(warnings)),
            Err(AdmissionError::Retrieval(error)) => Err(error),
            Err(reason) => Ok(Verdict::deny(reason, warnings)),
        }
    }

    fn check_cluster(
        &self,
        view: &impl ClusterView,
        policy: &Policy,
    ) -> Result<(), AdmissionError> {
        let machines = view.machines(&policy.node_selector)?;
        let states = view.node_states(&self.settings.namespace)?;
        let others = view.policies(&self.settings.namespace)?;
        let mut any_machine = false;
        let mut any_interface = false;
        for machine in &machines {
            if !policy.selects(machine) {
                continue;
            }
            any_machine = true;
            for state in states.iter().filter(|state| state.node == machine.name) {
                self.check_node_state(policy, state, machine, &mut any_interface)?;
            }
            // Policies that have not reached this node's state yet still
            // claim their declared ranges; compare against those directly.
            for other in others.iter().filter(|other| other.name != policy.name) {
                if other.selects(machine) {
                    check_conflict(policy, other)?;
                }
            }
        }
        if !any_machine {
            return Err(AdmissionError::NoNodeSelected(policy.name.clone()));
        }
        if !any_interface {
            return Err(AdmissionError::NoNicSelected(policy.name.clone()));
        }
        Ok(())
    }

    fn check_node_state(
        &self,
        policy: &Policy,
        state: &NodeState,
        machine: &MachineDescriptor,
        any_interface: &mut bool,
    ) -> Result<(), AdmissionError> {
        for iface in &state.interfaces {
            if !nic_matches(
                &policy.nic_selector,
                iface,
                machine,
                &self.catalog,
                &self.platforms,
            ) {
                continue;
            }
            *any_interface = true;
            if !policy.is_default() && policy.num_vfs == 0 {
                return Err(AdmissionError::ZeroVfRequest(policy.name.clone()));
            }
            match self.limits.ceiling(iface.vendor) {
                Some(VfCeiling::InterfaceTotal) if policy.num_vfs > iface.total_vfs => {
                    return Err(AdmissionError::TooManyVfs {
                        requested: policy.num_vfs,
                        policy: policy.name.clone(),
                        limit: iface.total_vfs,
                        interface: iface.name.clone(),
                        node: state.node.clone(),
                    });
                }
                Some(VfCeiling::Fixed(limit)) if policy.num_vfs > limit => {
                    return Err(AdmissionError::TooManyVfs {
                        requested: policy.num_vfs,
                        policy: policy.name.clone(),
                        limit,
                        interface: iface.name.clone(),
                        node: state.node.clone(),
                    });
                }
                _ => {}
            }
            if policy.vdpa_type == VdpaType::Virtio && !self.limits.supports_vdpa(iface.vendor) {
                return Err(AdmissionError::VdpaUnsupportedVendor {
                    vendor: iface.vendor,
                    interface: iface.name.clone(),
                    node: state.node.clone(),
                });
            }
        }
        Ok(())
    }

    /// Reviews one operator config operation.
    ///
    /// Only the config named `default` is honored. It must not be deleted,
    /// and disabling drain is admitted with a warning.
    pub fn validate_operator_config(
        &self,
        config: &OperatorConfig,
        operation: Operation,
    ) -> Verdict {
        debug!("validating {operation:?} of operator config {}", config.name);
        if config.name != DEFAULT_CONFIG_NAME {
            return Verdict::deny(
                AdmissionError::UnknownOperatorConfig(config.name.clone()),
                Vec::new(),
            );
        }
        if operation == Operation::Delete {
            return Verdict::deny(AdmissionError::DefaultConfigDeletion, Vec::new());
        }
        let mut warnings = Vec::new();
        if config.disable_drain {
            let warning =
                "node draining is disabled for applying policies, this may result in workload interruption"
                    .to_string();
            warn!("{warning}");
            warnings.push(warning);
        }
        Verdict::allow(warnings)
    }
}
