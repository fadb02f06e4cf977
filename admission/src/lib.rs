// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Admission engine for sriovgate policies.
//!
//! The entry point is [`PolicyValidator`]: give it [`EngineSettings`], a
//! [`ClusterView`] over the objects it may consult, and a policy plus the
//! operation under review; it answers with a [`Verdict`]. Content problems
//! are denials carried inside the verdict; a failure to read the cluster
//! is an `Err`, so hosts can fail closed without blaming the policy.
//!
//! The engine holds no cluster state of its own and nothing mutable
//! between reviews; concurrent reviews only share the read-only hardware
//! registries.

pub mod conflict;
pub mod errors;
pub mod matcher;
pub mod rules;
pub mod snapshot;
pub mod validator;
pub mod verdict;

pub use errors::AdmissionError;
pub use snapshot::{ClusterView, RetrievalError, StaticClusterView};
pub use validator::{EngineSettings, Operation, PolicyValidator};
pub use verdict::Verdict;
