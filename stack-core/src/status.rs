//! Cluster status schema
//!
//! Typed view of the status document printed by `juju status`. Only the
//! fields the deployer consumes are modelled; everything else in the
//! document is ignored.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{DeployError, Result};

/// Agent state reported for machines that have no agent yet
pub const NO_AGENT: &str = "no-agent";

/// A point-in-time read of cluster state
///
/// Maps are ordered by identifier so that classification and diagnostics
/// are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub machines: BTreeMap<String, MachineStatus>,
    #[serde(default)]
    pub services: BTreeMap<String, ServiceStatus>,
}

/// Machine record
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MachineStatus {
    /// Missing while the machine is still being provisioned
    #[serde(rename = "agent-state")]
    pub agent_state: Option<String>,
    #[serde(rename = "dns-name")]
    pub dns_name: Option<String>,
    #[serde(rename = "instance-id")]
    pub instance_id: Option<String>,
}

impl MachineStatus {
    /// Agent state, falling back to [`NO_AGENT`]
    pub fn agent_state(&self) -> &str {
        self.agent_state.as_deref().unwrap_or(NO_AGENT)
    }
}

/// Service record
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceStatus {
    pub charm: Option<String>,
    #[serde(default)]
    pub exposed: bool,
    #[serde(default)]
    pub units: BTreeMap<String, UnitStatus>,
}

/// Unit record
///
/// Unlike machines, a unit always reports an agent state; a document
/// without one is rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitStatus {
    #[serde(rename = "agent-state")]
    pub agent_state: String,
    #[serde(rename = "public-address")]
    pub public_address: Option<String>,
    pub machine: Option<String>,
}

impl StatusSnapshot {
    /// Parses a YAML status document
    pub fn from_yaml(document: &str) -> Result<Self> {
        serde_yaml::from_str(document).map_err(DeployError::StatusParse)
    }

    /// Looks up a unit of a service
    ///
    /// # Arguments
    /// * `service` - Service name (e.g. "wordpress")
    /// * `unit` - Unit name (e.g. "wordpress/0")
    pub fn unit(&self, service: &str, unit: &str) -> Result<&UnitStatus> {
        self.services
            .get(service)
            .and_then(|s| s.units.get(unit))
            .ok_or_else(|| DeployError::MissingUnit {
                unit: unit.to_string(),
            })
    }

    /// Public address of a unit of a service
    pub fn public_address(&self, service: &str, unit: &str) -> Result<&str> {
        self.unit(service, unit)?
            .public_address
            .as_deref()
            .filter(|addr| !addr.is_empty())
            .ok_or_else(|| DeployError::MissingAddress {
                unit: unit.to_string(),
            })
    }
}
