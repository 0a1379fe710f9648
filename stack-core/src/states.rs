//! Agent-state classification
//!
//! Groups every machine and unit of a [`StatusSnapshot`] by the agent state
//! it currently reports.

use std::collections::BTreeMap;

use crate::status::StatusSnapshot;

/// The only state that counts as converged
pub const STARTED: &str = "started";

/// Entity identifiers grouped by agent state
///
/// Each machine and unit of the source snapshot appears in exactly one
/// bucket. Buckets iterate in label order; entities keep the order in
/// which they were classified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateGroups {
    groups: BTreeMap<String, Vec<String>>,
}

/// Maps agent states to the machines and units in those states
///
/// Machines come first, sorted by id, then the units of each service with
/// services sorted by name.
pub fn agent_states(status: &StatusSnapshot) -> StateGroups {
    let mut states = StateGroups::default();
    for (machine_name, machine) in &status.machines {
        states.push(machine.agent_state(), machine_name);
    }
    for service in status.services.values() {
        for (unit_name, unit) in &service.units {
            states.push(&unit.agent_state, unit_name);
        }
    }
    states
}

/// True if an agent state is fatal
pub fn is_error_state(state: &str) -> bool {
    state.contains("error")
}

impl StateGroups {
    fn push(&mut self, state: &str, entity: &str) {
        self.groups
            .entry(state.to_string())
            .or_default()
            .push(entity.to_string());
    }

    /// Entities in the given state
    pub fn get(&self, state: &str) -> Option<&[String]> {
        self.groups.get(state).map(Vec::as_slice)
    }

    /// All buckets in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(state, entities)| (state.as_str(), entities.as_slice()))
    }

    /// Buckets other than [`STARTED`]
    pub fn pending(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.iter().filter(|(state, _)| *state != STARTED)
    }

    /// First entity of the first error bucket, with its state
    pub fn first_error(&self) -> Option<(&str, &str)> {
        self.pending()
            .filter(|(state, _)| is_error_state(state))
            .find_map(|(state, entities)| entities.first().map(|e| (e.as_str(), state)))
    }

    /// `"<state>: <ids>"` for every non-started bucket, joined by `" | "`
    pub fn pending_summary(&self) -> String {
        self.pending()
            .map(|(state, entities)| format!("{}: {}", state, entities.join(" ")))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// True when nothing is outside the started bucket
    pub fn is_converged(&self) -> bool {
        self.pending().next().is_none()
    }

    /// Total number of classified entities
    pub fn entity_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
