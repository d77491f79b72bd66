#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gate deciding whether the survey generator may offer a new contract.
//!
//! A generator runs only once the equipment it needs has been researched and
//! while the board is not already saturated with contracts of its kind.

use std::collections::{BTreeSet, HashSet};

use serde::Deserialize;

/// Set-membership view over the technologies the player has researched.
pub trait TechnologyLedger {
    /// Reports whether the technology with the provided id is unlocked.
    fn has_technology(&self, id: &str) -> bool;
}

impl TechnologyLedger for HashSet<String> {
    fn has_technology(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl TechnologyLedger for BTreeSet<String> {
    fn has_technology(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl TechnologyLedger for [&str] {
    fn has_technology(&self, id: &str) -> bool {
        self.contains(&id)
    }
}

/// Number of contracts of the generator's kind currently on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContractCounts {
    /// Contracts offered but not yet accepted.
    pub offered: u32,
    /// Contracts accepted and in progress.
    pub active: u32,
}

impl ContractCounts {
    /// Creates a new pair of counts.
    #[must_use]
    pub const fn new(offered: u32, active: u32) -> Self {
        Self { offered, active }
    }
}

/// Tunable limits for the gate.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Researching any one of these technologies unlocks the generator.
    pub unlocking_technologies: Vec<String>,
    /// Generation stops once this many contracts are on offer.
    pub max_offered: u32,
    /// Generation stops once this many contracts are in progress.
    pub max_active: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            unlocking_technologies: ["roverWheel1", "roverWheel2", "roverWheel3", "wheelMed"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_offered: 2,
            max_active: 4,
        }
    }
}

/// Equipment and quota predicate consulted before every generation attempt.
#[derive(Clone, Debug, Default)]
pub struct EligibilityGate {
    config: GateConfig,
}

impl EligibilityGate {
    /// Creates a gate with the provided limits.
    #[must_use]
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Limits the gate applies.
    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Reports whether any unlocking technology has been researched.
    #[must_use]
    pub fn equipment_unlocked<L>(&self, ledger: &L) -> bool
    where
        L: TechnologyLedger + ?Sized,
    {
        self.config
            .unlocking_technologies
            .iter()
            .any(|id| ledger.has_technology(id))
    }

    /// Reports whether the board still has room for another contract.
    #[must_use]
    pub fn within_quota(&self, counts: ContractCounts) -> bool {
        counts.offered < self.config.max_offered && counts.active < self.config.max_active
    }

    /// Combined predicate: equipment unlocked and quota not exhausted.
    #[must_use]
    pub fn is_eligible<L>(&self, ledger: &L, counts: ContractCounts) -> bool
    where
        L: TechnologyLedger + ?Sized,
    {
        if !self.equipment_unlocked(ledger) {
            tracing::trace!("generator locked: no unlocking technology researched");
            return false;
        }

        if !self.within_quota(counts) {
            tracing::trace!(
                offered = counts.offered,
                active = counts.active,
                "generator quota exhausted"
            );
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| (*id).to_owned()).collect()
    }

    #[test]
    fn locked_without_any_wheel() {
        let gate = EligibilityGate::default();
        let researched = ledger(&["probeCoreCube", "basicRocketry"]);
        assert!(!gate.is_eligible(&researched, ContractCounts::default()));
    }

    #[test]
    fn any_single_wheel_unlocks() {
        let gate = EligibilityGate::default();
        for wheel in ["roverWheel1", "roverWheel2", "roverWheel3", "wheelMed"] {
            let researched = ledger(&[wheel]);
            assert!(
                gate.is_eligible(&researched, ContractCounts::default()),
                "{wheel} should unlock the generator"
            );
        }
    }

    #[test]
    fn offered_quota_is_exclusive() {
        let gate = EligibilityGate::default();
        let researched = ledger(&["wheelMed"]);
        assert!(gate.is_eligible(&researched, ContractCounts::new(1, 0)));
        assert!(!gate.is_eligible(&researched, ContractCounts::new(2, 0)));
    }

    #[test]
    fn active_quota_is_exclusive() {
        let gate = EligibilityGate::default();
        let researched = ledger(&["wheelMed"]);
        assert!(gate.is_eligible(&researched, ContractCounts::new(0, 3)));
        assert!(!gate.is_eligible(&researched, ContractCounts::new(0, 4)));
    }

    #[test]
    fn slice_ledger_is_supported() {
        let gate = EligibilityGate::default();
        let researched: &[&str] = &["roverWheel2"];
        assert!(gate.equipment_unlocked(researched));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: GateConfig = toml::from_str("max_offered = 5").expect("config parses");
        assert_eq!(config.max_offered, 5);
        assert_eq!(config.max_active, 4);
        assert_eq!(config.unlocking_technologies.len(), 4);
    }
}
