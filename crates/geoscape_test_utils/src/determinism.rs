//! Determinism testing utilities.
//!
//! The equipment engine must give identical results for identical inputs:
//! a campaign replayed from the same actions must reach the same slots,
//! the same stock and the same aircraft stats.
//!
//! Sources of non-determinism guarded against here:
//!
//! - **Floating-point math**: modifiers are converted to fixed-point once,
//!   when the catalog is built.
//! - **HashMap iteration order**: storage and research sets are ordered
//!   maps, and bases and aircraft live in vectors.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use geoscape_core::campaign::Campaign;
use geoscape_core::persistence::{encode, CampaignRecord};

use crate::fixtures::Hangar;
use crate::strategies::EquipAction;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps applied per run.
    pub steps: usize,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic engine).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Equipment state is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a scenario multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the scenario
/// * `steps` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to apply step `n`
/// * `hash` - Function to compute the state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: usize,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S, usize),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for n in 0..steps {
            step(&mut state, n);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Replay `actions` against a fresh sample hangar `runs` times.
#[must_use]
pub fn verify_action_determinism(actions: &[EquipAction], runs: usize) -> DeterminismResult {
    verify_determinism(
        runs,
        actions.len(),
        || Hangar::new(2),
        |hangar, n| actions[n].apply(hangar),
        |hangar| campaign_hash(&hangar.campaign),
    )
}

/// Hash the full equipment state of a campaign: the save record plus the
/// live stats and fuel of every aircraft.
#[must_use]
pub fn campaign_hash(campaign: &Campaign) -> u64 {
    let mut hasher = DefaultHasher::new();
    encode(&CampaignRecord::save(campaign))
        .unwrap_or_default()
        .hash(&mut hasher);
    for aircraft in campaign.bases.iter().flat_map(|base| &base.aircraft) {
        aircraft.stats.0.hash(&mut hasher);
        aircraft.fuel.hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{SPARROWHAWK, SPARROWHAWK_AMMO};
    use geoscape_core::aircraft::AircraftSlotId;

    #[test]
    fn test_fixed_sequence_is_deterministic() {
        let slot = AircraftSlotId::Weapon(1);
        let actions = [
            EquipAction::Add(slot, SPARROWHAWK),
            EquipAction::Load(slot, SPARROWHAWK_AMMO),
            EquipAction::Hour,
            EquipAction::Hour,
            EquipAction::Hour,
            EquipAction::BeginRemoval(slot),
            EquipAction::Hour,
        ];
        verify_action_determinism(&actions, 3).assert_deterministic();
    }

    #[test]
    fn test_hash_changes_with_state() {
        let mut hangar = Hangar::new(1);
        let before = campaign_hash(&hangar.campaign);
        EquipAction::Add(AircraftSlotId::Weapon(1), SPARROWHAWK).apply(&mut hangar);
        assert_ne!(before, campaign_hash(&hangar.campaign));
    }
}
