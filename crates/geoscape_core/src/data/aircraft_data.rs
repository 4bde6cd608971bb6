//! Aircraft class data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::WeightClass;
use crate::stats::AircraftStat;

/// One mount point on an airframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotData {
    /// Heaviest weight class the mount accepts.
    #[serde(default)]
    pub capacity: WeightClass,

    /// Display position on the airframe.
    #[serde(default)]
    pub position: u8,
}

impl SlotData {
    /// Create slot data.
    #[must_use]
    pub const fn new(capacity: WeightClass, position: u8) -> Self {
        Self { capacity, position }
    }
}

/// Data-driven aircraft class.
///
/// # Example RON
///
/// ```ron
/// AircraftData(
///     id: "craft_interceptor",
///     name: "Interceptor",
///     stats: { Speed: 1000, Shield: 10, FuelSize: 2000 },
///     weapon_slots: [SlotData(capacity: Medium, position: 0)],
///     electronics_slots: [SlotData(capacity: Light)],
///     shield_capacity: Medium,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftData {
    /// Unique class id.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Baseline stats before equipment.
    #[serde(default)]
    pub stats: BTreeMap<AircraftStat, i32>,

    /// Weapon mounts.
    #[serde(default)]
    pub weapon_slots: Vec<SlotData>,

    /// Electronics mounts.
    #[serde(default)]
    pub electronics_slots: Vec<SlotData>,

    /// Capacity of the single shield mount.
    #[serde(default)]
    pub shield_capacity: WeightClass,
}

impl AircraftData {
    /// Create an aircraft class with no stats or mounts.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stats: BTreeMap::new(),
            weapon_slots: Vec::new(),
            electronics_slots: Vec::new(),
            shield_capacity: WeightClass::Heavy,
        }
    }

    /// Set one baseline stat.
    #[must_use]
    pub fn with_stat(mut self, stat: AircraftStat, value: i32) -> Self {
        self.stats.insert(stat, value);
        self
    }

    /// Add a weapon mount.
    #[must_use]
    pub fn with_weapon_slot(mut self, slot: SlotData) -> Self {
        self.weapon_slots.push(slot);
        self
    }

    /// Add an electronics mount.
    #[must_use]
    pub fn with_electronics_slot(mut self, slot: SlotData) -> Self {
        self.electronics_slots.push(slot);
        self
    }

    /// Set the shield mount capacity.
    #[must_use]
    pub const fn with_shield_capacity(mut self, capacity: WeightClass) -> Self {
        self.shield_capacity = capacity;
        self
    }
}
