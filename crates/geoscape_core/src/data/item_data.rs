//! Craft item data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::CraftItemType;
use crate::stats::AircraftStat;

/// Data-driven craft item definition.
///
/// # Example RON
///
/// ```ron
/// ItemData(
///     id: "craft_weapon_sparrowhawk",
///     name: "Sparrowhawk Launcher",
///     item_type: Weapon,
///     size: 40,
///     installation_time: 3,
///     stats: { Speed: 0.95, Accuracy: 1.2 },
///     ammos: ["craft_ammo_sparrowhawk"],
///     tech_required: ["rs_craft_weapon_sparrowhawk"],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    /// Unique provided-item id.
    pub id: String,

    /// Display name. Falls back to the id when empty.
    #[serde(default)]
    pub name: String,

    /// Item category.
    pub item_type: CraftItemType,

    /// Physical size; determines the weight class.
    pub size: u32,

    /// Hours to install or remove. `-1` marks items that can never be
    /// installed (alien equipment kept for research).
    pub installation_time: i32,

    /// Stat modifiers. Values above 2 in magnitude are flat bonuses, smaller
    /// positive values are ratios.
    #[serde(default)]
    pub stats: BTreeMap<AircraftStat, f64>,

    /// Ammunition ids usable by this mount.
    #[serde(default)]
    pub ammos: Vec<String>,

    /// Mount ids this ammunition fits.
    #[serde(default)]
    pub weapons: Vec<String>,

    /// Not sold on the market.
    #[serde(default)]
    pub not_on_market: bool,

    /// Rounds per reload, ammunition only.
    #[serde(default)]
    pub ammo_count: i32,

    /// Technologies that must be researched before the item can be picked.
    #[serde(default)]
    pub tech_required: Vec<String>,
}

impl ItemData {
    /// Create item data with no modifiers or references.
    pub fn new(
        id: impl Into<String>,
        item_type: CraftItemType,
        size: u32,
        installation_time: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            item_type,
            size,
            installation_time,
            stats: BTreeMap::new(),
            ammos: Vec::new(),
            weapons: Vec::new(),
            not_on_market: false,
            ammo_count: 0,
            tech_required: Vec::new(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set one stat modifier.
    #[must_use]
    pub fn with_stat(mut self, stat: AircraftStat, value: f64) -> Self {
        self.stats.insert(stat, value);
        self
    }

    /// Set the compatible ammunition.
    #[must_use]
    pub fn with_ammos<I, S>(mut self, ammos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ammos = ammos.into_iter().map(Into::into).collect();
        self
    }

    /// Set the compatible mounts.
    #[must_use]
    pub fn with_weapons<I, S>(mut self, weapons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.weapons = weapons.into_iter().map(Into::into).collect();
        self
    }

    /// Set the magazine size.
    #[must_use]
    pub const fn with_ammo_count(mut self, ammo_count: i32) -> Self {
        self.ammo_count = ammo_count;
        self
    }

    /// Mark the item as not sold on the market.
    #[must_use]
    pub const fn not_on_market(mut self) -> Self {
        self.not_on_market = true;
        self
    }

    /// Require a technology before the item can be selected.
    #[must_use]
    pub fn with_tech(mut self, tech_id: impl Into<String>) -> Self {
        self.tech_required.push(tech_id.into());
        self
    }

    /// Display name, or the id when no name was given.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
