//! Data structures for the craft item catalog.
//!
//! Pure data types deserialized from RON. Resolution of item references and
//! validation happen in [`crate::catalog::ItemCatalog::from_data`]; file
//! loading is left to the caller.

mod aircraft_data;
mod item_data;

use serde::{Deserialize, Serialize};

use crate::config::EquipRules;
use crate::error::{GameError, Result};

pub use aircraft_data::{AircraftData, SlotData};
pub use item_data::ItemData;

/// Top-level contents of a catalog data file.
///
/// # Example RON
///
/// ```ron
/// CatalogData(
///     items: [
///         ItemData(id: "craft_weapon_sparrowhawk", item_type: Weapon, size: 40, installation_time: 3),
///     ],
///     aircraft: [],
/// )
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    /// Every craft item, in catalog order.
    #[serde(default)]
    pub items: Vec<ItemData>,

    /// Aircraft class templates.
    #[serde(default)]
    pub aircraft: Vec<AircraftData>,

    /// Optional rule overrides.
    #[serde(default)]
    pub rules: EquipRules,
}

impl CatalogData {
    /// Create catalog data with default rules.
    #[must_use]
    pub fn new(items: Vec<ItemData>, aircraft: Vec<AircraftData>) -> Self {
        Self {
            items,
            aircraft,
            rules: EquipRules::default(),
        }
    }

    /// Override the equipment rules.
    #[must_use]
    pub const fn with_rules(mut self, rules: EquipRules) -> Self {
        self.rules = rules;
        self
    }

    /// Parse catalog data from RON text.
    ///
    /// `label` names the source in error messages (usually the file path).
    pub fn from_ron_str(source: &str, label: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| GameError::DataParseError {
            path: label.to_string(),
            message: e.to_string(),
        })
    }
}
