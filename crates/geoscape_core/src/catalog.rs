//! Craft item catalog.
//!
//! Read-only definitions of everything that can be mounted on an aircraft
//! or in a base-defense battery. Slots never own items; they hold an
//! [`ItemIndex`] into this catalog. The index doubles as the storage index
//! in [`crate::storage::Storage`].

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftTemplate;
use crate::config::{EquipRules, MAX_AIRCRAFT_SLOT};
use crate::data::{AircraftData, CatalogData, ItemData};
use crate::error::{GameError, Result};
use crate::math::fixed_from_f64;
use crate::stats::{AircraftStat, AircraftStats, StatModifiers};

/// Position of an item in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemIndex(pub u32);

impl ItemIndex {
    /// Create a new item index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The index as a `usize` for array access.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Weight tier of an item, and capacity tier of a slot.
///
/// Ordered: an item fits a slot when `item.weight <= slot.capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeightClass {
    /// Small items.
    Light,
    /// Mid-sized items.
    Medium,
    /// Anything else.
    Heavy,
}

impl WeightClass {
    /// Derive the weight class from an item's size.
    #[must_use]
    pub const fn from_size(size: u32) -> Self {
        if size < 50 {
            Self::Light
        } else if size < 100 {
            Self::Medium
        } else {
            Self::Heavy
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Light => "Light weight",
            Self::Medium => "Medium weight",
            Self::Heavy => "Heavy weight",
        }
    }
}

impl Default for WeightClass {
    fn default() -> Self {
        Self::Heavy
    }
}

/// Category of a craft item, and the type of slot that accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CraftItemType {
    /// Aircraft weapon.
    Weapon,
    /// Aircraft weapon ammunition.
    Ammo,
    /// Aircraft armour.
    Shield,
    /// Aircraft electronics.
    Electronics,
    /// Base missile battery.
    BaseMissile,
    /// Base laser battery.
    BaseLaser,
    /// Missile battery ammunition.
    AmmoMissile,
    /// Laser battery ammunition.
    AmmoLaser,
}

impl CraftItemType {
    /// The ammunition type fed into a mount of this type, if any.
    #[must_use]
    pub const fn ammo_type(self) -> Option<Self> {
        match self {
            Self::Weapon => Some(Self::Ammo),
            Self::BaseMissile => Some(Self::AmmoMissile),
            Self::BaseLaser => Some(Self::AmmoLaser),
            _ => None,
        }
    }

    /// The mount type an ammunition type belongs to.
    #[must_use]
    pub const fn mount_type(self) -> Option<Self> {
        match self {
            Self::Ammo => Some(Self::Weapon),
            Self::AmmoMissile => Some(Self::BaseMissile),
            Self::AmmoLaser => Some(Self::BaseLaser),
            _ => None,
        }
    }

    /// Whether this is an ammunition type.
    #[must_use]
    pub const fn is_ammo(self) -> bool {
        matches!(self, Self::Ammo | Self::AmmoMissile | Self::AmmoLaser)
    }

    /// Whether mounts of this type take ammunition.
    #[must_use]
    pub const fn takes_ammo(self) -> bool {
        self.ammo_type().is_some()
    }

    /// Whether this type belongs to base defense rather than aircraft.
    #[must_use]
    pub const fn is_base_defense(self) -> bool {
        matches!(
            self,
            Self::BaseMissile | Self::BaseLaser | Self::AmmoMissile | Self::AmmoLaser
        )
    }
}

/// Immutable definition of one craft item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDefinition {
    /// Catalog and storage index.
    pub index: ItemIndex,
    /// Provided-item identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Item category.
    pub item_type: CraftItemType,
    /// Weight tier.
    pub weight: WeightClass,
    /// Hours needed to install or remove; `-1` means never installable.
    pub installation_time: i32,
    /// Stat modifiers.
    pub modifiers: StatModifiers,
    /// Ammunition usable by this mount.
    pub ammos: Vec<ItemIndex>,
    /// Mounts this ammunition fits.
    pub weapons: Vec<ItemIndex>,
    /// Not purchasable; stock is not tracked for it as ammunition.
    pub not_on_market: bool,
    /// Rounds per reload (ammunition only).
    pub ammo_count: i32,
    /// Technologies that must be researched before the item can be picked.
    pub tech_required: Vec<String>,
}

impl ItemDefinition {
    /// Whether the item can ever be installed in a slot.
    #[must_use]
    pub const fn is_installable(&self) -> bool {
        self.installation_time >= 0
    }

    /// Whether the item fits a slot of the given capacity.
    #[must_use]
    pub fn fits(&self, capacity: WeightClass) -> bool {
        self.weight <= capacity
    }

    /// Whether loading this item as ammunition draws from base storage.
    #[must_use]
    pub const fn tracks_ammo_stock(&self) -> bool {
        !self.not_on_market && !self.item_type.is_base_defense()
    }

    /// Whether every required technology is in `researched`.
    #[must_use]
    pub fn is_researched(&self, researched: &BTreeSet<String>) -> bool {
        self.tech_required.iter().all(|tech| researched.contains(tech))
    }

    /// Whether this ammunition fits the given mount.
    #[must_use]
    pub fn fits_weapon(&self, weapon: ItemIndex) -> bool {
        self.weapons.contains(&weapon)
    }
}

/// All craft items and aircraft classes known to the campaign.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<ItemDefinition>,
    by_id: HashMap<String, ItemIndex>,
    templates: HashMap<String, AircraftTemplate>,
    rules: EquipRules,
}

impl ItemCatalog {
    /// Build and validate a catalog from loaded data.
    ///
    /// Every problem is collected before failing, so a data author sees the
    /// whole list at once.
    pub fn from_data(data: CatalogData) -> Result<Self> {
        let mut errors = Vec::new();

        let mut by_id = HashMap::new();
        for (position, item) in data.items.iter().enumerate() {
            let Ok(raw) = u32::try_from(position) else {
                errors.push(format!("too many items: '{}'", item.id));
                continue;
            };
            if by_id.insert(item.id.clone(), ItemIndex(raw)).is_some() {
                errors.push(format!("duplicate item id '{}'", item.id));
            }
        }

        let mut items = Vec::with_capacity(data.items.len());
        for (position, item) in data.items.iter().enumerate() {
            let index = ItemIndex(u32::try_from(position).unwrap_or(u32::MAX));
            items.push(build_item(index, item, &by_id, &mut errors));
        }
        validate_ammo_pairing(&items, &mut errors);

        let mut templates = HashMap::new();
        for aircraft in &data.aircraft {
            match build_template(aircraft) {
                Ok(template) => {
                    if templates.insert(aircraft.id.clone(), template).is_some() {
                        errors.push(format!("duplicate aircraft class '{}'", aircraft.id));
                    }
                }
                Err(message) => errors.push(message),
            }
        }

        if !errors.is_empty() {
            return Err(GameError::CatalogValidation { errors });
        }

        tracing::debug!(
            items = items.len(),
            aircraft_classes = templates.len(),
            "Built item catalog"
        );

        Ok(Self {
            items,
            by_id,
            templates,
            rules: data.rules,
        })
    }

    /// Resolve a provided-item id.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&ItemDefinition> {
        self.by_id.get(id).and_then(|index| self.get(*index))
    }

    /// Get an item by index.
    #[must_use]
    pub fn get(&self, index: ItemIndex) -> Option<&ItemDefinition> {
        self.items.get(index.as_usize())
    }

    /// Number of catalog entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items, in index order.
    pub fn items(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.iter()
    }

    /// Items of one type, in index order.
    pub fn items_of_type(&self, item_type: CraftItemType) -> impl Iterator<Item = &ItemDefinition> {
        self.items
            .iter()
            .filter(move |item| item.item_type == item_type)
    }

    /// Look up an aircraft class template.
    #[must_use]
    pub fn template(&self, class_id: &str) -> Option<&AircraftTemplate> {
        self.templates.get(class_id)
    }

    /// All aircraft class ids, sorted.
    #[must_use]
    pub fn template_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Equipment rules.
    #[must_use]
    pub const fn rules(&self) -> &EquipRules {
        &self.rules
    }
}

fn resolve_refs(
    owner: &str,
    field: &str,
    refs: &[String],
    by_id: &HashMap<String, ItemIndex>,
    errors: &mut Vec<String>,
) -> Vec<ItemIndex> {
    refs.iter()
        .filter_map(|id| {
            let found = by_id.get(id).copied();
            if found.is_none() {
                errors.push(format!("item '{owner}' lists unknown {field} '{id}'"));
            }
            found
        })
        .collect()
}

fn build_item(
    index: ItemIndex,
    data: &ItemData,
    by_id: &HashMap<String, ItemIndex>,
    errors: &mut Vec<String>,
) -> ItemDefinition {
    if data.installation_time < -1 {
        errors.push(format!(
            "item '{}' has invalid installation time {}",
            data.id, data.installation_time
        ));
    }

    let mut modifiers = StatModifiers::NONE;
    for (stat, value) in &data.stats {
        match fixed_from_f64(*value) {
            Some(fixed) => modifiers.set(*stat, fixed),
            None => errors.push(format!(
                "item '{}' has out-of-range modifier for {stat:?}",
                data.id
            )),
        }
    }

    if !data.ammos.is_empty() && !data.item_type.takes_ammo() {
        errors.push(format!(
            "item '{}' of type {:?} cannot take ammunition",
            data.id, data.item_type
        ));
    }
    if !data.weapons.is_empty() && !data.item_type.is_ammo() {
        errors.push(format!(
            "item '{}' of type {:?} is not ammunition",
            data.id, data.item_type
        ));
    }

    ItemDefinition {
        index,
        id: data.id.clone(),
        name: data.display_name().to_string(),
        item_type: data.item_type,
        weight: WeightClass::from_size(data.size),
        installation_time: data.installation_time,
        modifiers,
        ammos: resolve_refs(&data.id, "ammo", &data.ammos, by_id, errors),
        weapons: resolve_refs(&data.id, "weapon", &data.weapons, by_id, errors),
        not_on_market: data.not_on_market,
        ammo_count: data.ammo_count,
        tech_required: data.tech_required.clone(),
    }
}

fn validate_ammo_pairing(items: &[ItemDefinition], errors: &mut Vec<String>) {
    for item in items {
        let expected = item.item_type.ammo_type();
        for ammo in item.ammos.iter().filter_map(|index| items.get(index.as_usize())) {
            if Some(ammo.item_type) != expected {
                errors.push(format!(
                    "item '{}' lists '{}' of type {:?} as ammunition",
                    item.id, ammo.id, ammo.item_type
                ));
            }
        }
        for weapon in item.weapons.iter().filter_map(|index| items.get(index.as_usize())) {
            if weapon.item_type.ammo_type() != Some(item.item_type) {
                errors.push(format!(
                    "ammo '{}' lists '{}' of type {:?} as a weapon",
                    item.id, weapon.id, weapon.item_type
                ));
            }
        }
    }
}

fn build_template(data: &AircraftData) -> std::result::Result<AircraftTemplate, String> {
    if data.weapon_slots.len() > MAX_AIRCRAFT_SLOT {
        return Err(format!(
            "aircraft class '{}' has {} weapon slots (max {MAX_AIRCRAFT_SLOT})",
            data.id,
            data.weapon_slots.len()
        ));
    }
    if data.electronics_slots.len() > MAX_AIRCRAFT_SLOT {
        return Err(format!(
            "aircraft class '{}' has {} electronics slots (max {MAX_AIRCRAFT_SLOT})",
            data.id,
            data.electronics_slots.len()
        ));
    }

    let mut baseline = AircraftStats::ZERO;
    for (stat, value) in &data.stats {
        baseline.set(*stat, *value);
    }
    if baseline.get(AircraftStat::FuelSize) < 0 {
        return Err(format!("aircraft class '{}' has negative fuel size", data.id));
    }

    Ok(AircraftTemplate {
        class_id: data.id.clone(),
        name: data.name.clone(),
        baseline,
        weapon_slots: data.weapon_slots.clone(),
        electronics_slots: data.electronics_slots.clone(),
        shield_capacity: data.shield_capacity,
    })
}
