//! Slot lifecycle engine.
//!
//! Installs, removes and swaps items in a single [`Slot`], keeping base
//! storage in step. Functions here never touch aircraft stats; callers
//! recompute after a change (see [`crate::stats::recompute_aircraft_stats`]).
//!
//! Every refusal leaves the slot and storage exactly as they were, logs a
//! warning and returns an [`EquipError`].
//!
//! Storage is passed as `Option<&mut Storage>`: `None` means stock is not
//! tracked (equipment on captured craft without a home base).

use crate::catalog::{CraftItemType, ItemCatalog, ItemDefinition, ItemIndex, WeightClass};
use crate::slot::Slot;
use crate::storage::{return_one, take_one, Storage};

/// Reasons a slot refuses an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipError {
    /// No catalog entry for the given id.
    UnknownItem(String),
    /// The item type does not match the slot type.
    TypeMismatch {
        /// Type accepted by the slot.
        slot: CraftItemType,
        /// Type of the offered item.
        item: CraftItemType,
    },
    /// The item can never be installed.
    NotInstallable,
    /// The slot already holds an item.
    SlotOccupied,
    /// The base has none of the item in storage.
    OutOfStock,
    /// The item is heavier than the slot allows.
    TooHeavy {
        /// Slot capacity.
        capacity: WeightClass,
        /// Item weight.
        weight: WeightClass,
    },
    /// Ammunition offered to a slot with nothing installed.
    NoItemInstalled,
    /// The ammunition does not belong to this kind of mount.
    AmmoMismatch,
    /// Every battery emplacement of the base is in use.
    BankFull,
    /// No battery or mount at the given position.
    NoSuchSlot,
    /// No item picked from the selectable list.
    NothingSelected,
    /// The action targets a zone other than the selected one, or a zone
    /// that is not available for the slot.
    WrongZone,
}

impl std::fmt::Display for EquipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "Unknown craft item '{id}'"),
            Self::TypeMismatch { slot, item } => {
                write!(f, "Item of type {item:?} does not fit a {slot:?} slot")
            }
            Self::NotInstallable => write!(f, "Item cannot be installed"),
            Self::SlotOccupied => write!(f, "Slot already holds an item"),
            Self::OutOfStock => write!(f, "No more items of this type in storage"),
            Self::TooHeavy { capacity, weight } => write!(
                f,
                "Item is too heavy for this slot ({} > {})",
                weight.name(),
                capacity.name()
            ),
            Self::NoItemInstalled => write!(f, "No item installed to load ammunition into"),
            Self::AmmoMismatch => write!(f, "Ammunition does not fit this slot"),
            Self::BankFull => write!(f, "No free battery emplacement"),
            Self::NoSuchSlot => write!(f, "No slot at this position"),
            Self::NothingSelected => write!(f, "No item selected"),
            Self::WrongZone => write!(f, "Zone is not available"),
        }
    }
}

impl std::error::Error for EquipError {}

/// What one hour did to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing in progress.
    Idle,
    /// Timer moved but has not finished.
    Counting,
    /// Installation finished this hour.
    Installed,
    /// Removal finished this hour.
    Removed {
        /// The slot ended up empty (no queued item took over).
        emptied: bool,
    },
}

impl TickOutcome {
    /// Check if the tick completed an installation or removal.
    #[must_use]
    pub const fn completed(self) -> bool {
        matches!(self, Self::Installed | Self::Removed { .. })
    }
}

fn refuse<T>(slot: &Slot, id: &str, error: EquipError) -> Result<T, EquipError> {
    tracing::warn!(slot = ?slot.kind, owner = ?slot.owner, item = id, %error, "Equipment refused");
    Err(error)
}

fn has_stock(storage: Option<&Storage>, index: ItemIndex) -> bool {
    storage.map_or(true, |storage| storage.has(index))
}

/// Install an item into an empty slot.
///
/// The timer starts at the item's installation time; `0` makes the item
/// operational at once. One unit is taken from storage.
pub fn add_item(
    catalog: &ItemCatalog,
    storage: Option<&mut Storage>,
    slot: &mut Slot,
    item_id: &str,
) -> Result<ItemIndex, EquipError> {
    let Some(item) = catalog.resolve(item_id) else {
        return refuse(slot, item_id, EquipError::UnknownItem(item_id.to_string()));
    };
    check_installable(item, storage.as_deref(), slot)?;

    if !take_one(storage, item.index) {
        return refuse(slot, item_id, EquipError::OutOfStock);
    }
    slot.item = Some(item.index);
    slot.installation_time = item.installation_time;

    tracing::debug!(
        slot = ?slot.kind,
        owner = ?slot.owner,
        item = %item.id,
        hours = item.installation_time,
        "Installing item"
    );
    Ok(item.index)
}

fn check_installable(
    item: &ItemDefinition,
    storage: Option<&Storage>,
    slot: &Slot,
) -> Result<(), EquipError> {
    if item.item_type != slot.kind {
        return refuse(
            slot,
            &item.id,
            EquipError::TypeMismatch {
                slot: slot.kind,
                item: item.item_type,
            },
        );
    }
    if !item.is_installable() {
        return refuse(slot, &item.id, EquipError::NotInstallable);
    }
    if slot.item.is_some() {
        return refuse(slot, &item.id, EquipError::SlotOccupied);
    }
    if !has_stock(storage, item.index) {
        return refuse(slot, &item.id, EquipError::OutOfStock);
    }
    if !item.fits(slot.capacity) {
        return refuse(
            slot,
            &item.id,
            EquipError::TooHeavy {
                capacity: slot.capacity,
                weight: item.weight,
            },
        );
    }
    Ok(())
}

/// Load ammunition into a slot, replacing whatever was loaded.
///
/// Base-defense ammunition and items not sold on the market are not drawn
/// from storage.
pub fn add_ammo(
    catalog: &ItemCatalog,
    mut storage: Option<&mut Storage>,
    slot: &mut Slot,
    ammo_id: &str,
) -> Result<ItemIndex, EquipError> {
    let Some(ammo) = catalog.resolve(ammo_id) else {
        return refuse(slot, ammo_id, EquipError::UnknownItem(ammo_id.to_string()));
    };
    let Some(installed) = slot.item else {
        return refuse(slot, ammo_id, EquipError::NoItemInstalled);
    };
    if slot.kind.ammo_type() != Some(ammo.item_type) || !ammo.fits_weapon(installed) {
        return refuse(slot, ammo_id, EquipError::AmmoMismatch);
    }
    if ammo.tracks_ammo_stock() && !has_stock(storage.as_deref(), ammo.index) {
        return refuse(slot, ammo_id, EquipError::OutOfStock);
    }

    unload_ammo(catalog, storage.as_deref_mut(), slot);
    if ammo.tracks_ammo_stock() && !take_one(storage, ammo.index) {
        return refuse(slot, ammo_id, EquipError::OutOfStock);
    }
    slot.ammo = Some(ammo.index);

    tracing::debug!(slot = ?slot.kind, owner = ?slot.owner, ammo = %ammo.id, "Loaded ammunition");
    Ok(ammo.index)
}

fn unload_ammo(catalog: &ItemCatalog, storage: Option<&mut Storage>, slot: &mut Slot) {
    let Some(index) = slot.ammo.take() else {
        return;
    };
    if catalog.get(index).is_some_and(ItemDefinition::tracks_ammo_stock) {
        return_one(storage, index);
    }
}

/// Remove the contents of a slot right away.
///
/// With `ammo_only`, just the ammunition goes back to storage. Otherwise
/// the item and its ammunition go back, and a queued next item (if it can
/// be taken from storage) starts installing in its place.
pub fn remove_item(
    catalog: &ItemCatalog,
    mut storage: Option<&mut Storage>,
    slot: &mut Slot,
    ammo_only: bool,
) {
    unload_ammo(catalog, storage.as_deref_mut(), slot);
    if ammo_only {
        return;
    }

    if let Some(index) = slot.item.take() {
        return_one(storage.as_deref_mut(), index);
    }
    slot.installation_time = 0;

    let Some(next) = slot.next_item.take() else {
        return;
    };
    let Some(next_item) = catalog.get(next) else {
        return;
    };
    if take_one(storage, next) {
        slot.item = Some(next);
        slot.installation_time = next_item.installation_time;
        tracing::debug!(
            slot = ?slot.kind,
            owner = ?slot.owner,
            item = %next_item.id,
            "Queued item started installing"
        );
    } else {
        tracing::warn!(
            slot = ?slot.kind,
            owner = ?slot.owner,
            item = %next_item.id,
            "Queued item out of stock, slot left empty"
        );
    }
}

/// Start removing the installed item.
///
/// Ammunition is unloaded at once; the item itself leaves after its
/// installation time. Items with no installation time leave immediately.
pub fn begin_removal(catalog: &ItemCatalog, mut storage: Option<&mut Storage>, slot: &mut Slot) {
    let Some(item) = slot.item.and_then(|index| catalog.get(index)) else {
        return;
    };
    unload_ammo(catalog, storage.as_deref_mut(), slot);
    if item.installation_time > 0 {
        slot.installation_time = -item.installation_time;
    } else {
        remove_item(catalog, storage, slot, false);
    }
}

/// Advance the slot timer by one hour.
pub fn advance_one_tick(
    catalog: &ItemCatalog,
    storage: Option<&mut Storage>,
    slot: &mut Slot,
) -> TickOutcome {
    if slot.item.is_none() || slot.installation_time == 0 {
        return TickOutcome::Idle;
    }

    if slot.installation_time > 0 {
        slot.installation_time -= 1;
        return if slot.installation_time == 0 {
            TickOutcome::Installed
        } else {
            TickOutcome::Counting
        };
    }

    slot.installation_time += 1;
    if slot.installation_time < 0 {
        return TickOutcome::Counting;
    }
    remove_item(catalog, storage, slot, false);
    TickOutcome::Removed {
        emptied: slot.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::AircraftId;
    use crate::base::BaseId;
    use crate::data::{CatalogData, ItemData};
    use crate::slot::Owner;

    fn catalog() -> ItemCatalog {
        ItemCatalog::from_data(CatalogData::new(
            vec![
                ItemData::new("cannon", CraftItemType::Weapon, 60, 3).with_ammos(["shells"]),
                ItemData::new("railgun", CraftItemType::Weapon, 80, 2).with_ammos(["shells"]),
                ItemData::new("shells", CraftItemType::Ammo, 10, 0).with_weapons(["cannon"]),
                ItemData::new("plating", CraftItemType::Shield, 60, 2),
                ItemData::new("alien_beam", CraftItemType::Weapon, 40, -1),
                ItemData::new("missiles", CraftItemType::AmmoMissile, 10, 0)
                    .with_weapons(["launcher"]),
                ItemData::new("launcher", CraftItemType::BaseMissile, 120, 0)
                    .with_ammos(["missiles"]),
            ],
            Vec::new(),
        ))
        .unwrap()
    }

    fn weapon_slot() -> Slot {
        Slot::new(
            Owner::Aircraft(AircraftId::new(1)),
            CraftItemType::Weapon,
            WeightClass::Medium,
        )
    }

    fn index(catalog: &ItemCatalog, id: &str) -> ItemIndex {
        catalog.resolve(id).unwrap().index
    }

    fn stocked(catalog: &ItemCatalog, items: &[(&str, u32)]) -> Storage {
        items.iter().fold(Storage::new(), |storage, (id, count)| {
            storage.with_count(index(catalog, id), *count)
        })
    }

    #[test]
    fn test_add_item_starts_timer_and_debits() {
        let catalog = catalog();
        let mut storage = stocked(&catalog, &[("cannon", 1)]);
        let mut slot = weapon_slot();

        let added = add_item(&catalog, Some(&mut storage), &mut slot, "cannon").unwrap();
        assert_eq!(slot.item, Some(added));
        assert_eq!(slot.installation_time, 3);
        assert_eq!(storage.count(added), 0);
    }

    #[test]
    fn test_add_item_refusals_leave_state() {
        let catalog = catalog();
        let mut storage = stocked(&catalog, &[("cannon", 1), ("plating", 1), ("alien_beam", 1)]);
        let mut slot = weapon_slot();
        slot.capacity = WeightClass::Light;
        let before = (slot.clone(), storage.clone());

        assert_eq!(
            add_item(&catalog, Some(&mut storage), &mut slot, "nope"),
            Err(EquipError::UnknownItem("nope".to_string()))
        );
        assert!(matches!(
            add_item(&catalog, Some(&mut storage), &mut slot, "plating"),
            Err(EquipError::TypeMismatch { .. })
        ));
        assert_eq!(
            add_item(&catalog, Some(&mut storage), &mut slot, "alien_beam"),
            Err(EquipError::NotInstallable)
        );
        assert_eq!(
            add_item(&catalog, Some(&mut storage), &mut slot, "railgun"),
            Err(EquipError::OutOfStock)
        );
        assert!(matches!(
            add_item(&catalog, Some(&mut storage), &mut slot, "cannon"),
            Err(EquipError::TooHeavy { .. })
        ));
        assert_eq!((slot, storage), before);
    }

    #[test]
    fn test_add_item_without_storage_is_unlimited() {
        let catalog = catalog();
        let mut slot = weapon_slot();
        assert!(add_item(&catalog, None, &mut slot, "cannon").is_ok());
        assert_eq!(
            add_item(&catalog, None, &mut slot, "cannon"),
            Err(EquipError::SlotOccupied)
        );
    }

    #[test]
    fn test_add_ammo_replaces_and_credits() {
        let catalog = catalog();
        let shells = index(&catalog, "shells");
        let mut storage = stocked(&catalog, &[("cannon", 1), ("shells", 2)]);
        let mut slot = weapon_slot();

        assert_eq!(
            add_ammo(&catalog, Some(&mut storage), &mut slot, "shells"),
            Err(EquipError::NoItemInstalled)
        );
        add_item(&catalog, Some(&mut storage), &mut slot, "cannon").unwrap();

        add_ammo(&catalog, Some(&mut storage), &mut slot, "shells").unwrap();
        assert_eq!(storage.count(shells), 1);
        // Reloading the same ammo returns the old round first.
        add_ammo(&catalog, Some(&mut storage), &mut slot, "shells").unwrap();
        assert_eq!(storage.count(shells), 1);
        assert_eq!(slot.ammo, Some(shells));

        assert_eq!(
            add_ammo(&catalog, Some(&mut storage), &mut slot, "missiles"),
            Err(EquipError::AmmoMismatch)
        );
        assert_eq!(slot.ammo, Some(shells));
    }

    #[test]
    fn test_add_ammo_refuses_other_weapons_rounds() {
        let catalog = catalog();
        let mut storage = stocked(&catalog, &[("railgun", 1), ("shells", 1)]);
        let mut slot = weapon_slot();
        add_item(&catalog, Some(&mut storage), &mut slot, "railgun").unwrap();
        let before = (slot.clone(), storage.clone());

        // Shells list only the cannon among their weapons.
        assert_eq!(
            add_ammo(&catalog, Some(&mut storage), &mut slot, "shells"),
            Err(EquipError::AmmoMismatch)
        );
        assert_eq!((slot, storage), before);
    }

    #[test]
    fn test_base_defense_ammo_skips_stock() {
        let catalog = catalog();
        let mut storage = Storage::new();
        let mut slot = Slot::new(
            Owner::Base(BaseId::new(0)),
            CraftItemType::BaseMissile,
            WeightClass::Heavy,
        );
        add_item(&catalog, None, &mut slot, "launcher").unwrap();

        add_ammo(&catalog, Some(&mut storage), &mut slot, "missiles").unwrap();
        assert_eq!(slot.ammo, Some(index(&catalog, "missiles")));
        remove_item(&catalog, Some(&mut storage), &mut slot, true);
        assert_eq!(storage, Storage::new());
    }

    #[test]
    fn test_remove_item_credits_item_and_ammo() {
        let catalog = catalog();
        let mut storage = stocked(&catalog, &[("cannon", 1), ("shells", 1)]);
        let mut slot = weapon_slot();
        add_item(&catalog, Some(&mut storage), &mut slot, "cannon").unwrap();
        add_ammo(&catalog, Some(&mut storage), &mut slot, "shells").unwrap();
        slot.installation_time = 0;

        remove_item(&catalog, Some(&mut storage), &mut slot, false);
        assert!(slot.is_empty());
        assert_eq!(slot.ammo, None);
        assert_eq!(slot.installation_time, 0);
        assert_eq!(storage.count(index(&catalog, "cannon")), 1);
        assert_eq!(storage.count(index(&catalog, "shells")), 1);
    }

    #[test]
    fn test_remove_installs_queued_item() {
        let catalog = catalog();
        let mut storage = stocked(&catalog, &[("cannon", 1), ("railgun", 1)]);
        let mut slot = weapon_slot();
        add_item(&catalog, Some(&mut storage), &mut slot, "cannon").unwrap();
        slot.next_item = Some(index(&catalog, "railgun"));

        remove_item(&catalog, Some(&mut storage), &mut slot, false);
        assert_eq!(slot.item, Some(index(&catalog, "railgun")));
        assert_eq!(slot.installation_time, 2);
        assert_eq!(slot.next_item, None);
        assert_eq!(storage.count(index(&catalog, "railgun")), 0);
        assert_eq!(storage.count(index(&catalog, "cannon")), 1);
    }

    #[test]
    fn test_remove_with_queued_item_out_of_stock_empties() {
        let catalog = catalog();
        let mut storage = stocked(&catalog, &[("cannon", 1)]);
        let mut slot = weapon_slot();
        add_item(&catalog, Some(&mut storage), &mut slot, "cannon").unwrap();
        slot.next_item = Some(index(&catalog, "railgun"));

        remove_item(&catalog, Some(&mut storage), &mut slot, false);
        assert!(slot.is_empty());
        assert_eq!(slot.next_item, None);
        assert_eq!(slot.installation_time, 0);
    }

    #[test]
    fn test_tick_counts_down_then_installs() {
        let catalog = catalog();
        let mut slot = weapon_slot();
        add_item(&catalog, None, &mut slot, "cannon").unwrap();

        assert_eq!(advance_one_tick(&catalog, None, &mut slot), TickOutcome::Counting);
        assert_eq!(advance_one_tick(&catalog, None, &mut slot), TickOutcome::Counting);
        assert_eq!(advance_one_tick(&catalog, None, &mut slot), TickOutcome::Installed);
        assert_eq!(advance_one_tick(&catalog, None, &mut slot), TickOutcome::Idle);
        assert!(slot.is_operational());
    }

    #[test]
    fn test_tick_completes_removal() {
        let catalog = catalog();
        let mut storage = stocked(&catalog, &[("cannon", 1)]);
        let mut slot = weapon_slot();
        add_item(&catalog, Some(&mut storage), &mut slot, "cannon").unwrap();
        slot.installation_time = 0;

        begin_removal(&catalog, Some(&mut storage), &mut slot);
        assert_eq!(slot.installation_time, -3);
        assert_eq!(advance_one_tick(&catalog, Some(&mut storage), &mut slot), TickOutcome::Counting);
        assert_eq!(advance_one_tick(&catalog, Some(&mut storage), &mut slot), TickOutcome::Counting);
        assert_eq!(
            advance_one_tick(&catalog, Some(&mut storage), &mut slot),
            TickOutcome::Removed { emptied: true }
        );
        assert_eq!(storage.count(index(&catalog, "cannon")), 1);
    }

    #[test]
    fn test_empty_slot_tick_is_idle() {
        let catalog = catalog();
        let mut slot = weapon_slot();
        assert_eq!(advance_one_tick(&catalog, None, &mut slot), TickOutcome::Idle);
        assert!(!TickOutcome::Idle.completed());
        assert!(TickOutcome::Removed { emptied: false }.completed());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(EquipError::OutOfStock.to_string(), "No more items of this type in storage");
        assert_eq!(
            EquipError::TooHeavy {
                capacity: WeightClass::Light,
                weight: WeightClass::Heavy,
            }
            .to_string(),
            "Item is too heavy for this slot (Heavy weight > Light weight)"
        );
    }
}
