//! Aircraft and their equipment slots.

use serde::{Deserialize, Serialize};

use crate::campaign::{report_tick, NotificationSink};
use crate::catalog::{CraftItemType, ItemCatalog, WeightClass};
use crate::data::SlotData;
use crate::lifecycle::advance_one_tick;
use crate::slot::{Owner, Slot};
use crate::stats::{recompute_aircraft_stats, AircraftStat, AircraftStats};
use crate::storage::Storage;

/// Unique identifier for an aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AircraftId(pub u32);

impl AircraftId {
    /// Create a new aircraft ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// What an aircraft is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AircraftStatus {
    /// Parked in its hangar, tank full.
    #[default]
    Home,
    /// Parked in its hangar, refuelling.
    Refuel,
    /// Airborne, waiting for orders.
    Idle,
    /// Flying to a destination.
    Transit,
    /// On its way to a mission.
    Mission,
    /// Flying back to base.
    Returning,
    /// Pursuing a target.
    Intercept,
}

/// Address of one slot on an aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AircraftSlotId {
    /// Weapon mount by index.
    Weapon(usize),
    /// Electronics mount by index.
    Electronics(usize),
    /// The shield mount.
    Shield,
}

impl AircraftSlotId {
    /// Item type accepted by the addressed slot.
    #[must_use]
    pub const fn kind(self) -> CraftItemType {
        match self {
            Self::Weapon(_) => CraftItemType::Weapon,
            Self::Electronics(_) => CraftItemType::Electronics,
            Self::Shield => CraftItemType::Shield,
        }
    }

    /// Index within the slot group (always 0 for the shield).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Weapon(index) | Self::Electronics(index) => index,
            Self::Shield => 0,
        }
    }

    /// Build an address from a mount type and index.
    #[must_use]
    pub const fn from_kind(kind: CraftItemType, index: usize) -> Option<Self> {
        match kind {
            CraftItemType::Weapon => Some(Self::Weapon(index)),
            CraftItemType::Electronics => Some(Self::Electronics(index)),
            CraftItemType::Shield => Some(Self::Shield),
            _ => None,
        }
    }
}

/// An aircraft class: baseline stats and mount layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AircraftTemplate {
    /// Class id.
    pub class_id: String,
    /// Display name.
    pub name: String,
    /// Stats before any equipment.
    pub baseline: AircraftStats,
    /// Weapon mounts.
    pub weapon_slots: Vec<SlotData>,
    /// Electronics mounts.
    pub electronics_slots: Vec<SlotData>,
    /// Shield mount capacity.
    pub shield_capacity: WeightClass,
}

/// A single aircraft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aircraft {
    /// Unique id.
    pub id: AircraftId,
    /// Class id of the template this aircraft was built from.
    pub class_id: String,
    /// Display name.
    pub name: String,
    /// Class stats, never modified.
    pub baseline: AircraftStats,
    /// Live stats, rebuilt on every equipment change.
    pub stats: AircraftStats,
    /// Current fuel.
    pub fuel: i32,
    /// Current activity.
    pub status: AircraftStatus,
    /// Weapon mounts.
    pub weapons: Vec<Slot>,
    /// Electronics mounts.
    pub electronics: Vec<Slot>,
    /// Shield mount.
    pub shield: Slot,
}

fn build_slots(owner: Owner, kind: CraftItemType, layout: &[SlotData]) -> Vec<Slot> {
    layout
        .iter()
        .map(|data| Slot::new(owner, kind, data.capacity).with_position(data.position))
        .collect()
}

impl Aircraft {
    /// Build a fresh aircraft of the given class, empty slots, full tank.
    #[must_use]
    pub fn from_template(id: AircraftId, template: &AircraftTemplate) -> Self {
        let owner = Owner::Aircraft(id);
        let mut stats = template.baseline;
        if stats.get(AircraftStat::Speed) < 1 {
            stats.set(AircraftStat::Speed, 1);
        }
        Self {
            id,
            class_id: template.class_id.clone(),
            name: template.name.clone(),
            baseline: template.baseline,
            stats,
            fuel: template.baseline.get(AircraftStat::FuelSize).max(0),
            status: AircraftStatus::Home,
            weapons: build_slots(owner, CraftItemType::Weapon, &template.weapon_slots),
            electronics: build_slots(owner, CraftItemType::Electronics, &template.electronics_slots),
            shield: Slot::new(owner, CraftItemType::Shield, template.shield_capacity),
        }
    }

    /// Check if the aircraft is parked in its base.
    #[must_use]
    pub const fn is_in_base(&self) -> bool {
        matches!(self.status, AircraftStatus::Home | AircraftStatus::Refuel)
    }

    /// Look up a slot.
    #[must_use]
    pub fn slot(&self, id: AircraftSlotId) -> Option<&Slot> {
        match id {
            AircraftSlotId::Weapon(index) => self.weapons.get(index),
            AircraftSlotId::Electronics(index) => self.electronics.get(index),
            AircraftSlotId::Shield => Some(&self.shield),
        }
    }

    /// Look up a slot for modification.
    pub fn slot_mut(&mut self, id: AircraftSlotId) -> Option<&mut Slot> {
        match id {
            AircraftSlotId::Weapon(index) => self.weapons.get_mut(index),
            AircraftSlotId::Electronics(index) => self.electronics.get_mut(index),
            AircraftSlotId::Shield => Some(&mut self.shield),
        }
    }

    /// Number of slots of one type.
    #[must_use]
    pub fn slot_count(&self, kind: CraftItemType) -> usize {
        match kind {
            CraftItemType::Weapon => self.weapons.len(),
            CraftItemType::Electronics => self.electronics.len(),
            CraftItemType::Shield => 1,
            _ => 0,
        }
    }

    /// Number of occupied slots of one type.
    #[must_use]
    pub fn slot_items(&self, kind: CraftItemType) -> usize {
        let occupied = |slots: &[Slot]| slots.iter().filter(|slot| !slot.is_empty()).count();
        match kind {
            CraftItemType::Weapon => occupied(&self.weapons),
            CraftItemType::Electronics => occupied(&self.electronics),
            CraftItemType::Shield => usize::from(!self.shield.is_empty()),
            _ => 0,
        }
    }

    /// Every slot in update order: electronics, weapons, shield.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.electronics
            .iter()
            .chain(&self.weapons)
            .chain(std::iter::once(&self.shield))
    }

    /// Refill every loaded weapon to its magazine size.
    pub fn reload_weapons(&mut self, catalog: &ItemCatalog) {
        for slot in &mut self.weapons {
            if let Some(ammo) = slot.ammo.and_then(|index| catalog.get(index)) {
                slot.ammo_left = ammo.ammo_count;
            }
        }
    }

    /// Check if at least one weapon is loaded with rounds left.
    #[must_use]
    pub fn can_shoot(&self) -> bool {
        self.weapons.iter().any(Slot::is_armed)
    }

    /// Rebuild stats from the installed equipment.
    pub fn recompute_stats(&mut self, catalog: &ItemCatalog) {
        recompute_aircraft_stats(self, catalog);
    }

    /// Advance every slot by one hour.
    ///
    /// Stats are recomputed after each slot that finishes installing or
    /// removing, so the next slot sees up-to-date stats. Returns `true` if
    /// anything finished.
    pub fn advance_installation(
        &mut self,
        catalog: &ItemCatalog,
        mut storage: Option<&mut Storage>,
        sink: &mut dyn NotificationSink,
    ) -> bool {
        let electronics = (0..self.electronics.len()).map(AircraftSlotId::Electronics);
        let weapons = (0..self.weapons.len()).map(AircraftSlotId::Weapon);
        let order: Vec<AircraftSlotId> = electronics
            .chain(weapons)
            .chain(std::iter::once(AircraftSlotId::Shield))
            .collect();

        let mut changed = false;
        for id in order {
            let Some(slot) = self.slot_mut(id) else {
                continue;
            };
            let outcome = advance_one_tick(catalog, storage.as_deref_mut(), slot);
            if outcome.completed() {
                let owner = slot.owner;
                self.recompute_stats(catalog);
                report_tick(sink, owner, outcome);
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{Notice, NoticeLog};
    use crate::data::{AircraftData, CatalogData, ItemData};
    use crate::lifecycle::{add_ammo, add_item};

    fn catalog() -> ItemCatalog {
        ItemCatalog::from_data(CatalogData::new(
            vec![
                ItemData::new("cannon", CraftItemType::Weapon, 40, 2)
                    .with_stat(AircraftStat::Damage, 25.0)
                    .with_ammos(["shells"]),
                ItemData::new("shells", CraftItemType::Ammo, 10, 0)
                    .with_weapons(["cannon"])
                    .with_ammo_count(20),
                ItemData::new("radar", CraftItemType::Electronics, 10, 1)
                    .with_stat(AircraftStat::Ecm, 15.0),
            ],
            vec![AircraftData::new("interceptor", "Interceptor")
                .with_stat(AircraftStat::Speed, 1000)
                .with_stat(AircraftStat::FuelSize, 2000)
                .with_weapon_slot(SlotData::new(WeightClass::Medium, 0))
                .with_weapon_slot(SlotData::new(WeightClass::Light, 1))
                .with_electronics_slot(SlotData::new(WeightClass::Light, 0))],
        ))
        .unwrap()
    }

    fn aircraft(catalog: &ItemCatalog) -> Aircraft {
        Aircraft::from_template(AircraftId::new(7), catalog.template("interceptor").unwrap())
    }

    #[test]
    fn test_from_template() {
        let catalog = catalog();
        let aircraft = aircraft(&catalog);
        assert_eq!(aircraft.weapons.len(), 2);
        assert_eq!(aircraft.weapons[1].capacity, WeightClass::Light);
        assert_eq!(aircraft.weapons[1].position, 1);
        assert_eq!(aircraft.electronics.len(), 1);
        assert_eq!(aircraft.fuel, 2000);
        assert_eq!(aircraft.stats, aircraft.baseline);
        assert!(aircraft
            .slots()
            .all(|slot| slot.owner == Owner::Aircraft(AircraftId::new(7))));
    }

    #[test]
    fn test_slot_lookup_bounds() {
        let catalog = catalog();
        let mut aircraft = aircraft(&catalog);
        assert!(aircraft.slot(AircraftSlotId::Weapon(1)).is_some());
        assert!(aircraft.slot(AircraftSlotId::Weapon(2)).is_none());
        assert!(aircraft.slot_mut(AircraftSlotId::Electronics(3)).is_none());
        assert_eq!(
            aircraft.slot(AircraftSlotId::Shield).map(|slot| slot.kind),
            Some(CraftItemType::Shield)
        );
    }

    #[test]
    fn test_reload_and_can_shoot() {
        let catalog = catalog();
        let mut aircraft = aircraft(&catalog);
        assert!(!aircraft.can_shoot());

        add_item(&catalog, None, &mut aircraft.weapons[0], "cannon").unwrap();
        add_ammo(&catalog, None, &mut aircraft.weapons[0], "shells").unwrap();
        assert!(!aircraft.can_shoot());

        aircraft.reload_weapons(&catalog);
        assert_eq!(aircraft.weapons[0].ammo_left, 20);
        assert!(aircraft.can_shoot());
        assert_eq!(aircraft.slot_items(CraftItemType::Weapon), 1);
        assert_eq!(aircraft.slot_items(CraftItemType::Shield), 0);
    }

    #[test]
    fn test_advance_installation_recomputes_and_notifies() {
        let catalog = catalog();
        let mut aircraft = aircraft(&catalog);
        let mut log = NoticeLog::default();
        add_item(&catalog, None, &mut aircraft.electronics[0], "radar").unwrap();
        add_item(&catalog, None, &mut aircraft.weapons[0], "cannon").unwrap();
        aircraft.recompute_stats(&catalog);
        assert_eq!(aircraft.stats[AircraftStat::Ecm], 0);

        assert!(aircraft.advance_installation(&catalog, None, &mut log));
        assert_eq!(aircraft.stats[AircraftStat::Ecm], 15);
        assert_eq!(aircraft.stats[AircraftStat::Damage], 0);
        assert_eq!(log.notices(), &[Notice::AircraftItemInstalled]);

        assert!(aircraft.advance_installation(&catalog, None, &mut log));
        assert_eq!(aircraft.stats[AircraftStat::Damage], 25);
        assert_eq!(log.notices().len(), 2);
        assert_eq!(log.pauses(), 0);

        assert!(!aircraft.advance_installation(&catalog, None, &mut log));
    }

    #[test]
    fn test_slot_id_kinds() {
        assert_eq!(AircraftSlotId::Weapon(2).kind(), CraftItemType::Weapon);
        assert_eq!(AircraftSlotId::Shield.index(), 0);
        assert_eq!(
            AircraftSlotId::from_kind(CraftItemType::Electronics, 1),
            Some(AircraftSlotId::Electronics(1))
        );
        assert_eq!(AircraftSlotId::from_kind(CraftItemType::BaseLaser, 0), None);
    }
}
