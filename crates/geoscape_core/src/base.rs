//! Bases: storage, defense batteries and the aircraft hangar.
//!
//! Each base has two battery banks (missile and laser) with
//! [`MAX_BASE_SLOT`] emplacements each. Emplacements are allocated once and
//! reset when a battery is torn down; only the first `active` slots of a
//! bank are in use.

use serde::{Deserialize, Serialize};

use crate::aircraft::{Aircraft, AircraftId};
use crate::campaign::{report_tick, NotificationSink};
use crate::catalog::{CraftItemType, ItemCatalog, WeightClass};
use crate::config::{EquipRules, MAX_BASE_SLOT};
use crate::lifecycle::{advance_one_tick, EquipError};
use crate::slot::{Owner, Slot};
use crate::storage::Storage;

/// Unique identifier for a base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BaseId(pub u32);

impl BaseId {
    /// Create a new base ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// The two kinds of base defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenseKind {
    /// Missile batteries.
    Missile,
    /// Laser batteries.
    Laser,
}

impl DefenseKind {
    /// Slot type of this kind of battery.
    #[must_use]
    pub const fn slot_type(self) -> CraftItemType {
        match self {
            Self::Missile => CraftItemType::BaseMissile,
            Self::Laser => CraftItemType::BaseLaser,
        }
    }

    /// Defense kind of a battery slot type.
    #[must_use]
    pub const fn from_slot_type(kind: CraftItemType) -> Option<Self> {
        match kind {
            CraftItemType::BaseMissile | CraftItemType::AmmoMissile => Some(Self::Missile),
            CraftItemType::BaseLaser | CraftItemType::AmmoLaser => Some(Self::Laser),
            _ => None,
        }
    }
}

/// A fixed bank of battery emplacements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryBank {
    kind: DefenseKind,
    slots: [Slot; MAX_BASE_SLOT],
    active: usize,
}

impl BatteryBank {
    /// Create an empty bank with every emplacement bound to `base`.
    #[must_use]
    pub fn new(base: BaseId, kind: DefenseKind) -> Self {
        Self {
            kind,
            slots: std::array::from_fn(|_| {
                Slot::new(Owner::Base(base), kind.slot_type(), WeightClass::Heavy)
            }),
            active: 0,
        }
    }

    /// Defense kind.
    #[must_use]
    pub const fn kind(&self) -> DefenseKind {
        self.kind
    }

    /// Number of batteries built.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.active
    }

    /// Check if no battery is built.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Check if every emplacement is in use.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.active >= MAX_BASE_SLOT
    }

    /// Built batteries.
    #[must_use]
    pub fn active(&self) -> &[Slot] {
        &self.slots[..self.active]
    }

    /// Built batteries, mutable.
    pub fn active_mut(&mut self) -> &mut [Slot] {
        &mut self.slots[..self.active]
    }

    /// One built battery.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.active().get(index)
    }

    /// One built battery, mutable.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.active_mut().get_mut(index)
    }

    /// Every emplacement, built or not.
    #[must_use]
    pub const fn emplacements(&self) -> &[Slot; MAX_BASE_SLOT] {
        &self.slots
    }

    /// Set the number of built batteries directly, used when restoring a
    /// saved game. Emplacements past the new count are reset.
    pub(crate) fn set_active(&mut self, active: usize) {
        self.active = active.min(MAX_BASE_SLOT);
        for slot in &mut self.slots[self.active..] {
            slot.reset();
        }
    }

    fn push(&mut self, rules: &EquipRules) -> Result<usize, EquipError> {
        if self.is_full() {
            return Err(EquipError::BankFull);
        }
        let index = self.active;
        let slot = &mut self.slots[index];
        slot.reset();
        if self.kind == DefenseKind::Laser {
            slot.ammo_left = rules.laser_battery_ammo;
        }
        self.active += 1;
        Ok(index)
    }

    fn remove(&mut self, index: Option<usize>) -> Result<usize, EquipError> {
        let Some(last) = self.active.checked_sub(1) else {
            return Err(EquipError::NoSuchSlot);
        };
        let index = index.unwrap_or(last);
        if index > last {
            return Err(EquipError::NoSuchSlot);
        }
        self.slots[index..=last].rotate_left(1);
        self.slots[last].reset();
        self.active = last;
        Ok(index)
    }

    fn reload(&mut self, cap: i32) {
        for slot in self.active_mut() {
            if (0..cap).contains(&slot.ammo_left) {
                slot.ammo_left += 1;
            }
        }
    }

    fn can_shoot(&self) -> bool {
        self.active()
            .iter()
            .any(|slot| slot.is_armed() && slot.installation_time == 0)
    }

    fn advance(
        &mut self,
        catalog: &ItemCatalog,
        storage: &mut Storage,
        sink: &mut dyn NotificationSink,
    ) -> bool {
        let mut changed = false;
        for slot in self.active_mut() {
            let outcome = advance_one_tick(catalog, Some(&mut *storage), slot);
            if outcome.completed() {
                report_tick(sink, slot.owner, outcome);
                changed = true;
            }
        }
        changed
    }
}

/// A player base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base {
    /// Unique id.
    pub id: BaseId,
    /// Display name.
    pub name: String,
    /// Whether the base has been founded. Unfounded bases are skipped by
    /// the hourly update.
    pub founded: bool,
    /// Item storage.
    pub storage: Storage,
    /// Missile batteries.
    pub missiles: BatteryBank,
    /// Laser batteries.
    pub lasers: BatteryBank,
    /// A missile defense building is operational.
    pub has_missile_defense: bool,
    /// A laser defense building is operational.
    pub has_laser_defense: bool,
    /// Aircraft stationed here.
    pub aircraft: Vec<Aircraft>,
}

impl Base {
    /// Create a founded base with empty batteries and no defense buildings.
    #[must_use]
    pub fn new(id: BaseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            founded: true,
            storage: Storage::new(),
            missiles: BatteryBank::new(id, DefenseKind::Missile),
            lasers: BatteryBank::new(id, DefenseKind::Laser),
            has_missile_defense: false,
            has_laser_defense: false,
            aircraft: Vec::new(),
        }
    }

    /// Builder-style storage setter.
    #[must_use]
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        self
    }

    /// Battery bank of one kind.
    #[must_use]
    pub const fn bank(&self, kind: DefenseKind) -> &BatteryBank {
        match kind {
            DefenseKind::Missile => &self.missiles,
            DefenseKind::Laser => &self.lasers,
        }
    }

    /// Battery bank of one kind, mutable.
    pub fn bank_mut(&mut self, kind: DefenseKind) -> &mut BatteryBank {
        match kind {
            DefenseKind::Missile => &mut self.missiles,
            DefenseKind::Laser => &mut self.lasers,
        }
    }

    /// Check if the defense building for `kind` is operational.
    #[must_use]
    pub const fn has_defense(&self, kind: DefenseKind) -> bool {
        match kind {
            DefenseKind::Missile => self.has_missile_defense,
            DefenseKind::Laser => self.has_laser_defense,
        }
    }

    /// Build a new battery. Laser batteries come with their own power
    /// supply of ammunition.
    pub fn add_battery(&mut self, kind: DefenseKind, rules: &EquipRules) -> Result<usize, EquipError> {
        let result = self.bank_mut(kind).push(rules);
        match &result {
            Ok(index) => tracing::debug!(base = self.id.0, ?kind, index, "Battery added"),
            Err(error) => tracing::warn!(base = self.id.0, ?kind, %error, "Cannot add battery"),
        }
        result
    }

    /// Tear down a battery, shifting later batteries down one place.
    ///
    /// With `None` the most recently built battery goes.
    pub fn remove_battery(
        &mut self,
        kind: DefenseKind,
        index: Option<usize>,
    ) -> Result<usize, EquipError> {
        let result = self.bank_mut(kind).remove(index);
        match &result {
            Ok(index) => tracing::debug!(base = self.id.0, ?kind, index, "Battery removed"),
            Err(error) => tracing::warn!(base = self.id.0, ?kind, %error, "Cannot remove battery"),
        }
        result
    }

    /// Give each missile battery one more missile, up to the reload cap.
    ///
    /// Batteries never armed (ammo left `-1`) are skipped.
    pub fn reload_batteries(&mut self, rules: &EquipRules) {
        self.missiles.reload(rules.battery_reload_cap);
    }

    /// Check if any battery can fire right now.
    #[must_use]
    pub fn can_shoot(&self) -> bool {
        (self.has_missile_defense && self.missiles.can_shoot())
            || (self.has_laser_defense && self.lasers.can_shoot())
    }

    /// Station an aircraft here.
    pub fn add_aircraft(&mut self, aircraft: Aircraft) {
        self.aircraft.push(aircraft);
    }

    /// Find a stationed aircraft.
    #[must_use]
    pub fn aircraft(&self, id: AircraftId) -> Option<&Aircraft> {
        self.aircraft.iter().find(|aircraft| aircraft.id == id)
    }

    /// Find a stationed aircraft, mutable.
    pub fn aircraft_mut(&mut self, id: AircraftId) -> Option<&mut Aircraft> {
        self.aircraft.iter_mut().find(|aircraft| aircraft.id == id)
    }

    /// Advance every battery and every parked aircraft by one hour.
    ///
    /// Order: missile batteries, laser batteries, then aircraft in hangar
    /// order. Returns `true` if anything finished installing or removing.
    pub fn advance_installation(
        &mut self,
        catalog: &ItemCatalog,
        sink: &mut dyn NotificationSink,
    ) -> bool {
        let mut changed = self.missiles.advance(catalog, &mut self.storage, sink);
        changed |= self.lasers.advance(catalog, &mut self.storage, sink);
        for aircraft in self.aircraft.iter_mut().filter(|aircraft| aircraft.is_in_base()) {
            changed |= aircraft.advance_installation(catalog, Some(&mut self.storage), sink);
        }
        changed
    }
}
