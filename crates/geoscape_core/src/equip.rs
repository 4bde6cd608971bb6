//! Equip screen glue.
//!
//! An [`EquipSession`] holds what the player has selected on an equip
//! screen: which aircraft (or the base defense), which kind of mount, which
//! slot, which zone and which catalog item. Every entry point takes the
//! session explicitly; the slot engine in [`crate::lifecycle`] knows nothing
//! about it.
//!
//! # Zones
//!
//! A slot is shown as three zones:
//!
//! | zone   | shows                       | available when                        |
//! |--------|-----------------------------|---------------------------------------|
//! | `Main` | the installed item          | always                                |
//! | `Next` | the item queued after it    | the installed item is being removed   |
//! | `Ammo` | the loaded ammunition       | an item is installed in an ammo mount |
//!
//! The catalog category offered to the player follows the zone: in the
//! `Ammo` zone it is the ammunition paired with the mount, otherwise the
//! mount type itself.

use std::collections::BTreeSet;

use crate::aircraft::{Aircraft, AircraftId, AircraftSlotId};
use crate::base::{Base, BaseId, BatteryBank, DefenseKind};
use crate::campaign::Campaign;
use crate::catalog::{CraftItemType, ItemCatalog, ItemDefinition, ItemIndex, WeightClass};
use crate::config::EquipRules;
use crate::lifecycle::{add_ammo, add_item, begin_removal, remove_item, EquipError};
use crate::slot::{Slot, SlotPhase};
use crate::storage::Storage;

/// One of the three parts of a slot on the equip screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Installed item.
    Main,
    /// Item queued after the current removal.
    Next,
    /// Loaded ammunition.
    Ammo,
}

/// Something that can move the selected zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneEvent {
    /// The player clicked a zone.
    Select(Zone),
    /// The slot changed underneath the session.
    Revalidate,
}

/// Slot facts the zone table depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneGuard {
    /// Phase of the selected slot.
    pub phase: SlotPhase,
    /// Whether the mount type takes ammunition.
    pub takes_ammo: bool,
}

impl ZoneGuard {
    /// Guard for a slot.
    #[must_use]
    pub const fn of(slot: &Slot) -> Self {
        Self {
            phase: slot.phase(),
            takes_ammo: slot.kind.takes_ammo(),
        }
    }

    const fn removing(self) -> bool {
        matches!(self.phase, SlotPhase::Removing)
    }

    const fn ammo_available(self) -> bool {
        self.takes_ammo && !matches!(self.phase, SlotPhase::Empty)
    }
}

/// The zone transition table.
///
/// | from       | event            | guard                      | to      |
/// |------------|------------------|----------------------------|---------|
/// | any        | `Select(Main)`   |                            | `Main`  |
/// | any        | `Select(Next)`   | removing                   | `Next`  |
/// | any        | `Select(Next)`   | not removing               | `Main`  |
/// | any        | `Select(Ammo)`   | ammo available             | `Ammo`  |
/// | `z`        | `Select(Ammo)`   | ammo not available         | `z`     |
/// | `Main`     | `Revalidate`     |                            | `Main`  |
/// | `Next`     | `Revalidate`     | removing                   | `Next`  |
/// | `Next`     | `Revalidate`     | not removing               | `Main`  |
/// | `Ammo`     | `Revalidate`     | ammo available             | `Ammo`  |
/// | `Ammo`     | `Revalidate`     | ammo not available         | `Main`  |
///
/// Ammo is available when an item is installed in a mount that takes
/// ammunition.
#[must_use]
pub const fn next_zone(zone: Zone, event: ZoneEvent, guard: ZoneGuard) -> Zone {
    match (zone, event) {
        (_, ZoneEvent::Select(Zone::Main)) | (Zone::Main, ZoneEvent::Revalidate) => Zone::Main,
        (_, ZoneEvent::Select(Zone::Next)) | (Zone::Next, ZoneEvent::Revalidate) => {
            if guard.removing() {
                Zone::Next
            } else {
                Zone::Main
            }
        }
        (_, ZoneEvent::Select(Zone::Ammo)) => {
            if guard.ammo_available() {
                Zone::Ammo
            } else {
                zone
            }
        }
        (Zone::Ammo, ZoneEvent::Revalidate) => {
            if guard.ammo_available() {
                Zone::Ammo
            } else {
                Zone::Main
            }
        }
    }
}

/// What the session is equipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipTarget {
    /// An aircraft stationed at the session's base.
    Aircraft(AircraftId),
    /// The base's defense batteries.
    BaseDefense,
}

/// Selection state of one equip screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipSession {
    base: BaseId,
    target: EquipTarget,
    mount: CraftItemType,
    zone: Zone,
    slot: usize,
    selected: Option<ItemIndex>,
}

/// Installed item as shown in the main zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainZone {
    /// Installed item.
    pub item: ItemIndex,
    /// Installing, operational or removing.
    pub phase: SlotPhase,
    /// Hours until installation or removal completes.
    pub hours: u32,
}

/// Queued item as shown in the next zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextZone {
    /// Queued item, if any.
    pub item: Option<ItemIndex>,
    /// Hours until the queued item is operational: the rest of the current
    /// removal plus its own installation.
    pub hours_until_operational: Option<i32>,
}

/// Ammunition as shown in the ammo zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoZone {
    /// Loaded ammunition.
    pub ammo: Option<ItemIndex>,
    /// Rounds left, `-1` when never loaded.
    pub ammo_left: i32,
}

/// Read model of the selected slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSummary {
    /// Slot capacity, shown when the slot is empty.
    pub capacity: WeightClass,
    /// Main zone, `None` when the slot is empty.
    pub main: Option<MainZone>,
    /// Next zone, only while removing.
    pub next: Option<NextZone>,
    /// Ammo zone, only for ammo mounts with an item.
    pub ammo: Option<AmmoZone>,
}

enum Mounts<'a> {
    Aircraft(&'a mut Aircraft),
    Batteries(&'a mut BatteryBank),
}

impl Mounts<'_> {
    fn slot_mut(&mut self, mount: CraftItemType, index: usize) -> Option<&mut Slot> {
        match self {
            Self::Aircraft(aircraft) => {
                AircraftSlotId::from_kind(mount, index).and_then(|id| aircraft.slot_mut(id))
            }
            Self::Batteries(bank) => bank.get_mut(index),
        }
    }

    fn finish(self, catalog: &ItemCatalog, reload: bool) {
        if let Self::Aircraft(aircraft) = self {
            if reload {
                aircraft.reload_weapons(catalog);
            }
            aircraft.recompute_stats(catalog);
        }
    }
}

struct Workbench<'a> {
    catalog: &'a ItemCatalog,
    researched: &'a BTreeSet<String>,
    storage: &'a mut Storage,
    mounts: Mounts<'a>,
}

/// Whether `item` may be picked for `slot` in the given category.
fn is_selectable(
    item: &ItemDefinition,
    category: CraftItemType,
    slot: &Slot,
    storage: &Storage,
    researched: &BTreeSet<String>,
) -> bool {
    if item.item_type != category || !item.is_researched(researched) {
        return false;
    }
    if category.is_ammo() && !slot.item.is_some_and(|weapon| item.fits_weapon(weapon)) {
        return false;
    }
    if !item.fits(slot.capacity) {
        return false;
    }
    let in_stock = storage.has(item.index)
        || (slot.kind.is_base_defense() && item.not_on_market);
    if !in_stock {
        return false;
    }
    category.is_ammo() || item.is_installable()
}

/// Load the first usable ammunition into a freshly armed slot.
///
/// Does nothing if the slot already has ammunition. A missile battery that
/// has never been loaded receives the free starting missiles; aircraft
/// slots need a weapon reload afterwards.
pub fn auto_add_ammo(
    catalog: &ItemCatalog,
    researched: &BTreeSet<String>,
    storage: &mut Storage,
    slot: &mut Slot,
    rules: &EquipRules,
) -> Option<ItemIndex> {
    let ammo_type = slot.kind.ammo_type()?;
    if slot.ammo.is_some() {
        return None;
    }
    let item = slot.item.and_then(|index| catalog.get(index))?;

    let ammo = item
        .ammos
        .iter()
        .filter_map(|index| catalog.get(*index))
        .find(|ammo| is_selectable(ammo, ammo_type, &*slot, &*storage, researched))?;
    let loaded = add_ammo(catalog, Some(storage), slot, &ammo.id).ok()?;

    if slot.kind == CraftItemType::BaseMissile && slot.ammo_left < 0 {
        slot.ammo_left = rules.base_missile_free_ammo;
        tracing::debug!(owner = ?slot.owner, missiles = slot.ammo_left, "Free missiles granted");
    }
    Some(loaded)
}

impl EquipSession {
    /// Start equipping an aircraft. Opens on the first weapon mount.
    #[must_use]
    pub const fn for_aircraft(base: BaseId, aircraft: AircraftId) -> Self {
        Self {
            base,
            target: EquipTarget::Aircraft(aircraft),
            mount: CraftItemType::Weapon,
            zone: Zone::Main,
            slot: 0,
            selected: None,
        }
    }

    /// Start equipping base defenses. Opens on the first missile battery.
    #[must_use]
    pub const fn for_base_defense(base: BaseId) -> Self {
        Self {
            base,
            target: EquipTarget::BaseDefense,
            mount: CraftItemType::BaseMissile,
            zone: Zone::Main,
            slot: 0,
            selected: None,
        }
    }

    /// Base being equipped.
    #[must_use]
    pub const fn base(&self) -> BaseId {
        self.base
    }

    /// Aircraft or base defense.
    #[must_use]
    pub const fn target(&self) -> EquipTarget {
        self.target
    }

    /// Selected mount type.
    #[must_use]
    pub const fn mount(&self) -> CraftItemType {
        self.mount
    }

    /// Selected zone.
    #[must_use]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Selected slot index within the mount type.
    #[must_use]
    pub const fn slot_index(&self) -> usize {
        self.slot
    }

    /// Selected catalog item.
    #[must_use]
    pub const fn selected(&self) -> Option<ItemIndex> {
        self.selected
    }

    /// Catalog category offered in the current zone.
    #[must_use]
    pub fn category(&self) -> CraftItemType {
        match self.zone {
            Zone::Ammo => self.mount.ammo_type().unwrap_or(self.mount),
            Zone::Main | Zone::Next => self.mount,
        }
    }

    fn accepts_mount(&self, mount: CraftItemType) -> bool {
        match self.target {
            EquipTarget::Aircraft(_) => matches!(
                mount,
                CraftItemType::Weapon | CraftItemType::Electronics | CraftItemType::Shield
            ),
            EquipTarget::BaseDefense => DefenseKind::from_slot_type(mount)
                .is_some_and(|kind| kind.slot_type() == mount),
        }
    }

    fn open<'a>(&self, campaign: &'a mut Campaign) -> Result<Workbench<'a>, EquipError> {
        let Campaign {
            catalog,
            bases,
            researched,
            ..
        } = campaign;
        let Base {
            storage,
            missiles,
            lasers,
            aircraft,
            ..
        } = bases
            .iter_mut()
            .find(|base| base.id == self.base)
            .ok_or(EquipError::NoSuchSlot)?;

        let mounts = match self.target {
            EquipTarget::Aircraft(id) => Mounts::Aircraft(
                aircraft
                    .iter_mut()
                    .find(|aircraft| aircraft.id == id)
                    .ok_or(EquipError::NoSuchSlot)?,
            ),
            EquipTarget::BaseDefense => match DefenseKind::from_slot_type(self.mount) {
                Some(DefenseKind::Missile) => Mounts::Batteries(missiles),
                Some(DefenseKind::Laser) => Mounts::Batteries(lasers),
                None => return Err(EquipError::NoSuchSlot),
            },
        };

        Ok(Workbench {
            catalog,
            researched,
            storage,
            mounts,
        })
    }

    fn selected_slot<'c>(&self, campaign: &'c Campaign) -> Option<&'c Slot> {
        let base = campaign.base(self.base)?;
        match self.target {
            EquipTarget::Aircraft(id) => base
                .aircraft(id)
                .and_then(|aircraft| {
                    AircraftSlotId::from_kind(self.mount, self.slot)
                        .and_then(|slot| aircraft.slot(slot))
                }),
            EquipTarget::BaseDefense => DefenseKind::from_slot_type(self.mount)
                .and_then(|kind| base.bank(kind).get(self.slot)),
        }
    }

    fn apply(&mut self, campaign: &Campaign, event: ZoneEvent) {
        let Some(slot) = self.selected_slot(campaign) else {
            self.zone = Zone::Main;
            return;
        };
        let zone = next_zone(self.zone, event, ZoneGuard::of(slot));
        if zone != self.zone {
            tracing::debug!(from = ?self.zone, to = ?zone, ?event, "Equip zone changed");
            self.zone = zone;
            self.selected = None;
        }
    }

    /// Switch to another kind of mount. Returns `false` if the target has
    /// no such mount.
    pub fn select_mount(&mut self, campaign: &Campaign, mount: CraftItemType) -> bool {
        if !self.accepts_mount(mount) {
            tracing::warn!(?mount, target = ?self.target, "Mount type not available");
            return false;
        }
        self.mount = mount;
        self.zone = Zone::Main;
        self.selected = None;
        self.revalidate(campaign);
        true
    }

    /// Pick a slot of the current mount type. Indices past the last slot
    /// fall back to the first one.
    pub fn select_slot(&mut self, campaign: &Campaign, index: usize) {
        self.slot = index;
        self.selected = None;
        self.revalidate(campaign);
    }

    /// Click a zone.
    pub fn select_zone(&mut self, campaign: &Campaign, zone: Zone) -> Zone {
        self.apply(campaign, ZoneEvent::Select(zone));
        self.zone
    }

    /// Bring the session back in line with the slot after something changed
    /// it (an hour passed, an item was added or deleted).
    pub fn revalidate(&mut self, campaign: &Campaign) {
        if self.selected_slot(campaign).is_none() {
            self.slot = 0;
        }
        self.apply(campaign, ZoneEvent::Revalidate);
    }

    /// Items the player may pick for the selected slot and zone, in catalog
    /// order.
    #[must_use]
    pub fn selectable_items<'c>(&self, campaign: &'c Campaign) -> Vec<&'c ItemDefinition> {
        let (Some(slot), Some(base)) = (self.selected_slot(campaign), campaign.base(self.base))
        else {
            return Vec::new();
        };
        let category = self.category();
        campaign
            .catalog
            .items_of_type(category)
            .filter(|item| {
                is_selectable(item, category, slot, &base.storage, &campaign.researched)
            })
            .collect()
    }

    /// Pick the `n`th selectable item. Clears the selection when `n` is out
    /// of range.
    pub fn select_item(&mut self, campaign: &Campaign, n: usize) -> Option<ItemIndex> {
        self.selected = self
            .selectable_items(campaign)
            .get(n)
            .map(|item| item.index);
        self.selected
    }

    /// Put the selected item into `zone` of the selected slot.
    ///
    /// In the main zone an empty slot, or one whose installation has not
    /// progressed yet, takes the item at once. Re-adding the item whose
    /// removal just started cancels the removal. Any other main-zone add
    /// starts removing the current item and queues the selection after it.
    pub fn add_to_zone(&mut self, campaign: &mut Campaign, zone: Zone) -> Result<(), EquipError> {
        if zone != self.zone {
            return Err(EquipError::WrongZone);
        }
        let selected = self.selected.ok_or(EquipError::NothingSelected)?;
        let mount = self.mount;
        let index = self.slot;
        let rules = *campaign.catalog.rules();

        let Workbench {
            catalog,
            researched,
            storage,
            mut mounts,
        } = self.open(campaign)?;
        let item = catalog.get(selected).ok_or(EquipError::NothingSelected)?;
        let slot = mounts.slot_mut(mount, index).ok_or(EquipError::NoSuchSlot)?;

        let reload = match zone {
            Zone::Main => add_main(catalog, researched, storage, slot, item, &rules)?,
            Zone::Next => {
                if slot.phase() != SlotPhase::Removing {
                    return Err(EquipError::WrongZone);
                }
                slot.next_item = Some(item.index);
                false
            }
            Zone::Ammo => {
                add_ammo(catalog, Some(&mut *storage), slot, &item.id)?;
                true
            }
        };

        mounts.finish(catalog, reload);
        self.revalidate(campaign);
        Ok(())
    }

    /// Clear `zone` of the selected slot.
    ///
    /// Deleting the main item removes it at once if its installation has
    /// not progressed, otherwise starts a removal.
    pub fn delete_from_zone(
        &mut self,
        campaign: &mut Campaign,
        zone: Zone,
    ) -> Result<(), EquipError> {
        let mount = self.mount;
        let index = self.slot;

        let Workbench {
            catalog,
            storage,
            mut mounts,
            ..
        } = self.open(campaign)?;
        let slot = mounts.slot_mut(mount, index).ok_or(EquipError::NoSuchSlot)?;
        let Some(item) = slot.item.and_then(|installed| catalog.get(installed)) else {
            return Err(EquipError::NoItemInstalled);
        };

        match zone {
            Zone::Main => {
                if slot.installation_time < item.installation_time {
                    begin_removal(catalog, Some(&mut *storage), slot);
                } else {
                    remove_item(catalog, Some(&mut *storage), slot, false);
                }
            }
            Zone::Next => slot.next_item = None,
            Zone::Ammo => remove_item(catalog, Some(&mut *storage), slot, true),
        }

        mounts.finish(catalog, false);
        self.revalidate(campaign);
        Ok(())
    }

    /// Read model of the selected slot, `None` if the slot does not exist.
    #[must_use]
    pub fn zone_summary(&self, campaign: &Campaign) -> Option<ZoneSummary> {
        let slot = self.selected_slot(campaign)?;
        let catalog = &campaign.catalog;

        let main = slot.item.map(|item| MainZone {
            item,
            phase: slot.phase(),
            hours: slot.hours_remaining(),
        });
        let next = (slot.phase() == SlotPhase::Removing).then(|| NextZone {
            item: slot.next_item,
            hours_until_operational: slot
                .next_item
                .and_then(|index| catalog.get(index))
                .map(|next| next.installation_time.max(0) - slot.installation_time),
        });
        let ammo = (slot.kind.takes_ammo() && slot.item.is_some()).then_some(AmmoZone {
            ammo: slot.ammo,
            ammo_left: slot.ammo_left,
        });

        Some(ZoneSummary {
            capacity: slot.capacity,
            main,
            next,
            ammo,
        })
    }

    /// Number of slots of the selected mount type.
    #[must_use]
    pub fn slot_count(&self, campaign: &Campaign) -> usize {
        let Some(base) = campaign.base(self.base) else {
            return 0;
        };
        match self.target {
            EquipTarget::Aircraft(id) => base
                .aircraft(id)
                .map_or(0, |aircraft| aircraft.slot_count(self.mount)),
            EquipTarget::BaseDefense => DefenseKind::from_slot_type(self.mount)
                .map_or(0, |kind| base.bank(kind).len()),
        }
    }

    /// Check if the session targets an aircraft.
    #[must_use]
    pub const fn is_aircraft(&self) -> bool {
        matches!(self.target, EquipTarget::Aircraft(_))
    }
}

fn add_main(
    catalog: &ItemCatalog,
    researched: &BTreeSet<String>,
    storage: &mut Storage,
    slot: &mut Slot,
    item: &ItemDefinition,
    rules: &EquipRules,
) -> Result<bool, EquipError> {
    let current = slot.item.and_then(|index| catalog.get(index));
    match current {
        Some(current) if slot.installation_time != current.installation_time => {
            if current.index == item.index && slot.installation_time == -current.installation_time
            {
                slot.installation_time = 0;
                slot.next_item = None;
                tracing::debug!(item = %item.id, "Removal cancelled");
            } else {
                remove_item(catalog, Some(&mut *storage), slot, true);
                slot.installation_time = -current.installation_time;
                slot.next_item = Some(item.index);
                tracing::debug!(current = %current.id, next = %item.id, "Item swap queued");
                return Ok(false);
            }
        }
        _ => {
            // Work on copies so a refused item leaves the old one in place.
            let mut trial = slot.clone();
            let mut trial_storage = storage.clone();
            trial.next_item = None;
            remove_item(catalog, Some(&mut trial_storage), &mut trial, false);
            add_item(catalog, Some(&mut trial_storage), &mut trial, &item.id)?;
            *slot = trial;
            *storage = trial_storage;
        }
    }
    Ok(auto_add_ammo(catalog, researched, storage, slot, rules).is_some())
}

/// Fill every free weapon mount of an aircraft with `weapon_id` from its
/// base's storage, load ammunition and make everything operational at
/// once. Returns the number of mounts equipped.
pub fn auto_equip_aircraft(
    campaign: &mut Campaign,
    aircraft: AircraftId,
    weapon_id: &str,
) -> Result<usize, EquipError> {
    let rules = *campaign.catalog.rules();
    let Campaign {
        catalog,
        bases,
        researched,
        ..
    } = campaign;
    let catalog: &ItemCatalog = catalog;
    let weapon = catalog
        .resolve(weapon_id)
        .ok_or_else(|| EquipError::UnknownItem(weapon_id.to_string()))?;
    let (storage, target) = bases
        .iter_mut()
        .find_map(|base| {
            let Base {
                storage, aircraft: hangar, ..
            } = base;
            hangar
                .iter_mut()
                .find(|candidate| candidate.id == aircraft)
                .map(|found| (storage, found))
        })
        .ok_or(EquipError::NoSuchSlot)?;

    let mut equipped = 0;
    for slot in &mut target.weapons {
        if !slot.is_empty() || !weapon.fits(slot.capacity) || !storage.has(weapon.index) {
            continue;
        }
        add_item(catalog, Some(&mut *storage), slot, &weapon.id)?;
        auto_add_ammo(catalog, researched, storage, slot, &rules);
        slot.installation_time = 0;
        equipped += 1;
    }

    target.reload_weapons(catalog);
    target.recompute_stats(catalog);
    tracing::debug!(aircraft = aircraft.0, weapon = weapon_id, equipped, "Auto-equipped aircraft");
    Ok(equipped)
}
