//! Saving and restoring equipment state.
//!
//! Items are stored by their provided id rather than their catalog index,
//! so a save stays valid when the catalog is reordered. Records are plain
//! serde structs; [`encode`] and [`decode`] wrap them in a versioned
//! bincode envelope.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::aircraft::{Aircraft, AircraftId, AircraftStatus};
use crate::base::{Base, BaseId, DefenseKind};
use crate::campaign::Campaign;
use crate::catalog::{ItemCatalog, ItemIndex};
use crate::error::{GameError, Result};
use crate::slot::Slot;
use crate::storage::Storage;

/// Save format version for compatibility.
pub const FORMAT_VERSION: u32 = 1;

/// Persisted state of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotRecord {
    /// Installed item id.
    pub item: Option<String>,
    /// Loaded ammunition id.
    pub ammo: Option<String>,
    /// Queued replacement id.
    pub next_item: Option<String>,
    /// Rounds left.
    pub ammo_left: i32,
    /// Signed installation timer.
    pub installation_time: i32,
}

fn item_id(catalog: &ItemCatalog, index: Option<ItemIndex>) -> Option<String> {
    index
        .and_then(|index| catalog.get(index))
        .map(|item| item.id.clone())
}

fn item_index(catalog: &ItemCatalog, id: Option<&String>) -> Result<Option<ItemIndex>> {
    id.map(|id| {
        catalog
            .resolve(id)
            .map(|item| item.index)
            .ok_or_else(|| GameError::UnknownItem(id.clone()))
    })
    .transpose()
}

impl SlotRecord {
    /// Capture a slot.
    #[must_use]
    pub fn save(catalog: &ItemCatalog, slot: &Slot) -> Self {
        Self {
            item: item_id(catalog, slot.item),
            ammo: item_id(catalog, slot.ammo),
            next_item: item_id(catalog, slot.next_item),
            ammo_left: slot.ammo_left,
            installation_time: slot.installation_time,
        }
    }

    /// Write this record into `slot`, keeping its kind, owner, capacity and
    /// position.
    ///
    /// The slot is left untouched if any id is unknown or the result would
    /// break a slot invariant.
    pub fn restore(&self, catalog: &ItemCatalog, slot: &mut Slot) -> Result<()> {
        let mut restored = slot.clone();
        restored.item = item_index(catalog, self.item.as_ref())?;
        restored.ammo = item_index(catalog, self.ammo.as_ref())?;
        restored.next_item = item_index(catalog, self.next_item.as_ref())?;
        restored.ammo_left = self.ammo_left;
        restored.installation_time = self.installation_time;
        restored
            .check_invariants(catalog)
            .map_err(GameError::InvalidState)?;
        *slot = restored;
        Ok(())
    }
}

/// Capture a slot array in order.
#[must_use]
pub fn save_slots(catalog: &ItemCatalog, slots: &[Slot]) -> Vec<SlotRecord> {
    slots
        .iter()
        .map(|slot| SlotRecord::save(catalog, slot))
        .collect()
}

/// Restore a slot array in order.
///
/// # Errors
///
/// Returns [`GameError::InvalidState`] if the record count differs from the
/// slot count, and [`GameError::UnknownItem`] if a record names an item the
/// catalog does not know. Slots restored before the failing one keep their
/// new state.
pub fn load_slots(catalog: &ItemCatalog, records: &[SlotRecord], slots: &mut [Slot]) -> Result<()> {
    if records.len() != slots.len() {
        return Err(GameError::InvalidState(format!(
            "Expected {} slot records, got {}",
            slots.len(),
            records.len()
        )));
    }
    for (record, slot) in records.iter().zip(slots.iter_mut()) {
        record.restore(catalog, slot)?;
    }
    Ok(())
}

/// Persisted state of one aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftRecord {
    /// Aircraft id.
    pub id: u32,
    /// Class id.
    pub class_id: String,
    /// Display name.
    pub name: String,
    /// Current fuel.
    pub fuel: i32,
    /// Current activity.
    pub status: AircraftStatus,
    /// Weapon mounts.
    pub weapons: Vec<SlotRecord>,
    /// Electronics mounts.
    pub electronics: Vec<SlotRecord>,
    /// Shield mount.
    pub shield: SlotRecord,
}

impl AircraftRecord {
    /// Capture an aircraft.
    #[must_use]
    pub fn save(catalog: &ItemCatalog, aircraft: &Aircraft) -> Self {
        Self {
            id: aircraft.id.0,
            class_id: aircraft.class_id.clone(),
            name: aircraft.name.clone(),
            fuel: aircraft.fuel,
            status: aircraft.status,
            weapons: save_slots(catalog, &aircraft.weapons),
            electronics: save_slots(catalog, &aircraft.electronics),
            shield: SlotRecord::save(catalog, &aircraft.shield),
        }
    }

    /// Rebuild the aircraft from its class template and recompute its stats.
    pub fn restore(&self, catalog: &ItemCatalog) -> Result<Aircraft> {
        let template = catalog
            .template(&self.class_id)
            .ok_or_else(|| GameError::UnknownAircraftClass(self.class_id.clone()))?;
        let mut aircraft = Aircraft::from_template(AircraftId::new(self.id), template);
        aircraft.name.clone_from(&self.name);
        load_slots(catalog, &self.weapons, &mut aircraft.weapons)?;
        load_slots(catalog, &self.electronics, &mut aircraft.electronics)?;
        self.shield.restore(catalog, &mut aircraft.shield)?;

        // Recomputing may move a parked aircraft to Refuel; the saved status wins.
        aircraft.fuel = self.fuel;
        aircraft.status = self.status;
        aircraft.recompute_stats(catalog);
        aircraft.status = self.status;
        Ok(aircraft)
    }
}

/// Persisted state of one base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRecord {
    /// Base id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Founded flag.
    pub founded: bool,
    /// Stock by item id. Items with zero stock are omitted.
    pub storage: Vec<(String, u32)>,
    /// Built missile batteries.
    pub missiles: Vec<SlotRecord>,
    /// Built laser batteries.
    pub lasers: Vec<SlotRecord>,
    /// Missile defense building operational.
    pub has_missile_defense: bool,
    /// Laser defense building operational.
    pub has_laser_defense: bool,
    /// Stationed aircraft.
    pub aircraft: Vec<AircraftRecord>,
}

impl BaseRecord {
    /// Capture a base.
    #[must_use]
    pub fn save(catalog: &ItemCatalog, base: &Base) -> Self {
        let storage = base
            .storage
            .iter()
            .filter(|&(_, count)| count > 0)
            .filter_map(|(index, count)| catalog.get(index).map(|item| (item.id.clone(), count)))
            .collect();
        Self {
            id: base.id.0,
            name: base.name.clone(),
            founded: base.founded,
            storage,
            missiles: save_slots(catalog, base.missiles.active()),
            lasers: save_slots(catalog, base.lasers.active()),
            has_missile_defense: base.has_missile_defense,
            has_laser_defense: base.has_laser_defense,
            aircraft: save_aircraft(catalog, &base.aircraft),
        }
    }

    /// Rebuild the base.
    pub fn restore(&self, catalog: &ItemCatalog) -> Result<Base> {
        let mut base = Base::new(BaseId::new(self.id), self.name.clone());
        base.founded = self.founded;
        base.has_missile_defense = self.has_missile_defense;
        base.has_laser_defense = self.has_laser_defense;

        let mut storage = Storage::new();
        for (id, count) in &self.storage {
            let item = catalog
                .resolve(id)
                .ok_or_else(|| GameError::UnknownItem(id.clone()))?;
            storage.set_count(item.index, *count);
        }
        base.storage = storage;

        for (kind, records) in [
            (DefenseKind::Missile, &self.missiles),
            (DefenseKind::Laser, &self.lasers),
        ] {
            let bank = base.bank_mut(kind);
            if records.len() > bank.emplacements().len() {
                return Err(GameError::InvalidState(format!(
                    "{kind:?} bank holds at most {} batteries, save has {}",
                    bank.emplacements().len(),
                    records.len()
                )));
            }
            bank.set_active(records.len());
            load_slots(catalog, records, bank.active_mut())?;
        }

        for record in &self.aircraft {
            base.add_aircraft(record.restore(catalog)?);
        }
        Ok(base)
    }
}

fn save_aircraft(catalog: &ItemCatalog, hangar: &[Aircraft]) -> Vec<AircraftRecord> {
    hangar
        .iter()
        .map(|aircraft| AircraftRecord::save(catalog, aircraft))
        .collect()
}

/// Persisted equipment state of a whole campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// Save format version.
    pub version: u32,
    /// Hours simulated.
    pub hour: u64,
    /// Completed research.
    pub researched: Vec<String>,
    /// Bases in update order.
    pub bases: Vec<BaseRecord>,
}

impl CampaignRecord {
    /// Capture a campaign.
    #[must_use]
    pub fn save(campaign: &Campaign) -> Self {
        Self {
            version: FORMAT_VERSION,
            hour: campaign.hour(),
            researched: campaign.researched.iter().cloned().collect(),
            bases: campaign
                .bases
                .iter()
                .map(|base| BaseRecord::save(&campaign.catalog, base))
                .collect(),
        }
    }

    /// Rebuild a campaign on top of `catalog`.
    pub fn restore(&self, catalog: ItemCatalog) -> Result<Campaign> {
        let bases = self
            .bases
            .iter()
            .map(|record| record.restore(&catalog))
            .collect::<Result<Vec<_>>>()?;
        let mut campaign = Campaign::new(catalog);
        campaign.bases = bases;
        campaign.researched = self.researched.iter().cloned().collect::<BTreeSet<_>>();
        campaign.restore_counters(self.hour);
        tracing::debug!(
            hour = self.hour,
            bases = campaign.bases.len(),
            "Restored campaign equipment"
        );
        Ok(campaign)
    }
}

/// Serialize a campaign record.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(record: &CampaignRecord) -> Result<Vec<u8>> {
    bincode::serialize(record)
        .map_err(|e| GameError::SaveFormat(format!("Failed to serialize campaign: {e}")))
}

/// Deserialize a campaign record.
///
/// # Errors
///
/// Returns an error if the bytes are not a campaign record or were written by
/// a different format version.
pub fn decode(bytes: &[u8]) -> Result<CampaignRecord> {
    let record: CampaignRecord = bincode::deserialize(bytes)
        .map_err(|e| GameError::SaveFormat(format!("Failed to deserialize campaign: {e}")))?;

    if record.version != FORMAT_VERSION {
        return Err(GameError::SaveFormat(format!(
            "Save version mismatch: expected {}, got {}",
            FORMAT_VERSION, record.version
        )));
    }

    Ok(record)
}
