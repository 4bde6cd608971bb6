//! Equipment slots.
//!
//! A slot is one mount point on an aircraft or one battery emplacement in a
//! base. Its type is fixed at creation; its contents change over time as
//! items are installed, removed and swapped.
//!
//! # Installation timer
//!
//! `installation_time` is signed:
//!
//! - `> 0`: the item is being installed, hours remaining
//! - `0`: the item is operational (or the slot is empty)
//! - `< 0`: the item is being removed, hours remaining negated

use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftId;
use crate::base::BaseId;
use crate::catalog::{CraftItemType, ItemCatalog, ItemIndex, WeightClass};

/// Who a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// A mount on an aircraft.
    Aircraft(AircraftId),
    /// A defense battery of a base.
    Base(BaseId),
}

/// Coarse state of a slot, derived from its contents and timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotPhase {
    /// No item installed.
    Empty,
    /// Item present, installation under way.
    Installing,
    /// Item present and working.
    Operational,
    /// Item present, removal under way.
    Removing,
}

/// One mount point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Item type accepted by this slot. Never changes.
    pub kind: CraftItemType,
    /// Owning aircraft or base.
    pub owner: Owner,
    /// Heaviest weight class accepted.
    pub capacity: WeightClass,
    /// Display position on the airframe.
    pub position: u8,
    /// Installed item.
    pub item: Option<ItemIndex>,
    /// Loaded ammunition.
    pub ammo: Option<ItemIndex>,
    /// Item queued to replace the current one once it is removed.
    pub next_item: Option<ItemIndex>,
    /// Rounds left, `-1` when never loaded.
    pub ammo_left: i32,
    /// Signed installation timer in hours.
    pub installation_time: i32,
}

impl Slot {
    /// Create an empty slot bound to `owner`.
    #[must_use]
    pub const fn new(owner: Owner, kind: CraftItemType, capacity: WeightClass) -> Self {
        Self {
            kind,
            owner,
            capacity,
            position: 0,
            item: None,
            ammo: None,
            next_item: None,
            ammo_left: -1,
            installation_time: 0,
        }
    }

    /// Set the display position.
    #[must_use]
    pub const fn with_position(mut self, position: u8) -> Self {
        self.position = position;
        self
    }

    /// Clear every field except type and owner.
    ///
    /// Capacity returns to [`WeightClass::Heavy`], the widest class, which
    /// is what base batteries use.
    pub fn reset(&mut self) {
        *self = Self::new(self.owner, self.kind, WeightClass::Heavy).with_position(self.position);
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> SlotPhase {
        match (self.item, self.installation_time) {
            (None, _) => SlotPhase::Empty,
            (Some(_), t) if t > 0 => SlotPhase::Installing,
            (Some(_), 0) => SlotPhase::Operational,
            (Some(_), _) => SlotPhase::Removing,
        }
    }

    /// Check if no item is installed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    /// Check if an item is installed and working.
    #[must_use]
    pub const fn is_operational(&self) -> bool {
        matches!(self.phase(), SlotPhase::Operational)
    }

    /// Hours until the current installation or removal completes.
    #[must_use]
    pub const fn hours_remaining(&self) -> u32 {
        self.installation_time.unsigned_abs()
    }

    /// Check if the slot has an item and ammunition with rounds left.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.item.is_some() && self.ammo.is_some() && self.ammo_left > 0
    }

    /// Verify the structural invariants of the slot.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self, catalog: &ItemCatalog) -> Result<(), String> {
        let Some(index) = self.item else {
            if self.installation_time != 0 {
                return Err(format!("empty slot has timer {}", self.installation_time));
            }
            if self.next_item.is_some() {
                return Err("empty slot has a queued item".to_string());
            }
            if self.ammo.is_some() {
                return Err("empty slot has ammunition".to_string());
            }
            return Ok(());
        };

        let item = catalog
            .get(index)
            .ok_or_else(|| format!("slot references unknown item {}", index.0))?;
        if item.item_type != self.kind {
            return Err(format!(
                "{:?} slot holds '{}' of type {:?}",
                self.kind, item.id, item.item_type
            ));
        }
        if self.installation_time.unsigned_abs() > item.installation_time.max(0).unsigned_abs() {
            return Err(format!(
                "timer {} exceeds installation time {} of '{}'",
                self.installation_time, item.installation_time, item.id
            ));
        }

        if let Some(next) = self.next_item {
            let queued = catalog
                .get(next)
                .ok_or_else(|| format!("slot queues unknown item {}", next.0))?;
            if queued.item_type != self.kind {
                return Err(format!(
                    "{:?} slot queues '{}' of type {:?}",
                    self.kind, queued.id, queued.item_type
                ));
            }
            if self.installation_time >= 0 {
                return Err(format!("'{}' queued while nothing is being removed", queued.id));
            }
        }

        if let Some(loaded) = self.ammo {
            let ammo = catalog
                .get(loaded)
                .ok_or_else(|| format!("slot holds unknown ammunition {}", loaded.0))?;
            if self.kind.ammo_type() != Some(ammo.item_type) {
                return Err(format!(
                    "{:?} slot holds ammunition '{}' of type {:?}",
                    self.kind, ammo.id, ammo.item_type
                ));
            }
            if !ammo.fits_weapon(index) {
                return Err(format!("ammunition '{}' does not fit '{}'", ammo.id, item.id));
            }
        }
        Ok(())
    }
}
