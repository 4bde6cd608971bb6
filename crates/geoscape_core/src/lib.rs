//! # Geoscape Core
//!
//! Deterministic equipment engine for aircraft and base-defense batteries.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math in the stat pipeline (uses fixed-point)
//!
//! Items are installed into slots, take hours to become operational, and
//! take hours to come out again. Aircraft stats are rebuilt from the live set
//! of installed items every time a slot changes.
//!
//! ## Crate Structure
//!
//! - [`catalog`] - Immutable craft item definitions
//! - [`storage`] - Per-base item stock
//! - [`slot`] - Mount points and their phases
//! - [`lifecycle`] - Add, remove and tick operations on one slot
//! - [`stats`] - Aircraft stat aggregation
//! - [`aircraft`] / [`base`] - Slot owners
//! - [`campaign`] - Hourly update and notifications
//! - [`equip`] - Equip screen session logic
//! - [`persistence`] - Save records

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod aircraft;
pub mod base;
pub mod campaign;
pub mod catalog;
pub mod config;
pub mod data;
pub mod equip;
pub mod error;
pub mod lifecycle;
pub mod math;
pub mod persistence;
pub mod slot;
pub mod stats;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::aircraft::{Aircraft, AircraftId, AircraftSlotId, AircraftStatus};
    pub use crate::base::{Base, BaseId, BatteryBank, DefenseKind};
    pub use crate::campaign::{Campaign, Notice, NoticeLog, NotificationSink};
    pub use crate::catalog::{CraftItemType, ItemCatalog, ItemDefinition, ItemIndex, WeightClass};
    pub use crate::config::{EquipRules, MAX_AIRCRAFT_SLOT, MAX_BASE_SLOT};
    pub use crate::data::CatalogData;
    pub use crate::equip::{EquipSession, EquipTarget, Zone};
    pub use crate::error::{GameError, Result};
    pub use crate::lifecycle::{EquipError, TickOutcome};
    pub use crate::math::Fixed;
    pub use crate::persistence::CampaignRecord;
    pub use crate::slot::{Owner, Slot, SlotPhase};
    pub use crate::stats::{AircraftStat, AircraftStats};
    pub use crate::storage::Storage;
}
