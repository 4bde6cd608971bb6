//! Campaign state and the hourly equipment update.
//!
//! [`Campaign::run_hour`] is the only place simulated time moves for
//! equipment: every founded base advances its batteries and parked
//! aircraft by one hour, in a fixed order, and reloads its missile
//! batteries.

use std::collections::BTreeSet;

use crate::aircraft::{Aircraft, AircraftId};
use crate::base::{Base, BaseId};
use crate::catalog::{ItemCatalog, ItemDefinition};
use crate::error::{GameError, Result};
use crate::lifecycle::TickOutcome;
use crate::slot::Owner;

/// Player-facing message about equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// An aircraft item became operational.
    AircraftItemInstalled,
    /// An aircraft item was taken out.
    AircraftItemRemoved,
    /// A base-defense item became operational.
    BaseDefenseItemInstalled,
    /// A base-defense item was taken out.
    BaseDefenseItemRemoved,
}

impl Notice {
    /// Message text.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AircraftItemInstalled => "Aircraft item was successfully installed.",
            Self::AircraftItemRemoved => "Aircraft item was successfully removed.",
            Self::BaseDefenseItemInstalled => "Base defense item was successfully installed.",
            Self::BaseDefenseItemRemoved => "Base defense item was successfully removed.",
        }
    }

    /// The installed notice for a slot owner.
    #[must_use]
    pub const fn installed(owner: Owner) -> Self {
        match owner {
            Owner::Aircraft(_) => Self::AircraftItemInstalled,
            Owner::Base(_) => Self::BaseDefenseItemInstalled,
        }
    }

    /// The removed notice for a slot owner.
    #[must_use]
    pub const fn removed(owner: Owner) -> Self {
        match owner {
            Owner::Aircraft(_) => Self::AircraftItemRemoved,
            Owner::Base(_) => Self::BaseDefenseItemRemoved,
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Receiver for equipment notices.
///
/// Both calls are fire-and-forget.
pub trait NotificationSink {
    /// Show a notice to the player.
    fn notify(&mut self, notice: Notice);

    /// Stop the campaign clock so the player can react.
    fn pause_clock(&mut self);
}

/// A sink that records everything it receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeLog {
    notices: Vec<Notice>,
    pauses: usize,
}

impl NoticeLog {
    /// Notices received so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Number of clock pause requests.
    #[must_use]
    pub const fn pauses(&self) -> usize {
        self.pauses
    }

    /// Forget everything received.
    pub fn clear(&mut self) {
        self.notices.clear();
        self.pauses = 0;
    }
}

impl NotificationSink for NoticeLog {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn pause_clock(&mut self) {
        self.pauses += 1;
    }
}

/// Turn a finished slot tick into notices.
///
/// A removal pauses the clock only when the slot ended up empty.
pub(crate) fn report_tick(sink: &mut dyn NotificationSink, owner: Owner, outcome: TickOutcome) {
    match outcome {
        TickOutcome::Installed => {
            tracing::info!(?owner, "{}", Notice::installed(owner));
            sink.notify(Notice::installed(owner));
        }
        TickOutcome::Removed { emptied: true } => {
            tracing::info!(?owner, "{}", Notice::removed(owner));
            sink.notify(Notice::removed(owner));
            sink.pause_clock();
        }
        TickOutcome::Removed { emptied: false } | TickOutcome::Counting | TickOutcome::Idle => {}
    }
}

/// Everything the equipment engine needs about one campaign.
#[derive(Debug, Clone)]
pub struct Campaign {
    /// Item and aircraft class definitions.
    pub catalog: ItemCatalog,
    /// Player bases, in update order.
    pub bases: Vec<Base>,
    /// Completed research.
    pub researched: BTreeSet<String>,
    hour: u64,
    next_base_id: u32,
    next_aircraft_id: u32,
}

impl Campaign {
    /// Create a campaign with no bases.
    #[must_use]
    pub fn new(catalog: ItemCatalog) -> Self {
        Self {
            catalog,
            bases: Vec::new(),
            researched: BTreeSet::new(),
            hour: 0,
            next_base_id: 0,
            next_aircraft_id: 0,
        }
    }

    /// Hours simulated so far.
    #[must_use]
    pub const fn hour(&self) -> u64 {
        self.hour
    }

    /// Restore the clock and id counters from a saved game.
    pub(crate) fn restore_counters(&mut self, hour: u64) {
        self.hour = hour;
        self.next_base_id = self
            .bases
            .iter()
            .map(|base| base.id.0 + 1)
            .max()
            .unwrap_or(0);
        self.next_aircraft_id = self
            .bases
            .iter()
            .flat_map(|base| &base.aircraft)
            .map(|aircraft| aircraft.id.0 + 1)
            .max()
            .unwrap_or(0);
    }

    /// Found a new base.
    pub fn found_base(&mut self, name: impl Into<String>) -> BaseId {
        let id = BaseId::new(self.next_base_id);
        self.next_base_id += 1;
        self.bases.push(Base::new(id, name));
        tracing::debug!(base = id.0, "Founded base");
        id
    }

    /// Find a base.
    #[must_use]
    pub fn base(&self, id: BaseId) -> Option<&Base> {
        self.bases.iter().find(|base| base.id == id)
    }

    /// Find a base, mutable.
    pub fn base_mut(&mut self, id: BaseId) -> Result<&mut Base> {
        self.bases
            .iter_mut()
            .find(|base| base.id == id)
            .ok_or(GameError::InvalidBaseId(id.0))
    }

    /// Build an aircraft of the given class and station it at a base.
    pub fn buy_aircraft(&mut self, base: BaseId, class_id: &str) -> Result<AircraftId> {
        let template = self
            .catalog
            .template(class_id)
            .ok_or_else(|| GameError::UnknownAircraftClass(class_id.to_string()))?;
        let id = AircraftId::new(self.next_aircraft_id);
        let aircraft = Aircraft::from_template(id, template);

        self.bases
            .iter_mut()
            .find(|candidate| candidate.id == base)
            .ok_or(GameError::InvalidBaseId(base.0))?
            .add_aircraft(aircraft);
        self.next_aircraft_id += 1;
        tracing::debug!(base = base.0, aircraft = id.0, class_id, "Aircraft delivered");
        Ok(id)
    }

    /// Find an aircraft and the base it is stationed at.
    #[must_use]
    pub fn aircraft(&self, id: AircraftId) -> Option<(&Base, &Aircraft)> {
        self.bases
            .iter()
            .find_map(|base| base.aircraft(id).map(|aircraft| (base, aircraft)))
    }

    /// Record a completed technology.
    pub fn mark_researched(&mut self, tech_id: impl Into<String>) {
        self.researched.insert(tech_id.into());
    }

    /// Check if an item's research requirements are met.
    #[must_use]
    pub fn is_researched(&self, item: &ItemDefinition) -> bool {
        item.is_researched(&self.researched)
    }

    /// Simulate one hour of equipment work.
    ///
    /// Returns `true` if any slot finished installing or removing.
    pub fn run_hour(&mut self, sink: &mut dyn NotificationSink) -> bool {
        let rules = *self.catalog.rules();
        let mut changed = false;
        for base in self.bases.iter_mut().filter(|base| base.founded) {
            changed |= base.advance_installation(&self.catalog, sink);
            base.reload_batteries(&rules);
        }
        self.hour += 1;
        #[cfg(feature = "debug-validation")]
        self.assert_slot_invariants();
        changed
    }

    #[cfg(feature = "debug-validation")]
    fn assert_slot_invariants(&self) {
        for base in &self.bases {
            let batteries = base.missiles.active().iter().chain(base.lasers.active());
            let mounts = base.aircraft.iter().flat_map(Aircraft::slots);
            for slot in batteries.chain(mounts) {
                if let Err(violation) = slot.check_invariants(&self.catalog) {
                    panic!("slot of {:?} broken at hour {}: {violation}", slot.owner, self.hour);
                }
            }
        }
    }
}
