//! Hour-by-hour equipment simulation.
//!
//! A [`SimulationPlan`] founds one base, buys aircraft, queues equipment
//! through the same [`EquipSession`] the equip screen uses, then runs the
//! hourly update and records every notice.

use std::path::Path;

use geoscape_core::aircraft::AircraftId;
use geoscape_core::base::{BaseId, DefenseKind};
use geoscape_core::campaign::{Campaign, Notice, NotificationSink};
use geoscape_core::catalog::{CraftItemType, ItemCatalog};
use geoscape_core::equip::{EquipSession, Zone};
use geoscape_core::stats::AircraftStats;
use geoscape_core::storage::Storage;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

const fn default_stock() -> u32 {
    4
}

const fn default_hours() -> u32 {
    24
}

/// Equipment for one aircraft.
///
/// # Example RON
///
/// ```ron
/// AircraftPlan(
///     class_id: "craft_interceptor",
///     weapons: ["craft_weapon_sparrowhawk"],
///     shield: Some("craft_shield_light"),
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftPlan {
    /// Aircraft class to buy.
    pub class_id: String,
    /// Weapon per weapon mount, in mount order.
    #[serde(default)]
    pub weapons: Vec<String>,
    /// Electronics per electronics mount, in mount order.
    #[serde(default)]
    pub electronics: Vec<String>,
    /// Shield.
    #[serde(default)]
    pub shield: Option<String>,
}

/// A whole simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationPlan {
    /// Units of every catalog item placed in base storage.
    #[serde(default = "default_stock")]
    pub stock: u32,
    /// Hours to simulate.
    #[serde(default = "default_hours")]
    pub hours: u32,
    /// Aircraft to buy and equip.
    #[serde(default)]
    pub aircraft: Vec<AircraftPlan>,
    /// Launcher per missile battery.
    #[serde(default)]
    pub missile_batteries: Vec<String>,
    /// Launcher per laser battery.
    #[serde(default)]
    pub laser_batteries: Vec<String>,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self {
            stock: default_stock(),
            hours: default_hours(),
            aircraft: Vec::new(),
            missile_batteries: Vec::new(),
            laser_batteries: Vec::new(),
        }
    }
}

impl SimulationPlan {
    /// Read a plan from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
        ron::from_str(&source).map_err(|e| {
            ToolError::Game(geoscape_core::error::GameError::DataParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })
    }
}

/// A notice and the hour it arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedNotice {
    /// Campaign hour, counting from 0.
    pub hour: u64,
    /// The notice.
    pub notice: Notice,
}

/// Notification sink that stamps each notice with the campaign hour.
#[derive(Debug, Default)]
struct Timeline {
    hour: u64,
    notices: Vec<TimedNotice>,
    pauses: usize,
}

impl NotificationSink for Timeline {
    fn notify(&mut self, notice: Notice) {
        tracing::info!(hour = self.hour, "{notice}");
        self.notices.push(TimedNotice {
            hour: self.hour,
            notice,
        });
    }

    fn pause_clock(&mut self) {
        self.pauses += 1;
    }
}

/// What happened during a simulation.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Hours simulated.
    pub hours: u32,
    /// Notices in arrival order.
    pub notices: Vec<TimedNotice>,
    /// Clock pause requests.
    pub pauses: usize,
    /// Final stats of every aircraft, in purchase order.
    pub aircraft: Vec<(AircraftId, AircraftStats)>,
    /// Whether the base could fire at the end.
    pub base_can_shoot: bool,
    /// The campaign at the end of the run.
    pub campaign: Campaign,
}

fn install(
    campaign: &mut Campaign,
    session: &mut EquipSession,
    mount: CraftItemType,
    slot: usize,
    item_id: &str,
) -> Result<()> {
    if !session.select_mount(campaign, mount) {
        return Err(ToolError::Plan(format!("no {mount:?} mount")));
    }
    session.select_slot(campaign, slot);
    if session.slot_index() != slot {
        return Err(ToolError::Plan(format!("no {mount:?} mount #{slot}")));
    }
    let position = session
        .selectable_items(campaign)
        .iter()
        .position(|item| item.id == item_id)
        .ok_or_else(|| {
            ToolError::Plan(format!(
                "'{item_id}' cannot be selected for {mount:?} mount #{slot}"
            ))
        })?;
    session.select_item(campaign, position);
    session.add_to_zone(campaign, Zone::Main)?;
    Ok(())
}

fn build_batteries(
    campaign: &mut Campaign,
    base: BaseId,
    kind: DefenseKind,
    launchers: &[String],
) -> Result<()> {
    if launchers.is_empty() {
        return Ok(());
    }
    let rules = *campaign.catalog.rules();
    {
        let home = campaign.base_mut(base)?;
        match kind {
            DefenseKind::Missile => home.has_missile_defense = true,
            DefenseKind::Laser => home.has_laser_defense = true,
        }
        for _ in launchers {
            home.add_battery(kind, &rules)?;
        }
    }

    let mut session = EquipSession::for_base_defense(base);
    for (slot, launcher) in launchers.iter().enumerate() {
        install(campaign, &mut session, kind.slot_type(), slot, launcher)?;
    }
    Ok(())
}

fn equip_aircraft(
    campaign: &mut Campaign,
    base: BaseId,
    aircraft: AircraftId,
    plan: &AircraftPlan,
) -> Result<()> {
    let mut session = EquipSession::for_aircraft(base, aircraft);
    for (slot, weapon) in plan.weapons.iter().enumerate() {
        install(campaign, &mut session, CraftItemType::Weapon, slot, weapon)?;
    }
    for (slot, electronics) in plan.electronics.iter().enumerate() {
        install(campaign, &mut session, CraftItemType::Electronics, slot, electronics)?;
    }
    if let Some(shield) = &plan.shield {
        install(campaign, &mut session, CraftItemType::Shield, 0, shield)?;
    }
    Ok(())
}

/// Run a plan against a catalog.
///
/// # Errors
///
/// Returns an error if the plan names an unknown aircraft class, or an item
/// that cannot be installed where the plan puts it.
pub fn run_simulation(catalog: ItemCatalog, plan: &SimulationPlan) -> Result<SimulationReport> {
    let storage = catalog
        .items()
        .fold(Storage::new(), |storage, item| storage.with_count(item.index, plan.stock));
    let mut campaign = Campaign::new(catalog);
    let base = campaign.found_base("Simulation Base");
    campaign.base_mut(base)?.storage = storage;

    build_batteries(&mut campaign, base, DefenseKind::Missile, &plan.missile_batteries)?;
    build_batteries(&mut campaign, base, DefenseKind::Laser, &plan.laser_batteries)?;

    let mut fleet = Vec::with_capacity(plan.aircraft.len());
    for aircraft_plan in &plan.aircraft {
        let aircraft = campaign.buy_aircraft(base, &aircraft_plan.class_id)?;
        equip_aircraft(&mut campaign, base, aircraft, aircraft_plan)?;
        fleet.push(aircraft);
    }

    let mut timeline = Timeline::default();
    for _ in 0..plan.hours {
        timeline.hour = campaign.hour();
        campaign.run_hour(&mut timeline);
    }

    let aircraft = fleet
        .iter()
        .filter_map(|id| campaign.aircraft(*id).map(|(_, found)| (*id, found.stats)))
        .collect();
    let base_can_shoot = campaign.base(base).is_some_and(|home| home.can_shoot());

    tracing::info!(
        hours = plan.hours,
        notices = timeline.notices.len(),
        base_can_shoot,
        "Simulation finished"
    );

    Ok(SimulationReport {
        hours: plan.hours,
        notices: timeline.notices,
        pauses: timeline.pauses,
        aircraft,
        base_can_shoot,
        campaign,
    })
}
