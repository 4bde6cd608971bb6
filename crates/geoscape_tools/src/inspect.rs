//! Save file reading, writing and pretty-printing.

use std::fmt::Write as _;
use std::path::Path;

use geoscape_core::campaign::Campaign;
use geoscape_core::persistence::{self, CampaignRecord, SlotRecord};

use crate::error::{Result, ToolError};

/// Write a campaign's equipment state to a save file.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_save(path: &Path, campaign: &Campaign) -> Result<()> {
    let bytes = persistence::encode(&CampaignRecord::save(campaign))?;
    std::fs::write(path, bytes).map_err(|e| ToolError::io(path, e))?;
    tracing::info!(path = %path.display(), "Wrote save");
    Ok(())
}

/// Read a save file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a save of the
/// current format version.
pub fn read_save(path: &Path) -> Result<CampaignRecord> {
    let bytes = std::fs::read(path).map_err(|e| ToolError::io(path, e))?;
    Ok(persistence::decode(&bytes)?)
}

fn describe_slot(label: &str, record: &SlotRecord) -> String {
    let Some(item) = &record.item else {
        return format!("{label}: empty");
    };
    let mut line = format!("{label}: {item}");
    match record.installation_time {
        0 => {}
        hours if hours > 0 => {
            let _ = write!(line, " (installing, {hours}h left)");
        }
        hours => {
            let _ = write!(line, " (removing, {}h left)", hours.unsigned_abs());
        }
    }
    if let Some(next) = &record.next_item {
        let _ = write!(line, " -> {next}");
    }
    if let Some(ammo) = &record.ammo {
        let _ = write!(line, " [{ammo} x{}]", record.ammo_left);
    } else if record.ammo_left >= 0 {
        let _ = write!(line, " [x{}]", record.ammo_left);
    }
    line
}

/// Render a save record as indented text, one slot per line.
#[must_use]
pub fn render(record: &CampaignRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Save v{} at hour {}", record.version, record.hour);
    if !record.researched.is_empty() {
        let _ = writeln!(out, "Researched: {}", record.researched.join(", "));
    }
    for base in &record.bases {
        let _ = writeln!(out, "Base #{} {}", base.id, base.name);
        for (id, count) in &base.storage {
            let _ = writeln!(out, "  store {id} x{count}");
        }
        for (n, battery) in base.missiles.iter().enumerate() {
            let _ = writeln!(out, "  {}", describe_slot(&format!("missile {n}"), battery));
        }
        for (n, battery) in base.lasers.iter().enumerate() {
            let _ = writeln!(out, "  {}", describe_slot(&format!("laser {n}"), battery));
        }
        for aircraft in &base.aircraft {
            let _ = writeln!(
                out,
                "  Aircraft #{} {} ({}) fuel {} {:?}",
                aircraft.id, aircraft.name, aircraft.class_id, aircraft.fuel, aircraft.status
            );
            for (n, slot) in aircraft.weapons.iter().enumerate() {
                let _ = writeln!(out, "    {}", describe_slot(&format!("weapon {n}"), slot));
            }
            for (n, slot) in aircraft.electronics.iter().enumerate() {
                let _ = writeln!(out, "    {}", describe_slot(&format!("electronics {n}"), slot));
            }
            let _ = writeln!(out, "    {}", describe_slot("shield", &aircraft.shield));
        }
    }
    out
}
