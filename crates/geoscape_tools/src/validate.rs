//! Data validation utilities.
//!
//! A catalog may be split across several RON files in one directory. Files
//! are read in name order and merged before validation, so cross-file ammo
//! references resolve.

use std::path::{Path, PathBuf};

use geoscape_core::catalog::{CraftItemType, ItemCatalog};
use geoscape_core::config::EquipRules;
use geoscape_core::data::CatalogData;

use crate::error::{Result, ToolError};

/// Summary of a validated catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Files read, in merge order.
    pub files: Vec<PathBuf>,
    /// Number of craft items.
    pub items: usize,
    /// Number of aircraft classes.
    pub aircraft_classes: usize,
    /// Items that can never be installed.
    pub not_installable: Vec<String>,
}

fn data_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let entries = std::fs::read_dir(path).map_err(|e| ToolError::io(path, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ToolError::io(path, e))?;
        let file = entry.path();
        if file.extension().is_some_and(|ext| ext == "ron") {
            files.push(file);
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(ToolError::NoDataFiles(path.to_path_buf()));
    }
    Ok(files)
}

fn merge_files(files: &[PathBuf]) -> Result<CatalogData> {
    let mut merged = CatalogData::default();
    for file in files {
        let source = std::fs::read_to_string(file).map_err(|e| ToolError::io(file, e))?;
        let data = CatalogData::from_ron_str(&source, &file.display().to_string())?;
        tracing::debug!(
            file = %file.display(),
            items = data.items.len(),
            aircraft = data.aircraft.len(),
            "Read data file"
        );
        merged.items.extend(data.items);
        merged.aircraft.extend(data.aircraft);
        // The last file that sets rules wins.
        if data.rules != EquipRules::default() {
            merged.rules = data.rules;
        }
    }
    Ok(merged)
}

/// Load and validate a catalog from a RON file or a directory of them.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, or the merged data
/// fails catalog validation.
pub fn load_catalog(path: &Path) -> Result<ItemCatalog> {
    let files = data_files(path)?;
    Ok(ItemCatalog::from_data(merge_files(&files)?)?)
}

/// Validate all RON data files in a directory.
///
/// # Errors
///
/// Returns an error if any data file fails validation.
pub fn validate_data_directory(path: &Path) -> Result<ValidationReport> {
    let files = data_files(path)?;
    let catalog = ItemCatalog::from_data(merge_files(&files)?)?;

    let not_installable = catalog
        .items()
        .filter(|item| !item.item_type.is_ammo() && !item.is_installable())
        .map(|item| item.id.clone())
        .collect();
    for kind in [CraftItemType::BaseMissile, CraftItemType::BaseLaser] {
        if catalog.items_of_type(kind).next().is_none() {
            tracing::warn!(?kind, "Catalog has no base-defense item of this kind");
        }
    }

    Ok(ValidationReport {
        files,
        items: catalog.len(),
        aircraft_classes: catalog.template_ids().len(),
        not_installable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEAPON: &str = r#"CatalogData(
        items: [
            ItemData(id: "gun", item_type: Weapon, size: 30, installation_time: 2, ammos: ["shells"]),
        ],
    )"#;

    const AMMO: &str = r#"CatalogData(
        items: [
            ItemData(id: "shells", item_type: Ammo, size: 5, installation_time: 0, weapons: ["gun"], ammo_count: 10),
            ItemData(id: "relic", item_type: Weapon, size: 60, installation_time: -1),
        ],
        aircraft: [
            AircraftData(id: "scout", name: "Scout", stats: { Speed: 800 }, weapon_slots: [SlotData(capacity: Light)]),
        ],
    )"#;

    #[test]
    fn test_merges_files_in_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("a_weapons.ron"), WEAPON).expect("write");
        std::fs::write(dir.path().join("b_ammo.ron"), AMMO).expect("write");
        std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        let report = validate_data_directory(dir.path()).expect("valid");
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.items, 3);
        assert_eq!(report.aircraft_classes, 1);
        assert_eq!(report.not_installable, vec!["relic".to_string()]);
    }

    #[test]
    fn test_dangling_reference_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("weapons.ron"), WEAPON).expect("write");
        let result = validate_data_directory(dir.path());
        assert!(matches!(
            result,
            Err(ToolError::Game(geoscape_core::error::GameError::CatalogValidation { .. }))
        ));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(matches!(
            validate_data_directory(dir.path()),
            Err(ToolError::NoDataFiles(_))
        ));
    }

    #[test]
    fn test_single_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("catalog.ron");
        let combined = AMMO.replace(
            "items: [",
            r#"items: [
            ItemData(id: "gun", item_type: Weapon, size: 30, installation_time: 2, ammos: ["shells"]),"#,
        );
        std::fs::write(&file, combined).expect("write");
        let catalog = load_catalog(&file).expect("valid");
        assert!(catalog.resolve("gun").is_some());
    }
}
