//! Citizen status summary, the `score` view: ash, item counts, hoarding
//! standing, and the platform's cached danger level.

use crate::config::EnforcementConfig;
use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;
use crate::zone::monitor::PlatformMonitor;
use crate::zone::weight::citizen_item_count;

/// Format a compact status summary for one citizen.
pub fn format_citizen_status(
    store: &WorldStore,
    monitor: &PlatformMonitor,
    cfg: &EnforcementConfig,
    limit: i64,
    citizen_id: &str,
) -> Result<Vec<String>, WorldError> {
    let citizen = store.get_citizen(citizen_id)?;
    let carried = store.entities_held_by(citizen_id)?.len();
    let total = citizen_item_count(store, citizen_id)?;

    let standing = if citizen.under_investigation {
        "UNDER INVESTIGATION".to_string()
    } else if citizen.offenses > 0 {
        format!("{} offense(s)", citizen.offenses)
    } else if total >= cfg.minor_threshold {
        "At risk".to_string()
    } else {
        "Clean".to_string()
    };

    Ok(vec![
        "--- Citizen Status ---".to_string(),
        format!("Ash balance: {}", citizen.ash),
        format!("Items carried: {}", carried),
        format!("Total items (incl. shelves): {}", total),
        format!("Hoarding standing: {}", standing),
        "--- Zone 25 ---".to_string(),
        format!(
            "Platform: {} ({}/{} items)",
            monitor.cached_level().label().to_uppercase(),
            monitor.cached_count(),
            limit
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::storage::WorldStoreBuilder;
    use crate::world::types::{CitizenRecord, EntityLocation, EntityRecord};
    use tempfile::TempDir;

    #[test]
    fn status_reflects_standing_tiers() {
        let dir = TempDir::new().expect("tempdir");
        let store = WorldStoreBuilder::new(dir.path()).open().expect("store");
        let monitor = PlatformMonitor::new();
        let cfg = EnforcementConfig::default();

        let citizen = CitizenRecord::new("Alice", "Welcome area");
        let id = citizen.id.clone();
        store.put_citizen(citizen).unwrap();

        let lines = format_citizen_status(&store, &monitor, &cfg, 1000, &id).unwrap();
        assert!(lines.iter().any(|l| l.contains("Clean")));
        assert!(lines.iter().any(|l| l.contains("SAFE")));

        // Pile on items: at-risk.
        for i in 0..10 {
            let mut entity = EntityRecord::new(&format!("item {}", i), "x", "Welcome area");
            entity.location = EntityLocation::Citizen {
                citizen: id.clone(),
            };
            store.put_entity(entity).unwrap();
        }
        let lines = format_citizen_status(&store, &monitor, &cfg, 1000, &id).unwrap();
        assert!(lines.iter().any(|l| l.contains("At risk")));

        let mut citizen = store.get_citizen(&id).unwrap();
        citizen.under_investigation = true;
        store.put_citizen(citizen).unwrap();
        let lines = format_citizen_status(&store, &monitor, &cfg, 1000, &id).unwrap();
        assert!(lines.iter().any(|l| l.contains("UNDER INVESTIGATION")));
    }
}
