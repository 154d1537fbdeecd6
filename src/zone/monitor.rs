//! The periodic platform monitor.
//!
//! Every tick it recomputes the weighted item count, caches the danger level
//! for cheap reads by other systems (itemators, ambience, status), recharges
//! the station pool a little, and decides whether to broadcast.
//!
//! Broadcast policy is one-directional on purpose: a warning goes out on any
//! upward transition away from safe, Critical and Sinking nag every tick, and
//! downward transitions are silent -- there is no "all clear".

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{StationConfig, ZoneConfig};
use crate::economy::pool::credit_station_pool;
use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;
use crate::zone::danger::{classify, DangerLevel};
use crate::zone::messages;
use crate::zone::weight::platform_weight;

/// Chance per recharge tick of an ambient reclamation echo.
const RECOVERY_ECHO_CHANCE: f64 = 0.15;

/// What a monitor tick decided. The caller delivers the lines; none of them
/// affect correctness.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorReport {
    pub level: DangerLevel,
    pub count: i64,
    pub limit: i64,
    /// Platform-wide warning to deliver, if the broadcast policy fired.
    pub broadcast: Option<String>,
    /// Ambient reclamation-activity line for industrial rooms, occasional.
    pub recovery_echo: Option<String>,
}

/// Caches the latest danger level and count between ticks so readers never
/// pay for a world scan.
#[derive(Debug, Clone)]
pub struct PlatformMonitor {
    level: DangerLevel,
    last_count: i64,
}

impl Default for PlatformMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformMonitor {
    pub fn new() -> Self {
        Self {
            level: DangerLevel::Safe,
            last_count: 0,
        }
    }

    /// Last computed danger level, without touching the store.
    pub fn cached_level(&self) -> DangerLevel {
        self.level
    }

    /// Last computed weighted item count.
    pub fn cached_count(&self) -> i64 {
        self.last_count
    }

    /// Recompute the platform state and apply the tick side effects.
    pub fn tick(
        &mut self,
        store: &WorldStore,
        zone_cfg: &ZoneConfig,
        station_cfg: &StationConfig,
        rng: &mut impl Rng,
    ) -> Result<MonitorReport, WorldError> {
        let count = platform_weight(store, zone_cfg)?;
        let limit = zone_cfg.item_limit;
        let (level, ratio) = classify(count, limit);
        let old_level = self.level;

        self.level = level;
        self.last_count = count;
        debug!(
            "monitor tick: {}/{} items ({:.0}%), level {}",
            count,
            limit,
            ratio * 100.0,
            level.label()
        );

        // Passive ash recharge -- background material recovery from ocean
        // intake, biological waste, and industrial byproducts.
        let mut recovery_echo = None;
        if station_cfg.ash_recharge > 0 {
            credit_station_pool(store, station_cfg, station_cfg.ash_recharge)?;
            if rng.gen_bool(RECOVERY_ECHO_CHANCE) {
                recovery_echo = messages::RECOVERY_ECHOES
                    .choose(rng)
                    .map(|s| s.to_string());
            }
        }

        let should_broadcast = (level > old_level && level != DangerLevel::Safe)
            || matches!(level, DangerLevel::Critical | DangerLevel::Sinking);

        let broadcast = if should_broadcast {
            let over = (count - limit).max(0);
            messages::broadcast_lines(level).choose(rng).map(|line| {
                line.replace("{count}", &count.to_string())
                    .replace("{limit}", &limit.to_string())
                    .replace("{over}", &over.to_string())
            })
        } else {
            None
        };

        if let Some(line) = &broadcast {
            info!("platform broadcast: {}", line);
        }

        Ok(MonitorReport {
            level,
            count,
            limit,
            broadcast,
            recovery_echo,
        })
    }
}

/// One ambience line for the cached level, or `None` while safe.
pub fn ambient_echo(monitor: &PlatformMonitor, rng: &mut impl Rng) -> Option<String> {
    messages::ominous_echoes(monitor.cached_level())
        .choose(rng)
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::storage::WorldStoreBuilder;
    use crate::world::types::EntityRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn store() -> (TempDir, WorldStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = WorldStoreBuilder::new(dir.path()).open().expect("store");
        (dir, store)
    }

    fn fill(store: &WorldStore, items: usize) {
        for i in 0..items {
            store
                .put_entity(EntityRecord::new(
                    &format!("crate {}", i),
                    "x",
                    "Welcome area",
                ))
                .expect("entity");
        }
    }

    fn tick(
        monitor: &mut PlatformMonitor,
        store: &WorldStore,
        zone_cfg: &ZoneConfig,
    ) -> MonitorReport {
        let mut rng = StdRng::seed_from_u64(7);
        monitor
            .tick(store, zone_cfg, &StationConfig::default(), &mut rng)
            .expect("tick")
    }

    fn small_zone() -> ZoneConfig {
        ZoneConfig {
            item_limit: 10,
            ..ZoneConfig::default()
        }
    }

    #[test]
    fn safe_tick_is_silent_but_recharges() {
        let (_dir, store) = store();
        let mut monitor = PlatformMonitor::new();
        let report = tick(&mut monitor, &store, &small_zone());
        assert_eq!(report.level, DangerLevel::Safe);
        assert!(report.broadcast.is_none());
        assert_eq!(store.get_pool().unwrap(), 505);
    }

    #[test]
    fn upward_transition_broadcasts_once() {
        let (_dir, store) = store();
        let zone = small_zone();
        let mut monitor = PlatformMonitor::new();

        fill(&store, 8); // ratio 0.8 -> Warning
        let report = tick(&mut monitor, &store, &zone);
        assert_eq!(report.level, DangerLevel::Warning);
        assert!(report.broadcast.is_some());

        // Holding at Warning: no repeat nag.
        let report = tick(&mut monitor, &store, &zone);
        assert_eq!(report.level, DangerLevel::Warning);
        assert!(report.broadcast.is_none());
    }

    #[test]
    fn critical_and_sinking_nag_every_tick() {
        let (_dir, store) = store();
        let zone = small_zone();
        let mut monitor = PlatformMonitor::new();

        fill(&store, 10); // ratio 1.0 -> Sinking
        for _ in 0..3 {
            let report = tick(&mut monitor, &store, &zone);
            assert_eq!(report.level, DangerLevel::Sinking);
            assert!(report.broadcast.is_some());
        }
    }

    #[test]
    fn downward_transition_is_silent() {
        let (_dir, store) = store();
        let zone = small_zone();
        let mut monitor = PlatformMonitor::new();

        fill(&store, 8);
        tick(&mut monitor, &store, &zone);
        assert_eq!(monitor.cached_level(), DangerLevel::Warning);

        // Burn everything down.
        for entity in store.list_entities().unwrap() {
            store.delete_entity(&entity.id).unwrap();
        }
        let report = tick(&mut monitor, &store, &zone);
        assert_eq!(report.level, DangerLevel::Safe);
        assert!(report.broadcast.is_none(), "no all-clear message");
    }

    #[test]
    fn dropping_out_of_sinking_to_warning_is_silent() {
        let (_dir, store) = store();
        let zone = small_zone();
        let mut monitor = PlatformMonitor::new();

        fill(&store, 10);
        tick(&mut monitor, &store, &zone);
        assert_eq!(monitor.cached_level(), DangerLevel::Sinking);

        // Down to 8 items: Warning, but reached from above.
        for entity in store.list_entities().unwrap().into_iter().take(2) {
            store.delete_entity(&entity.id).unwrap();
        }
        let report = tick(&mut monitor, &store, &zone);
        assert_eq!(report.level, DangerLevel::Warning);
        assert!(report.broadcast.is_none(), "relief is never announced");
    }

    #[test]
    fn cached_level_updates_with_tick() {
        let (_dir, store) = store();
        let zone = small_zone();
        let mut monitor = PlatformMonitor::new();
        assert_eq!(monitor.cached_level(), DangerLevel::Safe);
        fill(&store, 12);
        tick(&mut monitor, &store, &zone);
        assert_eq!(monitor.cached_level(), DangerLevel::Sinking);
        assert_eq!(monitor.cached_count(), 12);
    }
}
