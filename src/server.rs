//! The Zone 25 server loop.
//!
//! One task owns the world store and every scheduled system: the platform
//! monitor, investigation ticks, enforcement phases, and shop restocking.
//! All mutation funnels through this loop, which is what makes the economy's
//! invariants hold without locks -- there is exactly one writer.
//!
//! Stopping an investigation or enforcement run means deleting its record;
//! the tick sweeps only ever read stored records, so a cancelled machine can
//! never fire again.

use std::time::Duration;

use anyhow::Result;
use log::{debug, info, warn};
use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::economy::shop::restock_all;
use crate::enforcement::investigation::tick_cases;
use crate::enforcement::robot::tick_runs;
use crate::enforcement::CaseEvent;
use crate::world::storage::{WorldStore, WorldStoreBuilder};
use crate::zone::monitor::{ambient_echo, PlatformMonitor};

/// Owns the store and drives the scheduled systems.
pub struct ZoneServer {
    config: Config,
    store: WorldStore,
    monitor: PlatformMonitor,
}

impl ZoneServer {
    /// Open the world and prime the scheduler state. Persisted investigation
    /// cases and enforcement runs resume automatically: the tick sweeps pick
    /// them up from the store on their first pass.
    pub fn new(config: Config) -> Result<Self> {
        let store = WorldStoreBuilder::new(&config.storage.data_dir)
            .with_initial_pool(config.station.initial_ash_pool)
            .open()?;

        let cases = store.list_cases()?.len();
        let runs = store.list_runs()?.len();
        if cases > 0 || runs > 0 {
            info!(
                "resuming enforcement state: {} investigation(s), {} run(s)",
                cases, runs
            );
        }

        Ok(Self {
            config,
            store,
            monitor: PlatformMonitor::new(),
        })
    }

    pub fn store(&self) -> &WorldStore {
        &self.store
    }

    pub fn monitor(&self) -> &PlatformMonitor {
        &self.monitor
    }

    /// Run the scheduler until a shutdown signal arrives.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Zone 25 monitor online: limit {}, pool {}",
            self.config.zone.item_limit,
            self.store.get_pool()?
        );

        let mut monitor_tick =
            tokio::time::interval(Duration::from_secs(self.config.zone.monitor_interval_secs));
        let mut investigation_tick = tokio::time::interval(Duration::from_secs(
            self.config.enforcement.investigation_interval_secs,
        ));
        let mut enforcement_tick = tokio::time::interval(Duration::from_secs(
            self.config.enforcement.enforcement_interval_secs,
        ));
        let mut restock_tick =
            tokio::time::interval(Duration::from_secs(self.config.shops.restock_interval_secs));
        for interval in [
            &mut monitor_tick,
            &mut investigation_tick,
            &mut enforcement_tick,
            &mut restock_tick,
        ] {
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        loop {
            tokio::select! {
                _ = monitor_tick.tick() => {
                    let mut rng = rand::thread_rng();
                    match self.monitor.tick(
                        &self.store,
                        &self.config.zone,
                        &self.config.station,
                        &mut rng,
                    ) {
                        Ok(report) => {
                            if let Some(echo) = report.recovery_echo {
                                debug!("industrial ambience: {}", echo);
                            }
                            if let Some(echo) = ambient_echo(&self.monitor, &mut rng) {
                                debug!("outdoor ambience: {}", echo);
                            }
                        }
                        Err(e) => warn!("monitor tick failed: {}", e),
                    }
                },

                _ = investigation_tick.tick() => {
                    for event in tick_cases(&self.store) {
                        match event {
                            CaseEvent::Warning { line, .. } => info!("{}", line),
                            CaseEvent::Resolved { target_id } => {
                                debug!("investigation resolved for {}", target_id);
                            }
                            CaseEvent::Invalidated { target_id } => {
                                debug!("investigation invalidated for {}", target_id);
                            }
                        }
                    }
                },

                _ = enforcement_tick.tick() => {
                    for event in tick_runs(&self.store, &self.config.enforcement) {
                        for line in &event.lines {
                            info!("{}", line);
                        }
                    }
                },

                _ = restock_tick.tick() => {
                    let mut rng = rand::thread_rng();
                    let now = chrono::Utc::now();
                    if let Err(e) = restock_all(
                        &self.store,
                        &self.config.shops,
                        self.config.zone.masterpiece_weight_fraction,
                        now,
                        &mut rng,
                    ) {
                        warn!("restock sweep failed: {}", e);
                    }
                },

                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        Ok(())
    }
}
