//! The `report` entry point: citizens reporting each other for hoarding.
//!
//! Minor hoarders draw escalating fines from the schedule; exhausting the
//! schedule -- or crossing the major threshold outright -- opens a formal
//! investigation. Fines are recycled into the station pool rather than
//! destroyed, so enforcement never deflates the economy.

use log::info;

use crate::config::{EnforcementConfig, StationConfig};
use crate::economy::pool::credit_station_pool;
use crate::enforcement::investigation::add_reporter;
use crate::logutil::escape_log;
use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;
use crate::world::types::{CitizenRecord, InvestigationCase};
use crate::zone::weight::citizen_item_count;

/// What a report did. Informational outcomes mutate nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Below the minor threshold; no action taken.
    NotHoarding { item_count: usize },
    /// Target already under investigation; the reporter was added to the
    /// case (speeding it up if they were new to it).
    ReporterAdded { ticks_remaining: u32 },
    /// A fine from the schedule was applied and routed to the pool.
    Fined {
        fine: i64,
        offense_number: u32,
        item_count: usize,
    },
    /// A formal investigation was opened against the target.
    InvestigationOpened { item_count: usize },
}

/// File a hoarding report from `reporter_id` against `target_id`.
pub fn report(
    store: &WorldStore,
    cfg: &EnforcementConfig,
    station_cfg: &StationConfig,
    reporter_id: &str,
    target_id: &str,
) -> Result<ReportOutcome, WorldError> {
    if reporter_id == target_id {
        return Err(WorldError::InvalidCombination(
            "you can't report yourself".to_string(),
        ));
    }
    // Both ends of the report must exist; a vanished target is NotFound.
    let _reporter = store.get_citizen(reporter_id)?;
    let mut target = store.get_citizen(target_id)?;

    let item_count = citizen_item_count(store, target_id)?;
    if item_count < cfg.minor_threshold {
        return Ok(ReportOutcome::NotHoarding { item_count });
    }

    // Already under investigation? Add the reporter and speed things up.
    if target.under_investigation {
        if let Some(mut case) = store.case_for_target(target_id)? {
            add_reporter(&mut case, cfg, reporter_id);
            let ticks_remaining = case.ticks_remaining;
            store.put_case(case)?;
            return Ok(ReportOutcome::ReporterAdded { ticks_remaining });
        }
        // Stale flag with no case record; reopen below as a fresh case.
    }

    // Major hoarding bypasses the fine schedule entirely.
    if item_count >= cfg.major_threshold {
        open_investigation(store, cfg, reporter_id, &mut target)?;
        return Ok(ReportOutcome::InvestigationOpened { item_count });
    }

    // Escalating fines. A 0 in the schedule -- or running off its end --
    // means escalate, never "fine zero ash".
    let offenses = target.offenses;
    let fine = cfg
        .fine_schedule
        .get(offenses as usize)
        .copied()
        .unwrap_or(0);

    if fine == 0 {
        open_investigation(store, cfg, reporter_id, &mut target)?;
        return Ok(ReportOutcome::InvestigationOpened { item_count });
    }

    target.ash -= fine;
    target.offenses = offenses + 1;
    let offense_number = target.offenses;
    info!(
        "hoarding fine: {} fined {} ash (offense #{}, {} items)",
        escape_log(&target.name),
        fine,
        offense_number,
        item_count
    );
    store.put_citizen(target)?;
    credit_station_pool(store, station_cfg, fine)?;

    Ok(ReportOutcome::Fined {
        fine,
        offense_number,
        item_count,
    })
}

fn open_investigation(
    store: &WorldStore,
    cfg: &EnforcementConfig,
    reporter_id: &str,
    target: &mut CitizenRecord,
) -> Result<(), WorldError> {
    target.under_investigation = true;
    info!(
        "investigation opened against {}",
        escape_log(&target.name)
    );
    store.put_citizen(target.clone())?;
    store.put_case(InvestigationCase::new(
        &target.id,
        reporter_id,
        cfg.investigation_ticks,
    ))?;
    Ok(())
}
