//! Timed investigation of hoarding suspects. Each case ticks down once per
//! interval, broadcasting escalating warnings; on completion it hands the
//! target to a security unit. A vanished target invalidates the case on its
//! next tick.

use log::{info, warn};

use crate::config::EnforcementConfig;
use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;
use crate::world::types::{EnforcementRun, InvestigationCase};
use crate::zone::messages::investigation_warning;

/// What one case did on a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseEvent {
    /// Still counting down; deliver the escalating warning platform-wide.
    Warning {
        target_name: String,
        ticks_remaining: u32,
        line: String,
    },
    /// Ticks exhausted; a security unit has been dispatched.
    Resolved { target_id: String },
    /// Target no longer exists; the case was dropped.
    Invalidated { target_id: String },
}

/// Add a reporter to an open case. Each new distinct reporter shaves ticks
/// off, floored at one remaining -- stacking reporters can never finish an
/// investigation instantly. Re-reports from a known reporter change nothing.
pub fn add_reporter(case: &mut InvestigationCase, cfg: &EnforcementConfig, reporter_id: &str) {
    if case.reporters.iter().any(|r| r == reporter_id) {
        return;
    }
    case.reporters.push(reporter_id.to_string());
    case.ticks_remaining = case.ticks_remaining.saturating_sub(cfg.speedup_per_report).max(1);
}

/// Advance every open case by one tick. A failure in one case is logged and
/// never disturbs the others.
pub fn tick_cases(store: &WorldStore) -> Vec<CaseEvent> {
    let cases = match store.list_cases() {
        Ok(cases) => cases,
        Err(e) => {
            warn!("investigation sweep failed to list cases: {}", e);
            return Vec::new();
        }
    };

    let mut events = Vec::new();
    for case in cases {
        match tick_case(store, case) {
            Ok(event) => events.push(event),
            Err(e) => warn!("investigation tick failed: {}", e),
        }
    }
    events
}

fn tick_case(
    store: &WorldStore,
    mut case: InvestigationCase,
) -> Result<CaseEvent, WorldError> {
    if !store.citizen_exists(&case.target) {
        store.delete_case(&case.id)?;
        info!("investigation dropped: target {} no longer exists", case.target);
        return Ok(CaseEvent::Invalidated {
            target_id: case.target,
        });
    }
    let target = store.get_citizen(&case.target)?;

    case.ticks_remaining = case.ticks_remaining.saturating_sub(1);

    if case.ticks_remaining > 0 {
        let elapsed = case.total_ticks - case.ticks_remaining;
        let line = investigation_warning(elapsed)
            .replace("{target}", &target.name)
            .replace("{remaining}", &case.ticks_remaining.to_string());
        let event = CaseEvent::Warning {
            target_name: target.name.clone(),
            ticks_remaining: case.ticks_remaining,
            line,
        };
        store.put_case(case)?;
        return Ok(event);
    }

    // Investigation complete -- dispatch the security unit.
    let run = EnforcementRun::new(&case.target, case.reporters.clone());
    store.put_run(run)?;
    let mut target = target;
    target.under_investigation = false;
    store.put_citizen(target.clone())?;
    store.delete_case(&case.id)?;
    info!("investigation resolved: security unit dispatched for {}", target.name);
    Ok(CaseEvent::Resolved {
        target_id: case.target,
    })
}
