//! The security unit's enforcement lifecycle, one phase per tick:
//!
//! announce -> move -> seize -> escort -> execute -> cleanup
//!
//! Every phase re-checks that the target still exists and jumps straight to
//! cleanup if not. An offender deleting out from under the machine must never
//! crash a tick or leave a robot wandering the platform.

use log::{info, warn};

use crate::config::EnforcementConfig;
use crate::logutil::escape_log;
use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;
use crate::world::types::{EnforcementPhase, EnforcementRun};

/// What one enforcement run did on a tick. The lines are presentation only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcementTick {
    pub run_id: String,
    pub phase: EnforcementPhase,
    pub lines: Vec<String>,
    /// True once the run has been removed from the schedule.
    pub finished: bool,
}

/// Advance every live enforcement run by one phase. A failure in one run is
/// logged and never disturbs the others.
pub fn tick_runs(store: &WorldStore, cfg: &EnforcementConfig) -> Vec<EnforcementTick> {
    let runs = match store.list_runs() {
        Ok(runs) => runs,
        Err(e) => {
            warn!("enforcement sweep failed to list runs: {}", e);
            return Vec::new();
        }
    };

    let mut events = Vec::new();
    for run in runs {
        match tick_run(store, cfg, run) {
            Ok(event) => events.push(event),
            Err(e) => warn!("enforcement tick failed: {}", e),
        }
    }
    events
}

fn tick_run(
    store: &WorldStore,
    cfg: &EnforcementConfig,
    mut run: EnforcementRun,
) -> Result<EnforcementTick, WorldError> {
    // Fail-soft: any phase with a vanished target collapses to cleanup.
    if run.phase != EnforcementPhase::Cleanup && !store.citizen_exists(&run.target) {
        info!(
            "enforcement run {} lost its target; cleaning up",
            run.id
        );
        run.phase = EnforcementPhase::Cleanup;
    }

    let phase = run.phase;
    let mut lines = Vec::new();
    match phase {
        EnforcementPhase::Announce => {
            let target = store.get_citizen(&run.target)?;
            lines.push(format!(
                "[ZONE 25] A Security Unit has been deployed. Target: {}.",
                target.name
            ));
            lines.push(format!(
                "The {} powers up at the {}, servos whining.",
                run.unit_name, cfg.temple_location
            ));
            run.phase = EnforcementPhase::Move;
        }
        EnforcementPhase::Move => {
            let target = store.get_citizen(&run.target)?;
            lines.push(format!(
                "The {} crashes into the {}, LED display scrolling: COMPLIANCE IS COMMUNITY.",
                run.unit_name, target.location
            ));
            lines.push(format!(
                "The Security Unit turns its optical array toward {}.",
                target.name
            ));
            run.phase = EnforcementPhase::Seize;
        }
        EnforcementPhase::Seize => {
            let target = store.get_citizen(&run.target)?;
            lines.push(format!(
                "The {} extends a pair of padded restraint arms toward {}.",
                run.unit_name, target.name
            ));
            lines.push(
                "'CITIZEN. YOU HAVE BEEN FOUND IN VIOLATION OF PLATFORM WEIGHT ORDINANCE. \
                 COME WITH ME.'"
                    .to_string(),
            );
            run.phase = EnforcementPhase::Escort;
        }
        EnforcementPhase::Escort => {
            let mut target = store.get_citizen(&run.target)?;
            target.location = cfg.temple_location.clone();
            lines.push(format!(
                "The {} enters the {} with {} in tow.",
                run.unit_name, cfg.temple_location, target.name
            ));
            store.put_citizen(target)?;
            run.phase = EnforcementPhase::Execute;
        }
        EnforcementPhase::Execute => {
            execute_punishment(store, cfg, &run, &mut lines)?;
            run.phase = EnforcementPhase::Cleanup;
        }
        EnforcementPhase::Cleanup => {
            lines.push(format!(
                "The {} powers down and is collected by a maintenance drone.",
                run.unit_name
            ));
            store.delete_run(&run.id)?;
            return Ok(EnforcementTick {
                run_id: run.id,
                phase,
                lines,
                finished: true,
            });
        }
    }

    let event = EnforcementTick {
        run_id: run.id.clone(),
        phase,
        lines,
        finished: false,
    };
    store.put_run(run)?;
    Ok(event)
}

/// The execute phase: strip inventory, apply the debt, award reporters,
/// respawn the offender.
fn execute_punishment(
    store: &WorldStore,
    cfg: &EnforcementConfig,
    run: &EnforcementRun,
    lines: &mut Vec<String>,
) -> Result<(), WorldError> {
    let mut target = store.get_citizen(&run.target)?;

    lines.push(format!(
        "The Security Unit guides {} to the incinerator. The ceremony is brief. \
         A flash of heat, a wisp of smoke, and it is done.",
        target.name
    ));

    // Strip everything the offender carries.
    let carried = store.entities_held_by(&target.id)?;
    let stripped = carried.len();
    for entity in carried {
        store.delete_entity(&entity.id)?;
    }

    // The debt is an overwrite, not a subtraction: every offender walks out
    // of the temple at exactly the same negative balance.
    target.ash = -cfg.debt;
    target.offenses = 0;
    target.under_investigation = false;
    target.location = cfg.safe_location.clone();
    info!(
        "enforcement executed against {}: {} items destroyed, balance set to {}",
        escape_log(&target.name),
        stripped,
        target.ash
    );
    store.put_citizen(target.clone())?;

    // Split the reward among reporters that still exist.
    let living: Vec<String> = run
        .reporters
        .iter()
        .filter(|r| store.citizen_exists(r))
        .cloned()
        .collect();
    if !living.is_empty() {
        let share = (cfg.reward / living.len() as i64).max(1);
        for reporter_id in &living {
            let mut reporter = store.get_citizen(reporter_id)?;
            reporter.ash += share;
            store.put_citizen(reporter)?;
        }
        lines.push(format!(
            "{} reporter(s) receive {} ash each for the enforcement action against {}.",
            living.len(),
            share,
            target.name
        ));
    }

    lines.push(format!(
        "{} awakens on the {}, lighter than before. A debt of {} ash hangs over them.",
        target.name, cfg.safe_location, cfg.debt
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::storage::WorldStoreBuilder;
    use crate::world::types::{CitizenRecord, EntityLocation, EntityRecord};
    use tempfile::TempDir;

    fn setup() -> (TempDir, WorldStore, String) {
        let dir = TempDir::new().expect("tempdir");
        let store = WorldStoreBuilder::new(dir.path()).open().expect("store");
        let target = CitizenRecord::new("Tova", "Observation Deck");
        let tid = target.id.clone();
        store.put_citizen(target).expect("target");
        (dir, store, tid)
    }

    fn cfg() -> EnforcementConfig {
        EnforcementConfig::default()
    }

    fn give_items(store: &WorldStore, citizen_id: &str, count: usize) {
        for i in 0..count {
            let mut entity = EntityRecord::new(&format!("hoard {}", i), "x", "Observation Deck");
            entity.location = EntityLocation::Citizen {
                citizen: citizen_id.to_string(),
            };
            store.put_entity(entity).expect("entity");
        }
    }

    #[test]
    fn full_phase_sequence_runs_to_completion() {
        let (_dir, store, tova) = setup();
        give_items(&store, &tova, 12);
        {
            let mut target = store.get_citizen(&tova).unwrap();
            target.ash = 200;
            target.offenses = 3;
            store.put_citizen(target).unwrap();
        }
        let reporter = CitizenRecord::new("Ren", "Welcome area");
        let ren = reporter.id.clone();
        store.put_citizen(reporter).unwrap();
        store
            .put_run(EnforcementRun::new(&tova, vec![ren.clone()]))
            .unwrap();

        let expected = [
            EnforcementPhase::Announce,
            EnforcementPhase::Move,
            EnforcementPhase::Seize,
            EnforcementPhase::Escort,
            EnforcementPhase::Execute,
            EnforcementPhase::Cleanup,
        ];
        for (i, want) in expected.iter().enumerate() {
            let events = tick_runs(&store, &cfg());
            assert_eq!(events.len(), 1, "tick {}", i);
            assert_eq!(events[0].phase, *want);
            assert_eq!(events[0].finished, *want == EnforcementPhase::Cleanup);
        }

        let target = store.get_citizen(&tova).unwrap();
        // Wealth is irrelevant: the debt is an overwrite.
        assert_eq!(target.ash, -50);
        assert_eq!(target.offenses, 0);
        assert!(!target.under_investigation);
        assert_eq!(target.location, "Welcome area");
        assert!(store.entities_held_by(&tova).unwrap().is_empty());
        assert_eq!(store.get_citizen(&ren).unwrap().ash, 25);
        assert!(store.list_runs().unwrap().is_empty());
    }

    #[test]
    fn escort_moves_target_to_temple() {
        let (_dir, store, tova) = setup();
        let mut run = EnforcementRun::new(&tova, vec![]);
        run.phase = EnforcementPhase::Escort;
        store.put_run(run).unwrap();

        tick_runs(&store, &cfg());
        assert_eq!(store.get_citizen(&tova).unwrap().location, "KonMarie Temple");
    }

    #[test]
    fn reward_splits_among_surviving_reporters() {
        let (_dir, store, tova) = setup();
        let mut ids = Vec::new();
        for name in ["Ren", "Mags", "Piet"] {
            let reporter = CitizenRecord::new(name, "Welcome area");
            ids.push(reporter.id.clone());
            store.put_citizen(reporter).unwrap();
        }
        // One reporter vanishes before the execute phase.
        store.delete_citizen(&ids[2]).unwrap();

        let mut run = EnforcementRun::new(&tova, ids.clone());
        run.phase = EnforcementPhase::Execute;
        store.put_run(run).unwrap();
        tick_runs(&store, &cfg());

        // 25 / 2 surviving reporters = 12 each, remainder dropped.
        assert_eq!(store.get_citizen(&ids[0]).unwrap().ash, 12);
        assert_eq!(store.get_citizen(&ids[1]).unwrap().ash, 12);
    }

    #[test]
    fn reporter_share_floors_at_one() {
        let (_dir, store, tova) = setup();
        let mut ids = Vec::new();
        for i in 0..30 {
            let reporter = CitizenRecord::new(&format!("witness {}", i), "Welcome area");
            ids.push(reporter.id.clone());
            store.put_citizen(reporter).unwrap();
        }
        let mut run = EnforcementRun::new(&tova, ids.clone());
        run.phase = EnforcementPhase::Execute;
        store.put_run(run).unwrap();
        tick_runs(&store, &cfg());
        assert_eq!(store.get_citizen(&ids[0]).unwrap().ash, 1);
    }

    #[test]
    fn vanished_target_jumps_to_cleanup() {
        let (_dir, store, tova) = setup();
        store
            .put_run(EnforcementRun::new(&tova, vec![]))
            .unwrap();
        store.delete_citizen(&tova).unwrap();

        let events = tick_runs(&store, &cfg());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, EnforcementPhase::Cleanup);
        assert!(events[0].finished);
        assert!(store.list_runs().unwrap().is_empty());
    }

    #[test]
    fn target_vanishing_mid_sequence_aborts_remaining_phases() {
        let (_dir, store, tova) = setup();
        give_items(&store, &tova, 5);
        store
            .put_run(EnforcementRun::new(&tova, vec![]))
            .unwrap();

        tick_runs(&store, &cfg()); // announce
        tick_runs(&store, &cfg()); // move
        store.delete_citizen(&tova).unwrap();

        let events = tick_runs(&store, &cfg());
        assert_eq!(events[0].phase, EnforcementPhase::Cleanup);
        // The seize/escort/execute phases never ran; the hoard survives as
        // loose world entities.
        assert_eq!(store.list_entities().unwrap().len(), 5);
    }
}
