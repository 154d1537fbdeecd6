//! The KonMarie Temple incinerator and the itemator fabricators.
//!
//! Burning is the economy's one deliberate faucet: the item is destroyed, the
//! burner is paid by category, and the station reclaims the same amount of
//! feedstock into the pool. Itemators are the matching sink -- one ash per
//! fabrication -- and shut down entirely while the platform is sinking.

use rand::Rng;

use crate::config::StationConfig;
use crate::economy::fabricate::{generate, weighted_choice, DEFAULT_OUTPUTS};
use crate::economy::pool::credit_station_pool;
use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;
use crate::world::types::EntityLocation;
use crate::zone::danger::DangerLevel;

/// Ash charged per itemator use.
pub const ITEMATOR_COST: i64 = 1;

/// Outcome of feeding an item to the incinerator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurnResult {
    Burned {
        item_name: String,
        reward: i64,
        balance: i64,
        /// Cursed items smoulder; everything else just burns.
        cursed: bool,
    },
    Failed {
        reason: String,
    },
}

/// Ash paid for burning an entity, by category.
fn burn_reward(cursed: bool, artwork: bool) -> i64 {
    if cursed {
        2
    } else if artwork {
        3
    } else {
        1
    }
}

/// Burn a carried item. The entity is destroyed, the burner is paid, and the
/// pool reclaims the same amount.
pub fn incinerate(
    store: &WorldStore,
    station_cfg: &StationConfig,
    citizen_id: &str,
    entity_id: &str,
) -> Result<BurnResult, WorldError> {
    let mut citizen = store.get_citizen(citizen_id)?;
    let entity = store.get_entity(entity_id)?;

    if entity.location
        != (EntityLocation::Citizen {
            citizen: citizen_id.to_string(),
        })
    {
        return Ok(BurnResult::Failed {
            reason: format!("You aren't carrying the {}.", entity.name),
        });
    }

    let reward = burn_reward(entity.flags.cursed, entity.flags.artwork);
    let cursed = entity.flags.cursed;
    let name = entity.name.clone();

    store.delete_entity(entity_id)?;
    citizen.ash += reward;
    let balance = citizen.ash;
    store.put_citizen(citizen)?;
    credit_station_pool(store, station_cfg, reward)?;

    Ok(BurnResult::Burned {
        item_name: name,
        reward,
        balance,
        cursed,
    })
}

/// Outcome of pulling the lever on an itemator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnResult {
    Spawned {
        item_id: String,
        item_name: String,
        balance: i64,
    },
    Refused {
        reason: String,
    },
}

/// Fabricate a random item at the citizen's location for one ash.
///
/// Generation is refused outright while the cached danger level is sinking --
/// the itemators are the first thing the platform shuts down.
pub fn itemator_spawn(
    store: &WorldStore,
    danger_level: DangerLevel,
    masterpiece_fraction: f64,
    citizen_id: &str,
    rng: &mut impl Rng,
) -> Result<SpawnResult, WorldError> {
    if danger_level == DangerLevel::Sinking {
        return Ok(SpawnResult::Refused {
            reason: "The itemator's display reads: FABRICATION SUSPENDED. PLATFORM OVER CAPACITY."
                .to_string(),
        });
    }

    let mut citizen = store.get_citizen(citizen_id)?;
    if citizen.ash < ITEMATOR_COST {
        return Ok(SpawnResult::Refused {
            reason: format!("The itemator requires {} ash.", ITEMATOR_COST),
        });
    }

    citizen.ash -= ITEMATOR_COST;
    let kind = weighted_choice(DEFAULT_OUTPUTS, rng);
    let entity = generate(kind, &citizen.location, masterpiece_fraction, rng);
    let result = SpawnResult::Spawned {
        item_id: entity.id.clone(),
        item_name: entity.name.clone(),
        balance: citizen.ash,
    };
    store.put_entity(entity)?;
    store.put_citizen(citizen)?;
    Ok(result)
}
