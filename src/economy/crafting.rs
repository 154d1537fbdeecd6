//! The workshop crafting engine: combine two raw materials into a finished
//! item. Each station favors a primary output type, with a small chance of a
//! wild-card result; same-station art has a masterpiece bonus.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::economy::fabricate::{
    generate, station_output_table, weighted_choice, StockKind, DEFAULT_OUTPUTS,
};
use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;
use crate::world::types::{EntityLocation, EntityRecord};

/// Chance that same-station artwork is forced up to a masterpiece.
const SAME_STATION_MASTERPIECE_CHANCE: f64 = 0.5;

/// A successful craft: both materials consumed, one item produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftOutcome {
    pub item_id: String,
    pub item_name: String,
    pub masterpiece: bool,
}

/// Choose an output kind from the materials' stations. Same-station combos
/// use that station's table; cross-station combos pick one of the two tables
/// at random; unknown stations fall back to the default table.
fn pick_output_kind(
    station1: Option<&str>,
    station2: Option<&str>,
    rng: &mut impl Rng,
) -> StockKind {
    let table1 = station1.and_then(station_output_table);
    let table2 = station2.and_then(station_output_table);
    let table = match (table1, table2) {
        (Some(t1), Some(t2)) => {
            if station1 == station2 {
                t1
            } else {
                *[t1, t2].choose(rng).unwrap_or(&t1)
            }
        }
        (Some(t), None) | (None, Some(t)) => t,
        (None, None) => DEFAULT_OUTPUTS,
    };
    weighted_choice(table, rng)
}

/// Combine two carried materials into a finished item.
///
/// Rejects early -- with nothing mutated -- if either input is not a
/// material, the inputs are the same entity, or either is not carried by the
/// crafting citizen.
pub fn combine(
    store: &WorldStore,
    masterpiece_fraction: f64,
    citizen_id: &str,
    mat1_id: &str,
    mat2_id: &str,
    rng: &mut impl Rng,
) -> Result<CraftOutcome, WorldError> {
    if mat1_id == mat2_id {
        return Err(WorldError::InvalidCombination(
            "you can't combine something with itself".to_string(),
        ));
    }
    let citizen = store.get_citizen(citizen_id)?;
    let mat1 = store.get_entity(mat1_id)?;
    let mat2 = store.get_entity(mat2_id)?;

    for mat in [&mat1, &mat2] {
        if !mat.flags.material {
            return Err(WorldError::InvalidCombination(format!(
                "the {} is not a raw material",
                mat.name
            )));
        }
        if mat.location
            != (EntityLocation::Citizen {
                citizen: citizen_id.to_string(),
            })
        {
            return Err(WorldError::InvalidCombination(format!(
                "you aren't carrying the {}",
                mat.name
            )));
        }
    }

    let station1 = mat1.station.as_deref();
    let station2 = mat2.station.as_deref();
    let same_station = station1.is_some() && station1 == station2;
    let kind = pick_output_kind(station1, station2, rng);

    let mut crafted = generate(kind, &citizen.location, masterpiece_fraction, rng);
    if same_station
        && kind == StockKind::Art
        && !crafted.flags.artwork
        && !crafted.flags.cursed
        && rng.gen_bool(SAME_STATION_MASTERPIECE_CHANCE)
    {
        crafted.flags.artwork = true;
        crafted.weight_fraction = masterpiece_fraction;
        crafted.description = format!("{} It's a masterful work.", crafted.description);
    }

    // Weave material provenance into the description.
    let word1 = flavor_word(&mat1, rng);
    let word2 = flavor_word(&mat2, rng);
    crafted.description = format!(
        "{} Crafted from {} {} and {} {}.",
        crafted.description, word1, mat1.name, word2, mat2.name
    );
    crafted.location = EntityLocation::Citizen {
        citizen: citizen_id.to_string(),
    };
    crafted.last_holder = Some(citizen_id.to_string());

    // Consume the inputs only once the output is fully formed.
    store.delete_entity(mat1_id)?;
    store.delete_entity(mat2_id)?;
    let outcome = CraftOutcome {
        item_id: crafted.id.clone(),
        item_name: crafted.name.clone(),
        masterpiece: crafted.flags.artwork,
    };
    store.put_entity(crafted)?;
    Ok(outcome)
}

fn flavor_word(material: &EntityRecord, rng: &mut impl Rng) -> String {
    material
        .flavor_words
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| "unusual".to_string())
}
