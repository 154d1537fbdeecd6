//! The platform weight model.
//!
//! Every entity contributes its weight fraction, player bodies contribute a
//! fixed constant each, and the fractional parts accumulate across the whole
//! population before the final truncation. Rounding error is therefore
//! bounded below one unit in total, not one unit per item.

use crate::config::ZoneConfig;
use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;
use crate::world::types::{EntityLocation, EntityRecord};

/// The weight an entity actually contributes to the platform total.
///
/// Materials count at the material fraction no matter what else is true of
/// them; the display discount applies only to non-material entities. A
/// non-material entity's stored fraction already encodes the masterpiece
/// discount and any shelf multiplier (see `world::shelf`).
pub fn effective_fraction(entity: &EntityRecord, cfg: &ZoneConfig) -> f64 {
    if entity.flags.material {
        cfg.material_weight_fraction
    } else {
        entity.weight_fraction
    }
}

/// Compute the current platform weight: the weighted sum over all entities
/// plus a fixed constant per connected player body, truncated once at the end.
pub fn platform_weight(store: &WorldStore, cfg: &ZoneConfig) -> Result<i64, WorldError> {
    let mut weighted = 0.0f64;
    for entity in store.list_entities()? {
        weighted += effective_fraction(&entity, cfg);
    }

    let connected = store.connected_citizen_count()? as f64;
    weighted += connected * cfg.player_body_weight;

    Ok(weighted as i64)
}

/// Recompute the platform weight and classify it in one query:
/// `(level, count, limit)`.
pub fn current_danger_level(
    store: &WorldStore,
    cfg: &ZoneConfig,
) -> Result<(crate::zone::danger::DangerLevel, i64, i64), WorldError> {
    let count = platform_weight(store, cfg)?;
    let (level, _) = crate::zone::danger::classify(count, cfg.item_limit);
    Ok((level, count, cfg.item_limit))
}

/// Items attributable to a citizen for enforcement purposes: carried
/// inventory plus everything on any shelf they have claimed.
pub fn citizen_item_count(store: &WorldStore, citizen_id: &str) -> Result<usize, WorldError> {
    let mut count = store.entities_held_by(citizen_id)?.len();
    for shelf in store.list_shelves()? {
        if shelf.owner.as_deref() == Some(citizen_id) {
            count += store.entities_on_shelf(&shelf.id)?.len();
        }
    }
    Ok(count)
}

/// Items sitting in rooms that still carry a last-holder tag -- stashed or
/// abandoned belongings rather than world fixtures.
pub fn stashed_item_count(store: &WorldStore) -> Result<usize, WorldError> {
    Ok(store
        .list_entities()?
        .iter()
        .filter(|e| e.last_holder.is_some() && matches!(e.location, EntityLocation::Room { .. }))
        .count())
}
