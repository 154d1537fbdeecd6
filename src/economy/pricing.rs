//! Item pricing: base price per category, modified by a scarcity multiplier
//! derived from how many items of that category exist on the platform.
//!
//! The multiplier is a continuous inverse proportion, not a tier table:
//! prices rise smoothly as a category empties out and fall smoothly as it
//! floods, bounded to a 12x total range.

use crate::config::ShopConfig;
use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;
use crate::world::types::{EntityRecord, ShopType};

pub const SCARCITY_MIN: f64 = 0.25;
pub const SCARCITY_MAX: f64 = 3.0;

/// Pricing category, decided by the first matching flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceCategory {
    Cursed,
    Artwork,
    Garment,
    Food,
    Book,
    Base,
}

/// Return the pricing category for an entity. Flag precedence matters:
/// a cursed artwork prices as cursed.
pub fn item_category(entity: &EntityRecord) -> PriceCategory {
    if entity.flags.cursed {
        PriceCategory::Cursed
    } else if entity.flags.artwork {
        PriceCategory::Artwork
    } else if entity.flags.garment {
        PriceCategory::Garment
    } else if entity.flags.edible {
        PriceCategory::Food
    } else if entity.flags.readable {
        PriceCategory::Book
    } else {
        PriceCategory::Base
    }
}

/// Expected population per category. At exactly this many live items the
/// scarcity modifier is 1.0; fewer pushes prices up (to 3x), more pushes
/// them down (to 0.25x).
pub fn scarcity_baseline(category: PriceCategory) -> usize {
    match category {
        PriceCategory::Cursed => 5,
        PriceCategory::Artwork => 10,
        PriceCategory::Garment => 20,
        PriceCategory::Food => 15,
        PriceCategory::Book => 15,
        PriceCategory::Base => 30,
    }
}

/// Count live items of a category across the whole world. The base category
/// is everything-else and too fuzzy to count meaningfully, so it reads as its
/// own baseline, pinning its multiplier at 1.0.
fn count_category(store: &WorldStore, category: PriceCategory) -> Result<usize, WorldError> {
    if category == PriceCategory::Base {
        return Ok(scarcity_baseline(PriceCategory::Base));
    }
    Ok(store
        .list_entities()?
        .iter()
        .filter(|e| item_category(e) == category)
        .count())
}

/// Return the price multiplier for a category: `baseline / count`, clamped
/// to `[SCARCITY_MIN, SCARCITY_MAX]`. An empty category reads as maximally
/// scarce.
pub fn scarcity_multiplier(
    store: &WorldStore,
    category: PriceCategory,
) -> Result<f64, WorldError> {
    let baseline = scarcity_baseline(category) as f64;
    let count = count_category(store, category)?;
    if count == 0 {
        return Ok(SCARCITY_MAX);
    }
    let raw = baseline / count as f64;
    Ok(raw.clamp(SCARCITY_MIN, SCARCITY_MAX))
}

fn base_buy_price(cfg: &ShopConfig, category: PriceCategory) -> i64 {
    match category {
        PriceCategory::Cursed => cfg.cursed_buy_price,
        PriceCategory::Artwork => cfg.masterpiece_price,
        PriceCategory::Garment => cfg.garment_price,
        PriceCategory::Food => cfg.food_price,
        PriceCategory::Book => cfg.book_price,
        PriceCategory::Base => cfg.base_price,
    }
}

/// Price for a player to BUY an item from a shop. Never below 1 ash.
pub fn get_buy_price(
    store: &WorldStore,
    cfg: &ShopConfig,
    entity: &EntityRecord,
) -> Result<i64, WorldError> {
    let category = item_category(entity);
    let mult = scarcity_multiplier(store, category)?;
    Ok(((base_buy_price(cfg, category) as f64 * mult) as i64).max(1))
}

/// Price the station pays a player for an item.
///
/// Non-cursed items sell at a strict markdown of the buy price, so the two
/// always move together. Cursed items invert: the station pays a scarcity-
/// adjusted premium to pull them out of circulation.
pub fn get_sell_price(
    store: &WorldStore,
    cfg: &ShopConfig,
    entity: &EntityRecord,
) -> Result<i64, WorldError> {
    let category = item_category(entity);
    if category == PriceCategory::Cursed {
        let mult = scarcity_multiplier(store, category)?;
        return Ok(((cfg.cursed_sell_price as f64 * mult) as i64).max(1));
    }
    let buy = get_buy_price(store, cfg, entity)?;
    Ok(((buy as f64 * cfg.sell_fraction) as i64).max(1))
}

/// Whether a shop of `shop_type` will buy `entity` from a player.
pub fn shop_accepts_item(shop_type: ShopType, entity: &EntityRecord) -> bool {
    let category = item_category(entity);
    let accepted: &[PriceCategory] = match shop_type {
        ShopType::Boutique => &[
            PriceCategory::Artwork,
            PriceCategory::Garment,
            PriceCategory::Base,
        ],
        ShopType::Food => &[PriceCategory::Food, PriceCategory::Base],
        ShopType::General => &[
            PriceCategory::Base,
            PriceCategory::Garment,
            PriceCategory::Book,
            PriceCategory::Artwork,
        ],
    };
    accepted.contains(&category)
}
