//! Shop counters: stock queries, buy/sell transactions routed through the
//! station pool, and the periodic restock sweep with stale-stock expiry.

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::Rng;

use crate::config::{ShopConfig, StationConfig};
use crate::economy::fabricate::{generate, shop_stock_table, weighted_choice};
use crate::economy::pool::{credit_station_pool, debit_station_pool};
use crate::economy::pricing::{get_buy_price, get_sell_price, shop_accepts_item};
use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;
use crate::world::types::{EntityLocation, EntityRecord, ShopRecord};

/// Outcome of a buy or sell. `Failed` means nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeResult {
    Bought {
        item_name: String,
        price: i64,
        balance: i64,
    },
    Sold {
        item_name: String,
        price: i64,
        balance: i64,
    },
    Failed {
        reason: String,
    },
}

/// Entities currently for sale on a counter.
pub fn shop_stock(store: &WorldStore, shop_id: &str) -> Result<Vec<EntityRecord>, WorldError> {
    Ok(store
        .entities_in_shop(shop_id)?
        .into_iter()
        .filter(|e| e.for_sale)
        .collect())
}

/// A player buys an item from a shop. The payment is credited to the station
/// pool, never minted.
pub fn buy(
    store: &WorldStore,
    shop_cfg: &ShopConfig,
    station_cfg: &StationConfig,
    citizen_id: &str,
    shop_id: &str,
    entity_id: &str,
) -> Result<TradeResult, WorldError> {
    let mut citizen = store.get_citizen(citizen_id)?;
    let mut entity = store.get_entity(entity_id)?;

    let on_this_counter = entity.location
        == (EntityLocation::Shop {
            shop: shop_id.to_string(),
        });
    if !on_this_counter || !entity.for_sale {
        return Ok(TradeResult::Failed {
            reason: format!("The shop doesn't have the {} for sale.", entity.name),
        });
    }

    let price = get_buy_price(store, shop_cfg, &entity)?;
    if citizen.ash < price {
        return Ok(TradeResult::Failed {
            reason: format!(
                "The {} costs {} ash but you only have {}.",
                entity.name, price, citizen.ash
            ),
        });
    }

    citizen.ash -= price;
    credit_station_pool(store, station_cfg, price)?;

    entity.for_sale = false;
    entity.listed_at = None;
    entity.location = EntityLocation::Citizen {
        citizen: citizen_id.to_string(),
    };
    entity.last_holder = Some(citizen_id.to_string());
    let name = entity.name.clone();
    let balance = citizen.ash;
    store.put_entity(entity)?;
    store.put_citizen(citizen)?;

    Ok(TradeResult::Bought {
        item_name: name,
        price,
        balance,
    })
}

/// A player sells a carried item to a shop. The payout is drawn down from the
/// station pool; if the coffers can't cover it, nothing moves.
pub fn sell(
    store: &WorldStore,
    shop_cfg: &ShopConfig,
    citizen_id: &str,
    shop_id: &str,
    entity_id: &str,
    now: DateTime<Utc>,
) -> Result<TradeResult, WorldError> {
    let mut citizen = store.get_citizen(citizen_id)?;
    let shop = store.get_shop(shop_id)?;
    let mut entity = store.get_entity(entity_id)?;

    if entity.location
        != (EntityLocation::Citizen {
            citizen: citizen_id.to_string(),
        })
    {
        return Ok(TradeResult::Failed {
            reason: format!("You aren't carrying the {}.", entity.name),
        });
    }
    if !shop_accepts_item(shop.shop_type, &entity) {
        return Ok(TradeResult::Failed {
            reason: "This shop doesn't deal in that kind of item.".to_string(),
        });
    }

    let price = get_sell_price(store, shop_cfg, &entity)?;
    if !debit_station_pool(store, price)? {
        return Ok(TradeResult::Failed {
            reason: "The station coffers are empty -- it can't afford to buy anything right now."
                .to_string(),
        });
    }

    citizen.ash += price;

    entity.for_sale = true;
    entity.listed_at = Some(now);
    entity.location = EntityLocation::Shop {
        shop: shop_id.to_string(),
    };
    let name = entity.name.clone();
    let balance = citizen.ash;
    store.put_entity(entity)?;
    store.put_citizen(citizen)?;

    Ok(TradeResult::Sold {
        item_name: name,
        price,
        balance,
    })
}

/// What a restock sweep did to one counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestockReport {
    pub expired: usize,
    pub stocked: usize,
}

/// Expire stale stock and top a counter back up. Items sit for sale for the
/// configured TTL before they are reclaimed.
pub fn restock_shop(
    store: &WorldStore,
    shop_cfg: &ShopConfig,
    masterpiece_fraction: f64,
    shop: &ShopRecord,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<RestockReport, WorldError> {
    let mut report = RestockReport::default();

    // Expire stale items before restocking.
    for entity in store.entities_in_shop(&shop.id)? {
        if !entity.for_sale {
            continue;
        }
        if let Some(listed) = entity.listed_at {
            if now.signed_duration_since(listed).num_seconds() > shop_cfg.item_ttl_secs {
                store.delete_entity(&entity.id)?;
                report.expired += 1;
            }
        }
    }

    let current = shop_stock(store, &shop.id)?.len();
    if current >= shop_cfg.max_inventory {
        return Ok(report);
    }
    let needed = shop_cfg
        .restock_count
        .min(shop_cfg.max_inventory - current);

    let table = shop_stock_table(shop.shop_type);
    for _ in 0..needed {
        let kind = weighted_choice(table, rng);
        let mut entity = generate(kind, &shop.room, masterpiece_fraction, rng);
        entity.for_sale = true;
        entity.listed_at = Some(now);
        entity.location = EntityLocation::Shop {
            shop: shop.id.clone(),
        };
        store.put_entity(entity)?;
        report.stocked += 1;
    }

    debug!(
        "restocked {}: {} expired, {} stocked",
        shop.name, report.expired, report.stocked
    );
    Ok(report)
}

/// Run the restock sweep over every counter.
pub fn restock_all(
    store: &WorldStore,
    shop_cfg: &ShopConfig,
    masterpiece_fraction: f64,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<RestockReport, WorldError> {
    let mut total = RestockReport::default();
    for shop in store.list_shops()? {
        let report = restock_shop(store, shop_cfg, masterpiece_fraction, &shop, now, rng)?;
        total.expired += report.expired;
        total.stocked += report.stocked;
    }
    if total.expired > 0 || total.stocked > 0 {
        info!(
            "shop restock sweep: {} expired, {} stocked",
            total.expired, total.stocked
        );
    }
    Ok(total)
}
