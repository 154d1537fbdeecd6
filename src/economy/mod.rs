//! The Zone 25 ash economy: the station pool, scarcity pricing, shop
//! counters, crafting, and the incinerator/itemator pair.

pub mod crafting;
pub mod fabricate;
pub mod incinerator;
pub mod pool;
pub mod pricing;
pub mod shop;

pub use crafting::{combine, CraftOutcome};
pub use fabricate::{spawn_material, StockKind};
pub use incinerator::{incinerate, itemator_spawn, BurnResult, SpawnResult, ITEMATOR_COST};
pub use pool::{credit_station_pool, debit_station_pool, get_station_pool};
pub use pricing::{
    get_buy_price, get_sell_price, item_category, scarcity_multiplier, shop_accepts_item,
    PriceCategory, SCARCITY_MAX, SCARCITY_MIN,
};
pub use shop::{buy, restock_all, restock_shop, sell, shop_stock, RestockReport, TradeResult};
