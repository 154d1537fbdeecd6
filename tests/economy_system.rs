//! The ash economy as a closed loop: pool bounds, scarcity pricing, shop
//! transactions, incineration, and the itemator gate.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use zone25::config::{ShopConfig, StationConfig};
use zone25::economy::{
    buy, credit_station_pool, debit_station_pool, get_buy_price, get_sell_price, get_station_pool,
    incinerate, itemator_spawn, sell, BurnResult, SpawnResult, TradeResult,
};
use zone25::world::types::{CitizenRecord, EntityLocation, EntityRecord, ShopType};
use zone25::world::{WorldStore, WorldStoreBuilder};
use zone25::zone::DangerLevel;

fn open_store() -> (TempDir, WorldStore) {
    let dir = TempDir::new().expect("tempdir");
    let store = WorldStoreBuilder::new(dir.path()).open().expect("store");
    (dir, store)
}

fn citizen_with_ash(store: &WorldStore, name: &str, ash: i64) -> String {
    let mut record = CitizenRecord::new(name, "Fashion District");
    record.ash = ash;
    let id = record.id.clone();
    store.put_citizen(record).expect("citizen");
    id
}

fn carried(store: &WorldStore, citizen_id: &str, build: impl FnOnce(&mut EntityRecord)) -> String {
    let mut entity = EntityRecord::new("trade good", "x", "Fashion District");
    entity.location = EntityLocation::Citizen {
        citizen: citizen_id.to_string(),
    };
    build(&mut entity);
    let id = entity.id.clone();
    store.put_entity(entity).expect("entity");
    id
}

fn general_shop(store: &WorldStore) -> String {
    store
        .list_shops()
        .expect("shops")
        .into_iter()
        .find(|s| s.shop_type == ShopType::General)
        .expect("general store")
        .id
}

#[test]
fn pool_bounds_hold_at_both_ends() {
    let (_dir, store) = open_store();
    let station = StationConfig::default();

    store.set_pool(0).unwrap();
    assert!(!debit_station_pool(&store, 10).unwrap());
    assert_eq!(get_station_pool(&store).unwrap(), 0);

    credit_station_pool(&store, &station, 2500).unwrap();
    assert_eq!(get_station_pool(&store).unwrap(), 2000);
}

#[test]
fn sell_then_buy_conserves_total_ash() {
    let (_dir, store) = open_store();
    let shop_cfg = ShopConfig::default();
    let station = StationConfig::default();
    let alice = citizen_with_ash(&store, "Alice", 100);
    let shop = general_shop(&store);
    let item = carried(&store, &alice, |e| e.flags.garment = true);

    let total_before = store.get_pool().unwrap() + 100;

    let sold = sell(&store, &shop_cfg, &alice, &shop, &item, Utc::now()).unwrap();
    let TradeResult::Sold { price: sell_price, .. } = sold else {
        panic!("expected sale, got {:?}", sold);
    };

    let bought = buy(&store, &shop_cfg, &station, &alice, &shop, &item).unwrap();
    let TradeResult::Bought { price: buy_price, .. } = bought else {
        panic!("expected purchase, got {:?}", bought);
    };

    let citizen_after = store.get_citizen(&alice).unwrap().ash;
    let pool_after = store.get_pool().unwrap();
    assert_eq!(citizen_after + pool_after, total_before, "no ash minted or destroyed");
    assert!(sell_price <= buy_price, "the spread favors the station");
}

#[test]
fn scarcity_moves_prices_with_population() {
    let (_dir, store) = open_store();
    let cfg = ShopConfig::default();
    let sample = {
        let mut entity = EntityRecord::new("overcoat", "x", "Gallery");
        entity.flags.garment = true;
        entity
    };

    // Scarce garments: max multiplier, 12 * 3 = 36.
    let scarce_price = get_buy_price(&store, &cfg, &sample).unwrap();
    assert_eq!(scarce_price, 36);

    // Flood the market; the price collapses toward the floor multiplier.
    for i in 0..200 {
        let mut entity = EntityRecord::new(&format!("overcoat {}", i), "x", "Gallery");
        entity.flags.garment = true;
        store.put_entity(entity).unwrap();
    }
    let flooded_price = get_buy_price(&store, &cfg, &sample).unwrap();
    assert_eq!(flooded_price, 3, "12 * 0.25 at the clamp");
    assert!(flooded_price < scarce_price);

    let sell_price = get_sell_price(&store, &cfg, &sample).unwrap();
    assert_eq!(sell_price, 1, "floor(3 * 0.4) floors at 1");
}

#[test]
fn cursed_items_carry_an_inverted_premium() {
    let (_dir, store) = open_store();
    let shop_cfg = ShopConfig::default();
    let mut idol = EntityRecord::new("whispering idol", "x", "Gallery");
    idol.flags.cursed = true;
    store.put_entity(idol.clone()).unwrap();

    let buy_price = get_buy_price(&store, &shop_cfg, &idol).unwrap();
    let sell_price = get_sell_price(&store, &shop_cfg, &idol).unwrap();
    assert!(
        sell_price > buy_price,
        "the station pays a premium to retire cursed items ({} > {})",
        sell_price,
        buy_price
    );
}

#[test]
fn burning_pays_and_reclaims() {
    let (_dir, store) = open_store();
    let station = StationConfig::default();
    let alice = citizen_with_ash(&store, "Alice", 0);
    let art = carried(&store, &alice, |e| {
        e.flags.artwork = true;
        e.weight_fraction = 0.5;
    });

    let pool_before = store.get_pool().unwrap();
    let result = incinerate(&store, &station, &alice, &art).unwrap();
    let BurnResult::Burned { reward, balance, .. } = result else {
        panic!("expected burn, got {:?}", result);
    };
    assert_eq!(reward, 3);
    assert_eq!(balance, 3);
    assert_eq!(store.get_pool().unwrap(), pool_before + 3);
    assert!(!store.entity_exists(&art));
}

#[test]
fn itemator_cycle_mints_and_charges() {
    let (_dir, store) = open_store();
    let alice = citizen_with_ash(&store, "Alice", 2);
    let mut rng = StdRng::seed_from_u64(33);

    let first = itemator_spawn(&store, DangerLevel::Warning, 0.5, &alice, &mut rng).unwrap();
    assert!(matches!(first, SpawnResult::Spawned { .. }));
    let second = itemator_spawn(&store, DangerLevel::Critical, 0.5, &alice, &mut rng).unwrap();
    assert!(matches!(second, SpawnResult::Spawned { .. }));
    // Broke now.
    let third = itemator_spawn(&store, DangerLevel::Safe, 0.5, &alice, &mut rng).unwrap();
    assert!(matches!(third, SpawnResult::Refused { .. }));

    // And no level of wealth opens the itemators while sinking.
    let rich = citizen_with_ash(&store, "Bo", 1000);
    let refused = itemator_spawn(&store, DangerLevel::Sinking, 0.5, &rich, &mut rng).unwrap();
    assert!(matches!(refused, SpawnResult::Refused { .. }));
}
