//! The restock scheduler: periodic top-up, TTL expiry, and the inventory cap,
//! swept across every counter at once.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use zone25::config::ShopConfig;
use zone25::economy::{restock_all, shop_stock};
use zone25::world::WorldStoreBuilder;

#[test]
fn sweep_fills_every_counter() {
    let dir = TempDir::new().expect("tempdir");
    let store = WorldStoreBuilder::new(dir.path()).open().expect("store");
    let cfg = ShopConfig::default();
    let mut rng = StdRng::seed_from_u64(41);
    let now = Utc::now();

    let report = restock_all(&store, &cfg, 0.5, now, &mut rng).unwrap();
    assert_eq!(report.stocked, cfg.restock_count * 3, "three counters");
    for shop in store.list_shops().unwrap() {
        let stock = shop_stock(&store, &shop.id).unwrap();
        assert_eq!(stock.len(), cfg.restock_count);
        assert!(stock.iter().all(|e| e.for_sale));
    }
}

#[test]
fn repeated_sweeps_stop_at_the_cap() {
    let dir = TempDir::new().expect("tempdir");
    let store = WorldStoreBuilder::new(dir.path()).open().expect("store");
    let cfg = ShopConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    let now = Utc::now();

    for _ in 0..5 {
        restock_all(&store, &cfg, 0.5, now, &mut rng).unwrap();
    }
    for shop in store.list_shops().unwrap() {
        let stock = shop_stock(&store, &shop.id).unwrap();
        assert!(stock.len() <= cfg.max_inventory);
    }
}

#[test]
fn stale_stock_expires_and_is_replaced() {
    let dir = TempDir::new().expect("tempdir");
    let store = WorldStoreBuilder::new(dir.path()).open().expect("store");
    let cfg = ShopConfig::default();
    let mut rng = StdRng::seed_from_u64(43);
    let now = Utc::now();

    restock_all(&store, &cfg, 0.5, now, &mut rng).unwrap();
    let entity_count_before = store.list_entities().unwrap().len();

    let later = now + Duration::seconds(cfg.item_ttl_secs + 1);
    let report = restock_all(&store, &cfg, 0.5, later, &mut rng).unwrap();
    assert_eq!(report.expired, entity_count_before, "all first-wave stock aged out");
    assert_eq!(report.stocked, report.expired, "replaced one for one");
    // Expired stock is destroyed, not leaked into the world.
    assert_eq!(store.list_entities().unwrap().len(), entity_count_before);
}

#[test]
fn fresh_stock_survives_a_sweep() {
    let dir = TempDir::new().expect("tempdir");
    let store = WorldStoreBuilder::new(dir.path()).open().expect("store");
    let cfg = ShopConfig::default();
    let mut rng = StdRng::seed_from_u64(44);
    let now = Utc::now();

    restock_all(&store, &cfg, 0.5, now, &mut rng).unwrap();
    let shop = &store.list_shops().unwrap()[0];
    let ids_before: Vec<String> = shop_stock(&store, &shop.id)
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();

    // Half the TTL later, nothing has aged out.
    let later = now + Duration::seconds(cfg.item_ttl_secs / 2);
    let report = restock_all(&store, &cfg, 0.5, later, &mut rng).unwrap();
    assert_eq!(report.expired, 0);
    let ids_after: Vec<String> = shop_stock(&store, &shop.id)
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    for id in ids_before {
        assert!(ids_after.contains(&id));
    }
}
