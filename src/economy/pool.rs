//! Station ash pool management.
//!
//! The pool is the single shared reserve every shop sale and hoarding fine
//! routes through: selling to the station drains it, fines and incineration
//! refill it. Money is neither created when the station pays out nor
//! destroyed when it collects.

use crate::config::StationConfig;
use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;

/// Return the station's current ash token reserve.
pub fn get_station_pool(store: &WorldStore) -> Result<i64, WorldError> {
    store.get_pool()
}

/// Add `amount` to the pool, clamped at the configured cap. Always succeeds;
/// overshoot is silently discarded. Negative amounts are ignored.
pub fn credit_station_pool(
    store: &WorldStore,
    cfg: &StationConfig,
    amount: i64,
) -> Result<i64, WorldError> {
    let current = store.get_pool()?;
    let next = (current + amount.max(0)).min(cfg.max_ash_pool);
    store.set_pool(next)?;
    Ok(next)
}

/// Subtract `amount` from the pool. All-or-nothing: returns `false` and
/// leaves the pool untouched if the reserve can't cover it.
pub fn debit_station_pool(store: &WorldStore, amount: i64) -> Result<bool, WorldError> {
    let current = store.get_pool()?;
    if current < amount {
        return Ok(false);
    }
    store.set_pool(current - amount)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::storage::WorldStoreBuilder;
    use tempfile::TempDir;

    fn store_with_pool(pool: i64) -> (TempDir, WorldStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = WorldStoreBuilder::new(dir.path())
            .with_initial_pool(pool)
            .open()
            .expect("store");
        (dir, store)
    }

    #[test]
    fn credit_clamps_at_cap() {
        let (_dir, store) = store_with_pool(0);
        let cfg = StationConfig::default();
        let value = credit_station_pool(&store, &cfg, 2500).unwrap();
        assert_eq!(value, 2000);
        assert_eq!(get_station_pool(&store).unwrap(), 2000);
    }

    #[test]
    fn debit_is_all_or_nothing() {
        let (_dir, store) = store_with_pool(0);
        assert!(!debit_station_pool(&store, 10).unwrap());
        assert_eq!(get_station_pool(&store).unwrap(), 0);

        let cfg = StationConfig::default();
        credit_station_pool(&store, &cfg, 100).unwrap();
        assert!(debit_station_pool(&store, 100).unwrap());
        assert_eq!(get_station_pool(&store).unwrap(), 0);
    }

    #[test]
    fn credit_then_debit_round_trips() {
        let (_dir, store) = store_with_pool(500);
        let cfg = StationConfig::default();
        credit_station_pool(&store, &cfg, 321).unwrap();
        assert!(debit_station_pool(&store, 321).unwrap());
        assert_eq!(get_station_pool(&store).unwrap(), 500);
    }

    #[test]
    fn negative_credit_is_ignored() {
        let (_dir, store) = store_with_pool(500);
        let cfg = StationConfig::default();
        let value = credit_station_pool(&store, &cfg, -50).unwrap();
        assert_eq!(value, 500);
    }
}
