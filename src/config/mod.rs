//! # Configuration Management Module
//!
//! All tunables for the Zone 25 economy core live here: weight fractions and
//! the platform item limit, station pool bounds, shop prices and restock
//! cadence, and the hoarding-enforcement schedule.
//!
//! Every field carries a serde default, so a partial (or missing) section in
//! `config.toml` falls back to the built-in value rather than failing the
//! load. The defaults are the values the platform has always shipped with.
//!
//! ## Configuration File Format
//!
//! ```toml
//! [zone]
//! item_limit = 1000
//! player_body_weight = 5.0
//!
//! [station]
//! initial_ash_pool = 500
//! max_ash_pool = 2000
//!
//! [enforcement]
//! minor_threshold = 10
//! major_threshold = 20
//! fine_schedule = [5, 15, 0]
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Platform weight and danger-level tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Weighted item count at which the platform starts sinking.
    #[serde(default = "default_item_limit")]
    pub item_limit: i64,
    /// Weight units contributed by each connected player body.
    #[serde(default = "default_player_body_weight")]
    pub player_body_weight: f64,
    /// Fractional weight of raw materials.
    #[serde(default = "default_material_fraction")]
    pub material_weight_fraction: f64,
    /// Multiplier applied to an entity's weight while on a display shelf.
    #[serde(default = "default_display_fraction")]
    pub display_weight_fraction: f64,
    /// Fractional weight of masterpieces (artwork).
    #[serde(default = "default_masterpiece_fraction")]
    pub masterpiece_weight_fraction: f64,
    /// Seconds between platform monitor ticks.
    #[serde(default = "default_monitor_interval")]
    pub monitor_interval_secs: u64,
}

fn default_item_limit() -> i64 {
    1000
}
fn default_player_body_weight() -> f64 {
    5.0
}
fn default_material_fraction() -> f64 {
    0.33
}
fn default_display_fraction() -> f64 {
    0.5
}
fn default_masterpiece_fraction() -> f64 {
    0.5
}
fn default_monitor_interval() -> u64 {
    180
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            item_limit: default_item_limit(),
            player_body_weight: default_player_body_weight(),
            material_weight_fraction: default_material_fraction(),
            display_weight_fraction: default_display_fraction(),
            masterpiece_weight_fraction: default_masterpiece_fraction(),
            monitor_interval_secs: default_monitor_interval(),
        }
    }
}

/// Station ash pool tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// Pool value seeded into a fresh world.
    #[serde(default = "default_initial_pool")]
    pub initial_ash_pool: i64,
    /// Hard cap; credits beyond this are silently clamped.
    #[serde(default = "default_max_pool")]
    pub max_ash_pool: i64,
    /// Ash added to the pool on each monitor tick (passive reclamation).
    #[serde(default = "default_recharge")]
    pub ash_recharge: i64,
}

fn default_initial_pool() -> i64 {
    500
}
fn default_max_pool() -> i64 {
    2000
}
fn default_recharge() -> i64 {
    5
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            initial_ash_pool: default_initial_pool(),
            max_ash_pool: default_max_pool(),
            ash_recharge: default_recharge(),
        }
    }
}

/// Shop pricing and restock tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default = "default_base_price")]
    pub base_price: i64,
    #[serde(default = "default_garment_price")]
    pub garment_price: i64,
    #[serde(default = "default_masterpiece_price")]
    pub masterpiece_price: i64,
    #[serde(default = "default_food_price")]
    pub food_price: i64,
    #[serde(default = "default_book_price")]
    pub book_price: i64,
    /// What a shop charges for a cursed item. Deliberately cheap.
    #[serde(default = "default_cursed_buy_price")]
    pub cursed_buy_price: i64,
    /// What the station pays for a cursed item; a premium to pull them out
    /// of circulation.
    #[serde(default = "default_cursed_sell_price")]
    pub cursed_sell_price: i64,
    /// Sell price as a fraction of buy price for non-cursed items.
    #[serde(default = "default_sell_fraction")]
    pub sell_fraction: f64,
    /// Seconds between restock sweeps.
    #[serde(default = "default_restock_interval")]
    pub restock_interval_secs: u64,
    /// Maximum items a counter keeps for sale.
    #[serde(default = "default_max_inventory")]
    pub max_inventory: usize,
    /// Items generated per restock, up to the inventory cap.
    #[serde(default = "default_restock_count")]
    pub restock_count: usize,
    /// Seconds before unsold stock expires.
    #[serde(default = "default_item_ttl")]
    pub item_ttl_secs: i64,
}

fn default_base_price() -> i64 {
    5
}
fn default_garment_price() -> i64 {
    12
}
fn default_masterpiece_price() -> i64 {
    50
}
fn default_food_price() -> i64 {
    4
}
fn default_book_price() -> i64 {
    4
}
fn default_cursed_buy_price() -> i64 {
    2
}
fn default_cursed_sell_price() -> i64 {
    4
}
fn default_sell_fraction() -> f64 {
    0.4
}
fn default_restock_interval() -> u64 {
    600
}
fn default_max_inventory() -> usize {
    8
}
fn default_restock_count() -> usize {
    3
}
fn default_item_ttl() -> i64 {
    3600
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            base_price: default_base_price(),
            garment_price: default_garment_price(),
            masterpiece_price: default_masterpiece_price(),
            food_price: default_food_price(),
            book_price: default_book_price(),
            cursed_buy_price: default_cursed_buy_price(),
            cursed_sell_price: default_cursed_sell_price(),
            sell_fraction: default_sell_fraction(),
            restock_interval_secs: default_restock_interval(),
            max_inventory: default_max_inventory(),
            restock_count: default_restock_count(),
            item_ttl_secs: default_item_ttl(),
        }
    }
}

/// Hoarding thresholds, fine schedule, and enforcement cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementConfig {
    /// Item count at which reports start drawing fines.
    #[serde(default = "default_minor_threshold")]
    pub minor_threshold: usize,
    /// Item count at which a report opens an investigation immediately.
    #[serde(default = "default_major_threshold")]
    pub major_threshold: usize,
    /// Ash fines per offense. A 0 entry means "escalate to investigation",
    /// not "fine zero ash".
    #[serde(default = "default_fine_schedule")]
    pub fine_schedule: Vec<i64>,
    /// Investigation length in ticks.
    #[serde(default = "default_investigation_ticks")]
    pub investigation_ticks: u32,
    /// Seconds per investigation tick.
    #[serde(default = "default_investigation_interval")]
    pub investigation_interval_secs: u64,
    /// Ticks removed per additional distinct reporter.
    #[serde(default = "default_speedup")]
    pub speedup_per_report: u32,
    /// Ash split among reporters when enforcement completes.
    #[serde(default = "default_reward")]
    pub reward: i64,
    /// The punished citizen's balance is set to exactly minus this value.
    #[serde(default = "default_debt")]
    pub debt: i64,
    /// Seconds per enforcement phase.
    #[serde(default = "default_enforcement_interval")]
    pub enforcement_interval_secs: u64,
    /// Room the punished citizen respawns in.
    #[serde(default = "default_safe_location")]
    pub safe_location: String,
    /// Room holding the incinerator; enforcement escorts end here.
    #[serde(default = "default_temple_location")]
    pub temple_location: String,
}

fn default_minor_threshold() -> usize {
    10
}
fn default_major_threshold() -> usize {
    20
}
fn default_fine_schedule() -> Vec<i64> {
    vec![5, 15, 0]
}
fn default_investigation_ticks() -> u32 {
    5
}
fn default_investigation_interval() -> u64 {
    60
}
fn default_speedup() -> u32 {
    1
}
fn default_reward() -> i64 {
    25
}
fn default_debt() -> i64 {
    50
}
fn default_enforcement_interval() -> u64 {
    10
}
fn default_safe_location() -> String {
    "Welcome area".to_string()
}
fn default_temple_location() -> String {
    "KonMarie Temple".to_string()
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            minor_threshold: default_minor_threshold(),
            major_threshold: default_major_threshold(),
            fine_schedule: default_fine_schedule(),
            investigation_ticks: default_investigation_ticks(),
            investigation_interval_secs: default_investigation_interval(),
            speedup_per_report: default_speedup(),
            reward: default_reward(),
            debt: default_debt(),
            enforcement_interval_secs: default_enforcement_interval(),
            safe_location: default_safe_location(),
            temple_location: default_temple_location(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    "data/zone25".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub zone: ZoneConfig,
    #[serde(default)]
    pub station: StationConfig,
    #[serde(default)]
    pub shops: ShopConfig,
    #[serde(default)]
    pub enforcement: EnforcementConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Sanity-check values that would make the economy degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.zone.item_limit <= 0 {
            return Err(anyhow!("zone.item_limit must be positive"));
        }
        if self.station.max_ash_pool < self.station.initial_ash_pool {
            return Err(anyhow!(
                "station.max_ash_pool must be >= station.initial_ash_pool"
            ));
        }
        if !(0.0..=1.0).contains(&self.shops.sell_fraction) {
            return Err(anyhow!("shops.sell_fraction must be in [0, 1]"));
        }
        if self.enforcement.minor_threshold > self.enforcement.major_threshold {
            return Err(anyhow!(
                "enforcement.minor_threshold must be <= major_threshold"
            ));
        }
        if self.enforcement.fine_schedule.is_empty() {
            return Err(anyhow!("enforcement.fine_schedule must not be empty"));
        }
        Ok(())
    }
}
