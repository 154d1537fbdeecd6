use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CITIZEN_SCHEMA_VERSION: u8 = 1;
pub const ENTITY_SCHEMA_VERSION: u8 = 1;
pub const SHELF_SCHEMA_VERSION: u8 = 1;
pub const SHOP_SCHEMA_VERSION: u8 = 1;
pub const CASE_SCHEMA_VERSION: u8 = 1;
pub const RUN_SCHEMA_VERSION: u8 = 1;

/// Default capacity of a display shelf.
pub const SHELF_CAPACITY: u32 = 5;

/// Where an entity currently sits. Rooms are referenced by name only; the
/// command/navigation layer that gives them structure lives outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityLocation {
    Room { room: String },
    Citizen { citizen: String },
    Shelf { shelf: String },
    Shop { shop: String },
}

/// Independent category flags. These are deliberately NOT an enum: an entity
/// can be a cursed artwork, or an edible material, and the weight and pricing
/// rules each pick the flags they care about.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityFlags {
    #[serde(default)]
    pub material: bool,
    #[serde(default)]
    pub artwork: bool,
    #[serde(default)]
    pub cursed: bool,
    #[serde(default)]
    pub edible: bool,
    #[serde(default)]
    pub readable: bool,
    #[serde(default)]
    pub garment: bool,
}

/// A countable object on the platform. Rooms, exits, characters, shelf
/// fixtures and enforcement robots are not entities and never carry weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub flags: EntityFlags,
    /// Effective weight contribution relative to a plain item (1.0).
    /// Masterpieces start at the masterpiece fraction; shelving multiplies
    /// this further (see `world::shelf`).
    pub weight_fraction: f64,
    /// True while the entity sits on a display shelf.
    pub displayed: bool,
    /// Fraction before the shelf override, restored on retrieval.
    pub original_weight_fraction: Option<f64>,
    pub location: EntityLocation,
    /// Last citizen to hold this entity. An entity in a room with a
    /// last_holder is "stashed", not unowned.
    pub last_holder: Option<String>,
    /// Crafting station this material came from, if it is a material.
    pub station: Option<String>,
    /// Flavor words woven into crafted-item descriptions.
    #[serde(default)]
    pub flavor_words: Vec<String>,
    pub for_sale: bool,
    pub listed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl EntityRecord {
    /// Create a plain entity in a room.
    pub fn new(name: &str, description: &str, room: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            flags: EntityFlags::default(),
            weight_fraction: 1.0,
            displayed: false,
            original_weight_fraction: None,
            location: EntityLocation::Room {
                room: room.to_string(),
            },
            last_holder: None,
            station: None,
            flavor_words: Vec::new(),
            for_sale: false,
            listed_at: None,
            created_at: Utc::now(),
            schema_version: ENTITY_SCHEMA_VERSION,
        }
    }
}

/// A player character's economy-relevant state. Inventory is derived by
/// querying entity locations, never stored inline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitizenRecord {
    pub id: String,
    pub name: String,
    /// Ash token balance. May go negative as a debt.
    pub ash: i64,
    /// Hoarding offense counter; resets when enforcement completes.
    pub offenses: u32,
    pub under_investigation: bool,
    /// Whether a player body is currently connected to this citizen.
    pub connected: bool,
    pub claimed_shelf: Option<String>,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl CitizenRecord {
    pub fn new(name: &str, location: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            ash: 0,
            offenses: 0,
            under_investigation: false,
            connected: false,
            claimed_shelf: None,
            location: location.to_string(),
            created_at: Utc::now(),
            schema_version: CITIZEN_SCHEMA_VERSION,
        }
    }
}

/// A display shelf fixture. At most one citizen may hold the claim at a time;
/// the claim is released explicitly, never expired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShelfRecord {
    pub id: String,
    pub name: String,
    pub room: String,
    pub capacity: u32,
    pub owner: Option<String>,
    pub schema_version: u8,
}

impl ShelfRecord {
    pub fn new(name: &str, room: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            room: room.to_string(),
            capacity: SHELF_CAPACITY,
            owner: None,
            schema_version: SHELF_SCHEMA_VERSION,
        }
    }
}

/// The three shop counters on the platform, distinguished by what they stock
/// and which item categories they will buy back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShopType {
    Boutique,
    Food,
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopRecord {
    pub id: String,
    pub name: String,
    pub room: String,
    pub shop_type: ShopType,
    pub schema_version: u8,
}

impl ShopRecord {
    pub fn new(name: &str, room: &str, shop_type: ShopType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            room: room.to_string(),
            shop_type,
            schema_version: SHOP_SCHEMA_VERSION,
        }
    }
}

/// An open hoarding investigation against one citizen. Ticks down once per
/// investigation interval; additional distinct reporters shave ticks off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvestigationCase {
    pub id: String,
    /// Weak reference: the target may be deleted mid-case. Consumers check
    /// existence before use and invalidate the case otherwise.
    pub target: String,
    pub ticks_remaining: u32,
    pub total_ticks: u32,
    pub reporters: Vec<String>,
    pub opened_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl InvestigationCase {
    pub fn new(target: &str, reporter: &str, total_ticks: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            target: target.to_string(),
            ticks_remaining: total_ticks,
            total_ticks,
            reporters: vec![reporter.to_string()],
            opened_at: Utc::now(),
            schema_version: CASE_SCHEMA_VERSION,
        }
    }
}

/// Phases of a security-unit enforcement action, advanced one per tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementPhase {
    Announce,
    Move,
    Seize,
    Escort,
    Execute,
    Cleanup,
}

/// A live enforcement action: one security unit working one offender through
/// the phase sequence. Created when an investigation resolves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnforcementRun {
    pub id: String,
    pub target: String,
    pub reporters: Vec<String>,
    pub phase: EnforcementPhase,
    /// Display name of the security unit for messaging.
    pub unit_name: String,
    pub schema_version: u8,
}

impl EnforcementRun {
    pub fn new(target: &str, reporters: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            target: target.to_string(),
            reporters,
            phase: EnforcementPhase::Announce,
            unit_name: "Security Unit Z25-09".to_string(),
            schema_version: RUN_SCHEMA_VERSION,
        }
    }
}
