use std::path::{Path, PathBuf};

use sled::IVec;

use crate::world::errors::WorldError;
use crate::world::types::{
    CitizenRecord, EntityLocation, EntityRecord, EnforcementRun, InvestigationCase, ShelfRecord,
    ShopRecord, ShopType, CASE_SCHEMA_VERSION, CITIZEN_SCHEMA_VERSION, ENTITY_SCHEMA_VERSION,
    RUN_SCHEMA_VERSION, SHELF_SCHEMA_VERSION, SHOP_SCHEMA_VERSION,
};

const TREE_PRIMARY: &str = "zone25";
const TREE_ENTITIES: &str = "zone25_entities";
const TREE_ENFORCEMENT: &str = "zone25_enforcement";
const TREE_META: &str = "zone25_meta";

const KEY_POOL: &[u8] = b"meta:station_ash_pool";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct WorldStoreBuilder {
    path: PathBuf,
    ensure_world_seed: bool,
    initial_pool: i64,
}

impl WorldStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ensure_world_seed: true,
            initial_pool: 500,
        }
    }

    /// Opt out of seeding the canonical fixtures during initialization
    /// (useful for targeted tests).
    pub fn without_world_seed(mut self) -> Self {
        self.ensure_world_seed = false;
        self
    }

    /// Override the pool value seeded into a fresh world.
    pub fn with_initial_pool(mut self, pool: i64) -> Self {
        self.initial_pool = pool;
        self
    }

    pub fn open(self) -> Result<WorldStore, WorldError> {
        WorldStore::open_with_options(self.path, self.ensure_world_seed, self.initial_pool)
    }
}

/// Sled-backed persistence for the Zone 25 world: citizens, entities, shop
/// and shelf fixtures, the station ash pool, and live enforcement state.
pub struct WorldStore {
    _db: sled::Db,
    primary: sled::Tree,
    entities: sled::Tree,
    enforcement: sled::Tree,
    meta: sled::Tree,
}

impl WorldStore {
    /// Open (or create) the world store rooted at `path`. The canonical shop
    /// counters and display shelves are seeded if no fixtures exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, WorldError> {
        Self::open_with_options(path, true, 500)
    }

    fn open_with_options<P: AsRef<Path>>(
        path: P,
        seed_world: bool,
        initial_pool: i64,
    ) -> Result<Self, WorldError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let primary = db.open_tree(TREE_PRIMARY)?;
        let entities = db.open_tree(TREE_ENTITIES)?;
        let enforcement = db.open_tree(TREE_ENFORCEMENT)?;
        let meta = db.open_tree(TREE_META)?;
        let store = Self {
            _db: db,
            primary,
            entities,
            enforcement,
            meta,
        };

        if seed_world {
            store.seed_world_if_needed(initial_pool)?;
        }

        Ok(store)
    }

    fn citizen_key(id: &str) -> Vec<u8> {
        format!("citizens:{}", id).into_bytes()
    }

    fn shelf_key(id: &str) -> Vec<u8> {
        format!("shelves:{}", id).into_bytes()
    }

    fn shop_key(id: &str) -> Vec<u8> {
        format!("shops:{}", id).into_bytes()
    }

    fn entity_key(id: &str) -> Vec<u8> {
        format!("entities:{}", id).into_bytes()
    }

    fn case_key(id: &str) -> Vec<u8> {
        format!("cases:{}", id).into_bytes()
    }

    fn run_key(id: &str) -> Vec<u8> {
        format!("runs:{}", id).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, WorldError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, WorldError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    // ------------------------------------------------------------------
    // Citizens
    // ------------------------------------------------------------------

    /// Insert or update a citizen record.
    pub fn put_citizen(&self, mut citizen: CitizenRecord) -> Result<(), WorldError> {
        citizen.schema_version = CITIZEN_SCHEMA_VERSION;
        let key = Self::citizen_key(&citizen.id);
        let bytes = Self::serialize(&citizen)?;
        self.primary.insert(key, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    /// Fetch a citizen record by id.
    pub fn get_citizen(&self, id: &str) -> Result<CitizenRecord, WorldError> {
        let key = Self::citizen_key(id);
        let Some(bytes) = self.primary.get(&key)? else {
            return Err(WorldError::NotFound(format!("citizen: {}", id)));
        };
        let record: CitizenRecord = Self::deserialize(bytes)?;
        if record.schema_version != CITIZEN_SCHEMA_VERSION {
            return Err(WorldError::SchemaMismatch {
                entity: "citizen",
                expected: CITIZEN_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Existence check for weak references held in enforcement state.
    pub fn citizen_exists(&self, id: &str) -> bool {
        self.primary
            .contains_key(Self::citizen_key(id))
            .unwrap_or(false)
    }

    /// Remove a citizen. Their carried entities are left in place and become
    /// dangling references resolved by the fail-soft checks.
    pub fn delete_citizen(&self, id: &str) -> Result<(), WorldError> {
        self.primary.remove(Self::citizen_key(id))?;
        self.primary.flush()?;
        Ok(())
    }

    pub fn list_citizens(&self) -> Result<Vec<CitizenRecord>, WorldError> {
        let mut citizens = Vec::new();
        for entry in self.primary.scan_prefix(b"citizens:") {
            let (_, bytes) = entry?;
            citizens.push(Self::deserialize(bytes)?);
        }
        Ok(citizens)
    }

    /// Number of citizens with a connected player body.
    pub fn connected_citizen_count(&self) -> Result<usize, WorldError> {
        Ok(self.list_citizens()?.iter().filter(|c| c.connected).count())
    }

    /// Case-insensitive name lookup, for command layers sitting above this
    /// crate. Returns the first match.
    pub fn find_citizen_by_name(&self, name: &str) -> Result<Option<CitizenRecord>, WorldError> {
        let needle = name.to_ascii_lowercase();
        Ok(self
            .list_citizens()?
            .into_iter()
            .find(|c| c.name.to_ascii_lowercase() == needle))
    }

    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------

    /// Insert or update an entity record.
    pub fn put_entity(&self, mut entity: EntityRecord) -> Result<(), WorldError> {
        entity.schema_version = ENTITY_SCHEMA_VERSION;
        let key = Self::entity_key(&entity.id);
        let bytes = Self::serialize(&entity)?;
        self.entities.insert(key, bytes)?;
        self.entities.flush()?;
        Ok(())
    }

    pub fn get_entity(&self, id: &str) -> Result<EntityRecord, WorldError> {
        let key = Self::entity_key(id);
        let Some(bytes) = self.entities.get(&key)? else {
            return Err(WorldError::NotFound(format!("entity: {}", id)));
        };
        let record: EntityRecord = Self::deserialize(bytes)?;
        if record.schema_version != ENTITY_SCHEMA_VERSION {
            return Err(WorldError::SchemaMismatch {
                entity: "entity",
                expected: ENTITY_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    pub fn entity_exists(&self, id: &str) -> bool {
        self.entities
            .contains_key(Self::entity_key(id))
            .unwrap_or(false)
    }

    /// Destroy an entity (incineration, eating, enforcement).
    pub fn delete_entity(&self, id: &str) -> Result<(), WorldError> {
        self.entities.remove(Self::entity_key(id))?;
        self.entities.flush()?;
        Ok(())
    }

    /// Full snapshot of every entity in the world. Population counts for the
    /// weight model and scarcity pricing run over this at minute cadence, so
    /// the linear scan is fine.
    pub fn list_entities(&self) -> Result<Vec<EntityRecord>, WorldError> {
        let mut out = Vec::new();
        for entry in self.entities.scan_prefix(b"entities:") {
            let (_, bytes) = entry?;
            out.push(Self::deserialize(bytes)?);
        }
        Ok(out)
    }

    /// Entities carried by a citizen.
    pub fn entities_held_by(&self, citizen_id: &str) -> Result<Vec<EntityRecord>, WorldError> {
        Ok(self
            .list_entities()?
            .into_iter()
            .filter(|e| {
                e.location
                    == EntityLocation::Citizen {
                        citizen: citizen_id.to_string(),
                    }
            })
            .collect())
    }

    /// Entities sitting on a display shelf.
    pub fn entities_on_shelf(&self, shelf_id: &str) -> Result<Vec<EntityRecord>, WorldError> {
        Ok(self
            .list_entities()?
            .into_iter()
            .filter(|e| {
                e.location
                    == EntityLocation::Shelf {
                        shelf: shelf_id.to_string(),
                    }
            })
            .collect())
    }

    /// Entities on a shop counter.
    pub fn entities_in_shop(&self, shop_id: &str) -> Result<Vec<EntityRecord>, WorldError> {
        Ok(self
            .list_entities()?
            .into_iter()
            .filter(|e| {
                e.location
                    == EntityLocation::Shop {
                        shop: shop_id.to_string(),
                    }
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Shelves and shops
    // ------------------------------------------------------------------

    pub fn put_shelf(&self, mut shelf: ShelfRecord) -> Result<(), WorldError> {
        shelf.schema_version = SHELF_SCHEMA_VERSION;
        let key = Self::shelf_key(&shelf.id);
        let bytes = Self::serialize(&shelf)?;
        self.primary.insert(key, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    pub fn get_shelf(&self, id: &str) -> Result<ShelfRecord, WorldError> {
        let key = Self::shelf_key(id);
        let Some(bytes) = self.primary.get(&key)? else {
            return Err(WorldError::NotFound(format!("shelf: {}", id)));
        };
        Ok(Self::deserialize(bytes)?)
    }

    pub fn list_shelves(&self) -> Result<Vec<ShelfRecord>, WorldError> {
        let mut shelves = Vec::new();
        for entry in self.primary.scan_prefix(b"shelves:") {
            let (_, bytes) = entry?;
            shelves.push(Self::deserialize(bytes)?);
        }
        Ok(shelves)
    }

    pub fn put_shop(&self, mut shop: ShopRecord) -> Result<(), WorldError> {
        shop.schema_version = SHOP_SCHEMA_VERSION;
        let key = Self::shop_key(&shop.id);
        let bytes = Self::serialize(&shop)?;
        self.primary.insert(key, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    pub fn get_shop(&self, id: &str) -> Result<ShopRecord, WorldError> {
        let key = Self::shop_key(id);
        let Some(bytes) = self.primary.get(&key)? else {
            return Err(WorldError::NotFound(format!("shop: {}", id)));
        };
        Ok(Self::deserialize(bytes)?)
    }

    pub fn list_shops(&self) -> Result<Vec<ShopRecord>, WorldError> {
        let mut shops = Vec::new();
        for entry in self.primary.scan_prefix(b"shops:") {
            let (_, bytes) = entry?;
            shops.push(Self::deserialize(bytes)?);
        }
        Ok(shops)
    }

    // ------------------------------------------------------------------
    // Enforcement state
    // ------------------------------------------------------------------

    pub fn put_case(&self, mut case: InvestigationCase) -> Result<(), WorldError> {
        case.schema_version = CASE_SCHEMA_VERSION;
        let key = Self::case_key(&case.id);
        let bytes = Self::serialize(&case)?;
        self.enforcement.insert(key, bytes)?;
        self.enforcement.flush()?;
        Ok(())
    }

    /// Removing a case is cancellation: the tick loop only ever sees stored
    /// cases, so a removed case can never fire again.
    pub fn delete_case(&self, id: &str) -> Result<(), WorldError> {
        self.enforcement.remove(Self::case_key(id))?;
        self.enforcement.flush()?;
        Ok(())
    }

    pub fn list_cases(&self) -> Result<Vec<InvestigationCase>, WorldError> {
        let mut cases = Vec::new();
        for entry in self.enforcement.scan_prefix(b"cases:") {
            let (_, bytes) = entry?;
            cases.push(Self::deserialize(bytes)?);
        }
        Ok(cases)
    }

    /// The open case against a citizen, if any. At most one exists per target.
    pub fn case_for_target(&self, target: &str) -> Result<Option<InvestigationCase>, WorldError> {
        Ok(self
            .list_cases()?
            .into_iter()
            .find(|case| case.target == target))
    }

    pub fn put_run(&self, mut run: EnforcementRun) -> Result<(), WorldError> {
        run.schema_version = RUN_SCHEMA_VERSION;
        let key = Self::run_key(&run.id);
        let bytes = Self::serialize(&run)?;
        self.enforcement.insert(key, bytes)?;
        self.enforcement.flush()?;
        Ok(())
    }

    pub fn delete_run(&self, id: &str) -> Result<(), WorldError> {
        self.enforcement.remove(Self::run_key(id))?;
        self.enforcement.flush()?;
        Ok(())
    }

    pub fn list_runs(&self) -> Result<Vec<EnforcementRun>, WorldError> {
        let mut runs = Vec::new();
        for entry in self.enforcement.scan_prefix(b"runs:") {
            let (_, bytes) = entry?;
            runs.push(Self::deserialize(bytes)?);
        }
        Ok(runs)
    }

    // ------------------------------------------------------------------
    // Station pool
    // ------------------------------------------------------------------

    /// Current station ash reserve. A missing value reads as 0.
    pub fn get_pool(&self) -> Result<i64, WorldError> {
        match self.meta.get(KEY_POOL)? {
            Some(bytes) => Self::deserialize(bytes),
            None => Ok(0),
        }
    }

    pub fn set_pool(&self, value: i64) -> Result<(), WorldError> {
        let bytes = Self::serialize(&value)?;
        self.meta.insert(KEY_POOL, bytes)?;
        self.meta.flush()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------

    /// Seed the canonical fixtures into an empty world: the three shop
    /// counters, two display shelves, and the initial ash pool. Idempotent.
    pub fn seed_world_if_needed(&self, initial_pool: i64) -> Result<usize, WorldError> {
        if self.primary.scan_prefix(b"shops:").next().is_some() {
            return Ok(0);
        }

        let mut inserted = 0usize;
        let shops = [
            ShopRecord::new("the Gallery Boutique", "Gallery", ShopType::Boutique),
            ShopRecord::new("the Specialty Food Market", "Gourmand Shop", ShopType::Food),
            ShopRecord::new("the Trading Post", "Fashion District", ShopType::General),
        ];
        for shop in shops {
            self.put_shop(shop)?;
            inserted += 1;
        }

        let shelves = [
            ShelfRecord::new("gallery display shelf", "Gallery"),
            ShelfRecord::new("promenade display shelf", "Fashion District"),
        ];
        for shelf in shelves {
            self.put_shelf(shelf)?;
            inserted += 1;
        }

        if self.meta.get(KEY_POOL)?.is_none() {
            self.set_pool(initial_pool)?;
        }

        Ok(inserted)
    }
}
