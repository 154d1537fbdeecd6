//! Display shelf operations: claiming, releasing, showcasing and retrieving
//! items. Shelved items count at reduced weight toward the platform total but
//! still count toward their owner's hoarding total.

use crate::world::errors::WorldError;
use crate::world::storage::WorldStore;
use crate::world::types::EntityLocation;

/// Outcome of a shelf operation. `Failed` means nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShelfResult {
    Claimed { shelf_name: String },
    Released { shelf_name: String },
    Displayed { item_name: String },
    Retrieved { item_name: String },
    Failed { reason: String },
}

/// Claim an unclaimed shelf. The claim is exclusive and held until released;
/// a citizen holds at most one claim at a time.
pub fn claim_shelf(
    store: &WorldStore,
    citizen_id: &str,
    shelf_id: &str,
) -> Result<ShelfResult, WorldError> {
    let mut citizen = store.get_citizen(citizen_id)?;
    let mut shelf = store.get_shelf(shelf_id)?;

    if let Some(owner) = &shelf.owner {
        let reason = if owner == citizen_id {
            "You have already claimed this shelf.".to_string()
        } else {
            format!("The {} is already claimed by someone else.", shelf.name)
        };
        return Ok(ShelfResult::Failed { reason });
    }
    if citizen.claimed_shelf.is_some() {
        return Ok(ShelfResult::Failed {
            reason: "You already hold a shelf claim. Unclaim it first.".to_string(),
        });
    }

    shelf.owner = Some(citizen_id.to_string());
    citizen.claimed_shelf = Some(shelf_id.to_string());
    store.put_shelf(shelf.clone())?;
    store.put_citizen(citizen)?;
    Ok(ShelfResult::Claimed {
        shelf_name: shelf.name,
    })
}

/// Release a shelf claim. Items on the shelf stay where they are; they simply
/// stop counting toward the releasing citizen's hoarding total.
pub fn release_shelf(store: &WorldStore, citizen_id: &str) -> Result<ShelfResult, WorldError> {
    let mut citizen = store.get_citizen(citizen_id)?;
    let Some(shelf_id) = citizen.claimed_shelf.take() else {
        return Ok(ShelfResult::Failed {
            reason: "You have no shelf claimed.".to_string(),
        });
    };

    let mut shelf = store.get_shelf(&shelf_id)?;
    shelf.owner = None;
    store.put_shelf(shelf.clone())?;
    store.put_citizen(citizen)?;
    Ok(ShelfResult::Released {
        shelf_name: shelf.name,
    })
}

/// Place a carried item on the citizen's claimed shelf. The item's weight
/// fraction is multiplied by the display fraction (fractions stack: a shelved
/// masterpiece counts at a quarter weight), and the prior fraction is saved
/// for retrieval.
pub fn display_item(
    store: &WorldStore,
    display_fraction: f64,
    citizen_id: &str,
    entity_id: &str,
) -> Result<ShelfResult, WorldError> {
    let citizen = store.get_citizen(citizen_id)?;
    let Some(shelf_id) = citizen.claimed_shelf.clone() else {
        return Ok(ShelfResult::Failed {
            reason: "You must claim a shelf before displaying items.".to_string(),
        });
    };
    let shelf = store.get_shelf(&shelf_id)?;
    let mut entity = store.get_entity(entity_id)?;

    if entity.location
        != (EntityLocation::Citizen {
            citizen: citizen_id.to_string(),
        })
    {
        return Ok(ShelfResult::Failed {
            reason: format!("You aren't carrying the {}.", entity.name),
        });
    }
    let occupancy = store.entities_on_shelf(&shelf_id)?.len();
    if occupancy >= shelf.capacity as usize {
        return Ok(ShelfResult::Failed {
            reason: format!("The {} is full ({} items).", shelf.name, shelf.capacity),
        });
    }

    entity.original_weight_fraction = Some(entity.weight_fraction);
    entity.weight_fraction *= display_fraction;
    entity.displayed = true;
    entity.location = EntityLocation::Shelf { shelf: shelf_id };
    let name = entity.name.clone();
    store.put_entity(entity)?;
    Ok(ShelfResult::Displayed { item_name: name })
}

/// Take an item back from the citizen's claimed shelf, restoring its original
/// weight fraction.
pub fn retrieve_item(
    store: &WorldStore,
    citizen_id: &str,
    entity_id: &str,
) -> Result<ShelfResult, WorldError> {
    let citizen = store.get_citizen(citizen_id)?;
    let Some(shelf_id) = citizen.claimed_shelf.clone() else {
        return Ok(ShelfResult::Failed {
            reason: "You have no shelf claimed.".to_string(),
        });
    };
    let mut entity = store.get_entity(entity_id)?;

    if entity.location != (EntityLocation::Shelf { shelf: shelf_id }) {
        return Ok(ShelfResult::Failed {
            reason: format!("The {} is not on your shelf.", entity.name),
        });
    }

    if let Some(original) = entity.original_weight_fraction.take() {
        entity.weight_fraction = original;
    }
    entity.displayed = false;
    entity.location = EntityLocation::Citizen {
        citizen: citizen_id.to_string(),
    };
    entity.last_holder = Some(citizen_id.to_string());
    let name = entity.name.clone();
    store.put_entity(entity)?;
    Ok(ShelfResult::Retrieved { item_name: name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::storage::WorldStoreBuilder;
    use crate::world::types::{CitizenRecord, EntityRecord};
    use tempfile::TempDir;

    fn setup() -> (TempDir, WorldStore, String, String) {
        let dir = TempDir::new().expect("tempdir");
        let store = WorldStoreBuilder::new(dir.path()).open().expect("store");
        let citizen = CitizenRecord::new("Alice", "Gallery");
        let citizen_id = citizen.id.clone();
        store.put_citizen(citizen).expect("citizen");
        let shelf_id = store.list_shelves().expect("shelves")[0].id.clone();
        (dir, store, citizen_id, shelf_id)
    }

    fn carried_item(store: &WorldStore, citizen_id: &str, name: &str) -> String {
        let mut entity = EntityRecord::new(name, "test item", "Gallery");
        entity.location = EntityLocation::Citizen {
            citizen: citizen_id.to_string(),
        };
        let id = entity.id.clone();
        store.put_entity(entity).expect("entity");
        id
    }

    #[test]
    fn claim_is_exclusive() {
        let (_dir, store, alice, shelf) = setup();
        let bob = CitizenRecord::new("Bob", "Gallery");
        let bob_id = bob.id.clone();
        store.put_citizen(bob).expect("bob");

        assert!(matches!(
            claim_shelf(&store, &alice, &shelf).unwrap(),
            ShelfResult::Claimed { .. }
        ));
        assert!(matches!(
            claim_shelf(&store, &bob_id, &shelf).unwrap(),
            ShelfResult::Failed { .. }
        ));
    }

    #[test]
    fn display_multiplies_and_retrieve_restores_fraction() {
        let (_dir, store, alice, shelf) = setup();
        claim_shelf(&store, &alice, &shelf).unwrap();
        let item = carried_item(&store, &alice, "seascape painting");
        {
            let mut entity = store.get_entity(&item).unwrap();
            entity.flags.artwork = true;
            entity.weight_fraction = 0.5;
            store.put_entity(entity).unwrap();
        }

        display_item(&store, 0.5, &alice, &item).unwrap();
        let displayed = store.get_entity(&item).unwrap();
        assert!(displayed.displayed);
        assert_eq!(displayed.weight_fraction, 0.25);
        assert_eq!(displayed.original_weight_fraction, Some(0.5));

        retrieve_item(&store, &alice, &item).unwrap();
        let back = store.get_entity(&item).unwrap();
        assert!(!back.displayed);
        assert_eq!(back.weight_fraction, 0.5);
        assert_eq!(back.original_weight_fraction, None);
    }

    #[test]
    fn display_respects_capacity() {
        let (_dir, store, alice, shelf) = setup();
        claim_shelf(&store, &alice, &shelf).unwrap();
        for i in 0..5 {
            let item = carried_item(&store, &alice, &format!("figurine {}", i));
            assert!(matches!(
                display_item(&store, 0.5, &alice, &item).unwrap(),
                ShelfResult::Displayed { .. }
            ));
        }
        let extra = carried_item(&store, &alice, "one figurine too many");
        assert!(matches!(
            display_item(&store, 0.5, &alice, &extra).unwrap(),
            ShelfResult::Failed { .. }
        ));
    }

    #[test]
    fn display_requires_claim_and_possession() {
        let (_dir, store, alice, shelf) = setup();
        let item = carried_item(&store, &alice, "clay pot");
        assert!(matches!(
            display_item(&store, 0.5, &alice, &item).unwrap(),
            ShelfResult::Failed { .. }
        ));

        claim_shelf(&store, &alice, &shelf).unwrap();
        let loose = EntityRecord::new("loose pot", "not carried", "Gallery");
        let loose_id = loose.id.clone();
        store.put_entity(loose).unwrap();
        assert!(matches!(
            display_item(&store, 0.5, &alice, &loose_id).unwrap(),
            ShelfResult::Failed { .. }
        ));
    }
}
