//! Item fabrication tables: what the shops restock with, what the workshop
//! stations produce, and the raw-material registry.
//!
//! The full generator corpus (art-speak, poem bodies, book blurbs) lives in
//! the content layer above this crate; here we only need enough to mint
//! correctly-flagged entities with plausible names.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::world::types::EntityRecord;

/// The kinds of item the fabricators know how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockKind {
    Talisman,
    Garment,
    Art,
    Cheese,
    IceCream,
    Candy,
    SciFiBook,
    Poem,
}

/// Chance that a generated artwork comes out a masterpiece.
pub const MASTERPIECE_CHANCE: f64 = 0.25;

/// Restock tables per shop type: (kind, weight) pairs.
pub fn shop_stock_table(
    shop_type: crate::world::types::ShopType,
) -> &'static [(StockKind, u32)] {
    use crate::world::types::ShopType;
    match shop_type {
        ShopType::Boutique => &[
            (StockKind::Art, 50),
            (StockKind::Garment, 40),
            (StockKind::Talisman, 10),
        ],
        ShopType::Food => &[
            (StockKind::Cheese, 30),
            (StockKind::IceCream, 30),
            (StockKind::Candy, 30),
            (StockKind::Talisman, 10),
        ],
        ShopType::General => &[
            (StockKind::Talisman, 30),
            (StockKind::Garment, 25),
            (StockKind::SciFiBook, 20),
            (StockKind::Poem, 15),
            (StockKind::Art, 10),
        ],
    }
}

/// Crafting output tables per workshop station.
pub fn station_output_table(station: &str) -> Option<&'static [(StockKind, u32)]> {
    let table: &'static [(StockKind, u32)] = match station {
        "textile" => &[
            (StockKind::Garment, 75),
            (StockKind::Talisman, 15),
            (StockKind::Art, 10),
        ],
        "glazier" => &[(StockKind::Art, 70), (StockKind::Talisman, 30)],
        "wax" => &[
            (StockKind::Talisman, 65),
            (StockKind::Art, 25),
            (StockKind::Poem, 10),
        ],
        "clay" => &[(StockKind::Art, 70), (StockKind::Talisman, 30)],
        "milk" => &[
            (StockKind::Cheese, 45),
            (StockKind::IceCream, 45),
            (StockKind::Talisman, 10),
        ],
        "candy" => &[
            (StockKind::Candy, 80),
            (StockKind::Talisman, 10),
            (StockKind::Art, 10),
        ],
        _ => return None,
    };
    Some(table)
}

/// Fallback table for unknown stations, cross-station combos, and itemators.
pub const DEFAULT_OUTPUTS: &[(StockKind, u32)] = &[
    (StockKind::Talisman, 30),
    (StockKind::Art, 20),
    (StockKind::Garment, 20),
    (StockKind::SciFiBook, 10),
    (StockKind::Poem, 10),
    (StockKind::Cheese, 5),
    (StockKind::IceCream, 5),
];

/// Pick a kind from a weighted table.
pub fn weighted_choice(table: &[(StockKind, u32)], rng: &mut impl Rng) -> StockKind {
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total.max(1));
    for (kind, weight) in table {
        if roll < *weight {
            return *kind;
        }
        roll -= weight;
    }
    table[0].0
}

const ADJECTIVES: &[&str] = &[
    "iridescent",
    "weathered",
    "luminous",
    "crooked",
    "austere",
    "gaudy",
    "threadbare",
    "immaculate",
];

const SUBSTANCES: &[&str] = &[
    "polyclay",
    "sea glass",
    "waxed canvas",
    "spun sugar",
    "salvaged chrome",
    "bleached driftwood",
];

const ART_FORMS: &[&str] = &["sculpture", "mosaic", "seascape", "diorama", "bas-relief"];
const GARMENTS: &[&str] = &["overcoat", "jumpsuit", "scarf", "ceremonial sash", "raincloak"];
const TALISMANS: &[&str] = &["talisman", "charm", "votive figure", "lucky knot"];
const BOOK_SUBJECTS: &[&str] = &[
    "drowned cities",
    "orbital lighthouses",
    "the last cartographers",
    "machine gardens",
];
const POEM_THEMES: &[&str] = &["the tide", "rust", "distant gulls", "the weight of things"];

fn pick<'a>(list: &[&'a str], rng: &mut impl Rng) -> &'a str {
    list.choose(rng).copied().unwrap_or("unremarkable")
}

/// Mint an entity of the given kind into a room, flags set for the pricing
/// and weight models.
pub fn generate(
    kind: StockKind,
    room: &str,
    masterpiece_fraction: f64,
    rng: &mut impl Rng,
) -> EntityRecord {
    let adjective = pick(ADJECTIVES, rng);
    match kind {
        StockKind::Art => {
            let form = pick(ART_FORMS, rng);
            let substance = pick(SUBSTANCES, rng);
            let name = format!("{} {}", adjective, form);
            let mut entity = EntityRecord::new(
                &name,
                &format!("A piece of {} worked from {}.", form, substance),
                room,
            );
            if rng.gen_bool(MASTERPIECE_CHANCE) {
                entity.flags.artwork = true;
                entity.weight_fraction = masterpiece_fraction;
                entity.description = format!(
                    "A piece of {} worked from {}. It's a masterful work.",
                    form, substance
                );
            }
            entity
        }
        StockKind::Garment => {
            let garment = pick(GARMENTS, rng);
            let mut entity = EntityRecord::new(
                &format!("{} {}", adjective, garment),
                &format!("A {} {} from the textile megaspools.", adjective, garment),
                room,
            );
            entity.flags.garment = true;
            entity
        }
        StockKind::Talisman => {
            let talisman = pick(TALISMANS, rng);
            EntityRecord::new(
                &format!("{} {}", adjective, talisman),
                &format!("A small {} that fits in the palm.", talisman),
                room,
            )
        }
        StockKind::Cheese => {
            let mut entity = EntityRecord::new(
                &format!("{} cheese wheel", adjective),
                "A dense wheel from the \"milk\" vats.",
                room,
            );
            entity.flags.edible = true;
            entity
        }
        StockKind::IceCream => {
            let mut entity = EntityRecord::new(
                &format!("{} ice cream", adjective),
                "A scoop that never quite melts.",
                room,
            );
            entity.flags.edible = true;
            entity
        }
        StockKind::Candy => {
            let mut entity = EntityRecord::new(
                &format!("{} candy", adjective),
                "A confection from the confectionary tanks.",
                room,
            );
            entity.flags.edible = true;
            entity
        }
        StockKind::SciFiBook => {
            let subject = pick(BOOK_SUBJECTS, rng);
            let mut entity = EntityRecord::new(
                &format!("book about {}", subject),
                &format!("A dog-eared paperback about {}.", subject),
                room,
            );
            entity.flags.readable = true;
            entity
        }
        StockKind::Poem => {
            let theme = pick(POEM_THEMES, rng);
            let mut entity = EntityRecord::new(
                &format!("poem about {}", theme),
                &format!("A single printed sheet, a poem about {}.", theme),
                room,
            );
            entity.flags.readable = true;
            entity
        }
    }
}

/// A raw material a workshop station hands out.
#[derive(Debug, Clone, Copy)]
pub struct MaterialSpec {
    pub name: &'static str,
    pub desc: &'static str,
    pub flavor_words: &'static [&'static str],
}

/// Material registry, keyed by station.
pub fn station_materials(station: &str) -> &'static [MaterialSpec] {
    match station {
        "textile" => &[
            MaterialSpec {
                name: "silk thread",
                desc: "A spool of luminous silk thread, fine as spider web.",
                flavor_words: &["silken", "gossamer", "lustrous thread"],
            },
            MaterialSpec {
                name: "raw cotton",
                desc: "A dense bale of unbleached raw cotton.",
                flavor_words: &["cotton", "woven", "soft-spun"],
            },
        ],
        "glazier" => &[
            MaterialSpec {
                name: "molten glass",
                desc: "A glowing gather of molten glass on a steel rod.",
                flavor_words: &["glassy", "translucent", "kiln-warm"],
            },
            MaterialSpec {
                name: "sea glass shards",
                desc: "A handful of frosted shards tumbled smooth by the ocean.",
                flavor_words: &["frosted", "sea-tumbled", "pale green"],
            },
        ],
        "wax" => &[
            MaterialSpec {
                name: "paraffin block",
                desc: "A waxy block still warm from the extruders.",
                flavor_words: &["waxen", "smooth", "faintly sweet"],
            },
            MaterialSpec {
                name: "beeswax lump",
                desc: "A golden lump that smells of honey.",
                flavor_words: &["golden", "honeyed", "hand-warmed"],
            },
        ],
        "clay" => &[
            MaterialSpec {
                name: "polyclay brick",
                desc: "A brick of synthetic clay from the intubators.",
                flavor_words: &["earthen", "malleable", "fingerprinted"],
            },
            MaterialSpec {
                name: "porcelain slip",
                desc: "A jar of fine white porcelain slip.",
                flavor_words: &["porcelain", "bone-white", "delicate"],
            },
        ],
        "milk" => &[
            MaterialSpec {
                name: "casein powder",
                desc: "A sack of protein powder from the \"milk\" vats.",
                flavor_words: &["milky", "rich", "vat-cultured"],
            },
            MaterialSpec {
                name: "cream concentrate",
                desc: "A chilled canister of cream concentrate.",
                flavor_words: &["creamy", "chilled", "thick"],
            },
        ],
        "candy" => &[
            MaterialSpec {
                name: "sugar glass",
                desc: "A brittle pane of clear spun sugar.",
                flavor_words: &["crystalline", "sweet", "brittle"],
            },
            MaterialSpec {
                name: "syrup base",
                desc: "A heavy jug of neutral syrup base.",
                flavor_words: &["syrupy", "amber", "slow-pouring"],
            },
        ],
        _ => &[],
    }
}

/// Mint a raw material from a station into a room.
pub fn spawn_material(station: &str, room: &str, rng: &mut impl Rng) -> Option<EntityRecord> {
    let spec = station_materials(station).choose(rng)?;
    let mut entity = EntityRecord::new(spec.name, spec.desc, room);
    entity.flags.material = true;
    entity.station = Some(station.to_string());
    entity.flavor_words = spec.flavor_words.iter().map(|s| s.to_string()).collect();
    Some(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::types::ShopType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn weighted_choice_respects_table_membership() {
        let mut rng = StdRng::seed_from_u64(1);
        let table = shop_stock_table(ShopType::Food);
        for _ in 0..50 {
            let kind = weighted_choice(table, &mut rng);
            assert!(table.iter().any(|(k, _)| *k == kind));
        }
    }

    #[test]
    fn generated_items_carry_category_flags() {
        let mut rng = StdRng::seed_from_u64(2);
        let garment = generate(StockKind::Garment, "Gallery", 0.5, &mut rng);
        assert!(garment.flags.garment);
        let cheese = generate(StockKind::Cheese, "Gallery", 0.5, &mut rng);
        assert!(cheese.flags.edible);
        let book = generate(StockKind::SciFiBook, "Gallery", 0.5, &mut rng);
        assert!(book.flags.readable);
    }

    #[test]
    fn masterpieces_get_the_reduced_fraction() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut saw_masterpiece = false;
        for _ in 0..200 {
            let art = generate(StockKind::Art, "Gallery", 0.5, &mut rng);
            if art.flags.artwork {
                saw_masterpiece = true;
                assert_eq!(art.weight_fraction, 0.5);
            } else {
                assert_eq!(art.weight_fraction, 1.0);
            }
        }
        assert!(saw_masterpiece, "200 rolls should produce a masterpiece");
    }

    #[test]
    fn materials_are_flagged_and_stationed() {
        let mut rng = StdRng::seed_from_u64(4);
        let material = spawn_material("textile", "Industrial Park", &mut rng).unwrap();
        assert!(material.flags.material);
        assert_eq!(material.station.as_deref(), Some("textile"));
        assert!(!material.flavor_words.is_empty());
        assert!(spawn_material("unknown", "Industrial Park", &mut rng).is_none());
    }
}
