//! Shop catalog: characters and maps
//!
//! Pure data. Prices and appearance never change during a run; ownership
//! lives in [`crate::profile::Profile`].

use serde::Serialize;

use crate::sim::MapKind;

/// Color-only appearance of a character (RGB, `0xRRGGBB`).
///
/// Always available, so a character can be drawn even when its sprite
/// sheet fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacterColors {
    pub hair: u32,
    pub skin: u32,
    pub shirt: u32,
    pub detail: u32,
    pub pants: u32,
    pub eye: u32,
}

/// Sprite sheet layout for an animated character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpriteSheet {
    pub source: &'static str,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_count: u32,
    /// Row in the sheet
    pub row: u32,
}

/// Visual parameters the simulation hands to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacterLook {
    pub colors: CharacterColors,
    pub sprite: Option<SpriteSheet>,
}

impl Default for CharacterLook {
    fn default() -> Self {
        CHARACTERS[0].look
    }
}

/// A purchasable character
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Character {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub look: CharacterLook,
}

/// Background palette for a map (RGB, `0xRRGGBB`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub sky_top: u32,
    pub sky_bottom: u32,
    pub near_trees: u32,
    pub mid_trees: u32,
    pub far_trees: u32,
    pub ground: u32,
    /// Grass line, road markings or shoreline depending on the map
    pub edge: u32,
}

/// A purchasable map
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MapItem {
    pub kind: MapKind,
    pub name: &'static str,
    pub price: u32,
    pub description: &'static str,
    pub theme: Theme,
}

const CHARACTER_SHEET: &str = "/assets/sprites/characters.png";

const fn sheet_row(row: u32) -> Option<SpriteSheet> {
    Some(SpriteSheet {
        source: CHARACTER_SHEET,
        frame_width: 64,
        frame_height: 64,
        frame_count: 4,
        row,
    })
}

/// All characters, in shop order. The first entry is free and owned by default.
pub static CHARACTERS: [Character; 6] = [
    Character {
        id: "char1",
        name: "RUNNER",
        price: 0,
        look: CharacterLook {
            colors: CharacterColors {
                hair: 0x4a3728,
                skin: 0xe0ac8a,
                shirt: 0x6b263b,
                detail: 0xa03030,
                pants: 0x2c3e50,
                eye: 0x1a1a1a,
            },
            sprite: sheet_row(0),
        },
    },
    Character {
        id: "char2",
        name: "FROST",
        price: 250,
        look: CharacterLook {
            colors: CharacterColors {
                hair: 0xffffff,
                skin: 0xf0f0f0,
                shirt: 0x3498db,
                detail: 0xffffff,
                pants: 0x2980b9,
                eye: 0x000000,
            },
            sprite: sheet_row(1),
        },
    },
    Character {
        id: "char3",
        name: "BLAZE",
        price: 500,
        look: CharacterLook {
            colors: CharacterColors {
                hair: 0xe67e22,
                skin: 0xd35400,
                shirt: 0xc0392b,
                detail: 0xf1c40f,
                pants: 0x2c3e50,
                eye: 0xffffff,
            },
            sprite: sheet_row(2),
        },
    },
    Character {
        id: "char4",
        name: "NEON",
        price: 1000,
        look: CharacterLook {
            colors: CharacterColors {
                hair: 0xec4899,
                skin: 0xf472b6,
                shirt: 0x06b6d4,
                detail: 0xffffff,
                pants: 0x1e293b,
                eye: 0xffffff,
            },
            sprite: sheet_row(3),
        },
    },
    Character {
        id: "char5",
        name: "NINJA",
        price: 2500,
        look: CharacterLook {
            colors: CharacterColors {
                hair: 0x1a1a1a,
                skin: 0x333333,
                shirt: 0x1a1a1a,
                detail: 0xe74c3c,
                pants: 0x1a1a1a,
                eye: 0xe74c3c,
            },
            sprite: sheet_row(4),
        },
    },
    Character {
        id: "char6",
        name: "GOLDEN",
        price: 5000,
        look: CharacterLook {
            colors: CharacterColors {
                hair: 0xf39c12,
                skin: 0xf1c40f,
                shirt: 0xf1c40f,
                detail: 0xffffff,
                pants: 0xd35400,
                eye: 0x000000,
            },
            sprite: sheet_row(5),
        },
    },
];

/// All maps, in shop order. Forest is free and owned by default.
pub static MAPS: [MapItem; 4] = [
    MapItem {
        kind: MapKind::Forest,
        name: "FOREST",
        price: 0,
        description: "The original dark woods.",
        theme: Theme {
            sky_top: 0x08081a,
            sky_bottom: 0x14142b,
            near_trees: 0x1e2a1e,
            mid_trees: 0x131d13,
            far_trees: 0x0d140d,
            ground: 0x2d3e2d,
            edge: 0x4a7a4a,
        },
    },
    MapItem {
        kind: MapKind::Snow,
        name: "SNOW",
        price: 750,
        description: "Icy peaks and gift crates.",
        theme: Theme {
            sky_top: 0x101a26,
            sky_bottom: 0x243447,
            near_trees: 0x2c3e50,
            mid_trees: 0x1e2a36,
            far_trees: 0x101a26,
            ground: 0xecf0f1,
            edge: 0xbdc3c7,
        },
    },
    MapItem {
        kind: MapKind::Road,
        name: "ROAD",
        price: 1500,
        description: "Industrial city barriers.",
        theme: Theme {
            sky_top: 0x1a1a2e,
            sky_bottom: 0x16213e,
            near_trees: 0x2c3e50,
            mid_trees: 0x1a1a2e,
            far_trees: 0x0f3460,
            ground: 0x333333,
            edge: 0xffcc00,
        },
    },
    MapItem {
        kind: MapKind::Beach,
        name: "BEACH",
        price: 3000,
        description: "Tropical shore hazards.",
        theme: Theme {
            sky_top: 0x1e90ff,
            sky_bottom: 0x87ceeb,
            near_trees: 0xf4a460,
            mid_trees: 0xdeb887,
            far_trees: 0xd2b48c,
            ground: 0xf0e68c,
            edge: 0x3498db,
        },
    },
];

/// Find a character by id
pub fn character(id: &str) -> Option<&'static Character> {
    CHARACTERS.iter().find(|c| c.id == id)
}

/// Find a character by id, falling back to the default runner
pub fn character_or_default(id: &str) -> &'static Character {
    character(id).unwrap_or(&CHARACTERS[0])
}

/// Catalog entry for a map
pub fn map(kind: MapKind) -> &'static MapItem {
    MAPS.iter()
        .find(|m| m.kind == kind)
        .unwrap_or(&MAPS[0])
}
