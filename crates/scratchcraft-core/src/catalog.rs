//! Menu values offered by the block palette
//!
//! Advisory only: the game server decides what it accepts, and commands are
//! sent whether or not their arguments appear here.

use serde::Serialize;

pub const SHAPES: &[&str] = &[
    "box",
    "box0",
    "cylinder",
    "cylinder0",
    "prism",
    "prism0",
    "sphere",
    "sphere0",
    "hemisphere",
    "hemisphere0",
];

pub const OBJECTS: &[&str] = &[
    "marker", "door", "torch", "bed", "ladder", "stairs", "signpost", "wallsign",
];

pub const DRONE_COMMANDS: &[&str] = &[
    "fwd",
    "back",
    "left",
    "right",
    "up",
    "down",
    "turn",
    "reset",
    "save_chkpt",
    "goto_chkpt",
];

pub const ENTITIES: &[&str] = &[
    "Cat",
    "Chicken",
    "Caw",
    "Horse",
    "Mushroom_cow",
    "Pig",
    "Sheep",
    "Rabbit",
    "Wolf",
    "Creeper",
    "Skeleton",
    "Spider",
    "Villager",
    "Zombie",
];

pub const ENTITY_SOUNDS: &[&str] = &["Ambient", "Hurt", "Death"];

pub const BLOCK_SOUNDS: &[&str] = &["Glass", "Grass", "Gravel", "Sand", "Snow", "Stone", "Wood"];

pub const RECORDS: &[&str] = &[
    "11", "13", "Blocks", "Cat", "Chirp", "Far", "Mall", "Mellohi", "Stal", "Strad", "Wait",
    "Ward",
];

pub const TELEPORT_TYPES: &[&str] = &["at", "offset", "to_drone"];

pub const TURN_TYPES: &[&str] = &[
    "horizontal_to",
    "horizontal_by",
    "vertical_to",
    "vertical_by",
    "to_point",
    "to_drone",
];

pub const TIMES: &[&str] = &["day", "night"];

pub const WEATHER: &[&str] = &["clear", "rain", "thunders"];

pub const COORDINATES: &[&str] = &["x", "y", "z"];

pub const TARGETS: &[&str] = &["player", "drone"];

/// All menus, keyed by the palette's menu name
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub menus: Vec<Menu>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Menu {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

impl Catalog {
    pub fn new() -> Self {
        let menus = [
            ("SHAPES", SHAPES),
            ("OBJECTS", OBJECTS),
            ("COMMANDS", DRONE_COMMANDS),
            ("ENTITIES", ENTITIES),
            ("ENTITY_SOUNDS", ENTITY_SOUNDS),
            ("BLOCK_SOUNDS", BLOCK_SOUNDS),
            ("RECORDS", RECORDS),
            ("TELEPORT_TYPES", TELEPORT_TYPES),
            ("TURN_TYPES", TURN_TYPES),
            ("TIME_ID", TIMES),
            ("WEATHER", WEATHER),
            ("COORDINATES", COORDINATES),
            ("TARGETS", TARGETS),
        ]
        .into_iter()
        .map(|(name, values)| Menu { name, values })
        .collect();

        Self { menus }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
