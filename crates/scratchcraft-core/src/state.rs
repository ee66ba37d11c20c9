//! Cached game state reported by the poll endpoint
//!
//! Every field is kept as the exact text the game server sent. Nothing is
//! parsed into numbers; a field that has never been reported is empty.

use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity whose position is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Player,
    Drone,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Player => "player",
            Target::Drone => "drone",
        }
    }
}

impl FromStr for Target {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(Target::Player),
            "drone" => Ok(Target::Drone),
            other => Err(BridgeError::InvalidArgument(format!(
                "unknown target: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl FromStr for Axis {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(BridgeError::InvalidArgument(format!(
                "unknown coordinate: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position as reported by the server, one string per axis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl Position {
    pub fn axis(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut String {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

/// A snapshot field that the poll endpoint can update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    BlockType,
    BlockData,
    Event,
    EventAction,
    EventItemInHand,
    EventHand,
    EventMaterial,
    EventBlockFace,
    DronePosition(Axis),
    PlayerPosition(Axis),
    Result,
}

impl StateField {
    /// Every field the poll endpoint reports, in the order the server writes them
    pub const ALL: [StateField; 15] = [
        StateField::BlockType,
        StateField::BlockData,
        StateField::Event,
        StateField::EventAction,
        StateField::EventItemInHand,
        StateField::EventHand,
        StateField::EventMaterial,
        StateField::EventBlockFace,
        StateField::DronePosition(Axis::X),
        StateField::DronePosition(Axis::Y),
        StateField::DronePosition(Axis::Z),
        StateField::PlayerPosition(Axis::X),
        StateField::PlayerPosition(Axis::Y),
        StateField::PlayerPosition(Axis::Z),
        StateField::Result,
    ];

    /// Look up the field for a poll line key
    pub fn from_key(key: &str) -> Option<Self> {
        let field = match key {
            "blockType" => StateField::BlockType,
            "blockData" => StateField::BlockData,
            "event" => StateField::Event,
            "event_action" => StateField::EventAction,
            "event_itemInHand" => StateField::EventItemInHand,
            "event_hand" => StateField::EventHand,
            "event_material" => StateField::EventMaterial,
            "event_blockFace" => StateField::EventBlockFace,
            "position/x/drone" => StateField::DronePosition(Axis::X),
            "position/y/drone" => StateField::DronePosition(Axis::Y),
            "position/z/drone" => StateField::DronePosition(Axis::Z),
            "position/x/player" => StateField::PlayerPosition(Axis::X),
            "position/y/player" => StateField::PlayerPosition(Axis::Y),
            "position/z/player" => StateField::PlayerPosition(Axis::Z),
            "result" => StateField::Result,
            _ => return None,
        };
        Some(field)
    }

    /// Poll line key for this field
    pub fn key(self) -> &'static str {
        match self {
            StateField::BlockType => "blockType",
            StateField::BlockData => "blockData",
            StateField::Event => "event",
            StateField::EventAction => "event_action",
            StateField::EventItemInHand => "event_itemInHand",
            StateField::EventHand => "event_hand",
            StateField::EventMaterial => "event_material",
            StateField::EventBlockFace => "event_blockFace",
            StateField::DronePosition(Axis::X) => "position/x/drone",
            StateField::DronePosition(Axis::Y) => "position/y/drone",
            StateField::DronePosition(Axis::Z) => "position/z/drone",
            StateField::PlayerPosition(Axis::X) => "position/x/player",
            StateField::PlayerPosition(Axis::Y) => "position/y/player",
            StateField::PlayerPosition(Axis::Z) => "position/z/player",
            StateField::Result => "result",
        }
    }
}

/// Locally cached game state
///
/// Fields start empty and are only ever replaced, never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Type of the last block touched
    pub block_type: String,
    /// Data value of the last block touched
    pub block_data: String,
    /// Last triggered event
    pub event: String,
    pub event_action: String,
    pub event_item_in_hand: String,
    pub event_hand: String,
    pub event_material: String,
    pub event_block_face: String,
    pub drone_position: Position,
    pub player_position: Position,
    /// Result of the last command, as reported by the server
    pub result: String,
    /// Full body of the last poll response
    pub poll_raw: String,
}

impl StateSnapshot {
    /// Current value of a field
    pub fn get(&self, field: StateField) -> &str {
        match field {
            StateField::BlockType => &self.block_type,
            StateField::BlockData => &self.block_data,
            StateField::Event => &self.event,
            StateField::EventAction => &self.event_action,
            StateField::EventItemInHand => &self.event_item_in_hand,
            StateField::EventHand => &self.event_hand,
            StateField::EventMaterial => &self.event_material,
            StateField::EventBlockFace => &self.event_block_face,
            StateField::DronePosition(axis) => self.drone_position.axis(axis),
            StateField::PlayerPosition(axis) => self.player_position.axis(axis),
            StateField::Result => &self.result,
        }
    }

    /// Replace a field value
    pub fn set(&mut self, field: StateField, value: impl Into<String>) {
        let slot = match field {
            StateField::BlockType => &mut self.block_type,
            StateField::BlockData => &mut self.block_data,
            StateField::Event => &mut self.event,
            StateField::EventAction => &mut self.event_action,
            StateField::EventItemInHand => &mut self.event_item_in_hand,
            StateField::EventHand => &mut self.event_hand,
            StateField::EventMaterial => &mut self.event_material,
            StateField::EventBlockFace => &mut self.event_block_face,
            StateField::DronePosition(axis) => self.drone_position.axis_mut(axis),
            StateField::PlayerPosition(axis) => self.player_position.axis_mut(axis),
            StateField::Result => &mut self.result,
        };
        *slot = value.into();
    }

    pub fn position(&self, target: Target) -> &Position {
        match target {
            Target::Player => &self.player_position,
            Target::Drone => &self.drone_position,
        }
    }

    /// Coordinate lookup by menu values, e.g. `("drone", "y")`
    ///
    /// Returns `None` when either value is not a known target or axis.
    pub fn coordinate(&self, target: &str, axis: &str) -> Option<&str> {
        let target: Target = target.parse().ok()?;
        let axis: Axis = axis.parse().ok()?;
        Some(self.position(target).axis(axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_map_back_to_fields() {
        for field in StateField::ALL {
            assert_eq!(StateField::from_key(field.key()), Some(field));
        }
        assert_eq!(StateField::from_key("position/w/drone"), None);
        assert_eq!(StateField::from_key("BlockType"), None);
    }

    #[test]
    fn test_set_touches_only_one_field() {
        let mut snapshot = StateSnapshot::default();
        snapshot.set(StateField::DronePosition(Axis::Y), "64");

        assert_eq!(snapshot.drone_position.y, "64");
        assert_eq!(snapshot.player_position, Position::default());
        assert_eq!(snapshot.get(StateField::DronePosition(Axis::X)), "");
    }

    #[test]
    fn test_coordinate_lookup() {
        let mut snapshot = StateSnapshot::default();
        snapshot.set(StateField::PlayerPosition(Axis::Y), "70");
        snapshot.set(StateField::DronePosition(Axis::Y), "12");

        assert_eq!(snapshot.coordinate("drone", "y"), Some("12"));
        assert_eq!(snapshot.coordinate("player", "y"), Some("70"));
        assert_eq!(snapshot.coordinate("player", "x"), Some(""));
        assert_eq!(snapshot.coordinate("sheep", "y"), None);
        assert_eq!(snapshot.coordinate("drone", "w"), None);
    }

    #[test]
    fn test_snapshot_json_names() {
        let mut snapshot = StateSnapshot::default();
        snapshot.set(StateField::EventItemInHand, "DIAMOND_SWORD");
        snapshot.set(StateField::PlayerPosition(Axis::Z), "-3");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["eventItemInHand"], "DIAMOND_SWORD");
        assert_eq!(json["playerPosition"]["z"], "-3");
        assert_eq!(json["pollRaw"], "");
    }
}
