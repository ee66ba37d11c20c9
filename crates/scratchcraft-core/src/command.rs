//! Block commands and the request paths they map to
//!
//! Each command becomes one GET against the game server. The path is the
//! operation segment followed by the arguments in a fixed order, joined with
//! `/`. Argument text is sent as-is: a value containing `/` shifts every
//! following segment on the server side.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Numeric block argument
///
/// Accepts a JSON number or a numeric string. A string is sent as the caller
/// wrote it (trimmed), so `"007"` stays `007`; a JSON number renders with the
/// shortest representation (`1.0` becomes `"1"`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Number {
    value: f64,
    text: Option<String>,
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => f.write_str(text),
            None => write!(f, "{}", self.value),
        }
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number { value, text: None }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.text {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_f64(self.value),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(Number::from(n)),
            Raw::Text(s) => {
                let text = s.trim();
                let value = text.parse::<f64>().map_err(|_| {
                    serde::de::Error::custom(format!("expected a number, got {:?}", s))
                })?;
                Ok(Number {
                    value,
                    text: Some(text.to_string()),
                })
            }
        }
    }
}

/// A remote-control operation with its block arguments
///
/// Serialized the way the block palette calls it: `opcode` names the block,
/// arguments use the block's upper-case keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "opcode",
    rename_all = "camelCase",
    rename_all_fields = "SCREAMING_SNAKE_CASE"
)]
pub enum Command {
    ConnectPlayer {
        user_id: String,
    },
    ResetConnection,
    BuildShape {
        shape: String,
        block_type: Number,
        block_data: Number,
        block_x: Number,
        block_y: Number,
        block_z: Number,
    },
    Place {
        object: String,
        par_1: String,
        par_2: String,
        par_3: String,
        par_4: String,
    },
    Rainbow {
        radius: Number,
    },
    MoveDrone {
        command: String,
        count: Number,
    },
    Summon {
        entity: String,
    },
    EntitySound {
        entity: String,
        entity_sound: String,
        player: String,
    },
    BlockSound {
        block: String,
        block_sound: String,
        player: String,
    },
    /// Play a music record.
    ///
    /// The server only ever receives this on the time route with the record
    /// as the time id; `player` is not sent.
    Music {
        record: String,
        player: String,
    },
    Teleport {
        player_name: String,
        teleport_type: String,
        teleport_x: Number,
        teleport_y: Number,
        teleport_z: Number,
    },
    Turn {
        player_name: String,
        turn_type: String,
        turn_x: Number,
        turn_y: Number,
        turn_z: Number,
    },
    SetTime {
        time_id: String,
    },
    SetWeather {
        weather: String,
    },
    ResetEvent,
}

impl Command {
    /// Block opcode, as used in the `opcode` tag
    pub fn opcode(&self) -> &'static str {
        match self {
            Command::ConnectPlayer { .. } => "connectPlayer",
            Command::ResetConnection => "resetConnection",
            Command::BuildShape { .. } => "buildShape",
            Command::Place { .. } => "place",
            Command::Rainbow { .. } => "rainbow",
            Command::MoveDrone { .. } => "moveDrone",
            Command::Summon { .. } => "summon",
            Command::EntitySound { .. } => "entitySound",
            Command::BlockSound { .. } => "blockSound",
            Command::Music { .. } => "music",
            Command::Teleport { .. } => "teleport",
            Command::Turn { .. } => "turn",
            Command::SetTime { .. } => "setTime",
            Command::SetWeather { .. } => "setWeather",
            Command::ResetEvent => "resetEvent",
        }
    }

    /// Build the request the game server expects for this command
    pub fn request(&self) -> CommandRequest {
        match self {
            Command::ConnectPlayer { user_id } => CommandRequest::new("connect", [user_id]),
            Command::ResetConnection => CommandRequest::new("reset_all", Vec::<String>::new()),
            Command::BuildShape {
                shape,
                block_type,
                block_data,
                block_x,
                block_y,
                block_z,
            } => CommandRequest::new(
                "build",
                [
                    shape.clone(),
                    block_type.to_string(),
                    block_data.to_string(),
                    block_x.to_string(),
                    block_y.to_string(),
                    block_z.to_string(),
                ],
            ),
            // The server route reads the first parameter twice.
            Command::Place {
                object,
                par_1,
                par_2,
                par_3,
                par_4,
            } => CommandRequest::new("place", [object, par_1, par_1, par_2, par_3, par_4]),
            Command::Rainbow { radius } => CommandRequest::new("rainbow", [radius.to_string()]),
            Command::MoveDrone { command, count } => {
                CommandRequest::new("moveDrone", [command.clone(), count.to_string()])
            }
            Command::Summon { entity } => CommandRequest::new("summon", [entity]),
            Command::EntitySound {
                entity,
                entity_sound,
                player,
            } => CommandRequest::new("entitySound", [entity, entity_sound, player]),
            Command::BlockSound {
                block,
                block_sound,
                player,
            } => CommandRequest::new("blockSound", [block, block_sound, player]),
            Command::Music { record, .. } => CommandRequest::new("time", [record]),
            Command::Teleport {
                player_name,
                teleport_type,
                teleport_x,
                teleport_y,
                teleport_z,
            } => CommandRequest::new(
                "teleport",
                [
                    player_name.clone(),
                    teleport_type.clone(),
                    teleport_x.to_string(),
                    teleport_y.to_string(),
                    teleport_z.to_string(),
                ],
            ),
            Command::Turn {
                player_name,
                turn_type,
                turn_x,
                turn_y,
                turn_z,
            } => CommandRequest::new(
                "turn",
                [
                    player_name.clone(),
                    turn_type.clone(),
                    turn_x.to_string(),
                    turn_y.to_string(),
                    turn_z.to_string(),
                ],
            ),
            Command::SetTime { time_id } => CommandRequest::new("time", [time_id]),
            Command::SetWeather { weather } => CommandRequest::new("weather", [weather]),
            // Route is registered with a trailing separator.
            Command::ResetEvent => CommandRequest::new("reset_event", [""]),
        }
    }
}

/// A concrete request: operation segment plus ordered, already stringified arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    operation: &'static str,
    args: Vec<String>,
}

impl CommandRequest {
    pub fn new<I, S>(operation: &'static str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            operation,
            args: args.into_iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Path relative to the server base address, e.g. `/build/box/1/0/2/3/4`
    pub fn path(&self) -> String {
        let mut path = format!("/{}", self.operation);
        for arg in &self.args {
            path.push('/');
            path.push_str(arg);
        }
        path
    }
}

impl fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(json: serde_json::Value) -> Command {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_build_shape_path() {
        let cmd = command(serde_json::json!({
            "opcode": "buildShape",
            "SHAPE": "box",
            "BLOCK_TYPE": 1,
            "BLOCK_DATA": 0,
            "BLOCK_X": 2,
            "BLOCK_Y": 3,
            "BLOCK_Z": 4
        }));

        assert_eq!(cmd.request().path(), "/build/box/1/0/2/3/4");
    }

    #[test]
    fn test_teleport_path() {
        let cmd = Command::Teleport {
            player_name: "Steve".into(),
            teleport_type: "at".into(),
            teleport_x: Number::from(1.0),
            teleport_y: Number::from(2.0),
            teleport_z: Number::from(3.0),
        };

        assert_eq!(cmd.request().path(), "/teleport/Steve/at/1/2/3");
    }

    #[test]
    fn test_numeric_strings_and_fractions() {
        let cmd = command(serde_json::json!({
            "opcode": "turn",
            "PLAYER_NAME": "Alex",
            "TURN_TYPE": "vertical_by",
            "TURN_X": "2.5",
            "TURN_Y": -90,
            "TURN_Z": " 0 "
        }));

        assert_eq!(cmd.request().path(), "/turn/Alex/vertical_by/2.5/-90/0");
    }

    #[test]
    fn test_numeric_strings_sent_verbatim() {
        let cmd = command(serde_json::json!({
            "opcode": "teleport",
            "PLAYER_NAME": "Steve",
            "TELEPORT_TYPE": "at",
            "TELEPORT_X": "007",
            "TELEPORT_Y": "1.50",
            "TELEPORT_Z": 4.0
        }));

        assert_eq!(cmd.request().path(), "/teleport/Steve/at/007/1.50/4");
    }

    #[test]
    fn test_non_numeric_string_rejected() {
        let result: Result<Command, _> = serde_json::from_value(serde_json::json!({
            "opcode": "rainbow",
            "RADIUS": "wide"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_place_repeats_first_parameter() {
        let cmd = command(serde_json::json!({
            "opcode": "place",
            "OBJECT": "wallsign",
            "PAR_1": "a",
            "PAR_2": "b",
            "PAR_3": "c",
            "PAR_4": "d"
        }));

        assert_eq!(cmd.request().path(), "/place/wallsign/a/a/b/c/d");
    }

    #[test]
    fn test_music_uses_time_route() {
        let cmd = Command::Music {
            record: "Cat".into(),
            player: "all".into(),
        };
        assert_eq!(cmd.request().path(), "/time/Cat");
    }

    #[test]
    fn test_argumentless_paths() {
        assert_eq!(Command::ResetConnection.request().path(), "/reset_all");
        assert_eq!(Command::ResetEvent.request().path(), "/reset_event/");
        assert_eq!(
            command(serde_json::json!({ "opcode": "resetEvent" })),
            Command::ResetEvent
        );
    }

    #[test]
    fn test_single_argument_paths() {
        let cases = [
            (serde_json::json!({"opcode": "connectPlayer", "USER_ID": "steve42"}), "/connect/steve42"),
            (serde_json::json!({"opcode": "rainbow", "RADIUS": 12}), "/rainbow/12"),
            (serde_json::json!({"opcode": "moveDrone", "COMMAND": "fwd", "COUNT": 3}), "/moveDrone/fwd/3"),
            (serde_json::json!({"opcode": "summon", "ENTITY": "Chicken"}), "/summon/Chicken"),
            (serde_json::json!({"opcode": "setTime", "TIME_ID": "night"}), "/time/night"),
            (serde_json::json!({"opcode": "setWeather", "WEATHER": "rain"}), "/weather/rain"),
            (
                serde_json::json!({"opcode": "entitySound", "ENTITY": "Wolf", "ENTITY_SOUND": "Hurt", "PLAYER": "all"}),
                "/entitySound/Wolf/Hurt/all",
            ),
            (
                serde_json::json!({"opcode": "blockSound", "BLOCK": "Grass", "BLOCK_SOUND": "Step", "PLAYER": "Steve"}),
                "/blockSound/Grass/Step/Steve",
            ),
        ];

        for (json, path) in cases {
            let cmd = command(json);
            assert_eq!(cmd.request().path(), path, "opcode {}", cmd.opcode());
        }
    }

    #[test]
    fn test_arguments_not_escaped() {
        let cmd = Command::Summon {
            entity: "a/b".into(),
        };
        assert_eq!(cmd.request().path(), "/summon/a/b");
        assert_eq!(cmd.request().args(), ["a/b".to_string()]);
    }

    #[test]
    fn test_opcode_matches_tag() {
        let cmd = Command::SetWeather {
            weather: "clear".into(),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["opcode"], cmd.opcode());
        assert_eq!(json["WEATHER"], "clear");
    }
}
