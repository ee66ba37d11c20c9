//! MCP tool handlers for the block palette
//!
//! Every command block and every reporter block is one tool. Command tools
//! take the block's upper-case argument keys; missing arguments fall back to
//! the block's default value.

use scratchcraft_core::{BridgeError, Command, Result, StateSnapshot, catalog, error_codes};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::mcp::{RequestId, Response};
use crate::surface::ControlSurface;

/// Tool definition for MCP tools/list
#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Copy)]
enum ArgKind {
    Text,
    Number,
}

#[derive(Debug, Clone, Copy)]
struct ArgSpec {
    key: &'static str,
    kind: ArgKind,
    menu: Option<&'static [&'static str]>,
    default: Option<&'static str>,
}

const fn text(key: &'static str, default: Option<&'static str>) -> ArgSpec {
    ArgSpec {
        key,
        kind: ArgKind::Text,
        menu: None,
        default,
    }
}

const fn menu(key: &'static str, values: &'static [&'static str], default: &'static str) -> ArgSpec {
    ArgSpec {
        key,
        kind: ArgKind::Text,
        menu: Some(values),
        default: Some(default),
    }
}

const fn number(key: &'static str, default: &'static str) -> ArgSpec {
    ArgSpec {
        key,
        kind: ArgKind::Number,
        menu: None,
        default: Some(default),
    }
}

struct BlockSpec {
    opcode: &'static str,
    description: &'static str,
    args: &'static [ArgSpec],
}

const COMMAND_BLOCKS: &[BlockSpec] = &[
    BlockSpec {
        opcode: "connectPlayer",
        description: "Connect a Minecraft user to this session.",
        args: &[text("USER_ID", None)],
    },
    BlockSpec {
        opcode: "resetConnection",
        description: "Reset every connection on the game server.",
        args: &[],
    },
    BlockSpec {
        opcode: "buildShape",
        description: "Build a shape at the drone. Example: {\"SHAPE\": \"box\", \"BLOCK_TYPE\": 1, \"BLOCK_DATA\": 0, \"BLOCK_X\": 2, \"BLOCK_Y\": 3, \"BLOCK_Z\": 4}",
        args: &[
            menu("SHAPE", catalog::SHAPES, "box"),
            number("BLOCK_TYPE", "1"),
            number("BLOCK_DATA", "0"),
            number("BLOCK_X", "1"),
            number("BLOCK_Y", "1"),
            number("BLOCK_Z", "1"),
        ],
    },
    BlockSpec {
        opcode: "place",
        description: "Place an object at the drone.",
        args: &[
            menu("OBJECT", catalog::OBJECTS, "wallsign"),
            text("PAR_1", Some(" ")),
            text("PAR_2", Some(" ")),
            text("PAR_3", Some(" ")),
            text("PAR_4", Some(" ")),
        ],
    },
    BlockSpec {
        opcode: "rainbow",
        description: "Build a rainbow of the given radius.",
        args: &[number("RADIUS", "12")],
    },
    BlockSpec {
        opcode: "moveDrone",
        description: "Move or turn the drone.",
        args: &[
            menu("COMMAND", catalog::DRONE_COMMANDS, "fwd"),
            number("COUNT", "1"),
        ],
    },
    BlockSpec {
        opcode: "summon",
        description: "Summon an entity at the drone.",
        args: &[menu("ENTITY", catalog::ENTITIES, "Chicken")],
    },
    BlockSpec {
        opcode: "entitySound",
        description: "Play an entity sound to a player (or \"all\").",
        args: &[
            menu("ENTITY", catalog::ENTITIES, "Chicken"),
            menu("ENTITY_SOUND", catalog::ENTITY_SOUNDS, "Ambient"),
            text("PLAYER", Some("all")),
        ],
    },
    BlockSpec {
        opcode: "blockSound",
        description: "Play a block sound to a player (or \"all\").",
        args: &[
            text("BLOCK", Some("Grass")),
            menu("BLOCK_SOUND", catalog::BLOCK_SOUNDS, "Step"),
            text("PLAYER", Some("all")),
        ],
    },
    BlockSpec {
        opcode: "music",
        description: "Play a music record. Sent on the time route; PLAYER is not forwarded.",
        args: &[
            menu("RECORD", catalog::RECORDS, "11"),
            text("PLAYER", Some("all")),
        ],
    },
    BlockSpec {
        opcode: "teleport",
        description: "Teleport a player. Example: {\"PLAYER_NAME\": \"Steve\", \"TELEPORT_TYPE\": \"at\", \"TELEPORT_X\": 1, \"TELEPORT_Y\": 2, \"TELEPORT_Z\": 3}",
        args: &[
            text("PLAYER_NAME", None),
            menu("TELEPORT_TYPE", catalog::TELEPORT_TYPES, "at"),
            number("TELEPORT_X", "0"),
            number("TELEPORT_Y", "0"),
            number("TELEPORT_Z", "0"),
        ],
    },
    BlockSpec {
        opcode: "turn",
        description: "Turn a player.",
        args: &[
            text("PLAYER_NAME", None),
            menu("TURN_TYPE", catalog::TURN_TYPES, "horizontal_to"),
            number("TURN_X", "0"),
            number("TURN_Y", "0"),
            number("TURN_Z", "0"),
        ],
    },
    BlockSpec {
        opcode: "setTime",
        description: "Set the time of day.",
        args: &[menu("TIME_ID", catalog::TIMES, "day")],
    },
    BlockSpec {
        opcode: "setWeather",
        description: "Set the weather.",
        args: &[menu("WEATHER", catalog::WEATHER, "clear")],
    },
    BlockSpec {
        opcode: "resetEvent",
        description: "Clear the last triggered event on the game server.",
        args: &[],
    },
];

const REPORTER_BLOCKS: &[BlockSpec] = &[
    BlockSpec {
        opcode: "getPollValue",
        description: "Full text of the last poll response.",
        args: &[],
    },
    BlockSpec {
        opcode: "getBlockType",
        description: "Type of the last block touched.",
        args: &[],
    },
    BlockSpec {
        opcode: "getBlockData",
        description: "Data value of the last block touched.",
        args: &[],
    },
    BlockSpec {
        opcode: "getEvent",
        description: "Last triggered event.",
        args: &[],
    },
    BlockSpec {
        opcode: "getEventAction",
        description: "Action of the last event.",
        args: &[],
    },
    BlockSpec {
        opcode: "getItemInHand",
        description: "Item in hand during the last event.",
        args: &[],
    },
    BlockSpec {
        opcode: "getEventHand",
        description: "Hand used in the last event.",
        args: &[],
    },
    BlockSpec {
        opcode: "getEventMaterial",
        description: "Material involved in the last event.",
        args: &[],
    },
    BlockSpec {
        opcode: "getEventBlockFace",
        description: "Block face involved in the last event.",
        args: &[],
    },
    BlockSpec {
        opcode: "getCoordinate",
        description: "One coordinate of the player or drone position. Example: {\"TARGET\": \"drone\", \"COORDINATE\": \"y\"}",
        args: &[
            menu("COORDINATE", catalog::COORDINATES, "x"),
            menu("TARGET", catalog::TARGETS, "player"),
        ],
    },
    BlockSpec {
        opcode: "getResult",
        description: "Result of the last command, as reported by the server.",
        args: &[],
    },
];

/// Schema default in the property's own JSON type
fn default_value(kind: ArgKind, default: &'static str) -> Value {
    match kind {
        ArgKind::Text => Value::from(default),
        ArgKind::Number => default
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| default.parse::<f64>().map(Value::from))
            .unwrap_or_else(|_| Value::from(default)),
    }
}

fn input_schema(args: &[ArgSpec]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for arg in args {
        let mut prop = Map::new();
        let kind = match arg.kind {
            ArgKind::Text => "string",
            ArgKind::Number => "number",
        };
        prop.insert("type".into(), Value::from(kind));
        if let Some(values) = arg.menu {
            prop.insert("examples".into(), Value::from(values.to_vec()));
        }
        match arg.default {
            Some(default) => {
                prop.insert("default".into(), default_value(arg.kind, default));
            }
            None => required.push(arg.key),
        }
        properties.insert(arg.key.into(), Value::Object(prop));
    }

    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

/// Get list of available tools
pub fn list_tools() -> Vec<ToolDef> {
    COMMAND_BLOCKS
        .iter()
        .chain(REPORTER_BLOCKS)
        .map(|block| ToolDef {
            name: block.opcode.into(),
            description: block.description.into(),
            input_schema: input_schema(block.args),
        })
        .collect()
}

/// Build a command from tool arguments, filling in block defaults
pub fn command_from_arguments(name: &str, arguments: Value) -> Result<Command> {
    let block = COMMAND_BLOCKS
        .iter()
        .find(|b| b.opcode == name)
        .ok_or_else(|| BridgeError::UnknownOperation(name.to_string()))?;

    let mut object = match arguments {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(BridgeError::InvalidArgument(format!(
                "arguments must be an object, got {}",
                other
            )));
        }
    };

    for arg in block.args {
        if let Some(default) = arg.default {
            object
                .entry(arg.key)
                .or_insert_with(|| Value::from(default));
        }
    }
    object.insert("opcode".into(), Value::from(name));

    serde_json::from_value(Value::Object(object))
        .map_err(|e| BridgeError::InvalidArgument(format!("{}: {}", name, e)))
}

/// Read a reporter value from the snapshot, or None if `name` is not a reporter
fn read_reporter(name: &str, arguments: &Value, snapshot: &StateSnapshot) -> Option<String> {
    let value = match name {
        "getPollValue" => &snapshot.poll_raw,
        "getBlockType" => &snapshot.block_type,
        "getBlockData" => &snapshot.block_data,
        "getEvent" => &snapshot.event,
        "getEventAction" => &snapshot.event_action,
        "getItemInHand" => &snapshot.event_item_in_hand,
        "getEventHand" => &snapshot.event_hand,
        "getEventMaterial" => &snapshot.event_material,
        "getEventBlockFace" => &snapshot.event_block_face,
        "getResult" => &snapshot.result,
        "getCoordinate" => {
            // Absent keys take the block default; a non-string value names no
            // target or axis.
            let arg = |key: &str, default: &'static str| match arguments.get(key) {
                None | Some(Value::Null) => Some(default),
                Some(value) => value.as_str(),
            };
            let value = match (arg("TARGET", "player"), arg("COORDINATE", "x")) {
                (Some(target), Some(axis)) => snapshot.coordinate(target, axis),
                _ => None,
            };
            // Unknown pairs read as empty, like an unset field.
            return Some(value.unwrap_or_default().to_string());
        }
        _ => return None,
    };
    Some(value.clone())
}

async fn call_tool<S: ControlSurface>(
    name: &str,
    arguments: Value,
    surface: &Arc<RwLock<S>>,
) -> Result<String> {
    let surface = surface.read().await;

    if let Some(value) = read_reporter(name, &arguments, &surface.snapshot()) {
        return Ok(value);
    }

    let command = command_from_arguments(name, arguments)?;
    let request = surface.dispatch(command).await?;
    debug!("Dispatched {} as {}", name, request);

    Ok(serde_json::json!({ "path": request.path() }).to_string())
}

/// Handle a tools/call request
pub async fn handle_tool_call<S: ControlSurface>(
    name: &str,
    arguments: Value,
    id: RequestId,
    surface: &Arc<RwLock<S>>,
) -> Response {
    match call_tool(name, arguments, surface).await {
        Ok(text) => Response::success(
            id,
            serde_json::json!({ "content": [{ "type": "text", "text": text }] }),
        ),
        Err(e) => {
            let code = match &e {
                BridgeError::UnknownOperation(_) => error_codes::UNKNOWN_OPERATION,
                BridgeError::InvalidArgument(_) | BridgeError::Serialization(_) => {
                    error_codes::INVALID_PARAMS
                }
                BridgeError::Transport(_) => error_codes::TRANSPORT_FAILED,
                _ => error_codes::INTERNAL_ERROR,
            };
            Response::error(id, code, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::mock::MockSurface;
    use scratchcraft_core::{Axis, StateField};
    use std::collections::HashSet;

    fn surface_with(snapshot: StateSnapshot) -> Arc<RwLock<MockSurface>> {
        Arc::new(RwLock::new(MockSurface {
            snapshot,
            ..Default::default()
        }))
    }

    fn text_of(response: &Response) -> String {
        response.result.as_ref().unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_tool_names_unique() {
        let tools = list_tools();
        let names: HashSet<_> = tools.iter().map(|t| t.name.clone()).collect();

        assert_eq!(names.len(), tools.len());
        assert_eq!(tools.len(), COMMAND_BLOCKS.len() + REPORTER_BLOCKS.len());
        assert!(names.contains("buildShape"));
        assert!(names.contains("getCoordinate"));
        assert!(!names.contains("chickentype"));
    }

    #[test]
    fn test_schema_marks_required_arguments() {
        let tools = list_tools();
        let teleport = tools.iter().find(|t| t.name == "teleport").unwrap();

        assert_eq!(teleport.input_schema["required"], serde_json::json!(["PLAYER_NAME"]));
        assert_eq!(
            teleport.input_schema["properties"]["TELEPORT_X"]["type"],
            "number"
        );
        assert!(teleport.input_schema["properties"]["TELEPORT_X"]["default"].is_number());
        assert!(teleport.input_schema["properties"]["TELEPORT_TYPE"]["default"].is_string());
        assert_eq!(
            teleport.input_schema["properties"]["TELEPORT_TYPE"]["examples"],
            serde_json::json!(["at", "offset", "to_drone"])
        );
    }

    #[test]
    fn test_every_command_block_parses_with_defaults() {
        for block in COMMAND_BLOCKS {
            let mut args = Map::new();
            for arg in block.args.iter().filter(|a| a.default.is_none()) {
                args.insert(arg.key.into(), Value::from("Steve"));
            }
            let command = command_from_arguments(block.opcode, Value::Object(args));
            assert!(command.is_ok(), "{}: {:?}", block.opcode, command.err());
            assert_eq!(command.unwrap().opcode(), block.opcode);
        }
    }

    #[test]
    fn test_defaults_fill_missing_arguments() {
        let command = command_from_arguments("rainbow", Value::Null).unwrap();
        assert_eq!(command.request().path(), "/rainbow/12");

        let command =
            command_from_arguments("moveDrone", serde_json::json!({ "COUNT": 4 })).unwrap();
        assert_eq!(command.request().path(), "/moveDrone/fwd/4");
    }

    #[test]
    fn test_missing_required_argument() {
        let result = command_from_arguments("connectPlayer", serde_json::json!({}));
        assert!(matches!(result, Err(BridgeError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_command_tool_dispatches() {
        let surface = surface_with(StateSnapshot::default());
        let response = handle_tool_call(
            "buildShape",
            serde_json::json!({
                "SHAPE": "box", "BLOCK_TYPE": 1, "BLOCK_DATA": 0,
                "BLOCK_X": 2, "BLOCK_Y": 3, "BLOCK_Z": 4
            }),
            RequestId::Number(1),
            &surface,
        )
        .await;

        assert!(response.error.is_none());
        assert_eq!(text_of(&response), r#"{"path":"/build/box/1/0/2/3/4"}"#);
        let dispatched = surface.read().await.dispatched.lock().unwrap().clone();
        assert_eq!(dispatched, vec!["/build/box/1/0/2/3/4".to_string()]);
    }

    #[tokio::test]
    async fn test_reporter_reads_snapshot() {
        let mut snapshot = StateSnapshot::default();
        snapshot.set(StateField::DronePosition(Axis::Y), "65");
        snapshot.set(StateField::PlayerPosition(Axis::Y), "70");
        snapshot.set(StateField::EventItemInHand, "STICK");
        let surface = surface_with(snapshot);

        let response = handle_tool_call(
            "getCoordinate",
            serde_json::json!({ "TARGET": "drone", "COORDINATE": "y" }),
            RequestId::Number(2),
            &surface,
        )
        .await;
        assert_eq!(text_of(&response), "65");

        let response =
            handle_tool_call("getItemInHand", Value::Null, RequestId::Number(3), &surface).await;
        assert_eq!(text_of(&response), "STICK");

        let response = handle_tool_call(
            "getCoordinate",
            serde_json::json!({ "TARGET": "cow", "COORDINATE": "y" }),
            RequestId::Number(4),
            &surface,
        )
        .await;
        assert_eq!(text_of(&response), "");
        assert!(surface.read().await.dispatched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_coordinate_rejects_non_string_menu_values() {
        let mut snapshot = StateSnapshot::default();
        snapshot.set(StateField::PlayerPosition(Axis::X), "12");
        let surface = surface_with(snapshot);

        for (id, arguments) in [
            (6, serde_json::json!({ "TARGET": 7, "COORDINATE": "x" })),
            (7, serde_json::json!({ "TARGET": "player", "COORDINATE": ["x"] })),
        ] {
            let response =
                handle_tool_call("getCoordinate", arguments, RequestId::Number(id), &surface).await;
            assert_eq!(text_of(&response), "");
        }

        // Absent keys still fall back to player / x
        let response =
            handle_tool_call("getCoordinate", Value::Null, RequestId::Number(8), &surface).await;
        assert_eq!(text_of(&response), "12");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let surface = surface_with(StateSnapshot::default());
        let response =
            handle_tool_call("chickentype", Value::Null, RequestId::Number(5), &surface).await;

        let error = response.error.unwrap();
        assert_eq!(error.code, error_codes::UNKNOWN_OPERATION);
        tokio_test::assert_ok!(serde_json::to_string(&error));
    }
}
