//! IPC message protocol for Atelier
//!
//! Defines all message types exchanged between the editor viewport and UI
//! panels (object list, property panel, add menu). Messages are JSON with an
//! adjacent `type`/`data` tag.

pub mod commands;
pub mod error;
pub mod input;
pub mod messages;
pub mod types;

pub use commands::*;
pub use error::*;
pub use input::*;
pub use messages::*;
pub use types::*;

/// Serialize an editor message to JSON
pub fn encode(message: &EditorToUi) -> Result<String, IpcError> {
    Ok(serde_json::to_string(message)?)
}

/// Parse a UI message from JSON
pub fn decode(json: &str) -> Result<UiToEditor, IpcError> {
    if json.trim().is_empty() {
        return Err(IpcError::InvalidFormat("empty message".to_string()));
    }
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_message_shape() {
        let json = encode(&EditorToUi::SelectionChanged {
            selected_id: Some("cube".to_string()),
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "SelectionChanged");
        assert_eq!(value["data"]["selected_id"], "cube");
    }

    #[test]
    fn test_unit_message_has_no_data() {
        let json = encode(&EditorToUi::SelectionChanged { selected_id: None }).unwrap();
        assert!(json.contains("null"));
        let value: serde_json::Value =
            serde_json::to_value(UiToEditor::Ready).unwrap();
        assert_eq!(value["type"], "Ready");
    }

    #[test]
    fn test_decode_ui_commands() {
        let msg = decode(
            r#"{"type":"ObjectCommand","data":{"Transform":{"id":"cube","transform":{"position":[1.0,2.0,3.0],"rotation":[0.0,0.5,0.0],"scale":[1.0,1.0,1.0]}}}}"#,
        )
        .unwrap();
        let UiToEditor::ObjectCommand(ObjectCommand::Transform { id, transform }) = msg else {
            panic!("unexpected message: {msg:?}");
        };
        assert_eq!(id, "cube");
        assert_eq!(transform.position, [1.0, 2.0, 3.0]);
        assert_eq!(transform.rotation[1], 0.5);

        let msg = decode(r#"{"type":"AddObject","data":{"object_type":"Torus","position":null,"name":null}}"#)
            .unwrap();
        assert_eq!(
            msg,
            UiToEditor::AddObject(AddObjectRequest {
                object_type: ObjectType::Torus,
                position: None,
                name: None,
            })
        );
    }

    #[test]
    fn test_forwarded_mouse_move_defaults_modifiers() {
        let msg = decode(r#"{"type":"Input","data":{"Mouse":{"Move":{"x":10.0,"y":20.0}}}}"#).unwrap();
        assert_eq!(
            msg,
            UiToEditor::Input(InputEvent::Mouse(MouseEvent::Move {
                x: 10.0,
                y: 20.0,
                modifiers: Modifiers::default(),
            }))
        );
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode("   "), Err(IpcError::InvalidFormat(_))));
        assert!(matches!(
            decode(r#"{"type":"Nope"}"#),
            Err(IpcError::Serialize(_))
        ));
    }

    #[test]
    fn test_object_type_is_mesh() {
        assert!(ObjectType::Cube.is_mesh());
        assert!(ObjectType::Mesh.is_mesh());
        assert!(!ObjectType::Light.is_mesh());
    }
}
