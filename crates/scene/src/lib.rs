//! Bevy host for the Atelier viewport engine
//!
//! The engine ([`viewport::Viewport`]) decides everything; this crate feeds
//! it input, mirrors its scene onto ECS entities, draws helpers and forwards
//! its notifications to the UI as IPC messages.

use atelier_config::ViewportSettings;
use atelier_ipc::EditorToUi;
use bevy::prelude::*;
use viewport::{Viewport, ViewportEvent};

mod camera;
mod helpers;
mod lighting;
mod mirror;
mod sync;
mod ui_bridge;

pub use camera::{MainCamera, pose_transform};
pub use lighting::{LightingPlugin, SunLight};
pub use mirror::{SceneMirror, SceneOp};
pub use sync::{SceneAssets, SceneMarker, SceneNode, primitive_mesh, to_bevy_transform};
pub use ui_bridge::{UiCommand, apply_ui_message, initialize_message, input_event};

/// The interaction engine as a Bevy resource
#[derive(Resource, Deref, DerefMut)]
pub struct EditorViewport(pub Viewport<SceneMirror>);

/// One engine input event for the next frame
#[derive(Message, Debug, Clone)]
pub struct ViewportInput(pub ViewportEvent);

/// Resource for queuing messages to send to the UI
/// The host app drains this and forwards it to whatever UI is attached
#[derive(Resource, Default)]
pub struct OutboundUiMessages {
    pub messages: Vec<EditorToUi>,
}

impl OutboundUiMessages {
    /// Queue a message to be sent to the UI
    pub fn send(&mut self, msg: EditorToUi) {
        self.messages.push(msg);
    }

    /// Take all queued messages, leaving the queue empty
    pub fn drain(&mut self) -> Vec<EditorToUi> {
        std::mem::take(&mut self.messages)
    }
}

/// Ordering of the per-frame viewport work
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewportSystems {
    /// Input and UI commands reach the engine
    Input,
    /// Engine state is mirrored onto entities and the camera
    Sync,
    /// Notifications go out, helpers are drawn
    Output,
}

/// Uses the [`ViewportSettings`] resource when present, defaults otherwise
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<ViewportSettings>()
            .cloned()
            .unwrap_or_default();
        app.insert_resource(EditorViewport(Viewport::new(
            SceneMirror::default(),
            settings,
        )));

        app.init_resource::<OutboundUiMessages>()
            .init_resource::<SceneAssets>()
            .add_message::<ViewportInput>()
            .add_message::<UiCommand>();

        app.add_plugins(LightingPlugin);

        app.configure_sets(
            Update,
            (
                ViewportSystems::Input,
                ViewportSystems::Sync,
                ViewportSystems::Output,
            )
                .chain(),
        );

        app.add_systems(
            Startup,
            (setup_scene, camera::spawn_main_camera).chain(),
        )
        .add_systems(
            Update,
            (
                (process_viewport_input, ui_bridge::handle_ui_commands)
                    .chain()
                    .in_set(ViewportSystems::Input),
                (sync::apply_scene_ops, camera::sync_camera)
                    .chain()
                    .in_set(ViewportSystems::Sync),
                (
                    ui_bridge::forward_notifications,
                    helpers::draw_scene_helpers,
                    helpers::draw_markers,
                )
                    .in_set(ViewportSystems::Output),
            ),
        );
    }
}

/// Populate the default scene: grid, axis gizmo, scene camera and a selected cube
fn setup_scene(mut viewport: ResMut<EditorViewport>) {
    if let Err(e) = viewport.populate_default_scene() {
        error!("Failed to populate default scene: {}", e);
        return;
    }
    info!("Scene setup complete: {} objects", viewport.registry().len());
}

/// Feed queued input events to the engine in arrival order
fn process_viewport_input(
    mut viewport: ResMut<EditorViewport>,
    mut events: MessageReader<ViewportInput>,
) {
    for event in events.read() {
        if let Some(transition) = viewport.handle(event.0.clone()) {
            debug!("Viewport transition: {:?}", transition);
        }
    }
}
