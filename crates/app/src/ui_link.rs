//! Message link between the editor and an external UI process.
//!
//! In stdio mode a reader thread decodes `UiToEditor` JSON lines from stdin
//! and hands them to the main loop over a channel; outbound `EditorToUi`
//! messages are written to stdout one per line. Headless mode only logs them.

use std::io::{BufRead, Write};

use atelier_ipc::{EditorToUi, UiToEditor, decode, encode};
use atelier_scene::{OutboundUiMessages, UiCommand};
use bevy::prelude::*;
use tokio::sync::mpsc;

use crate::config::{AtelierConfig, UiLinkMode};

/// Receiving end of the stdin reader thread
#[derive(Resource)]
pub struct StdioLink {
    from_ui: mpsc::UnboundedReceiver<UiToEditor>,
}

pub struct UiLinkPlugin;

impl Plugin for UiLinkPlugin {
    fn build(&self, app: &mut App) {
        let mode = app
            .world()
            .get_resource::<AtelierConfig>()
            .map(|config| config.ui_link)
            .unwrap_or_default();

        if mode == UiLinkMode::Stdio {
            let (to_editor, from_ui) = mpsc::unbounded_channel();
            let spawned = std::thread::Builder::new()
                .name("ui-link-stdin".into())
                .spawn(move || read_messages(std::io::stdin().lock(), &to_editor));
            match spawned {
                Ok(_) => {
                    app.insert_resource(StdioLink { from_ui });
                    info!("UI link: reading messages from stdin");
                }
                Err(e) => error!("UI link: failed to start stdin reader: {}", e),
            }
        }

        app.add_systems(PreUpdate, poll_ui_link)
            .add_systems(PostUpdate, flush_outbound);
    }
}

/// Decode messages line by line until EOF or the receiver goes away.
///
/// Returns the number of messages delivered.
pub fn read_messages(reader: impl BufRead, to_editor: &mpsc::UnboundedSender<UiToEditor>) -> usize {
    let mut delivered = 0;
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("UI link: stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match decode(&line) {
            Ok(message) => {
                if to_editor.send(message).is_err() {
                    break;
                }
                delivered += 1;
            }
            Err(e) => warn!("UI link: dropping malformed message: {}", e),
        }
    }
    debug!("UI link: reader finished after {} messages", delivered);
    delivered
}

/// Move messages from the reader thread into the ECS
fn poll_ui_link(link: Option<ResMut<StdioLink>>, mut commands: MessageWriter<UiCommand>) {
    let Some(mut link) = link else {
        return;
    };
    while let Ok(message) = link.from_ui.try_recv() {
        commands.write(UiCommand(message));
    }
}

/// Window title reflecting the scene stats
pub fn window_title(object_count: usize, selected: Option<&str>) -> String {
    match selected {
        Some(id) => format!("Atelier - {} objects - {}", object_count, id),
        None => format!("Atelier - {} objects", object_count),
    }
}

/// Write each message as one JSON line, then flush. Messages that fail to
/// encode are skipped; the first I/O error ends the batch.
pub fn write_messages(out: &mut impl Write, messages: &[EditorToUi]) -> std::io::Result<usize> {
    let mut written = 0;
    for message in messages {
        let json = match encode(message) {
            Ok(json) => json,
            Err(e) => {
                error!("UI link: failed to encode {:?}: {}", message, e);
                continue;
            }
        };
        writeln!(out, "{}", json)?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// Deliver queued outbound messages and keep the window title current
fn flush_outbound(
    mut outbound: ResMut<OutboundUiMessages>,
    link: Option<Res<StdioLink>>,
    mut windows: Query<&mut Window>,
) {
    let messages = outbound.drain();
    if messages.is_empty() {
        return;
    }

    for message in &messages {
        if let EditorToUi::SceneStats {
            object_count,
            selected_id,
        } = message
        {
            if let Ok(mut window) = windows.single_mut() {
                window.title = window_title(*object_count, selected_id.as_deref());
            }
        }
    }

    if link.is_some() {
        if let Err(e) = write_messages(&mut std::io::stdout().lock(), &messages) {
            error!("UI link: stdout write failed: {}", e);
        }
    } else {
        for message in &messages {
            debug!("UI message: {:?}", message);
        }
    }
}
