//! Scene object registry and single-object selection.
//!
//! The registry owns every manipulable object. Selection is a single id; the
//! only way highlight state changes is through [`Registry::select`], which
//! always tears down the previous highlight before building the next one.

use std::collections::{HashMap, HashSet};

use atelier_config::{hex_to_rgb, HighlightSettings};
use tracing::{debug, info};

use crate::error::ViewportError;
use crate::notify::{Notification, Outbox};
use crate::scene_graph::{EmissiveOverlay, OutlineStyle, SceneGraph};
use crate::types::{MaterialHandle, NodeId, ObjectId, SceneObject, Transform};

/// Highlight applied to the current selection
#[derive(Debug, Clone, PartialEq)]
struct Highlight {
    object: ObjectId,
    /// Material the object had before highlighting, restored verbatim
    original_material: MaterialHandle,
    highlight_material: MaterialHandle,
    outline: Option<NodeId>,
}

/// Live set of manipulable objects plus the current selection
#[derive(Debug)]
pub struct Registry {
    objects: HashMap<ObjectId, SceneObject>,
    /// Insertion order, for object lists
    order: Vec<ObjectId>,
    by_node: HashMap<NodeId, ObjectId>,
    helpers: HashSet<NodeId>,
    selection: Option<ObjectId>,
    highlight: Option<Highlight>,
    overlay: EmissiveOverlay,
    outline_style: OutlineStyle,
}

impl Registry {
    pub fn new(settings: &HighlightSettings) -> Self {
        Self {
            objects: HashMap::new(),
            order: Vec::new(),
            by_node: HashMap::new(),
            helpers: HashSet::new(),
            selection: None,
            highlight: None,
            overlay: EmissiveOverlay {
                color: hex_to_rgb(settings.emissive_color),
                intensity: settings.emissive_intensity,
            },
            outline_style: OutlineStyle {
                color: hex_to_rgb(settings.outline_color),
                opacity: settings.outline_opacity,
            },
        }
    }

    /// Take ownership of an object and attach it to the scene
    pub fn add(
        &mut self,
        object: SceneObject,
        scene: &mut impl SceneGraph,
        outbox: &mut Outbox,
    ) -> Result<(), ViewportError> {
        if self.objects.contains_key(&object.id) {
            return Err(ViewportError::DuplicateObject(object.id));
        }
        scene.add_to_scene(&object);
        let id = object.id.clone();
        self.by_node.insert(object.node(), id.clone());
        outbox.push(Notification::ObjectAdded {
            id: id.clone(),
            kind: object.kind,
        });
        info!("Registry: added '{}'", id);
        self.order.push(id.clone());
        self.objects.insert(id, object);
        Ok(())
    }

    /// Remove an object, clearing the selection first if it is selected.
    ///
    /// Returns false for unknown ids.
    pub fn remove(
        &mut self,
        id: &ObjectId,
        scene: &mut impl SceneGraph,
        outbox: &mut Outbox,
    ) -> bool {
        if !self.objects.contains_key(id) {
            return false;
        }
        if self.selection.as_ref() == Some(id) {
            self.select(None, scene, outbox);
        }
        let Some(object) = self.objects.remove(id) else {
            return false;
        };
        self.order.retain(|o| o != id);
        self.by_node.remove(&object.node());
        scene.remove_from_scene(object.node());
        outbox.push(Notification::ObjectRemoved { id: id.clone() });
        info!("Registry: removed '{}'", id);
        true
    }

    /// Change the selection. Unknown ids are ignored and return false.
    pub fn select(
        &mut self,
        id: Option<&ObjectId>,
        scene: &mut impl SceneGraph,
        outbox: &mut Outbox,
    ) -> bool {
        if let Some(id) = id {
            if !self.objects.contains_key(id) {
                debug!("Registry: ignoring selection of unknown '{}'", id);
                return false;
            }
        }
        if self.selection.as_ref() == id {
            return true;
        }

        self.clear_highlight(scene);
        self.selection = id.cloned();
        if let Some(id) = id {
            self.apply_highlight(id, scene);
        }

        outbox.push(Notification::SelectionChanged {
            selected: self.selection.clone(),
        });
        debug!("Registry: selection is now {:?}", self.selection);
        true
    }

    fn clear_highlight(&mut self, scene: &mut impl SceneGraph) {
        let Some(highlight) = self.highlight.take() else {
            return;
        };
        if let Some(object) = self.objects.get(&highlight.object) {
            scene.set_material(object.node(), highlight.original_material);
        }
        scene.release_material(highlight.highlight_material);
        if let Some(outline) = highlight.outline {
            scene.remove_from_scene(outline);
        }
    }

    fn apply_highlight(&mut self, id: &ObjectId, scene: &mut impl SceneGraph) {
        let Some(object) = self.objects.get(id) else {
            return;
        };
        if !object.kind.is_mesh() {
            return;
        }
        let Some(original_material) = object.renderable.material else {
            return;
        };
        let node = object.node();
        let highlight_material = scene.highlight_material(original_material, &self.overlay);
        scene.set_material(node, highlight_material);
        let outline = self.spawn_outline(node, scene);
        self.highlight = Some(Highlight {
            object: id.clone(),
            original_material,
            highlight_material,
            outline,
        });
    }

    fn spawn_outline(&self, node: NodeId, scene: &mut impl SceneGraph) -> Option<NodeId> {
        let bounds = scene.bounding_box(node)?;
        Some(scene.add_outline(bounds, &self.outline_style))
    }

    /// Resize the selection outline to the object's current bounds
    fn refresh_outline(&mut self, scene: &mut impl SceneGraph) {
        let Some(highlight) = self.highlight.as_ref() else {
            return;
        };
        let Some(node) = self.objects.get(&highlight.object).map(SceneObject::node) else {
            return;
        };
        let outline = self.spawn_outline(node, scene);
        if let Some(highlight) = self.highlight.as_mut() {
            if let Some(old) = std::mem::replace(&mut highlight.outline, outline) {
                scene.remove_from_scene(old);
            }
        }
    }

    /// Write an object's transform and push it to the scene graph.
    ///
    /// Returns false for unknown ids.
    pub fn set_transform(
        &mut self,
        id: &ObjectId,
        transform: Transform,
        scene: &mut impl SceneGraph,
    ) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        object.transform = transform;
        scene.set_transform(object.node(), &transform);
        if self.highlight.as_ref().is_some_and(|h| &h.object == id) {
            self.refresh_outline(scene);
        }
        true
    }

    /// Currently selected object
    pub fn current(&self) -> Option<&SceneObject> {
        self.selection.as_ref().and_then(|id| self.objects.get(id))
    }

    pub fn current_id(&self) -> Option<&ObjectId> {
        self.selection.as_ref()
    }

    pub fn get(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Mark a scene node as non-selectable furniture
    pub fn register_helper(&mut self, node: NodeId) {
        self.helpers.insert(node);
    }

    /// Whether a node is helper geometry (registered helpers and the selection outline)
    pub fn is_helper(&self, node: NodeId) -> bool {
        self.helpers.contains(&node)
            || self
                .highlight
                .as_ref()
                .is_some_and(|h| h.outline == Some(node))
    }

    /// Root nodes eligible for picking
    pub fn selectable_nodes(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|o| o.selectable && !self.is_helper(o.node()))
            .map(SceneObject::node)
            .collect()
    }

    /// Registered object whose root node is exactly `node`
    pub fn owner_of(&self, node: NodeId) -> Option<&ObjectId> {
        self.by_node.get(&node)
    }

    /// Id of the highlighted object, if any
    pub fn highlighted(&self) -> Option<&ObjectId> {
        self.highlight.as_ref().map(|h| &h.object)
    }

    /// Outline helper node of the current highlight
    pub fn outline_node(&self) -> Option<NodeId> {
        self.highlight.as_ref().and_then(|h| h.outline)
    }
}
