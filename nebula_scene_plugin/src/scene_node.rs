/// Scene node types.
///
/// `SNMesh` and `SNLight` embed a `SceneNode` as their base part, so the
/// node attributes, methods and signals apply to them as well.

use std::sync::{Arc, Mutex, PoisonError};
use nebula_core::glam::Vec3;
use nebula_core::nebula::rtti::{DynEvent, DynEventHandler, DynParams, Signature, Var, VarType};

/// Signature of position notifications: `void(vec3)`
pub fn position_signature() -> Signature {
    Signature::new(VarType::Void, vec![VarType::Vec3])
}

// ===== SCENE NODE =====

/// Named node with a position
///
/// `event_position` is emitted with the new position after every move.
#[derive(Debug)]
pub struct SceneNode {
    pub name: String,
    pub position: Vec3,
    pub visible: bool,
    pub event_position: DynEvent,
}

impl SceneNode {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            position: Vec3::ZERO,
            visible: true,
            event_position: DynEvent::new(position_signature()),
        }
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::new()
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
        self.notify_position();
    }

    /// Move by an offset and return the new position
    pub fn translate(&mut self, offset: Vec3) -> Vec3 {
        self.position += offset;
        self.notify_position();
        self.position
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    fn notify_position(&self) {
        let params = DynParams::from_values(VarType::Void, vec![Var::Vec3(self.position)]);
        self.event_position.emit(&params);
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SceneNode {
    /// Copies the node data; the copy's event starts without connections
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            position: self.position,
            visible: self.visible,
            event_position: DynEvent::new(position_signature()),
        }
    }
}

impl PartialEq for SceneNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.position == other.position && self.visible == other.visible
    }
}

nebula_core::impl_object!(SceneNode, "Nebula::SceneNode");

// ===== MESH NODE =====

/// Node rendering a mesh file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SNMesh {
    pub node: SceneNode,
    pub mesh_file: String,
    pub cast_shadows: bool,
}

nebula_core::impl_object!(SNMesh, "Nebula::SNMesh", base: node);

// ===== LIGHT NODE =====

/// Point light node
///
/// `slot_look_at` stores the received position as the light's target, so
/// a light can follow any node whose `event_position` it is connected to.
#[derive(Debug)]
pub struct SNLight {
    pub node: SceneNode,
    pub color: Vec3,
    pub range: f32,
    pub intensity: f32,
    target: Arc<Mutex<Vec3>>,
    pub slot_look_at: DynEventHandler,
}

impl SNLight {
    pub fn new() -> Self {
        Self::with_target(Vec3::ZERO)
    }

    fn with_target(target: Vec3) -> Self {
        let target = Arc::new(Mutex::new(target));
        let slot_target = target.clone();
        Self {
            node: SceneNode::new(),
            color: Vec3::ONE,
            range: 10.0,
            intensity: 1.0,
            target,
            slot_look_at: DynEventHandler::new(move |position: Vec3| {
                *slot_target.lock().unwrap_or_else(PoisonError::into_inner) = position;
            }),
        }
    }

    /// Whether a point lies within the light's range
    pub fn reaches(&self, point: Vec3) -> bool {
        self.node.distance_to(point) <= self.range
    }

    /// Point the light looks at
    pub fn target(&self) -> Vec3 {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_target(&mut self, target: Vec3) {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner) = target;
    }
}

impl Default for SNLight {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SNLight {
    /// Copies the light data; the copy's slot starts without connections
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            color: self.color,
            range: self.range,
            intensity: self.intensity,
            ..Self::with_target(self.target())
        }
    }
}

impl PartialEq for SNLight {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
            && self.color == other.color
            && self.range == other.range
            && self.intensity == other.intensity
            && self.target() == other.target()
    }
}

nebula_core::impl_object!(SNLight, "Nebula::SNLight", base: node);

#[cfg(test)]
#[path = "scene_node_tests.rs"]
mod tests;
