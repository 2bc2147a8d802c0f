/// Registration of the scene classes.

use std::sync::Arc;
use nebula_core::glam::Vec3;
use nebula_core::nebula::Result;
use nebula_core::nebula::rtti::{Class, ClassManager, ModuleId, ModuleInfo, ModuleRegistrar};
use crate::scene_node::{position_signature, SceneNode, SNLight, SNMesh};

/// Module name plugin manifests refer to
pub const SCENE_MODULE_NAME: &str = "NebulaScene";

/// Registrar of `Nebula::SceneNode`, `Nebula::SNMesh` and `Nebula::SNLight`
pub struct SceneModule;

impl ModuleRegistrar for SceneModule {
    fn module_info(&self) -> ModuleInfo {
        ModuleInfo::new(SCENE_MODULE_NAME)
            .vendor("Nebula")
            .license("MIT OR Apache-2.0")
            .description("Scene node classes")
    }

    fn register(&self, manager: &mut ClassManager, module: ModuleId) -> Result<()> {
        nebula_core::engine_debug!("nebula::Scene", "Registering scene classes (module {})", module);
        manager.register_class(module, scene_node_class())?;
        manager.register_class(module, mesh_class())?;
        manager.register_class(module, light_class())?;
        Ok(())
    }
}

/// Plugin entry point for `Engine::create_class_manager`
pub fn plugin_entry() -> Arc<dyn ModuleRegistrar> {
    Arc::new(SceneModule)
}

fn scene_node_class() -> Class {
    Class::builder("Nebula", "SceneNode")
        .description("Named node with a position")
        .base("Nebula::Object")
        .property("Category", "Scene")
        .property("Icon", "node.png")
        .attribute("Name", "Node name", "",
            |n: &SceneNode| n.name.clone(),
            |n: &mut SceneNode, v: String| n.name = v)
        .attribute("Position", "Position in parent space", "0 0 0",
            |n: &SceneNode| n.position,
            |n: &mut SceneNode, v: Vec3| n.position = v)
        .attribute("Visible", "Whether the node is drawn", "true",
            |n: &SceneNode| n.visible,
            |n: &mut SceneNode, v: bool| n.visible = v)
        .method("SetPosition", "Set the position from components",
            |n: &mut SceneNode, x: f32, y: f32, z: f32| n.set_position(x, y, z))
        .method("Translate", "Move by an offset, returns the new position",
            |n: &mut SceneNode, offset: Vec3| n.translate(offset))
        .signal("EventPosition", "Emitted with the new position after a move", position_signature(),
            |n: &SceneNode| &n.event_position)
        .constructor("ctor", "Unnamed node", SceneNode::new)
        .constructor("ctor_name", "Named node", |name: String| SceneNode::named(&name))
        .build()
}

fn mesh_class() -> Class {
    Class::builder("Nebula", "SNMesh")
        .description("Node rendering a mesh file")
        .base("Nebula::SceneNode")
        .property("Icon", "mesh.png")
        .attribute("MeshFile", "Mesh file path", "",
            |m: &SNMesh| m.mesh_file.clone(),
            |m: &mut SNMesh, v: String| m.mesh_file = v)
        .attribute("CastShadows", "Whether the mesh casts shadows", "false",
            |m: &SNMesh| m.cast_shadows,
            |m: &mut SNMesh, v: bool| m.cast_shadows = v)
        .constructor("ctor", "Empty mesh node", SNMesh::default)
        .build()
}

fn light_class() -> Class {
    Class::builder("Nebula", "SNLight")
        .description("Point light node")
        .base("Nebula::SceneNode")
        .property("Icon", "light.png")
        .attribute("Color", "Light color", "1 1 1",
            |l: &SNLight| l.color,
            |l: &mut SNLight, v: Vec3| l.color = v)
        .attribute("Range", "Light range", "10",
            |l: &SNLight| l.range,
            |l: &mut SNLight, v: f32| l.range = v)
        .attribute("Intensity", "Light intensity", "1",
            |l: &SNLight| l.intensity,
            |l: &mut SNLight, v: f32| l.intensity = v)
        .attribute("Target", "Point the light looks at", "0 0 0",
            |l: &SNLight| l.target(),
            |l: &mut SNLight, v: Vec3| l.set_target(v))
        .method("Reaches", "Whether a point lies within range",
            |l: &mut SNLight, point: Vec3| l.reaches(point))
        .slot("SlotLookAt", "Look at the received position", position_signature(),
            |l: &SNLight| &l.slot_look_at)
        .constructor("ctor", "White light", SNLight::new)
        .build()
}

#[cfg(test)]
#[path = "scene_module_tests.rs"]
mod tests;
