/*!
# Nebula Scene Plugin

Reflected scene node classes for the Nebula engine.

- **SceneNode** (`Nebula::SceneNode`): named node with a position, emitting
  `EventPosition` when moved
- **SNMesh** (`Nebula::SNMesh`): node rendering a mesh file
- **SNLight** (`Nebula::SNLight`): point light node; its `SlotLookAt` slot
  follows any node's `EventPosition`

The classes are registered by `SceneModule`, either installed statically or
offered as a plugin entry point and activated by a manifest naming the
`NebulaScene` module (see `plugins/nebula_scene.plugin`).
*/

mod scene_node;
mod scene_module;

pub use scene_node::{SceneNode, SNMesh, SNLight, position_signature};
pub use scene_module::{SceneModule, SCENE_MODULE_NAME, plugin_entry};
