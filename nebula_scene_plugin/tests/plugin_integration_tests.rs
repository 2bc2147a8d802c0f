//! Integration tests for loading the scene module as a plugin
//!
//! The manifest shipped in `plugins/` activates the `NebulaScene` entry point.
//!
//! Run with: cargo test --test plugin_integration_tests

use nebula_core::nebula::{Engine, EngineConfig};
use nebula_core::nebula::rtti::{ClassFilter, DefaultValue, Var};
use nebula_core::glam::Vec3;
use nebula_scene_plugin::{plugin_entry, SceneModule, SCENE_MODULE_NAME};
use std::path::PathBuf;
use serial_test::serial;

fn plugins_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("plugins")
}

// ============================================================================
// PLUGIN LOADING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_scene_plugin_from_config() {
    let mut config = EngineConfig::default();
    config.plugins.paths = vec![plugins_dir()];
    Engine::initialize_with(config).unwrap();
    Engine::create_class_manager(&[], vec![plugin_entry()]).unwrap();

    let manager = Engine::class_manager().unwrap();
    {
        let manager = manager.read().unwrap();
        let module = manager.module_by_name(SCENE_MODULE_NAME).unwrap();
        assert!(module.is_plugin());
        assert_eq!(module.manifest(), Some(plugins_dir().join("nebula_scene.plugin").as_path()));

        let nodes = manager.find_classes("Nebula::SceneNode", ClassFilter::RECURSIVE, None);
        let names: Vec<&str> = nodes.iter().map(|c| c.class_name()).collect();
        assert_eq!(names, vec!["Nebula::SNMesh", "Nebula::SNLight"]);

        let mut mesh = manager.class("Nebula::SNMesh").unwrap().create().unwrap();
        mesh.set_values(&manager, "Name=\"Crate\" MeshFile=\"crate.mesh\" Position=\"1 2 -3\"");
        assert_eq!(mesh.get_attribute(&manager, "Position"), Some(Var::Vec3(Vec3::new(1.0, 2.0, -3.0))));
        assert_eq!(
            mesh.get_values(&manager, DefaultValue::NoDefault),
            "Name=\"Crate\" Position=\"1 2 -3\" MeshFile=\"crate.mesh\""
        );
    }

    Engine::shutdown();
    assert!(manager.read().unwrap().class("Nebula::SNMesh").is_none());
}

#[test]
#[serial]
fn test_integration_scene_module_static() {
    Engine::initialize_with(EngineConfig::default()).unwrap();
    Engine::create_class_manager(&[&SceneModule], Vec::new()).unwrap();

    {
        let manager = Engine::class_manager().unwrap();
        let manager = manager.read().unwrap();
        assert!(!manager.module_by_name(SCENE_MODULE_NAME).unwrap().is_plugin());
        assert!(manager.class("Nebula::SNLight").unwrap().is_derived_from("Nebula::Object"));
    }

    Engine::shutdown();
}

#[test]
#[serial]
fn test_integration_scene_plugin_without_entry() {
    let mut config = EngineConfig::default();
    config.plugins.paths = vec![plugins_dir()];
    Engine::initialize_with(config).unwrap();

    // Manifest names a module with no entry point: logged and skipped
    Engine::create_class_manager(&[], Vec::new()).unwrap();
    {
        let manager = Engine::class_manager().unwrap();
        let manager = manager.read().unwrap();
        assert!(manager.module_by_name(SCENE_MODULE_NAME).is_none());
        assert!(manager.class("Nebula::Object").is_some());
    }

    Engine::shutdown();
}
