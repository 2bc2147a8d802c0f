/// Tests for AttributeDesc, MethodDesc and ConstructorDesc

use super::*;
use glam::Vec3;

// ============================================================================
// Helper Types
// ============================================================================

#[derive(Default)]
struct Node {
    name: String,
    position: Vec3,
    visits: u32,
}

crate::impl_object!(Node, "Test::Node");

#[derive(Default)]
struct Light {
    node: Node,
    range: f32,
}

crate::impl_object!(Light, "Test::Light", base: node);

fn name_attribute() -> AttributeDesc {
    AttributeDesc::new(
        "Name",
        "Node name",
        "",
        |n: &Node| n.name.clone(),
        |n: &mut Node, v: String| n.name = v,
    )
}

fn position_attribute() -> AttributeDesc {
    AttributeDesc::new(
        "Position",
        "Node position",
        "0 0 0",
        |n: &Node| n.position,
        |n: &mut Node, v: Vec3| n.position = v,
    )
}

// ============================================================================
// Tests: AttributeDesc
// ============================================================================

#[test]
fn test_attribute_metadata() {
    let attribute = position_attribute();
    assert_eq!(attribute.name(), "Position");
    assert_eq!(attribute.var_type(), VarType::Vec3);
    assert_eq!(attribute.default_value(), "0 0 0");
    assert_eq!(attribute.flags(), AttributeFlags::READ | AttributeFlags::WRITE);
    assert!(attribute.is_writable());
}

#[test]
fn test_attribute_get_set() {
    let attribute = position_attribute();
    let mut node = Node::default();

    assert!(attribute.set_str(&mut node, "1 2 -3"));
    assert_eq!(node.position, Vec3::new(1.0, 2.0, -3.0));
    assert_eq!(attribute.get(&node), Some(Var::Vec3(Vec3::new(1.0, 2.0, -3.0))));
}

#[test]
fn test_attribute_wrong_type_refused() {
    let attribute = name_attribute();
    let mut node = Node::default();

    assert!(!attribute.set(&mut node, Var::Int(3)));
    assert_eq!(node.name, "");
}

#[test]
fn test_attribute_malformed_text_refused() {
    let attribute = position_attribute();
    let mut node = Node { position: Vec3::ONE, ..Default::default() };

    assert!(!attribute.set_str(&mut node, "1 2"));
    assert_eq!(node.position, Vec3::ONE);
}

#[test]
fn test_read_only_attribute() {
    let attribute = AttributeDesc::read_only("Visits", "Visit counter", "0", |n: &Node| n.visits);
    let mut node = Node { visits: 4, ..Default::default() };

    assert_eq!(attribute.flags(), AttributeFlags::READ);
    assert!(!attribute.set(&mut node, Var::UInt(1)));
    assert_eq!(attribute.get(&node), Some(Var::UInt(4)));
}

#[test]
fn test_attribute_default() {
    let attribute = AttributeDesc::new(
        "Range",
        "Light range",
        "10",
        |l: &Light| l.range,
        |l: &mut Light, v: f32| l.range = v,
    );
    let mut light = Light::default();

    assert!(!attribute.is_default(&light));
    assert!(attribute.set_default(&mut light));
    assert_eq!(light.range, 10.0);
    assert!(attribute.is_default(&light));
}

#[test]
fn test_base_attribute_on_derived_object() {
    let attribute = name_attribute();
    let mut light = Light::default();

    assert!(attribute.set_str(&mut light, "Sun"));
    assert_eq!(light.node.name, "Sun");
    assert_eq!(attribute.get(&light), Some(Var::String("Sun".to_string())));
}

#[test]
fn test_derived_attribute_on_base_object() {
    let attribute = AttributeDesc::new("Range", "", "10", |l: &Light| l.range, |l: &mut Light, v: f32| l.range = v);
    let mut node = Node::default();

    assert_eq!(attribute.get(&node), None);
    assert!(!attribute.set(&mut node, Var::Float(1.0)));
}

// ============================================================================
// Tests: MethodDesc
// ============================================================================

#[test]
fn test_method_call() {
    let method = MethodDesc::new("Move", "Offset the node", |n: &mut Node, x: f32, y: f32, z: f32| {
        n.position += Vec3::new(x, y, z);
        n.position.length()
    });
    assert_eq!(method.signature().to_string(), "float(float,float,float)");

    let mut light = Light::default();
    let mut params = DynParams::from_string(method.signature().clone(), "Param0=3 Param1=4 Param2=0");
    assert!(method.call(&mut light, &mut params));
    assert_eq!(light.node.position, Vec3::new(3.0, 4.0, 0.0));
    assert_eq!(params.return_value(), &Var::Float(5.0));
}

#[test]
fn test_method_signature_mismatch() {
    let method = MethodDesc::new("Visit", "", |n: &mut Node| n.visits += 1);
    let mut node = Node::default();
    let mut params = DynParams::from_values(VarType::Void, vec![Var::Int(1)]);

    assert!(!method.call(&mut node, &mut params));
    assert_eq!(node.visits, 0);
}

// ============================================================================
// Tests: ConstructorDesc
// ============================================================================

#[test]
fn test_default_constructor() {
    let ctor = ConstructorDesc::new("ctor", "Default constructor", Node::default);
    assert!(ctor.is_default());

    let object = ctor.create(&DynParams::new(Signature::default())).unwrap();
    assert_eq!(object.class_name(), "Test::Node");
}

#[test]
fn test_constructor_with_params() {
    let ctor = ConstructorDesc::new("ctor_name", "", |name: String| Node { name, ..Default::default() });
    assert!(!ctor.is_default());
    assert_eq!(ctor.signature().to_string(), "void(string)");

    let params = DynParams::from_values(VarType::Void, vec![Var::String("Root".into())]);
    let object = ctor.create(&params).unwrap();
    let node = object.as_any().downcast_ref::<Node>().unwrap();
    assert_eq!(node.name, "Root");

    let wrong = DynParams::from_values(VarType::Void, vec![Var::Int(1)]);
    assert!(ctor.create(&wrong).is_none());
}

#[test]
fn test_constructor_ignores_return_type() {
    let ctor = ConstructorDesc::new("ctor", "", |visits: u32| Node { visits, ..Default::default() });
    let params = DynParams::from_values(VarType::Int, vec![Var::UInt(2)]);
    assert!(ctor.create(&params).is_some());
}
