/// Class records.
///
/// A `Class` holds only what its own declaration states: name, base class
/// name, properties and member descriptors. Inherited members are resolved
/// on demand by `ClassRef`, which pairs a class with the manager it is
/// registered in and walks the base chain by name.

use std::ops::Deref;
use super::class_manager::ClassManager;
use super::descriptor::{AttributeDesc, ConstructorDesc, IntoConstructor, IntoMethod, MethodDesc, SignalDesc, SlotDesc};
use super::event::{DynEvent, DynEventHandler};
use super::module::ModuleId;
use super::object::Object;
use super::params::DynParams;
use super::signature::Signature;
use super::var::VarValue;

// ===== CLASS =====

/// Reflection record of one class
#[derive(Debug, Clone)]
pub struct Class {
    name: String,
    namespace: String,
    class_name: String,
    description: String,
    base_class: String,
    module: ModuleId,
    properties: Vec<(String, String)>,
    attributes: Vec<AttributeDesc>,
    methods: Vec<MethodDesc>,
    signals: Vec<SignalDesc>,
    slots: Vec<SlotDesc>,
    constructors: Vec<ConstructorDesc>,
}

impl Class {
    /// Start declaring a class `namespace::name`
    pub fn builder(namespace: &str, name: &str) -> ClassBuilder {
        ClassBuilder::new(namespace, name)
    }

    /// Class name without namespace
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Qualified name (`namespace::name`), the registry key
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Qualified name of the base class, empty for root classes
    pub fn base_class_name(&self) -> &str {
        &self.base_class
    }

    /// Module the class was registered by
    pub fn module(&self) -> ModuleId {
        self.module
    }

    pub(crate) fn set_module(&mut self, module: ModuleId) {
        self.module = module;
    }

    /// Properties declared by this class (not inherited)
    pub fn own_properties(&self) -> &[(String, String)] {
        &self.properties
    }

    /// Attributes declared by this class (not inherited)
    pub fn own_attributes(&self) -> &[AttributeDesc] {
        &self.attributes
    }

    /// Methods declared by this class (not inherited)
    pub fn own_methods(&self) -> &[MethodDesc] {
        &self.methods
    }

    /// Signals declared by this class (not inherited)
    pub fn own_signals(&self) -> &[SignalDesc] {
        &self.signals
    }

    /// Slots declared by this class (not inherited)
    pub fn own_slots(&self) -> &[SlotDesc] {
        &self.slots
    }

    /// Constructors (never inherited)
    pub fn constructors(&self) -> &[ConstructorDesc] {
        &self.constructors
    }

    pub fn constructor(&self, name: &str) -> Option<&ConstructorDesc> {
        self.constructors.iter().find(|c| c.name() == name)
    }

    /// Whether the class can be instantiated at all
    pub fn has_constructor(&self) -> bool {
        !self.constructors.is_empty()
    }

    pub fn has_default_constructor(&self) -> bool {
        self.constructors.iter().any(ConstructorDesc::is_default)
    }

    /// Instantiate through the parameterless constructor
    pub fn create(&self) -> Option<Box<dyn Object>> {
        let params = DynParams::new(Signature::default());
        self.constructors
            .iter()
            .find(|c| c.is_default())
            .and_then(|c| c.create(&params))
    }

    /// Instantiate through the first constructor accepting `params`
    pub fn create_with(&self, params: &DynParams) -> Option<Box<dyn Object>> {
        self.constructors
            .iter()
            .find(|c| c.accepts(params))
            .and_then(|c| c.create(params))
    }

    /// Instantiate through the constructor with this name, if it accepts `params`
    pub fn create_named(&self, name: &str, params: &DynParams) -> Option<Box<dyn Object>> {
        self.constructor(name).and_then(|c| c.create(params))
    }
}

// ===== CLASS BUILDER =====

/// Declarative class registration
///
/// # Example
///
/// ```ignore
/// let class = Class::builder("Nebula", "SceneNode")
///     .description("Scene node")
///     .base("Nebula::Object")
///     .constructor("ctor", "Default constructor", SceneNode::default)
///     .attribute("Name", "Node name", "", |n: &SceneNode| n.name.clone(), |n: &mut SceneNode, v: String| n.name = v)
///     .method("SetPosition", "", |n: &mut SceneNode, x: f32, y: f32, z: f32| n.set_position(x, y, z))
///     .build();
/// ```
pub struct ClassBuilder {
    class: Class,
}

impl ClassBuilder {
    pub fn new(namespace: &str, name: &str) -> Self {
        let class_name = if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}::{}", namespace, name)
        };
        Self {
            class: Class {
                name: name.to_string(),
                namespace: namespace.to_string(),
                class_name,
                description: String::new(),
                base_class: String::new(),
                module: 0,
                properties: Vec::new(),
                attributes: Vec::new(),
                methods: Vec::new(),
                signals: Vec::new(),
                slots: Vec::new(),
                constructors: Vec::new(),
            },
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.class.description = description.to_string();
        self
    }

    /// Qualified name of the base class
    pub fn base(mut self, base_class: &str) -> Self {
        self.class.base_class = base_class.to_string();
        self
    }

    /// Free-form property; a later value for the same name replaces the earlier one
    pub fn property(mut self, name: &str, value: &str) -> Self {
        match self.class.properties.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.class.properties.push((name.to_string(), value.to_string())),
        }
        self
    }

    /// Read/write attribute
    pub fn attribute<C, T, G, S>(self, name: &str, description: &str, default_value: &str, getter: G, setter: S) -> Self
    where
        C: Object,
        T: VarValue,
        G: Fn(&C) -> T + Send + Sync + 'static,
        S: Fn(&mut C, T) + Send + Sync + 'static,
    {
        self.with_attribute(AttributeDesc::new(name, description, default_value, getter, setter))
    }

    /// Read-only attribute
    pub fn attribute_read_only<C, T, G>(self, name: &str, description: &str, default_value: &str, getter: G) -> Self
    where
        C: Object,
        T: VarValue,
        G: Fn(&C) -> T + Send + Sync + 'static,
    {
        self.with_attribute(AttributeDesc::read_only(name, description, default_value, getter))
    }

    /// Prebuilt attribute descriptor; replaces an own attribute of the same name
    pub fn with_attribute(mut self, attribute: AttributeDesc) -> Self {
        self.class.attributes.retain(|a| a.name() != attribute.name());
        self.class.attributes.push(attribute);
        self
    }

    pub fn method<C, Args, F>(mut self, name: &str, description: &str, method: F) -> Self
    where
        F: IntoMethod<C, Args>,
    {
        self.class.methods.retain(|m| m.name() != name);
        self.class.methods.push(MethodDesc::new(name, description, method));
        self
    }

    /// Event reachable on every instance; replaces an own signal of the same name
    pub fn signal<C, G>(mut self, name: &str, description: &str, signature: Signature, event: G) -> Self
    where
        C: Object,
        G: Fn(&C) -> &DynEvent + Send + Sync + 'static,
    {
        self.class.signals.retain(|s| s.name() != name);
        self.class.signals.push(SignalDesc::new(name, description, signature, event));
        self
    }

    /// Event handler reachable on every instance; replaces an own slot of the same name
    pub fn slot<C, G>(mut self, name: &str, description: &str, signature: Signature, handler: G) -> Self
    where
        C: Object,
        G: Fn(&C) -> &DynEventHandler + Send + Sync + 'static,
    {
        self.class.slots.retain(|s| s.name() != name);
        self.class.slots.push(SlotDesc::new(name, description, signature, handler));
        self
    }

    pub fn constructor<C, Args, F>(mut self, name: &str, description: &str, constructor: F) -> Self
    where
        F: IntoConstructor<C, Args>,
    {
        self.class.constructors.push(ConstructorDesc::new(name, description, constructor));
        self
    }

    pub fn build(self) -> Class {
        self.class
    }
}

// ===== CLASS REF =====

/// A class together with the manager that resolves its base chain
#[derive(Clone, Copy)]
pub struct ClassRef<'a> {
    manager: &'a ClassManager,
    class: &'a Class,
}

impl<'a> ClassRef<'a> {
    pub(crate) fn new(manager: &'a ClassManager, class: &'a Class) -> Self {
        Self { manager, class }
    }

    /// The underlying class record
    pub fn class(&self) -> &'a Class {
        self.class
    }

    /// Base class, None for root classes or if the base is not registered
    pub fn base_class(&self) -> Option<ClassRef<'a>> {
        if self.class.base_class.is_empty() {
            return None;
        }
        self.manager.class(&self.class.base_class)
    }

    /// This class followed by its registered ancestors.
    ///
    /// Stops at the first unregistered base, and after as many steps as
    /// there are classes (a cyclic chain cannot loop forever).
    fn lineage(&self) -> Vec<&'a Class> {
        let mut chain = vec![self.class];
        let mut current = *self;
        while chain.len() <= self.manager.class_count() {
            match current.base_class() {
                Some(base) => {
                    chain.push(base.class);
                    current = base;
                }
                None => break,
            }
        }
        chain
    }

    /// Whether `base_name` is an ancestor (at any level) of this class
    pub fn is_derived_from(&self, base_name: &str) -> bool {
        self.lineage().iter().skip(1).any(|c| c.class_name == base_name)
    }

    /// Registered classes whose direct base is this class
    pub fn derived_classes(&self) -> Vec<ClassRef<'a>> {
        self.manager
            .classes()
            .into_iter()
            .filter(|c| c.class.base_class == self.class.class_name)
            .collect()
    }

    /// Members of every class in the lineage, base first; a member
    /// redeclared in a derived class replaces the inherited one in place.
    fn merged<T>(&self, members: fn(&'a Class) -> &'a [T], name: fn(&T) -> &str) -> Vec<&'a T> {
        let mut merged: Vec<&'a T> = Vec::new();
        for class in self.lineage().into_iter().rev() {
            for member in members(class) {
                match merged.iter().position(|m| name(*m) == name(member)) {
                    Some(index) => merged[index] = member,
                    None => merged.push(member),
                }
            }
        }
        merged
    }

    /// Most-derived member with this name
    fn find<T>(&self, members: fn(&'a Class) -> &'a [T], name: fn(&T) -> &str, wanted: &str) -> Option<&'a T> {
        self.lineage()
            .into_iter()
            .find_map(|class| members(class).iter().find(|m| name(*m) == wanted))
    }

    /// Attributes including inherited ones, base first.
    ///
    /// An attribute redeclared in a derived class replaces the inherited
    /// descriptor in place.
    pub fn attributes(&self) -> Vec<&'a AttributeDesc> {
        self.merged(|c| c.attributes.as_slice(), AttributeDesc::name)
    }

    /// Most-derived attribute with this name
    pub fn attribute(&self, name: &str) -> Option<&'a AttributeDesc> {
        self.find(|c| c.attributes.as_slice(), AttributeDesc::name, name)
    }

    /// Methods including inherited ones, base first, overridden by name
    pub fn methods(&self) -> Vec<&'a MethodDesc> {
        self.merged(|c| c.methods.as_slice(), MethodDesc::name)
    }

    /// Most-derived method with this name
    pub fn method(&self, name: &str) -> Option<&'a MethodDesc> {
        self.find(|c| c.methods.as_slice(), MethodDesc::name, name)
    }

    /// Signals including inherited ones, base first, overridden by name
    pub fn signals(&self) -> Vec<&'a SignalDesc> {
        self.merged(|c| c.signals.as_slice(), SignalDesc::name)
    }

    pub fn signal(&self, name: &str) -> Option<&'a SignalDesc> {
        self.find(|c| c.signals.as_slice(), SignalDesc::name, name)
    }

    /// Slots including inherited ones, base first, overridden by name
    pub fn slots(&self) -> Vec<&'a SlotDesc> {
        self.merged(|c| c.slots.as_slice(), SlotDesc::name)
    }

    pub fn slot(&self, name: &str) -> Option<&'a SlotDesc> {
        self.find(|c| c.slots.as_slice(), SlotDesc::name, name)
    }

    /// Properties merged from the root class down; derived values win
    pub fn properties(&self) -> Vec<(&'a str, &'a str)> {
        let mut properties: Vec<(&'a str, &'a str)> = Vec::new();
        for class in self.lineage().into_iter().rev() {
            for (name, value) in &class.properties {
                match properties.iter_mut().find(|(n, _)| n == name) {
                    Some(slot) => slot.1 = value.as_str(),
                    None => properties.push((name.as_str(), value.as_str())),
                }
            }
        }
        properties
    }

    pub fn property(&self, name: &str) -> Option<&'a str> {
        self.lineage().into_iter().find_map(|c| {
            c.properties
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        })
    }
}

impl<'a> Deref for ClassRef<'a> {
    type Target = Class;

    fn deref(&self) -> &Class {
        self.class
    }
}

impl PartialEq for ClassRef<'_> {
    /// Same class record
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.class, other.class)
    }
}

impl std::fmt::Debug for ClassRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ClassRef").field(&self.class.class_name).finish()
    }
}

#[cfg(test)]
#[path = "class_tests.rs"]
mod tests;
