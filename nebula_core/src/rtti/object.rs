/// Object - base trait of every reflected type.
///
/// A reflected type implements `Object` and is registered under a qualified
/// class name. Inheritance is modeled by composition: a derived type holds
/// its base type as a field and exposes it through `base` / `base_mut`, so
/// accessors declared on a base class keep working on derived instances.
///
/// The reflection surface (attribute access, serialization to
/// `Name="value"` strings, method calls, signals and slots by name) lives
/// on `dyn Object` and takes the `ClassManager` the object's class is
/// registered with.

use std::any::Any;
use super::class::ClassRef;
use super::class_manager::ClassManager;
use super::event::{DynEvent, DynEventHandler};
use super::params::{DynParams, ParamsParser};
use super::var::Var;

/// Base trait of reflected types
///
/// Use `impl_object!` for the boilerplate.
pub trait Object: Any {
    /// Qualified name of the object's class
    fn class_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The embedded base-class part, if the class derives from a reflected type
    fn base(&self) -> Option<&dyn Object> {
        None
    }

    fn base_mut(&mut self) -> Option<&mut dyn Object> {
        None
    }
}

/// Implement `Object` for a type.
///
/// ```ignore
/// impl_object!(SceneNode, "Nebula::SceneNode");
/// impl_object!(SNLight, "Nebula::SNLight", base: node);
/// ```
#[macro_export]
macro_rules! impl_object {
    ($ty:ty, $class_name:expr) => {
        impl $crate::nebula::rtti::Object for $ty {
            fn class_name(&self) -> &str {
                $class_name
            }
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
    ($ty:ty, $class_name:expr, base: $field:ident) => {
        impl $crate::nebula::rtti::Object for $ty {
            fn class_name(&self) -> &str {
                $class_name
            }
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
            fn base(&self) -> Option<&dyn $crate::nebula::rtti::Object> {
                Some(&self.$field)
            }
            fn base_mut(&mut self) -> Option<&mut dyn $crate::nebula::rtti::Object> {
                Some(&mut self.$field)
            }
        }
    };
}

/// Find the part of type `C` in an object or its base chain
pub(crate) fn part<C: 'static>(object: &dyn Object) -> Option<&C> {
    match object.as_any().downcast_ref::<C>() {
        Some(part) => Some(part),
        None => object.base().and_then(part::<C>),
    }
}

/// Find the part of type `C` in an object or its base chain (mutable)
pub(crate) fn part_mut<C: 'static>(object: &mut dyn Object) -> Option<&mut C> {
    if object.as_any().is::<C>() {
        return object.as_any_mut().downcast_mut::<C>();
    }
    object.base_mut().and_then(part_mut::<C>)
}

// ===== REFLECTION SURFACE =====

/// Which attributes `get_values` writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Every attribute
    WithDefault,
    /// Only attributes whose value differs from the declared default
    NoDefault,
}

impl dyn Object {
    /// Class record of this object
    pub fn class<'a>(&self, manager: &'a ClassManager) -> Option<ClassRef<'a>> {
        manager.class(self.class_name())
    }

    /// Whether the object's class is `class_name` or derives from it
    pub fn is_instance_of(&self, manager: &ClassManager, class_name: &str) -> bool {
        match self.class(manager) {
            Some(class) => class.class_name() == class_name || class.is_derived_from(class_name),
            None => false,
        }
    }

    /// Current value of an attribute
    pub fn get_attribute(&self, manager: &ClassManager, name: &str) -> Option<Var> {
        self.class(manager)?.attribute(name)?.get(self)
    }

    /// Set an attribute from its text form. False if unknown, read-only or malformed.
    pub fn set_attribute(&mut self, manager: &ClassManager, name: &str, value: &str) -> bool {
        match self.class(manager).and_then(|class| class.attribute(name)) {
            Some(attribute) => attribute.set_str(self, value),
            None => false,
        }
    }

    /// Set an attribute from a value. False if unknown, read-only or of the wrong type.
    pub fn set_attribute_var(&mut self, manager: &ClassManager, name: &str, value: Var) -> bool {
        match self.class(manager).and_then(|class| class.attribute(name)) {
            Some(attribute) => attribute.set(self, value),
            None => false,
        }
    }

    /// Reset an attribute to its declared default
    pub fn set_attribute_default(&mut self, manager: &ClassManager, name: &str) -> bool {
        match self.class(manager).and_then(|class| class.attribute(name)) {
            Some(attribute) => attribute.set_default(self),
            None => false,
        }
    }

    /// Reset every writable attribute to its declared default
    pub fn set_default_values(&mut self, manager: &ClassManager) {
        let Some(class) = self.class(manager) else {
            return;
        };
        for attribute in class.attributes() {
            attribute.set_default(self);
        }
    }

    /// Attribute values as `Name="value" Name2="value"`, in declaration order
    /// (base class attributes first)
    pub fn get_values(&self, manager: &ClassManager, default_value: DefaultValue) -> String {
        let Some(class) = self.class(manager) else {
            return String::new();
        };

        let mut values = String::new();
        for attribute in class.attributes() {
            if default_value == DefaultValue::NoDefault && attribute.is_default(self) {
                continue;
            }
            let Some(value) = attribute.get(self) else {
                continue;
            };
            if !values.is_empty() {
                values.push(' ');
            }
            values.push_str(&format!("{}=\"{}\"", attribute.name(), value));
        }
        values
    }

    /// Set attributes from `Name="value" ...`. Unknown names are ignored.
    pub fn set_values(&mut self, manager: &ClassManager, values: &str) {
        for (name, value) in ParamsParser::new(values) {
            self.set_attribute(manager, name, value);
        }
    }

    /// Set attributes from a TOML table keyed by attribute name
    pub fn set_values_table(&mut self, manager: &ClassManager, table: &toml::Table) {
        let Some(class) = self.class(manager) else {
            return;
        };
        for (name, value) in table {
            if let Some(attribute) = class.attribute(name) {
                if let Some(var) = Var::from_toml(attribute.var_type(), value) {
                    attribute.set(self, var);
                }
            }
        }
    }

    /// Call a method by name. False if unknown or on signature mismatch.
    pub fn call_method(&mut self, manager: &ClassManager, name: &str, params: &mut DynParams) -> bool {
        match self.class(manager).and_then(|class| class.method(name)) {
            Some(method) => method.call(self, params),
            None => false,
        }
    }

    /// Call a method with parameters deserialized from `Param0="..." ...`.
    ///
    /// Returns the method's return value, or None if the method is unknown.
    pub fn call_method_str(&mut self, manager: &ClassManager, name: &str, params: &str) -> Option<Var> {
        let method = self.class(manager)?.method(name)?;
        let mut params = DynParams::from_string(method.signature().clone(), params);
        method.call(self, &mut params).then(|| params.take_return_value())
    }

    /// Event exposed under a signal name
    pub fn signal<'o>(&'o self, manager: &ClassManager, name: &str) -> Option<&'o DynEvent> {
        self.class(manager)?.signal(name)?.get(self)
    }

    /// Event handler exposed under a slot name
    pub fn slot<'o>(&'o self, manager: &ClassManager, name: &str) -> Option<&'o DynEventHandler> {
        self.class(manager)?.slot(name)?.get(self)
    }

    /// Connect `receiver`'s slot to this object's signal, both by name.
    ///
    /// False if either name is unknown or the signatures differ.
    pub fn connect(&self, manager: &ClassManager, signal: &str, receiver: &(dyn Object + 'static), slot: &str) -> bool {
        match (self.signal(manager, signal), receiver.slot(manager, slot)) {
            (Some(event), Some(handler)) => event.connect(handler),
            _ => false,
        }
    }

    /// Disconnect `receiver`'s slot from this object's signal
    pub fn disconnect(&self, manager: &ClassManager, signal: &str, receiver: &(dyn Object + 'static), slot: &str) -> bool {
        match (self.signal(manager, signal), receiver.slot(manager, slot)) {
            (Some(event), Some(handler)) => event.disconnect(handler),
            _ => false,
        }
    }
}
