//! Runtime type information
//!
//! - `Var` / `VarType`: dynamically typed values with a text form
//! - `DynParams` / `DynFunc` / `DynEvent`: type-erased calls and multicast events
//! - `Class` / `ClassManager`: reflected classes with attributes, methods,
//!   signals, slots and constructors, grouped into modules and plugins
//! - `Object`: base trait of reflected instances

mod var;
mod signature;
mod params;
mod func;
mod event;
mod object;
mod descriptor;
mod class;
mod module;
mod class_manager;

pub use var::{Var, VarType, VarValue};
pub use signature::Signature;
pub use params::{DynParams, ParamsParser};
pub use func::{DynFunc, IntoDynFunc};
pub use event::{DynEvent, DynEventHandler};
pub use object::{Object, DefaultValue};
pub use descriptor::{AttributeDesc, AttributeFlags, MethodDesc, SignalDesc, SlotDesc, ConstructorDesc, IntoMethod, IntoConstructor};
pub use class::{Class, ClassBuilder, ClassRef};
pub use module::{Module, ModuleId, ModuleInfo, ModuleRegistrar, PluginManifest, CORE_MODULE_ID, PLUGIN_MANIFEST_VERSION};
pub use class_manager::{ClassManager, ClassFilter, FIRST_MODULE_ID, PLUGIN_EXTENSION};
