/// Member descriptors: attributes, methods, signals, slots and
/// constructors of a class.
///
/// Descriptors are built from typed Rust closures. The closures are
/// type-erased once, when the descriptor is created; afterwards they only
/// see `dyn Object` and `DynParams` and locate their own concrete type
/// through the object's base chain.

use std::fmt;
use std::sync::Arc;
use bitflags::bitflags;
use super::event::{DynEvent, DynEventHandler};
use super::object::{part, part_mut, Object};
use super::params::DynParams;
use super::signature::Signature;
use super::var::{Var, VarType, VarValue};

bitflags! {
    /// Access flags of an attribute
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttributeFlags: u32 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
    }
}

type Getter = Arc<dyn Fn(&dyn Object) -> Option<Var> + Send + Sync>;
type Setter = Arc<dyn Fn(&mut dyn Object, Var) -> bool + Send + Sync>;
type MethodInvoker = Arc<dyn Fn(&mut dyn Object, &mut DynParams) -> bool + Send + Sync>;
type Factory = Arc<dyn Fn(&DynParams) -> Box<dyn Object> + Send + Sync>;
type SignalAccessor = Arc<dyn Fn(&dyn Object) -> Option<&DynEvent> + Send + Sync>;
type SlotAccessor = Arc<dyn Fn(&dyn Object) -> Option<&DynEventHandler> + Send + Sync>;

// Closures passed through these get the higher-ranked signature the
// accessor aliases need.
fn signal_accessor<F>(accessor: F) -> SignalAccessor
where
    F: Fn(&dyn Object) -> Option<&DynEvent> + Send + Sync + 'static,
{
    Arc::new(accessor)
}

fn slot_accessor<F>(accessor: F) -> SlotAccessor
where
    F: Fn(&dyn Object) -> Option<&DynEventHandler> + Send + Sync + 'static,
{
    Arc::new(accessor)
}

// ===== ATTRIBUTE =====

/// A named, typed attribute with its accessor pair
#[derive(Clone)]
pub struct AttributeDesc {
    name: String,
    var_type: VarType,
    default_value: String,
    description: String,
    flags: AttributeFlags,
    getter: Getter,
    setter: Option<Setter>,
}

impl AttributeDesc {
    /// Read/write attribute of objects containing a `C`
    pub fn new<C, T, G, S>(name: &str, description: &str, default_value: &str, getter: G, setter: S) -> Self
    where
        C: Object,
        T: VarValue,
        G: Fn(&C) -> T + Send + Sync + 'static,
        S: Fn(&mut C, T) + Send + Sync + 'static,
    {
        let mut attribute = Self::read_only(name, description, default_value, getter);
        attribute.flags |= AttributeFlags::WRITE;
        attribute.setter = Some(Arc::new(move |object: &mut dyn Object, value: Var| {
            match (part_mut::<C>(object), T::from_var(&value)) {
                (Some(target), Some(value)) => {
                    setter(target, value);
                    true
                }
                _ => false,
            }
        }));
        attribute
    }

    /// Read-only attribute of objects containing a `C`
    pub fn read_only<C, T, G>(name: &str, description: &str, default_value: &str, getter: G) -> Self
    where
        C: Object,
        T: VarValue,
        G: Fn(&C) -> T + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            var_type: T::TYPE,
            default_value: default_value.to_string(),
            description: description.to_string(),
            flags: AttributeFlags::READ,
            getter: Arc::new(move |object: &dyn Object| {
                part::<C>(object).map(|target| getter(target).into_var())
            }),
            setter: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    /// Declared default, in text form
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// Declared default as a value (the type's default if the text is malformed)
    pub fn default_var(&self) -> Var {
        Var::parse_or_default(self.var_type, &self.default_value)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn flags(&self) -> AttributeFlags {
        self.flags
    }

    pub fn is_writable(&self) -> bool {
        self.flags.contains(AttributeFlags::WRITE)
    }

    /// Current value, None if the object has no part of the declaring type
    pub fn get(&self, object: &dyn Object) -> Option<Var> {
        (self.getter)(object)
    }

    /// Set a value. Refused (false) if read-only or of the wrong type.
    pub fn set(&self, object: &mut dyn Object, value: Var) -> bool {
        if value.var_type() != self.var_type {
            return false;
        }
        match &self.setter {
            Some(setter) => setter(object, value),
            None => false,
        }
    }

    /// Set a value from its text form. Refused (false) if malformed.
    pub fn set_str(&self, object: &mut dyn Object, value: &str) -> bool {
        match Var::parse(self.var_type, value) {
            Some(var) => self.set(object, var),
            None => false,
        }
    }

    /// Reset to the declared default
    pub fn set_default(&self, object: &mut dyn Object) -> bool {
        self.set(object, self.default_var())
    }

    /// Whether the current value equals the declared default
    pub fn is_default(&self, object: &dyn Object) -> bool {
        self.get(object) == Some(self.default_var())
    }
}

impl fmt::Debug for AttributeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDesc")
            .field("name", &self.name)
            .field("var_type", &self.var_type)
            .field("default_value", &self.default_value)
            .field("flags", &self.flags)
            .finish()
    }
}

// ===== METHOD =====

/// A named method callable with `DynParams`
#[derive(Clone)]
pub struct MethodDesc {
    name: String,
    description: String,
    signature: Signature,
    invoker: MethodInvoker,
}

impl MethodDesc {
    pub fn new<C, Args, F>(name: &str, description: &str, method: F) -> Self
    where
        F: IntoMethod<C, Args>,
    {
        let (signature, invoker) = method.into_method();
        Self {
            name: name.to_string(),
            description: description.to_string(),
            signature,
            invoker,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Call on an object. False on signature mismatch or if the object has
    /// no part of the declaring type.
    pub fn call(&self, object: &mut dyn Object, params: &mut DynParams) -> bool {
        if params.signature() != &self.signature {
            return false;
        }
        (self.invoker)(object, params)
    }
}

impl fmt::Debug for MethodDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDesc")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

// ===== SIGNAL =====

/// A named event exposed by every instance of a class
#[derive(Clone)]
pub struct SignalDesc {
    name: String,
    description: String,
    signature: Signature,
    accessor: SignalAccessor,
}

impl SignalDesc {
    /// Signal of objects containing a `C`, reached through `accessor`
    pub fn new<C, G>(name: &str, description: &str, signature: Signature, accessor: G) -> Self
    where
        C: Object,
        G: Fn(&C) -> &DynEvent + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            signature,
            accessor: signal_accessor(move |object| part::<C>(object).map(|target| accessor(target))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared signature of the event
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The event of `object`, None if it has no part of the declaring type
    pub fn get<'o>(&self, object: &'o dyn Object) -> Option<&'o DynEvent> {
        (self.accessor)(object)
    }
}

impl fmt::Debug for SignalDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalDesc")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

// ===== SLOT =====

/// A named event handler exposed by every instance of a class
#[derive(Clone)]
pub struct SlotDesc {
    name: String,
    description: String,
    signature: Signature,
    accessor: SlotAccessor,
}

impl SlotDesc {
    /// Slot of objects containing a `C`, reached through `accessor`
    pub fn new<C, G>(name: &str, description: &str, signature: Signature, accessor: G) -> Self
    where
        C: Object,
        G: Fn(&C) -> &DynEventHandler + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            signature,
            accessor: slot_accessor(move |object| part::<C>(object).map(|target| accessor(target))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The handler of `object`, None if it has no part of the declaring type
    pub fn get<'o>(&self, object: &'o dyn Object) -> Option<&'o DynEventHandler> {
        (self.accessor)(object)
    }
}

impl fmt::Debug for SlotDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotDesc")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

// ===== CONSTRUCTOR =====

/// A named constructor
///
/// Constructors are matched on their parameter types only; the return
/// type of a constructor signature is always `void`.
#[derive(Clone)]
pub struct ConstructorDesc {
    name: String,
    description: String,
    signature: Signature,
    factory: Factory,
}

impl ConstructorDesc {
    pub fn new<C, Args, F>(name: &str, description: &str, constructor: F) -> Self
    where
        F: IntoConstructor<C, Args>,
    {
        let (signature, factory) = constructor.into_constructor();
        Self {
            name: name.to_string(),
            description: description.to_string(),
            signature,
            factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Whether this constructor takes no parameters
    pub fn is_default(&self) -> bool {
        self.signature.params().is_empty()
    }

    /// Whether `params` carries exactly this constructor's parameter types
    pub fn accepts(&self, params: &DynParams) -> bool {
        params.signature().params() == self.signature.params()
    }

    /// Create an instance, None if the parameter types do not match
    pub fn create(&self, params: &DynParams) -> Option<Box<dyn Object>> {
        self.accepts(params).then(|| (self.factory)(params))
    }
}

impl fmt::Debug for ConstructorDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDesc")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

// ===== TYPED BINDING =====

/// Closures usable as methods of objects containing a `C`: `Fn(&mut C, A0, ..) -> R`
pub trait IntoMethod<C, Args>: Send + Sync + 'static {
    fn into_method(self) -> (Signature, MethodInvoker);
}

/// Closures usable as constructors of `C`: `Fn(A0, ..) -> C`
pub trait IntoConstructor<C, Args>: Send + Sync + 'static {
    fn into_constructor(self) -> (Signature, Factory);
}

macro_rules! impl_member_binding {
    ($($arg:ident $index:tt),*) => {
        impl<C, F, R, $($arg,)*> IntoMethod<C, (R, $($arg,)*)> for F
        where
            C: Object,
            F: Fn(&mut C, $($arg),*) -> R + Send + Sync + 'static,
            R: VarValue,
            $($arg: VarValue,)*
        {
            fn into_method(self) -> (Signature, MethodInvoker) {
                let method = self;
                let signature = Signature::new(R::TYPE, vec![$($arg::TYPE),*]);
                let invoker: MethodInvoker = Arc::new(move |object: &mut dyn Object, params: &mut DynParams| {
                    let Some(target) = part_mut::<C>(object) else {
                        return false;
                    };
                    let result = method(target, $(params.arg::<$arg>($index).unwrap_or_default()),*);
                    params.set_return_value(result.into_var());
                    true
                });
                (signature, invoker)
            }
        }

        impl<C, F, $($arg,)*> IntoConstructor<C, ($($arg,)*)> for F
        where
            C: Object,
            F: Fn($($arg),*) -> C + Send + Sync + 'static,
            $($arg: VarValue,)*
        {
            #[allow(unused_variables)]
            fn into_constructor(self) -> (Signature, Factory) {
                let constructor = self;
                let signature = Signature::new(VarType::Void, vec![$($arg::TYPE),*]);
                let factory: Factory = Arc::new(move |params: &DynParams| -> Box<dyn Object> {
                    Box::new(constructor($(params.arg::<$arg>($index).unwrap_or_default()),*))
                });
                (signature, factory)
            }
        }
    };
}

impl_member_binding!();
impl_member_binding!(A0 0);
impl_member_binding!(A0 0, A1 1);
impl_member_binding!(A0 0, A1 1, A2 2);
impl_member_binding!(A0 0, A1 1, A2 2, A3 3);

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
