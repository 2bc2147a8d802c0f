/// Dynamic values used by attributes, parameters and events.
///
/// A `Var` is a tagged union over the value types the reflection system can
/// marshal. Every value has a canonical text form used for attribute strings
/// (`Position="1 2 -3"`) and serialized parameters.

use std::fmt;
use glam::{Vec2, Vec3, Vec4};

// ===== VAR TYPE =====

/// Declared type of an attribute, parameter or return value
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    #[default]
    Void,
    Bool,
    Int,
    UInt,
    Float,
    Double,
    String,
    Vec2,
    Vec3,
    Vec4,
}

impl VarType {
    /// Type name as used in signature strings (`void`, `int`, `vec3`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            VarType::Void => "void",
            VarType::Bool => "bool",
            VarType::Int => "int",
            VarType::UInt => "uint",
            VarType::Float => "float",
            VarType::Double => "double",
            VarType::String => "string",
            VarType::Vec2 => "vec2",
            VarType::Vec3 => "vec3",
            VarType::Vec4 => "vec4",
        }
    }

    /// Resolve a type name (exact match)
    pub fn from_name(name: &str) -> Option<VarType> {
        match name {
            "void" => Some(VarType::Void),
            "bool" => Some(VarType::Bool),
            "int" => Some(VarType::Int),
            "uint" => Some(VarType::UInt),
            "float" => Some(VarType::Float),
            "double" => Some(VarType::Double),
            "string" => Some(VarType::String),
            "vec2" => Some(VarType::Vec2),
            "vec3" => Some(VarType::Vec3),
            "vec4" => Some(VarType::Vec4),
            _ => None,
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ===== VAR =====

/// A dynamically typed value
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Var {
    #[default]
    Void,
    Bool(bool),
    Int(i32),
    UInt(u32),
    Float(f32),
    Double(f64),
    String(String),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
}

impl Var {
    /// Type tag of the value
    pub fn var_type(&self) -> VarType {
        match self {
            Var::Void => VarType::Void,
            Var::Bool(_) => VarType::Bool,
            Var::Int(_) => VarType::Int,
            Var::UInt(_) => VarType::UInt,
            Var::Float(_) => VarType::Float,
            Var::Double(_) => VarType::Double,
            Var::String(_) => VarType::String,
            Var::Vec2(_) => VarType::Vec2,
            Var::Vec3(_) => VarType::Vec3,
            Var::Vec4(_) => VarType::Vec4,
        }
    }

    /// Default value of a type (zero, false, empty string, zero vector)
    pub fn default_of(var_type: VarType) -> Var {
        match var_type {
            VarType::Void => Var::Void,
            VarType::Bool => Var::Bool(false),
            VarType::Int => Var::Int(0),
            VarType::UInt => Var::UInt(0),
            VarType::Float => Var::Float(0.0),
            VarType::Double => Var::Double(0.0),
            VarType::String => Var::String(String::new()),
            VarType::Vec2 => Var::Vec2(Vec2::ZERO),
            VarType::Vec3 => Var::Vec3(Vec3::ZERO),
            VarType::Vec4 => Var::Vec4(Vec4::ZERO),
        }
    }

    /// Parse the text form of a value of the given type.
    ///
    /// Returns None if the text is not a valid value of that type. Vectors
    /// must have exactly the right number of space-separated components.
    pub fn parse(var_type: VarType, text: &str) -> Option<Var> {
        let trimmed = text.trim();
        match var_type {
            VarType::Void => Some(Var::Void),
            VarType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Var::Bool(true)),
                "false" | "0" => Some(Var::Bool(false)),
                _ => None,
            },
            VarType::Int => trimmed.parse().ok().map(Var::Int),
            VarType::UInt => trimmed.parse().ok().map(Var::UInt),
            VarType::Float => trimmed.parse().ok().map(Var::Float),
            VarType::Double => trimmed.parse().ok().map(Var::Double),
            VarType::String => Some(Var::String(text.to_string())),
            VarType::Vec2 => parse_components::<2>(trimmed).map(|c| Var::Vec2(Vec2::from_array(c))),
            VarType::Vec3 => parse_components::<3>(trimmed).map(|c| Var::Vec3(Vec3::from_array(c))),
            VarType::Vec4 => parse_components::<4>(trimmed).map(|c| Var::Vec4(Vec4::from_array(c))),
        }
    }

    /// Parse the text form, falling back to the type's default value
    pub fn parse_or_default(var_type: VarType, text: &str) -> Var {
        Var::parse(var_type, text).unwrap_or_else(|| Var::default_of(var_type))
    }

    /// Convert a TOML value to a value of the given type.
    ///
    /// Strings go through `parse`, so `"1 2 3"` and `[1, 2, 3]` both give a
    /// `vec3`. Integers are accepted for float types.
    pub fn from_toml(var_type: VarType, value: &toml::Value) -> Option<Var> {
        use toml::Value;

        match (var_type, value) {
            (_, Value::String(text)) => Var::parse(var_type, text),
            (VarType::Bool, Value::Boolean(b)) => Some(Var::Bool(*b)),
            (VarType::Int, Value::Integer(i)) => i32::try_from(*i).ok().map(Var::Int),
            (VarType::UInt, Value::Integer(i)) => u32::try_from(*i).ok().map(Var::UInt),
            (VarType::Float, Value::Float(f)) => Some(Var::Float(*f as f32)),
            (VarType::Float, Value::Integer(i)) => Some(Var::Float(*i as f32)),
            (VarType::Double, Value::Float(f)) => Some(Var::Double(*f)),
            (VarType::Double, Value::Integer(i)) => Some(Var::Double(*i as f64)),
            (VarType::Vec2, Value::Array(items)) => toml_components::<2>(items).map(|c| Var::Vec2(Vec2::from_array(c))),
            (VarType::Vec3, Value::Array(items)) => toml_components::<3>(items).map(|c| Var::Vec3(Vec3::from_array(c))),
            (VarType::Vec4, Value::Array(items)) => toml_components::<4>(items).map(|c| Var::Vec4(Vec4::from_array(c))),
            _ => None,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Void => Ok(()),
            Var::Bool(b) => write!(f, "{}", b),
            Var::Int(i) => write!(f, "{}", i),
            Var::UInt(u) => write!(f, "{}", u),
            Var::Float(v) => write!(f, "{}", v),
            Var::Double(v) => write!(f, "{}", v),
            Var::String(s) => f.write_str(s),
            Var::Vec2(v) => write!(f, "{} {}", v.x, v.y),
            Var::Vec3(v) => write!(f, "{} {} {}", v.x, v.y, v.z),
            Var::Vec4(v) => write!(f, "{} {} {} {}", v.x, v.y, v.z, v.w),
        }
    }
}

fn parse_components<const N: usize>(text: &str) -> Option<[f32; N]> {
    let mut components = [0.0; N];
    let mut parts = text.split_whitespace();
    for component in components.iter_mut() {
        *component = parts.next()?.parse().ok()?;
    }
    match parts.next() {
        Some(_) => None,
        None => Some(components),
    }
}

fn toml_components<const N: usize>(items: &[toml::Value]) -> Option<[f32; N]> {
    if items.len() != N {
        return None;
    }
    let mut components = [0.0; N];
    for (component, item) in components.iter_mut().zip(items) {
        *component = match item {
            toml::Value::Float(f) => *f as f32,
            toml::Value::Integer(i) => *i as f32,
            _ => return None,
        };
    }
    Some(components)
}

// ===== TYPED BINDING =====

/// Rust types that can cross the dynamic boundary.
///
/// Implemented for the payload type of every `Var` variant and for `()`
/// (the `void` return type). Typed closures bound to a `DynFunc`, a method
/// or a constructor use this to marshal their arguments.
pub trait VarValue: Default + Sized + 'static {
    /// Declared type
    const TYPE: VarType;

    /// Extract the value if the variant matches
    fn from_var(var: &Var) -> Option<Self>;

    /// Wrap the value
    fn into_var(self) -> Var;
}

macro_rules! impl_var_value {
    ($ty:ty, $var_type:ident) => {
        impl VarValue for $ty {
            const TYPE: VarType = VarType::$var_type;

            fn from_var(var: &Var) -> Option<Self> {
                match var {
                    Var::$var_type(value) => Some(value.clone()),
                    _ => None,
                }
            }

            fn into_var(self) -> Var {
                Var::$var_type(self)
            }
        }
    };
}

impl_var_value!(bool, Bool);
impl_var_value!(i32, Int);
impl_var_value!(u32, UInt);
impl_var_value!(f32, Float);
impl_var_value!(f64, Double);
impl_var_value!(String, String);
impl_var_value!(Vec2, Vec2);
impl_var_value!(Vec3, Vec3);
impl_var_value!(Vec4, Vec4);

impl VarValue for () {
    const TYPE: VarType = VarType::Void;

    fn from_var(var: &Var) -> Option<Self> {
        match var {
            Var::Void => Some(()),
            _ => None,
        }
    }

    fn into_var(self) -> Var {
        Var::Void
    }
}

#[cfg(test)]
#[path = "var_tests.rs"]
mod tests;
