/// DynFunc - a callable with a runtime signature.
///
/// Typed Rust closures are bound once: their argument and return types
/// become the function's `Signature`, and the generated invoker reads the
/// typed arguments out of a `DynParams`. Calls with a different signature
/// are refused before the closure runs.

use std::fmt;
use std::sync::Arc;
use super::params::DynParams;
use super::signature::Signature;
use super::var::{Var, VarValue};

/// Type-erased invoker. The caller guarantees the params match the signature.
pub(crate) type Invoker = Arc<dyn Fn(&mut DynParams) + Send + Sync>;

/// Dynamic function.
///
/// The default value is unbound: `call` does nothing and returns false,
/// `signature` returns None.
///
/// # Example
///
/// ```
/// use nebula_core::nebula::rtti::{DynFunc, Var};
///
/// let add = DynFunc::new(|a: i32, b: i32| a + b);
/// assert_eq!(add.signature_string(), "int(int,int)");
///
/// let result = add.call_str(r#"Param0="2" Param1="3""#);
/// assert_eq!(result, Some(Var::Int(5)));
/// ```
#[derive(Clone, Default)]
pub struct DynFunc {
    bound: Option<(Signature, Invoker)>,
}

impl DynFunc {
    /// Bind a typed closure (0 to 4 parameters)
    pub fn new<Args, F: IntoDynFunc<Args>>(func: F) -> Self {
        func.into_dyn_func()
    }

    pub(crate) fn from_parts(signature: Signature, invoker: Invoker) -> Self {
        Self {
            bound: Some((signature, invoker)),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.bound.as_ref().map(|(signature, _)| signature)
    }

    /// Text form of the signature, empty if unbound
    pub fn signature_string(&self) -> String {
        self.signature().map(|s| s.to_string()).unwrap_or_default()
    }

    /// Call with prepared parameters.
    ///
    /// Returns false without calling if unbound or if `params` was built for
    /// another signature. The return value is stored in `params`.
    pub fn call(&self, params: &mut DynParams) -> bool {
        match &self.bound {
            Some((signature, invoker)) if params.signature() == signature => {
                invoker(params);
                true
            }
            _ => false,
        }
    }

    /// Call with parameters deserialized from `Param0="..." Param1="..."`.
    ///
    /// Returns the return value, or None if unbound.
    pub fn call_str(&self, text: &str) -> Option<Var> {
        let signature = self.signature()?.clone();
        let mut params = DynParams::from_string(signature, text);
        self.call(&mut params).then(|| params.take_return_value())
    }

    /// Call with parameters deserialized from a TOML table
    pub fn call_table(&self, table: &toml::Table) -> Option<Var> {
        let signature = self.signature()?.clone();
        let mut params = DynParams::from_table(signature, table);
        self.call(&mut params).then(|| params.take_return_value())
    }
}

impl fmt::Debug for DynFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynFunc")
            .field("signature", &self.signature())
            .finish()
    }
}

// ===== TYPED BINDING =====

/// Closures that can be bound to a `DynFunc`.
///
/// `Args` is `(R, A0, A1, ...)`: the return type followed by the parameter
/// types. It only exists to keep the per-arity implementations apart.
pub trait IntoDynFunc<Args>: Send + Sync + 'static {
    fn into_dyn_func(self) -> DynFunc;
}

macro_rules! impl_into_dyn_func {
    ($($arg:ident $index:tt),*) => {
        impl<F, R, $($arg,)*> IntoDynFunc<(R, $($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: VarValue,
            $($arg: VarValue,)*
        {
            fn into_dyn_func(self) -> DynFunc {
                let func = self;
                let signature = Signature::new(R::TYPE, vec![$($arg::TYPE),*]);
                DynFunc::from_parts(signature, Arc::new(move |params: &mut DynParams| {
                    let result = func($(params.arg::<$arg>($index).unwrap_or_default()),*);
                    params.set_return_value(result.into_var());
                }))
            }
        }
    };
}

impl_into_dyn_func!();
impl_into_dyn_func!(A0 0);
impl_into_dyn_func!(A0 0, A1 1);
impl_into_dyn_func!(A0 0, A1 1, A2 2);
impl_into_dyn_func!(A0 0, A1 1, A2 2, A3 3);

#[cfg(test)]
#[path = "func_tests.rs"]
mod tests;
