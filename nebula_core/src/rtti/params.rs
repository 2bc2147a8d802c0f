/// Dynamic parameter containers.
///
/// `DynParams` is the argument pack passed through `DynFunc`, methods,
/// constructors and events: a signature, one `Var` per parameter and a
/// return slot. Values are always stored with the declared types, so a
/// callee never sees a mismatched argument.
///
/// `ParamsParser` tokenizes the `Name="value"` text form used for both
/// parameters and attribute strings.

use std::fmt;
use super::signature::Signature;
use super::var::{Var, VarType, VarValue};

// ===== PARAMS PARSER =====

/// Iterator over `name="value"` pairs.
///
/// Values may be double-quoted, single-quoted or bare (terminated by
/// whitespace). Tokens without `=` are skipped.
///
/// # Example
///
/// ```
/// use nebula_core::nebula::rtti::ParamsParser;
///
/// let pairs: Vec<_> = ParamsParser::new(r#"Name="Main Camera" Fov='60' Active=true"#).collect();
/// assert_eq!(pairs, vec![("Name", "Main Camera"), ("Fov", "60"), ("Active", "true")]);
/// ```
pub struct ParamsParser<'a> {
    rest: &'a str,
}

impl<'a> ParamsParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for ParamsParser<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = self.rest.trim_start();
            if text.is_empty() {
                self.rest = text;
                return None;
            }

            // Name runs until '=' or whitespace
            let name_end = text
                .find(|c: char| c == '=' || c.is_whitespace())
                .unwrap_or(text.len());
            let name = &text[..name_end];
            let after_name = &text[name_end..];

            let Some(value_text) = after_name.strip_prefix('=') else {
                // Stray token
                self.rest = after_name;
                continue;
            };

            let (value, rest) = match value_text.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &value_text[1..];
                    match body.find(quote) {
                        Some(end) => (&body[..end], &body[end + 1..]),
                        None => (body, ""),
                    }
                }
                _ => {
                    let end = value_text.find(char::is_whitespace).unwrap_or(value_text.len());
                    (&value_text[..end], &value_text[end..])
                }
            };

            self.rest = rest;
            if name.is_empty() {
                continue;
            }
            return Some((name, value));
        }
    }
}

// ===== DYN PARAMS =====

/// Typed argument pack plus return slot
#[derive(Debug, Clone, PartialEq)]
pub struct DynParams {
    signature: Signature,
    values: Vec<Var>,
    return_value: Var,
}

impl DynParams {
    /// Parameters for `signature`, every value set to its type's default
    pub fn new(signature: Signature) -> Self {
        let values = signature.params().iter().map(|&ty| Var::default_of(ty)).collect();
        let return_value = Var::default_of(signature.return_type());
        Self { signature, values, return_value }
    }

    /// Parameters built from values; the signature follows their types
    pub fn from_values(return_type: VarType, values: Vec<Var>) -> Self {
        let signature = Signature::new(return_type, values.iter().map(Var::var_type).collect());
        Self {
            signature,
            values,
            return_value: Var::default_of(return_type),
        }
    }

    /// Deserialize positional parameters from `Param0="1" Param1="2"`.
    ///
    /// The i-th pair fills the i-th parameter whatever its name. Missing or
    /// malformed values take the type's default; extra pairs are ignored.
    pub fn from_string(signature: Signature, text: &str) -> Self {
        let mut params = Self::new(signature);
        for ((_, value), slot) in ParamsParser::new(text).zip(params.values.iter_mut()) {
            *slot = Var::parse_or_default(slot.var_type(), value);
        }
        params
    }

    /// Deserialize parameters from a TOML table with `Param0`, `Param1`, ... keys.
    ///
    /// Missing or malformed values take the type's default.
    pub fn from_table(signature: Signature, table: &toml::Table) -> Self {
        let mut params = Self::new(signature);
        for (index, slot) in params.values.iter_mut().enumerate() {
            if let Some(value) = table.get(&format!("Param{}", index)) {
                let var_type = slot.var_type();
                *slot = Var::from_toml(var_type, value).unwrap_or_else(|| Var::default_of(var_type));
            }
        }
        params
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameter value by index
    pub fn get(&self, index: usize) -> Option<&Var> {
        self.values.get(index)
    }

    /// Typed parameter value by index
    pub fn arg<T: VarValue>(&self, index: usize) -> Option<T> {
        self.values.get(index).and_then(T::from_var)
    }

    /// Replace a parameter value. Refused (false) if the index is out of
    /// range or the value's type differs from the declared one.
    pub fn set(&mut self, index: usize, value: Var) -> bool {
        match self.values.get_mut(index) {
            Some(slot) if slot.var_type() == value.var_type() => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    pub fn return_value(&self) -> &Var {
        &self.return_value
    }

    /// Store the return value. Refused (false) on type mismatch.
    pub fn set_return_value(&mut self, value: Var) -> bool {
        if value.var_type() != self.signature.return_type() {
            return false;
        }
        self.return_value = value;
        true
    }

    /// Move the return value out, leaving the type's default behind
    pub fn take_return_value(&mut self) -> Var {
        let default = Var::default_of(self.signature.return_type());
        std::mem::replace(&mut self.return_value, default)
    }
}

impl fmt::Display for DynParams {
    /// `Param0="..." Param1="..."`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.values.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "Param{}=\"{}\"", index, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
