/// Function signatures (`ret(p0,p1,...)`).

use std::fmt;
use std::str::FromStr;
use crate::error::{Error, Result};
use super::var::VarType;

/// Return type plus ordered parameter types
///
/// Two callables are compatible only if their signatures are equal.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    return_type: VarType,
    params: Vec<VarType>,
}

impl Signature {
    pub fn new(return_type: VarType, params: Vec<VarType>) -> Self {
        Self { return_type, params }
    }

    pub fn return_type(&self) -> VarType {
        self.return_type
    }

    pub fn params(&self) -> &[VarType] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.return_type)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            f.write_str(param.name())?;
        }
        f.write_str(")")
    }
}

impl FromStr for Signature {
    type Err = Error;

    /// Parse `ret(p0,p1,...)`; whitespace around names is ignored
    fn from_str(text: &str) -> Result<Self> {
        let invalid = || Error::ConfigError(format!("Invalid signature '{}'", text));

        let text = text.trim();
        let open = text.find('(').ok_or_else(invalid)?;
        let inner = text[open + 1..].strip_suffix(')').ok_or_else(invalid)?;

        let return_type = VarType::from_name(text[..open].trim()).ok_or_else(invalid)?;
        let params = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner
                .split(',')
                .map(|name| VarType::from_name(name.trim()))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(invalid)?
        };

        Ok(Self { return_type, params })
    }
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
