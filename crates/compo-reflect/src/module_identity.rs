//! Module identity
//!
//! The loader names each compiled unit with a display string that already
//! carries whatever disambiguating data it needs (name, version, signing
//! key, ...). This crate treats that string as an opaque key.

use crate::error::{Result, TypeRefError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Opaque identity of the compiled unit that declares a type
///
/// Cloning is cheap (shared string).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleIdentity(Arc<str>);

impl ModuleIdentity {
    /// Create a module identity from the loader's display name
    ///
    /// An empty or blank name counts as an absent identity.
    pub fn new(name: impl Into<Arc<str>>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TypeRefError::MissingModuleIdentity);
        }
        Ok(Self(name))
    }

    /// The display name this identity was created from
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModuleIdentity").field(&&*self.0).finish()
    }
}

impl Serialize for ModuleIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ModuleIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        ModuleIdentity::new(name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_display() {
        let id = ModuleIdentity::new("Contoso.Core, Version=1.0.0.0").unwrap();
        assert_eq!(id.as_str(), "Contoso.Core, Version=1.0.0.0");
        assert_eq!(id.to_string(), "Contoso.Core, Version=1.0.0.0");
    }

    #[test]
    fn test_blank_name_is_absent() {
        assert_eq!(ModuleIdentity::new(""), Err(TypeRefError::MissingModuleIdentity));
        assert_eq!(ModuleIdentity::new("   "), Err(TypeRefError::MissingModuleIdentity));
    }

    #[test]
    fn test_equality_is_exact() {
        let a = ModuleIdentity::new("Contoso.Core, Version=1.0.0.0").unwrap();
        let b = ModuleIdentity::new("Contoso.Core, Version=1.0.0.0").unwrap();
        let c = ModuleIdentity::new("Contoso.Core, Version=2.0.0.0").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
