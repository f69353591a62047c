//! Type references
//!
//! A [`TypeRef`] names a type by the module that declares it, its metadata
//! token inside that module and, for constructed generic types, the
//! references bound to its generic parameters. It holds nothing from the
//! loader, so keeping a `TypeRef` alive never keeps a module loaded.
//!
//! # Example
//!
//! ```rust,ignore
//! use compo_reflect::{ModuleIdentity, MetadataToken, TypeRef};
//!
//! let module = ModuleIdentity::new("Contoso.Core, Version=1.0.0.0")?;
//! let list = TypeRef::get(module.clone(), MetadataToken(7), 1, vec![])?;
//! let item = TypeRef::get(module, MetadataToken(9), 0, vec![])?;
//!
//! let list_of_item = list.make_generic_type(vec![item])?;
//! assert!(list.is_generic_definition());
//! assert!(!list_of_item.is_generic_definition());
//! ```

use crate::cache::TypeRefCache;
use crate::error::{Result, TypeRefError};
use crate::handle::TypeHandle;
use crate::module_identity::ModuleIdentity;
use crate::token::MetadataToken;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Shared payload of a [`TypeRef`]
pub(crate) struct TypeRefData {
    module_identity: ModuleIdentity,
    metadata_token: MetadataToken,
    generic_arity: usize,
    generic_arguments: Box<[TypeRef]>,
}

/// Immutable, value-comparable reference to a type
///
/// Clones share one allocation. Equality and hashing never look at that
/// allocation's address, only at the four identifying attributes.
#[derive(Clone)]
pub struct TypeRef(Arc<TypeRefData>);

/// Raw components of a [`TypeRef`], as read back from persisted data
///
/// Missing fields are representable here so that rehydration can report
/// them instead of failing somewhere less obvious.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRefParts {
    /// Declaring module; `None` is rejected
    pub module_identity: Option<ModuleIdentity>,
    /// Token of the type definition within its module
    pub metadata_token: MetadataToken,
    /// Number of generic parameters the definition declares
    pub generic_arity: usize,
    /// Bound generic arguments; `None` means "never initialized" and is rejected
    pub generic_arguments: Option<Vec<TypeRef>>,
}

impl TypeRef {
    /// Build a reference from raw components
    ///
    /// `generic_arguments` must be empty or exactly `generic_arity` long.
    /// The result is not deduplicated against the handle cache.
    pub fn get(
        module_identity: ModuleIdentity,
        metadata_token: MetadataToken,
        generic_arity: usize,
        generic_arguments: Vec<TypeRef>,
    ) -> Result<TypeRef> {
        Self::from_parts(TypeRefParts {
            module_identity: Some(module_identity),
            metadata_token,
            generic_arity,
            generic_arguments: Some(generic_arguments),
        })
    }

    /// Validate raw components and build a reference from them
    pub fn from_parts(parts: TypeRefParts) -> Result<TypeRef> {
        let module_identity = parts
            .module_identity
            .ok_or(TypeRefError::MissingModuleIdentity)?;
        let generic_arguments = parts
            .generic_arguments
            .ok_or(TypeRefError::UninitializedGenericArguments)?;

        if !generic_arguments.is_empty() && generic_arguments.len() != parts.generic_arity {
            return Err(TypeRefError::GenericArgumentCount {
                expected: parts.generic_arity,
                actual: generic_arguments.len(),
            });
        }

        Ok(Self::new_unchecked(
            module_identity,
            parts.metadata_token,
            parts.generic_arity,
            generic_arguments,
        ))
    }

    /// Get (or create) the reference for a live type handle
    ///
    /// Goes through the process-wide cache. An absent handle yields `None`.
    pub fn from_handle<H: TypeHandle>(handle: Option<&H>) -> Option<TypeRef> {
        TypeRefCache::global().get_or_create(handle)
    }

    pub(crate) fn new_unchecked(
        module_identity: ModuleIdentity,
        metadata_token: MetadataToken,
        generic_arity: usize,
        generic_arguments: Vec<TypeRef>,
    ) -> TypeRef {
        TypeRef(Arc::new(TypeRefData {
            module_identity,
            metadata_token,
            generic_arity,
            generic_arguments: generic_arguments.into_boxed_slice(),
        }))
    }

    /// Declaring module
    pub fn module_identity(&self) -> &ModuleIdentity {
        &self.0.module_identity
    }

    /// Metadata token of the type definition
    pub fn metadata_token(&self) -> MetadataToken {
        self.0.metadata_token
    }

    /// Number of generic parameters on the type definition
    pub fn generic_arity(&self) -> usize {
        self.0.generic_arity
    }

    /// Bound generic arguments (empty for open definitions and non-generic types)
    pub fn generic_arguments(&self) -> &[TypeRef] {
        &self.0.generic_arguments
    }

    /// True for a generic type definition with no arguments bound
    pub fn is_generic_definition(&self) -> bool {
        self.0.generic_arity > 0 && self.0.generic_arguments.is_empty()
    }

    /// True for a constructed generic type
    pub fn is_closed_generic(&self) -> bool {
        !self.0.generic_arguments.is_empty()
    }

    /// Close this generic definition over `generic_arguments`
    ///
    /// Fails with an invalid-operation error if `self` is not an open
    /// generic definition or the argument count differs from the arity.
    pub fn make_generic_type(&self, generic_arguments: Vec<TypeRef>) -> Result<TypeRef> {
        self.make_generic_type_raw(Some(generic_arguments))
    }

    /// Like [`make_generic_type`](Self::make_generic_type), but accepts an
    /// argument list that may never have been initialized
    pub fn make_generic_type_raw(&self, generic_arguments: Option<Vec<TypeRef>>) -> Result<TypeRef> {
        let generic_arguments =
            generic_arguments.ok_or(TypeRefError::UninitializedGenericArguments)?;

        if !self.is_generic_definition() {
            return Err(TypeRefError::NotGenericDefinition {
                type_ref: self.to_string(),
            });
        }

        if generic_arguments.len() != self.0.generic_arity {
            return Err(TypeRefError::GenericArityMismatch {
                expected: self.0.generic_arity,
                actual: generic_arguments.len(),
            });
        }

        Ok(Self::new_unchecked(
            self.0.module_identity.clone(),
            self.0.metadata_token,
            self.0.generic_arity,
            generic_arguments,
        ))
    }

    /// The open definition this reference was constructed from
    ///
    /// Open definitions and non-generic types return themselves.
    pub fn generic_definition(&self) -> TypeRef {
        if !self.is_closed_generic() {
            return self.clone();
        }
        Self::new_unchecked(
            self.0.module_identity.clone(),
            self.0.metadata_token,
            self.0.generic_arity,
            Vec::new(),
        )
    }

    /// Raw components, suitable for persisting
    pub fn to_parts(&self) -> TypeRefParts {
        TypeRefParts {
            module_identity: Some(self.0.module_identity.clone()),
            metadata_token: self.0.metadata_token,
            generic_arity: self.0.generic_arity,
            generic_arguments: Some(self.0.generic_arguments.to_vec()),
        }
    }

    /// Whether `handle` denotes the same type as this reference
    pub fn matches_handle<H: TypeHandle>(&self, handle: &H) -> bool {
        TypeRef::from_handle(Some(handle)).is_some_and(|other| other == *self)
    }

    /// Whether both values share one allocation
    ///
    /// Only useful to observe cache reuse; use `==` to compare types.
    pub fn ptr_eq(&self, other: &TypeRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn downgrade(&self) -> Weak<TypeRefData> {
        Arc::downgrade(&self.0)
    }

    pub(crate) fn upgrade(weak: &Weak<TypeRefData>) -> Option<TypeRef> {
        weak.upgrade().map(TypeRef)
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        self.0.metadata_token == other.0.metadata_token
            && self.0.generic_arity == other.0.generic_arity
            && self.0.module_identity == other.0.module_identity
            && self.0.generic_arguments == other.0.generic_arguments
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    // Token only: equal tokens in different modules collide and are
    // told apart by `eq`.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.metadata_token.hash(state);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.0.module_identity, self.0.metadata_token)?;
        if self.is_generic_definition() {
            return write!(f, "`{}", self.0.generic_arity);
        }
        if let Some((first, rest)) = self.0.generic_arguments.split_first() {
            write!(f, "<{}", first)?;
            for arg in rest {
                write!(f, ", {}", arg)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
            .field("module_identity", &self.0.module_identity)
            .field("metadata_token", &self.0.metadata_token)
            .field("generic_arity", &self.0.generic_arity)
            .field("generic_arguments", &self.0.generic_arguments)
            .finish()
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_parts().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let parts = TypeRefParts::deserialize(deserializer)?;
        TypeRef::from_parts(parts).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<TypeRefParts> for TypeRef {
    type Error = TypeRefError;

    fn try_from(parts: TypeRefParts) -> Result<Self> {
        TypeRef::from_parts(parts)
    }
}
