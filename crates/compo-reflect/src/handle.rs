//! Live type handles
//!
//! The loader owns the actual type objects. This trait is the narrow view
//! of them the cache needs: enough to derive a [`TypeRef`](crate::TypeRef)
//! and a stable key to cache it under.

use crate::module_identity::ModuleIdentity;
use crate::token::MetadataToken;

/// A type currently loaded by the host's type loader
pub trait TypeHandle: Sized + Send + Sync + 'static {
    /// Stable identity of this handle while its type stays loaded
    ///
    /// Two live handles of the same implementing type with equal ids must
    /// describe the same type. An id may be reused once its type is
    /// unloaded; the cache checks a hit against the handle before reusing it.
    fn handle_id(&self) -> u64;

    /// Identity of the declaring module
    fn module_identity(&self) -> ModuleIdentity;

    /// Token of the type definition within its module
    fn metadata_token(&self) -> MetadataToken;

    /// Number of generic parameters declared by the type definition
    fn generic_parameter_count(&self) -> usize;

    /// Handles bound as generic arguments, in order
    ///
    /// Empty unless this is a constructed generic type, in which case the
    /// length must equal [`generic_parameter_count`](Self::generic_parameter_count).
    fn generic_type_arguments(&self) -> Vec<Self>;
}
