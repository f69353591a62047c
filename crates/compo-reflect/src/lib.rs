//! Compo Reflection Core
//!
//! Persistable, value-comparable references to loaded types:
//! - **TypeRef**: module identity + metadata token + generic arity + bound
//!   generic arguments (`type_ref` module)
//! - **TypeRefCache**: weakly-held, deduplicating map from live type
//!   handles to their references (`cache` module)
//! - **TypeHandle**: what the cache needs from the host's type loader
//!   (`handle` module)
//!
//! Catalogs and on-disk caches of the composition engine store `TypeRef`s
//! instead of live types, so mentioning a type never pins its module in
//! memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use compo_reflect::{TypeRef, TypeRefCache};
//!
//! // Walking freshly loaded types
//! let export_type = TypeRef::from_handle(Some(&loaded_type)).unwrap();
//!
//! // Rehydrating from a catalog
//! let restored: TypeRef = serde_json::from_str(&stored)?;
//! assert_eq!(restored, export_type);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cache;
pub mod config;
pub mod error;
pub mod handle;
pub mod module_identity;
pub mod token;
pub mod type_ref;

pub use cache::{CacheStats, TypeRefCache};
pub use config::CacheOptions;
pub use error::{ErrorKind, Result, TypeRefError};
pub use handle::TypeHandle;
pub use module_identity::ModuleIdentity;
pub use token::MetadataToken;
pub use type_ref::{TypeRef, TypeRefParts};
