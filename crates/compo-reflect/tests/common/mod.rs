//! In-memory stand-in for a type loader
//!
//! Types are `Arc`-owned like a real loader's type objects; dropping the
//! last `LiveType` for a type "unloads" it.

#![allow(dead_code)]

use compo_reflect::{MetadataToken, ModuleIdentity, TypeHandle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

pub struct LoadedType {
    id: u64,
    module: ModuleIdentity,
    token: u32,
    arity: usize,
    args: Vec<LiveType>,
}

/// Handle to a loaded type
#[derive(Clone)]
pub struct LiveType(Arc<LoadedType>);

impl LiveType {
    /// Load a type definition (open if `arity > 0`)
    pub fn define(module_name: &str, token: u32, arity: usize) -> LiveType {
        LiveType(Arc::new(LoadedType {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            module: module(module_name),
            token,
            arity,
            args: Vec::new(),
        }))
    }

    /// Load a type definition under a caller-chosen handle id
    ///
    /// Lets a test reuse an id after the previous holder was unloaded.
    pub fn define_with_id(id: u64, module_name: &str, token: u32, arity: usize) -> LiveType {
        LiveType(Arc::new(LoadedType {
            id,
            module: module(module_name),
            token,
            arity,
            args: Vec::new(),
        }))
    }

    /// A broken loader's view of a generic type with only some arguments bound
    pub fn partially_bound(module_name: &str, token: u32, arity: usize, args: &[LiveType]) -> LiveType {
        LiveType(Arc::new(LoadedType {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            module: module(module_name),
            token,
            arity,
            args: args.to_vec(),
        }))
    }

    /// Construct a generic type from this definition
    pub fn construct(&self, args: &[LiveType]) -> LiveType {
        assert_eq!(args.len(), self.0.arity, "wrong number of type arguments");
        LiveType(Arc::new(LoadedType {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            module: self.0.module.clone(),
            token: self.0.token,
            arity: self.0.arity,
            args: args.to_vec(),
        }))
    }

    /// The same type description under a different handle id
    pub fn with_id(&self, id: u64) -> LiveType {
        LiveType(Arc::new(LoadedType {
            id,
            module: self.0.module.clone(),
            token: self.0.token,
            arity: self.0.arity,
            args: self.0.args.clone(),
        }))
    }

    /// Observe whether the underlying type is still loaded
    pub fn downgrade(&self) -> Weak<LoadedType> {
        Arc::downgrade(&self.0)
    }
}

impl TypeHandle for LiveType {
    fn handle_id(&self) -> u64 {
        self.0.id
    }

    fn module_identity(&self) -> ModuleIdentity {
        self.0.module.clone()
    }

    fn metadata_token(&self) -> MetadataToken {
        MetadataToken(self.0.token)
    }

    fn generic_parameter_count(&self) -> usize {
        self.0.arity
    }

    fn generic_type_arguments(&self) -> Vec<Self> {
        self.0.args.clone()
    }
}

pub fn module(name: &str) -> ModuleIdentity {
    ModuleIdentity::new(name).unwrap()
}
