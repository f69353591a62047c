//! Type reference cache
//!
//! Maps live type handles to the [`TypeRef`] derived from them so that
//! walking the same loaded types repeatedly does not rebuild identical
//! references. Entries hold their `TypeRef` weakly: once every caller has
//! dropped it, the entry is dead and gets rebuilt on the next request (or
//! pruned by a sweep). Nothing here keeps a handle, and therefore its
//! module, alive.
//!
//! Reuse is best-effort. Callers compare references with `==`, never by
//! address.

use crate::config::CacheOptions;
use crate::error::Result;
use crate::handle::TypeHandle;
use crate::type_ref::{TypeRef, TypeRefData, TypeRefParts};
use log::{debug, trace, warn};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::any::TypeId;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, Weak};

/// Registry key: handle implementation plus the handle's stable id
type HandleKey = (TypeId, u64);

/// Process-wide cache used by [`TypeRef::from_handle`]
static GLOBAL_CACHE: LazyLock<TypeRefCache> = LazyLock::new(TypeRefCache::new);

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered with a live cached reference
    pub hits: u64,
    /// Requests for handles with no entry at all
    pub misses: u64,
    /// Requests that found a dead or mismatched entry and rebuilt it
    pub replaced: u64,
    /// Dead entries removed by sweeps
    pub swept: u64,
}

struct Registry {
    entries: FxHashMap<HandleKey, Weak<TypeRefData>>,
    inserts_since_sweep: usize,
}

impl Registry {
    /// Drop dead entries, returning how many were removed
    fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, weak| weak.strong_count() > 0);
        self.inserts_since_sweep = 0;
        before - self.entries.len()
    }
}

/// Deduplicating, weakly-held map from live type handles to [`TypeRef`]s
///
/// Lookup, construction on a miss and insertion all happen under one lock,
/// so concurrent requests for the same handle never leave two entries
/// behind.
pub struct TypeRefCache {
    registry: Mutex<Registry>,
    options: CacheOptions,
    hits: AtomicU64,
    misses: AtomicU64,
    replaced: AtomicU64,
    swept: AtomicU64,
}

impl TypeRefCache {
    /// Create an empty cache with default options
    pub fn new() -> Self {
        Self::with_options(CacheOptions::default())
    }

    /// Create an empty cache with the given options
    pub fn with_options(options: CacheOptions) -> Self {
        Self {
            registry: Mutex::new(Registry {
                entries: FxHashMap::with_capacity_and_hasher(
                    options.initial_capacity,
                    Default::default(),
                ),
                inserts_since_sweep: 0,
            }),
            options,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            replaced: AtomicU64::new(0),
            swept: AtomicU64::new(0),
        }
    }

    /// The process-wide cache
    ///
    /// Created on first use and never torn down.
    pub fn global() -> &'static TypeRefCache {
        &GLOBAL_CACHE
    }

    /// Options this cache was created with
    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Get the reference for `handle`, building and caching it if needed
    ///
    /// Generic arguments are resolved through this same cache. An absent
    /// handle is not an error and yields `None`. A handle whose generic
    /// arguments do not match its arity is logged and refused (`None`, no
    /// entry); use [`try_get_or_create`](Self::try_get_or_create) to see
    /// the error.
    pub fn get_or_create<H: TypeHandle>(&self, handle: Option<&H>) -> Option<TypeRef> {
        match self.try_get_or_create(handle) {
            Ok(type_ref) => type_ref,
            Err(err) => {
                warn!("[TypeRefCache] refused type handle: {}", err);
                None
            }
        }
    }

    /// Like [`get_or_create`](Self::get_or_create), but reports a handle
    /// that describes a partially bound generic type as an error
    pub fn try_get_or_create<H: TypeHandle>(&self, handle: Option<&H>) -> Result<Option<TypeRef>> {
        let Some(handle) = handle else {
            return Ok(None);
        };
        let mut registry = self.registry.lock();
        self.resolve_locked(&mut registry, handle).map(Some)
    }

    fn resolve_locked<H: TypeHandle>(&self, registry: &mut Registry, handle: &H) -> Result<TypeRef> {
        let key = (TypeId::of::<H>(), handle.handle_id());

        // An id may be reused for a different type once the old one is
        // unloaded, while its reference is still held elsewhere.
        let stale = match registry.entries.get(&key) {
            Some(weak) => match TypeRef::upgrade(weak) {
                Some(existing) if describes(&existing, handle) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    trace!("[TypeRefCache] hit for handle {}: {}", key.1, existing);
                    return Ok(existing);
                }
                _ => true,
            },
            None => false,
        };

        let type_ref = match self.build_locked(registry, handle) {
            Ok(type_ref) => type_ref,
            Err(err) => {
                registry.entries.remove(&key);
                return Err(err);
            }
        };
        registry.entries.insert(key, type_ref.downgrade());

        if stale {
            self.replaced.fetch_add(1, Ordering::Relaxed);
            debug!("[TypeRefCache] replaced stale entry for handle {}: {}", key.1, type_ref);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("[TypeRefCache] new entry for handle {}: {}", key.1, type_ref);
        }

        registry.inserts_since_sweep += 1;
        if let Some(interval) = self.options.sweep_interval {
            if registry.inserts_since_sweep >= interval {
                self.record_sweep(registry.sweep());
            }
        }

        Ok(type_ref)
    }

    fn build_locked<H: TypeHandle>(&self, registry: &mut Registry, handle: &H) -> Result<TypeRef> {
        let generic_arguments = handle
            .generic_type_arguments()
            .iter()
            .map(|arg| self.resolve_locked(registry, arg))
            .collect::<Result<Vec<TypeRef>>>()?;

        TypeRef::from_parts(TypeRefParts {
            module_identity: Some(handle.module_identity()),
            metadata_token: handle.metadata_token(),
            generic_arity: handle.generic_parameter_count(),
            generic_arguments: Some(generic_arguments),
        })
    }

    /// Remove every dead entry now, returning how many were removed
    pub fn sweep(&self) -> usize {
        let removed = self.registry.lock().sweep();
        self.record_sweep(removed);
        removed
    }

    fn record_sweep(&self, removed: usize) {
        self.swept.fetch_add(removed as u64, Ordering::Relaxed);
        if removed > 0 {
            debug!("[TypeRefCache] swept {} dead entries", removed);
        }
    }

    /// Drop all entries, live or dead
    ///
    /// References already handed out are unaffected.
    pub fn clear(&self) {
        let mut registry = self.registry.lock();
        registry.entries.clear();
        registry.inserts_since_sweep = 0;
    }

    /// Number of entries, including dead ones not yet swept
    pub fn len(&self) -> usize {
        self.registry.lock().entries.len()
    }

    /// Check if the cache has no entries
    pub fn is_empty(&self) -> bool {
        self.registry.lock().entries.is_empty()
    }

    /// Number of entries whose reference is still held somewhere
    pub fn live_entries(&self) -> usize {
        self.registry
            .lock()
            .entries
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Current counter values
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            replaced: self.replaced.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
        }
    }
}

/// Whether a cached reference still describes `handle`
fn describes<H: TypeHandle>(type_ref: &TypeRef, handle: &H) -> bool {
    if type_ref.metadata_token() != handle.metadata_token()
        || type_ref.generic_arity() != handle.generic_parameter_count()
        || *type_ref.module_identity() != handle.module_identity()
    {
        return false;
    }
    let args = handle.generic_type_arguments();
    args.len() == type_ref.generic_arguments().len()
        && type_ref
            .generic_arguments()
            .iter()
            .zip(&args)
            .all(|(cached, arg)| describes(cached, arg))
}

impl Default for TypeRefCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRefCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRefCache")
            .field("entries", &self.len())
            .field("options", &self.options)
            .field("stats", &self.stats())
            .finish()
    }
}
