#![forbid(unsafe_code)]

//! Surrogate addressing.
//!
//! A [`SurrogateNode`] names a render object by its position in the
//! structural tree; it never holds the object itself. The
//! [`SurrogateCache`] turns nodes into environment handles, looking them up
//! once and remembering the answer under a key derived from the parent
//! chain. Clearing the cache is the only way a handle is forgotten; the node
//! tree is unaffected.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::environment::RenderEnvironment;
use crate::error::SurfaceError;

/// Prefix of a root node's cache key.
pub const KEY_ROOT_PREFIX: &str = "#";
/// Separator inserted before each descendant's local id.
pub const KEY_SEPARATOR: &str = " .";

/// Structural placeholder for one render object.
pub struct SurrogateNode {
    parent: Option<Rc<SurrogateNode>>,
    local_id: String,
    cache_key: String,
}

impl SurrogateNode {
    /// A top-level node, resolved through `lookup_root(local_id)`.
    #[must_use]
    pub fn root(local_id: impl Into<String>) -> Rc<Self> {
        let local_id = local_id.into();
        let cache_key = format!("{KEY_ROOT_PREFIX}{local_id}");
        Rc::new(Self {
            parent: None,
            local_id,
            cache_key,
        })
    }

    /// A child of `self`, resolved through `find_child(parent, local_id)`.
    #[must_use]
    pub fn child(self: &Rc<Self>, local_id: impl Into<String>) -> Rc<Self> {
        let local_id = local_id.into();
        let cache_key = format!("{}{KEY_SEPARATOR}{local_id}", self.cache_key);
        Rc::new(Self {
            parent: Some(Rc::clone(self)),
            local_id,
            cache_key,
        })
    }

    #[inline]
    pub fn parent(&self) -> Option<&Rc<SurrogateNode>> {
        self.parent.as_ref()
    }

    #[inline]
    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Key computed once at construction; equal to [`derive_cache_key`].
    #[inline]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }
}

impl fmt::Debug for SurrogateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurrogateNode")
            .field("key", &self.cache_key)
            .finish()
    }
}

/// Walk the parent chain and build the node's cache key.
///
/// `root -> a -> b` gives `"#root .a .b"`.
#[must_use]
pub fn derive_cache_key(node: &SurrogateNode) -> String {
    match node.parent() {
        None => format!("{KEY_ROOT_PREFIX}{}", node.local_id),
        Some(parent) => format!("{}{KEY_SEPARATOR}{}", derive_cache_key(parent), node.local_id),
    }
}

/// Counters for cache diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurrogateStats {
    pub hits: u64,
    pub misses: u64,
    pub seeded: u64,
    pub resets: u64,
}

impl SurrogateStats {
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Cache key → environment handle.
#[derive(Debug)]
pub struct SurrogateCache<H> {
    entries: HashMap<String, H>,
    stats: SurrogateStats,
}

impl<H> Default for SurrogateCache<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: SurrogateStats::default(),
        }
    }
}

impl<H: Clone> SurrogateCache<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `node`, looking it up in `env` on a miss.
    ///
    /// Roots are found with `lookup_root`; other nodes resolve their parent
    /// first and then search its children. Nothing is ever created here. A
    /// failed lookup means the structural and render trees diverged and is
    /// returned to the caller without retrying.
    pub fn resolve<E>(&mut self, env: &E, node: &SurrogateNode) -> Result<H, SurfaceError>
    where
        E: RenderEnvironment<Handle = H>,
    {
        if let Some(handle) = self.entries.get(node.cache_key()) {
            self.stats.hits += 1;
            return Ok(handle.clone());
        }
        self.stats.misses += 1;

        let found = match node.parent() {
            None => env
                .lookup_root(node.local_id())
                .ok_or_else(|| SurfaceError::RootNotFound {
                    id: node.local_id().to_owned(),
                }),
            Some(parent) => {
                let parent_handle = self.resolve(env, parent)?;
                env.find_child(&parent_handle, node.local_id())
                    .ok_or_else(|| SurfaceError::ChildNotFound {
                        parent_key: parent.cache_key().to_owned(),
                        local_id: node.local_id().to_owned(),
                    })
            }
        };

        match found {
            Ok(handle) => {
                self.entries
                    .insert(node.cache_key().to_owned(), handle.clone());
                Ok(handle)
            }
            Err(err) => {
                vcon_core::warn!(key = node.cache_key(), error = %err, "surrogate resolution failed");
                Err(err)
            }
        }
    }

    /// Record a handle the caller has just materialized for `node`.
    pub fn seed(&mut self, node: &SurrogateNode, handle: H) {
        self.stats.seeded += 1;
        self.entries.insert(node.cache_key().to_owned(), handle);
    }

    /// Cached handle without touching the environment.
    #[must_use]
    pub fn get(&self, node: &SurrogateNode) -> Option<&H> {
        self.entries.get(node.cache_key())
    }

    #[must_use]
    pub fn contains(&self, node: &SurrogateNode) -> bool {
        self.entries.contains_key(node.cache_key())
    }

    /// Forget every handle. Nodes stay valid and resolve afresh.
    pub fn reset(&mut self) {
        vcon_core::debug!(entries = self.entries.len(), "surrogate cache reset");
        self.entries.clear();
        self.stats.resets += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> SurrogateStats {
        self.stats
    }
}
