#![forbid(unsafe_code)]

//! The bundle a surface renders through.
//!
//! Surfaces never reach for globals: every operation receives the [`Host`],
//! which owns the render environment, the surrogate cache that addresses
//! it, and the mutation sink structural changes flow through.

use crate::environment::RenderEnvironment;
use crate::error::SurfaceError;
use crate::mutation::{MutationLog, MutationSink};
use crate::surrogate::{SurrogateCache, SurrogateNode};

pub struct Host<E: RenderEnvironment, S = crate::mutation::Immediate> {
    env: E,
    addressing: SurrogateCache<E::Handle>,
    sink: S,
}

impl<E: RenderEnvironment> Host<E> {
    /// Host that applies mutations immediately.
    #[must_use]
    pub fn new(env: E) -> Self {
        Self::with_sink(env, crate::mutation::Immediate)
    }
}

impl<E, S> Host<E, S>
where
    E: RenderEnvironment,
    S: MutationSink<E>,
{
    #[must_use]
    pub fn with_sink(env: E, sink: S) -> Self {
        Self {
            env,
            addressing: SurrogateCache::new(),
            sink,
        }
    }

    #[inline]
    pub fn env(&self) -> &E {
        &self.env
    }

    #[inline]
    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    #[inline]
    pub fn addressing(&self) -> &SurrogateCache<E::Handle> {
        &self.addressing
    }

    #[inline]
    pub fn addressing_mut(&mut self) -> &mut SurrogateCache<E::Handle> {
        &mut self.addressing
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Split borrow of environment and sink.
    pub(crate) fn env_and_sink(&mut self) -> (&mut E, &mut S) {
        (&mut self.env, &mut self.sink)
    }

    /// Environment handle for `node`.
    pub fn resolve(&mut self, node: &SurrogateNode) -> Result<E::Handle, SurfaceError> {
        self.addressing.resolve(&self.env, node)
    }

    /// Give back the environment, dropping the cache and sink.
    pub fn into_env(self) -> E {
        self.env
    }
}

impl<E: RenderEnvironment> Host<E, MutationLog<E::Handle>> {
    /// Apply and clear the deferred log.
    pub fn flush(&mut self) {
        self.sink.drain_into(&mut self.env);
    }
}
