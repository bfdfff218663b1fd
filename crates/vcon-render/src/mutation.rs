#![forbid(unsafe_code)]

//! Structural mutation sinks.
//!
//! Every attach and child positioning the engine performs goes through a
//! [`MutationSink`]. [`Immediate`] forwards straight to the environment;
//! [`MutationLog`] records typed entries that tests can query and that a
//! host can replay later.

use crate::environment::RenderEnvironment;

/// Outward seam for structural changes.
pub trait MutationSink<E: RenderEnvironment> {
    /// Append `child` under `parent`.
    fn attach(&mut self, env: &mut E, parent: &E::Handle, child: &E::Handle, tag: &str);

    /// Place `child` at `(left, top)` inside `parent`.
    fn position_child(
        &mut self,
        env: &mut E,
        parent: &E::Handle,
        child: &E::Handle,
        tag: &str,
        top: i32,
        left: i32,
    );
}

/// Applies every mutation to the environment as it happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl<E: RenderEnvironment> MutationSink<E> for Immediate {
    fn attach(&mut self, env: &mut E, parent: &E::Handle, child: &E::Handle, _tag: &str) {
        env.attach(parent, child);
    }

    fn position_child(
        &mut self,
        env: &mut E,
        _parent: &E::Handle,
        child: &E::Handle,
        _tag: &str,
        top: i32,
        left: i32,
    ) {
        env.set_position(child, left, top);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Attach,
    Position,
}

/// One recorded structural change.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<H> {
    Attach {
        parent: H,
        child: H,
        tag: String,
    },
    Position {
        parent: H,
        child: H,
        tag: String,
        top: i32,
        left: i32,
    },
}

impl<H> Mutation<H> {
    #[inline]
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Attach { .. } => MutationKind::Attach,
            Self::Position { .. } => MutationKind::Position,
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        match self {
            Self::Attach { tag, .. } | Self::Position { tag, .. } => tag,
        }
    }

    #[inline]
    pub fn child(&self) -> &H {
        match self {
            Self::Attach { child, .. } | Self::Position { child, .. } => child,
        }
    }

    #[inline]
    pub fn parent(&self) -> &H {
        match self {
            Self::Attach { parent, .. } | Self::Position { parent, .. } => parent,
        }
    }

    fn apply<E>(&self, env: &mut E)
    where
        E: RenderEnvironment<Handle = H>,
    {
        match self {
            Self::Attach { parent, child, .. } => env.attach(parent, child),
            Self::Position {
                child, top, left, ..
            } => env.set_position(child, *left, *top),
        }
    }
}

/// Append-only record of mutations.
///
/// A deferred log ([`MutationLog::new`]) only records; the environment sees
/// nothing until [`replay`](Self::replay) or [`drain_into`](Self::drain_into).
/// A passthrough log records and applies at once.
#[derive(Debug, Clone)]
pub struct MutationLog<H> {
    entries: Vec<Mutation<H>>,
    passthrough: bool,
}

impl<H> Default for MutationLog<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            passthrough: false,
        }
    }
}

impl<H> MutationLog<H> {
    /// Deferred log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that also applies each mutation immediately.
    #[must_use]
    pub fn passthrough() -> Self {
        Self {
            entries: Vec::new(),
            passthrough: true,
        }
    }

    #[inline]
    pub fn is_passthrough(&self) -> bool {
        self.passthrough
    }

    #[inline]
    pub fn entries(&self) -> &[Mutation<H>] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry of `kind` carrying `tag`.
    #[must_use]
    pub fn find_by_tag(&self, kind: MutationKind, tag: &str) -> Option<&Mutation<H>> {
        self.entries
            .iter()
            .find(|entry| entry.kind() == kind && entry.tag() == tag)
    }

    /// Drop every entry, releasing the handles they hold.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Apply the recorded entries to `env` in order.
    pub fn replay<E>(&self, env: &mut E)
    where
        E: RenderEnvironment<Handle = H>,
    {
        for entry in &self.entries {
            entry.apply(env);
        }
    }

    /// [`replay`](Self::replay), then [`reset`](Self::reset).
    pub fn drain_into<E>(&mut self, env: &mut E)
    where
        E: RenderEnvironment<Handle = H>,
    {
        vcon_core::trace!(entries = self.entries.len(), "draining mutation log");
        self.replay(env);
        self.reset();
    }

    fn record<E>(&mut self, env: &mut E, entry: Mutation<H>)
    where
        E: RenderEnvironment<Handle = H>,
    {
        if self.passthrough {
            entry.apply(env);
        }
        self.entries.push(entry);
    }
}

impl<E: RenderEnvironment> MutationSink<E> for MutationLog<E::Handle> {
    fn attach(&mut self, env: &mut E, parent: &E::Handle, child: &E::Handle, tag: &str) {
        self.record(
            env,
            Mutation::Attach {
                parent: parent.clone(),
                child: child.clone(),
                tag: tag.to_owned(),
            },
        );
    }

    fn position_child(
        &mut self,
        env: &mut E,
        parent: &E::Handle,
        child: &E::Handle,
        tag: &str,
        top: i32,
        left: i32,
    ) {
        self.record(
            env,
            Mutation::Position {
                parent: parent.clone(),
                child: child.clone(),
                tag: tag.to_owned(),
                top,
                left,
            },
        );
    }
}
