#![forbid(unsafe_code)]

//! Software render environment.
//!
//! A small retained scene graph with RGBA pixel storage for drawables. It is
//! the deterministic stand-in for the browser: tests inspect per-drawable
//! pixels, node positions and lookup counts, and [`HeadlessEnvironment::composite`]
//! samples what a viewport would show.

use std::cell::Cell;
use std::collections::HashMap;

use vcon_core::color::Rgba;
use vcon_core::geometry::PixelRect;

use crate::environment::RenderEnvironment;
use crate::error::SurfaceError;

/// Index of a node in a [`HeadlessEnvironment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeRecord {
    marker: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    left: i32,
    top: i32,
    width: u32,
    height: u32,
    /// Row-major pixels; `None` for containers.
    pixels: Option<Vec<Rgba>>,
}

impl NodeRecord {
    fn new(marker: &str, width: u32, height: u32, pixels: Option<Vec<Rgba>>) -> Self {
        Self {
            marker: marker.to_owned(),
            parent: None,
            children: Vec::new(),
            left: 0,
            top: 0,
            width,
            height,
            pixels,
        }
    }
}

/// Lookup and draw counters, for asserting how often the engine touched the
/// environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvironmentStats {
    pub root_lookups: u64,
    pub child_lookups: u64,
    pub attaches: u64,
    pub positions: u64,
    pub fills: u64,
}

/// In-memory render environment.
#[derive(Debug, Default)]
pub struct HeadlessEnvironment {
    nodes: Vec<NodeRecord>,
    roots: HashMap<String, NodeId>,
    root_lookups: Cell<u64>,
    child_lookups: Cell<u64>,
    attaches: u64,
    positions: u64,
    fills: u64,
}

impl HeadlessEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level container reachable through `lookup_root(id)`.
    pub fn add_root(&mut self, id: &str) -> NodeId {
        let node = self.push(NodeRecord::new(id, 0, 0, None));
        self.roots.insert(id.to_owned(), node);
        node
    }

    #[must_use]
    pub fn stats(&self) -> EnvironmentStats {
        EnvironmentStats {
            root_lookups: self.root_lookups.get(),
            child_lookups: self.child_lookups.get(),
            attaches: self.attaches,
            positions: self.positions,
            fills: self.fills,
        }
    }

    #[must_use]
    pub fn marker(&self, node: NodeId) -> Option<&str> {
        self.record(node).map(|r| r.marker.as_str())
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.record(node).and_then(|r| r.parent)
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.record(node).map_or(&[], |r| r.children.as_slice())
    }

    /// `(left, top)` relative to the parent.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<(i32, i32)> {
        self.record(node).map(|r| (r.left, r.top))
    }

    #[must_use]
    pub fn size(&self, node: NodeId) -> Option<(u32, u32)> {
        self.record(node).map(|r| (r.width, r.height))
    }

    /// Pixel of a drawable; `None` for containers or out-of-range reads.
    #[must_use]
    pub fn pixel(&self, node: NodeId, x: u32, y: u32) -> Option<Rgba> {
        let record = self.record(node)?;
        let pixels = record.pixels.as_ref()?;
        if x >= record.width || y >= record.height {
            return None;
        }
        pixels
            .get(y as usize * record.width as usize + x as usize)
            .copied()
    }

    /// Drawable pixels as text: `#` for visible pixels, `.` otherwise.
    #[must_use]
    pub fn ascii_dump(&self, node: NodeId) -> String {
        let Some(record) = self.record(node) else {
            return String::new();
        };
        let Some(pixels) = record.pixels.as_ref() else {
            return String::new();
        };
        ascii_rows(pixels, record.width as usize)
    }

    /// Render what a `width` x `height` viewport onto `container` shows.
    ///
    /// Each drawable child is copied at its position, clipped to the
    /// viewport; later children paint over earlier ones.
    #[must_use]
    pub fn composite(&self, container: NodeId, width: u32, height: u32) -> Vec<Rgba> {
        let mut out = vec![Rgba::TRANSPARENT; width as usize * height as usize];
        for &child in self.children(container) {
            let Some(record) = self.record(child) else {
                continue;
            };
            let Some(pixels) = record.pixels.as_ref() else {
                continue;
            };
            let placed = PixelRect::new(record.left, record.top, record.width, record.height);
            let Some(visible) = placed.clip(width, height) else {
                continue;
            };
            for vy in visible.y0..visible.y1 {
                let sy = (i64::from(vy) - i64::from(record.top)) as usize;
                for vx in visible.x0..visible.x1 {
                    let sx = (i64::from(vx) - i64::from(record.left)) as usize;
                    let src = pixels[sy * record.width as usize + sx];
                    if src.is_visible() {
                        out[vy as usize * width as usize + vx as usize] = src;
                    }
                }
            }
        }
        out
    }

    /// [`Self::composite`] rendered like [`Self::ascii_dump`].
    #[must_use]
    pub fn composite_ascii(&self, container: NodeId, width: u32, height: u32) -> String {
        ascii_rows(&self.composite(container, width, height), width as usize)
    }

    fn push(&mut self, record: NodeRecord) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(record);
        id
    }

    fn record(&self, node: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(node.index())
    }

    fn record_mut(&mut self, node: NodeId) -> Option<&mut NodeRecord> {
        self.nodes.get_mut(node.index())
    }

    fn detach(&mut self, child: NodeId) {
        let Some(old_parent) = self.record(child).and_then(|r| r.parent) else {
            return;
        };
        if let Some(parent) = self.record_mut(old_parent) {
            parent.children.retain(|c| *c != child);
        }
    }
}

fn ascii_rows(pixels: &[Rgba], width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    pixels
        .chunks(width)
        .map(|row| {
            row.iter()
                .map(|p| if p.is_visible() { '#' } else { '.' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl RenderEnvironment for HeadlessEnvironment {
    type Handle = NodeId;

    fn lookup_root(&self, id: &str) -> Option<NodeId> {
        self.root_lookups.set(self.root_lookups.get() + 1);
        self.roots.get(id).copied()
    }

    fn find_child(&self, parent: &NodeId, marker: &str) -> Option<NodeId> {
        self.child_lookups.set(self.child_lookups.get() + 1);
        self.children(*parent)
            .iter()
            .copied()
            .find(|child| self.marker(*child) == Some(marker))
    }

    fn create_container(&mut self, marker: &str) -> Result<NodeId, SurfaceError> {
        Ok(self.push(NodeRecord::new(marker, 0, 0, None)))
    }

    fn create_drawable(
        &mut self,
        marker: &str,
        width: u32,
        height: u32,
    ) -> Result<NodeId, SurfaceError> {
        let len = usize::try_from(u64::from(width) * u64::from(height))
            .map_err(|_| SurfaceError::Environment(format!("{width}x{height} drawable")))?;
        let pixels = vec![Rgba::TRANSPARENT; len];
        Ok(self.push(NodeRecord::new(marker, width, height, Some(pixels))))
    }

    fn attach(&mut self, parent: &NodeId, child: &NodeId) {
        if self.record(*parent).is_none() || self.record(*child).is_none() {
            return;
        }
        self.detach(*child);
        if let Some(record) = self.record_mut(*child) {
            record.parent = Some(*parent);
        }
        if let Some(record) = self.record_mut(*parent) {
            record.children.push(*child);
        }
        self.attaches += 1;
    }

    fn set_position(&mut self, node: &NodeId, left: i32, top: i32) {
        let Some(record) = self.record_mut(*node) else {
            return;
        };
        record.left = left;
        record.top = top;
        self.positions += 1;
    }

    fn set_size(&mut self, node: &NodeId, width: u32, height: u32) {
        let Some(record) = self.record_mut(*node) else {
            return;
        };
        // Drawables keep their backing store; only layout boxes resize.
        if record.pixels.is_none() {
            record.width = width;
            record.height = height;
        }
    }

    fn fill_rect(&mut self, drawable: &NodeId, rect: PixelRect, color: Rgba) {
        let Some(record) = self.record_mut(*drawable) else {
            return;
        };
        let width = record.width;
        let Some(clipped) = rect.clip(width, record.height) else {
            return;
        };
        let Some(pixels) = record.pixels.as_mut() else {
            return;
        };
        for y in clipped.y0..clipped.y1 {
            let row = y as usize * width as usize;
            pixels[row + clipped.x0 as usize..row + clipped.x1 as usize].fill(color);
        }
        self.fills += 1;
    }
}
