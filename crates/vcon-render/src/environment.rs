#![forbid(unsafe_code)]

//! The render-surface environment the engine draws into.
//!
//! Anything that can look nodes up, create drawables, attach and position
//! them, and fill rectangles qualifies: a retained DOM tree, an immediate-mode
//! canvas, or the software [`HeadlessEnvironment`](crate::headless::HeadlessEnvironment).

use std::fmt;

use vcon_core::color::Rgba;
use vcon_core::geometry::PixelRect;

use crate::error::SurfaceError;

pub trait RenderEnvironment {
    /// Reference to one node of the backing render tree.
    type Handle: Clone + PartialEq + fmt::Debug;

    /// Find a top-level node by its identifier.
    fn lookup_root(&self, id: &str) -> Option<Self::Handle>;

    /// Find the direct child of `parent` carrying structural marker `marker`.
    fn find_child(&self, parent: &Self::Handle, marker: &str) -> Option<Self::Handle>;

    /// Create a detached container node.
    fn create_container(&mut self, marker: &str) -> Result<Self::Handle, SurfaceError>;

    /// Create a detached `width` x `height` drawable tagged with `marker`.
    fn create_drawable(
        &mut self,
        marker: &str,
        width: u32,
        height: u32,
    ) -> Result<Self::Handle, SurfaceError>;

    /// Append `child` under `parent`, detaching it from any previous parent.
    fn attach(&mut self, parent: &Self::Handle, child: &Self::Handle);

    /// Absolutely position `node` relative to its parent.
    fn set_position(&mut self, node: &Self::Handle, left: i32, top: i32);

    /// Force the layout size of `node`.
    fn set_size(&mut self, node: &Self::Handle, width: u32, height: u32);

    /// Fill `rect` of a drawable; the drawable clips to its own bounds.
    fn fill_rect(&mut self, drawable: &Self::Handle, rect: PixelRect, color: Rgba);
}
