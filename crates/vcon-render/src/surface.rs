#![forbid(unsafe_code)]

//! Scrollable four-tile ring surface.
//!
//! Four equally sized drawables tile a plane twice the logical width and
//! height. Panning only moves them: the canvas position slides and, whenever
//! it wraps past a whole surface, the tile playing the top-left corner
//! changes. Pixels are never redrawn on pan.
//!
//! # Corner roles
//!
//! | role | bits | placed at        |
//! |------|------|------------------|
//! | TL   | 0    | `(cx, cy)`       |
//! | TR   | 1    | `(cx + W, cy)`   |
//! | BL   | 2    | `(cx, cy + H)`   |
//! | BR   | 3    | `(cx + W, cy + H)` |
//!
//! The tile in a role is `top_left_index ^ role`. Horizontal wraparound
//! toggles bit 0 of `top_left_index`, vertical wraparound bit 1.
//!
//! # Invariants
//!
//! - `canvas_x ∈ (−W, 0]`, `canvas_y ∈ (−H, 0]` after construction and after
//!   every pan.
//! - A fill at logical viewport position `p` is visible at `p` regardless of
//!   the pan history; content painted earlier shifts by `−d` on `pan(d)`
//!   modulo twice the surface size.

use std::rc::Rc;

use vcon_core::color::Rgba;
use vcon_core::config::{DisplayConfig, GlyphMirroring};
use vcon_core::geometry::PixelRect;

use crate::environment::RenderEnvironment;
use crate::error::SurfaceError;
use crate::font;
use crate::glyph_runs::{GlyphRun, MAX_SCALE};
use crate::host::Host;
use crate::mutation::MutationSink;
use crate::run_cache::GlyphRunCache;
use crate::surrogate::SurrogateNode;

/// Number of backing drawables.
pub const RING_SIZE: usize = 4;

/// Local id of the container holding the tiles.
pub const RING_CONTAINER_ID: &str = "ring";

/// Local id and marker of the tile with ring index `index`.
#[must_use]
pub fn tile_tag(index: usize) -> String {
    format!("tile-{index}")
}

/// Visual corner a tile currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CornerRole {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl CornerRole {
    pub const ALL: [CornerRole; RING_SIZE] = [
        CornerRole::TopLeft,
        CornerRole::TopRight,
        CornerRole::BottomLeft,
        CornerRole::BottomRight,
    ];

    #[inline]
    pub const fn bits(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn is_right(self) -> bool {
        self.bits() & 1 != 0
    }

    #[inline]
    pub const fn is_bottom(self) -> bool {
        self.bits() & 2 != 0
    }
}

/// A surface that scrolls by moving its backing drawables.
///
/// Every operation takes the [`Host`] it renders through.
pub trait ScrollableSurface {
    /// Logical `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Current `(canvas_x, canvas_y)`.
    fn canvas_position(&self) -> (i32, i32);

    /// Ring index of the tile at the visual top-left.
    fn top_left_index(&self) -> usize;

    /// `(glyph_width, glyph_height)` of one character cell.
    fn glyph_cell(&self) -> (u32, u32);

    /// Fill a rectangle given in logical viewport coordinates.
    fn fill_rect<E, S>(
        &self,
        host: &mut Host<E, S>,
        rect: PixelRect,
        color: Rgba,
    ) -> Result<(), SurfaceError>
    where
        E: RenderEnvironment,
        S: MutationSink<E>;

    /// Paint an encoded glyph into character cell `(col, row)`.
    fn paint_glyph<E, S>(
        &self,
        host: &mut Host<E, S>,
        col: u32,
        row: u32,
        color: Rgba,
        run: &GlyphRun,
    ) -> Result<(), SurfaceError>
    where
        E: RenderEnvironment,
        S: MutationSink<E>;

    /// Scroll by `(dx, dy)` pixels.
    fn pan<E, S>(&mut self, host: &mut Host<E, S>, dx: i32, dy: i32) -> Result<(), SurfaceError>
    where
        E: RenderEnvironment,
        S: MutationSink<E>;

    /// Place every tile at its corner for the current canvas position.
    fn reposition<E, S>(&self, host: &mut Host<E, S>) -> Result<(), SurfaceError>
    where
        E: RenderEnvironment,
        S: MutationSink<E>;
}

/// Four drawables arranged as a wrapping 2x2 ring.
#[derive(Debug, Clone)]
pub struct RingSurface {
    width: u32,
    height: u32,
    glyph_width: u32,
    glyph_height: u32,
    mirroring: GlyphMirroring,
    canvas_x: i32,
    canvas_y: i32,
    top_left: usize,
    parent: Rc<SurrogateNode>,
    container: Rc<SurrogateNode>,
    tiles: [Rc<SurrogateNode>; RING_SIZE],
}

impl RingSurface {
    /// Materialize the ring under `parent`.
    ///
    /// Resolves the parent, sizes it to the logical surface, creates the
    /// `ring` container and four tiles, attaches them through the host's
    /// sink and seeds the surrogate cache with the new handles. Fails with
    /// [`SurfaceError::AlreadyMounted`] if the parent already holds a ring.
    pub fn new<E, S>(
        parent: Rc<SurrogateNode>,
        host: &mut Host<E, S>,
        config: &DisplayConfig,
    ) -> Result<Self, SurfaceError>
    where
        E: RenderEnvironment,
        S: MutationSink<E>,
    {
        config.validate()?;
        let (width, height) = (config.width, config.height);

        let parent_handle = host.resolve(&parent)?;
        let container = parent.child(RING_CONTAINER_ID);
        // A pending attach in a deferred sink is only visible through the cache.
        if host.addressing().contains(&container)
            || host
                .env()
                .find_child(&parent_handle, RING_CONTAINER_ID)
                .is_some()
        {
            let err = SurfaceError::AlreadyMounted {
                key: container.cache_key().to_owned(),
            };
            vcon_core::warn!(parent = parent.cache_key(), error = %err, "ring surface refused");
            return Err(err);
        }
        host.env_mut().set_size(&parent_handle, width, height);

        let container_handle = host.env_mut().create_container(RING_CONTAINER_ID)?;
        {
            let (env, sink) = host.env_and_sink();
            sink.attach(env, &parent_handle, &container_handle, RING_CONTAINER_ID);
        }
        host.addressing_mut()
            .seed(&container, container_handle.clone());

        let tiles: [Rc<SurrogateNode>; RING_SIZE] =
            std::array::from_fn(|index| container.child(tile_tag(index)));
        for tile in &tiles {
            let handle = host
                .env_mut()
                .create_drawable(tile.local_id(), width, height)?;
            {
                let (env, sink) = host.env_and_sink();
                sink.attach(env, &container_handle, &handle, tile.local_id());
            }
            host.addressing_mut().seed(tile, handle);
        }

        let surface = Self {
            width,
            height,
            glyph_width: config.glyph_width,
            glyph_height: config.glyph_height,
            mirroring: config.glyph_mirroring,
            canvas_x: 0,
            canvas_y: 0,
            top_left: 0,
            parent,
            container,
            tiles,
        };
        surface.reposition(host)?;

        vcon_core::debug!(
            parent = surface.parent.cache_key(),
            width,
            height,
            "ring surface created"
        );
        Ok(surface)
    }

    #[inline]
    pub fn mirroring(&self) -> GlyphMirroring {
        self.mirroring
    }

    #[inline]
    pub fn parent_node(&self) -> &Rc<SurrogateNode> {
        &self.parent
    }

    #[inline]
    pub fn container_node(&self) -> &Rc<SurrogateNode> {
        &self.container
    }

    /// Surrogate of the tile with ring index `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= RING_SIZE`.
    #[inline]
    pub fn tile_node(&self, index: usize) -> &Rc<SurrogateNode> {
        &self.tiles[index]
    }

    /// Ring index of the tile currently in `role`.
    #[inline]
    pub fn tile_for_role(&self, role: CornerRole) -> usize {
        self.top_left ^ role.bits()
    }

    /// Paint `text` with the built-in font, one character per cell starting
    /// at `(col, row)`. A newline moves to `col` of the next row. Characters
    /// the font lacks leave their cell untouched. Returns the number of
    /// glyphs painted.
    pub fn paint_text<E, S>(
        &self,
        host: &mut Host<E, S>,
        col: u32,
        row: u32,
        color: Rgba,
        text: &str,
        runs: &mut GlyphRunCache,
    ) -> Result<usize, SurfaceError>
    where
        E: RenderEnvironment,
        S: MutationSink<E>,
    {
        let scale = self.font_scale();
        let (mut x, mut y) = (col, row);
        let mut painted = 0;
        for ch in text.chars() {
            if ch == '\n' {
                x = col;
                y = y.saturating_add(1);
                continue;
            }
            if let Some(bitmap) = font::glyph(ch)
                && !bitmap.is_blank()
            {
                let run = runs.get_or_encode(&bitmap, scale);
                self.paint_glyph(host, x, y, color, &run)?;
                painted += 1;
            }
            x = x.saturating_add(1);
        }
        Ok(painted)
    }

    /// Shift that fits the 8x8 font into a glyph cell.
    fn font_scale(&self) -> u32 {
        let ratio = self.glyph_width.min(self.glyph_height) / 8;
        if ratio == 0 {
            0
        } else {
            ratio.ilog2().min(MAX_SCALE)
        }
    }

    fn tile_handles<E, S>(
        &self,
        host: &mut Host<E, S>,
    ) -> Result<[E::Handle; RING_SIZE], SurfaceError>
    where
        E: RenderEnvironment,
        S: MutationSink<E>,
    {
        let [t0, t1, t2, t3] = &self.tiles;
        Ok([
            host.resolve(t0)?,
            host.resolve(t1)?,
            host.resolve(t2)?,
            host.resolve(t3)?,
        ])
    }
}

/// Slide one axis of the canvas by `offset`, returning the new position and
/// whether the top-left tile toggles on this axis.
///
/// Whole surface multiples each toggle once; the remainder moves the canvas
/// and toggles once more if it wraps past `-extent`.
fn wrap_axis(position: i32, offset: i32, extent: u32) -> (i32, bool) {
    let extent = i64::from(extent);
    let offset = i64::from(offset);
    let laps = offset.div_euclid(extent);
    let step = offset.rem_euclid(extent);

    let mut flip = laps.rem_euclid(2) == 1;
    let mut next = i64::from(position) - step;
    if next <= -extent {
        next += extent;
        flip = !flip;
    }
    // `next` is in (-extent, 0] and extent fits in i32.
    (next as i32, flip)
}

#[inline]
fn to_i32(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl ScrollableSurface for RingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn canvas_position(&self) -> (i32, i32) {
        (self.canvas_x, self.canvas_y)
    }

    fn top_left_index(&self) -> usize {
        self.top_left
    }

    fn glyph_cell(&self) -> (u32, u32) {
        (self.glyph_width, self.glyph_height)
    }

    fn fill_rect<E, S>(
        &self,
        host: &mut Host<E, S>,
        rect: PixelRect,
        color: Rgba,
    ) -> Result<(), SurfaceError>
    where
        E: RenderEnvironment,
        S: MutationSink<E>,
    {
        if rect.is_empty() {
            return Ok(());
        }
        let handles = self.tile_handles(host)?;
        let (w, h) = (to_i32(u64::from(self.width)), to_i32(u64::from(self.height)));
        for role in CornerRole::ALL {
            let adj_x = if role.is_right() { w } else { 0 };
            let adj_y = if role.is_bottom() { h } else { 0 };
            let local = rect.translate(
                -self.canvas_x.saturating_add(adj_x),
                -self.canvas_y.saturating_add(adj_y),
            );
            if local.clip(self.width, self.height).is_none() {
                continue;
            }
            let tile = &handles[self.tile_for_role(role)];
            host.env_mut().fill_rect(tile, local, color);
        }
        Ok(())
    }

    fn paint_glyph<E, S>(
        &self,
        host: &mut Host<E, S>,
        col: u32,
        row: u32,
        color: Rgba,
        run: &GlyphRun,
    ) -> Result<(), SurfaceError>
    where
        E: RenderEnvironment,
        S: MutationSink<E>,
    {
        if run.is_empty() {
            return Ok(());
        }
        let origin_x = u64::from(col) * u64::from(self.glyph_width);
        let origin_y = u64::from(row) * u64::from(self.glyph_height);
        let place = |r: &crate::glyph_runs::RunRect| {
            PixelRect::new(
                to_i32(origin_x + u64::from(r.left)),
                to_i32(origin_y + u64::from(r.top)),
                r.width,
                r.height,
            )
        };

        match self.mirroring {
            GlyphMirroring::Canonical => {
                // Unscrolled frame of ring tile 0 only.
                let tile = host.resolve(&self.tiles[0])?;
                for r in run {
                    host.env_mut().fill_rect(&tile, place(r), color);
                }
            }
            GlyphMirroring::Mirrored => {
                for r in run {
                    self.fill_rect(host, place(r), color)?;
                }
            }
        }
        Ok(())
    }

    fn pan<E, S>(&mut self, host: &mut Host<E, S>, dx: i32, dy: i32) -> Result<(), SurfaceError>
    where
        E: RenderEnvironment,
        S: MutationSink<E>,
    {
        let (x, flip_x) = wrap_axis(self.canvas_x, dx, self.width);
        let (y, flip_y) = wrap_axis(self.canvas_y, dy, self.height);
        self.canvas_x = x;
        self.canvas_y = y;
        if flip_x {
            self.top_left ^= 1;
        }
        if flip_y {
            self.top_left ^= 2;
        }
        vcon_core::trace!(
            dx,
            dy,
            canvas_x = x,
            canvas_y = y,
            top_left = self.top_left,
            "ring surface pan"
        );
        self.reposition(host)
    }

    fn reposition<E, S>(&self, host: &mut Host<E, S>) -> Result<(), SurfaceError>
    where
        E: RenderEnvironment,
        S: MutationSink<E>,
    {
        let container = host.resolve(&self.container)?;
        let handles = self.tile_handles(host)?;
        let (w, h) = (to_i32(u64::from(self.width)), to_i32(u64::from(self.height)));
        for role in CornerRole::ALL {
            let left = self.canvas_x + if role.is_right() { w } else { 0 };
            let top = self.canvas_y + if role.is_bottom() { h } else { 0 };
            let index = self.tile_for_role(role);
            let (env, sink) = host.env_and_sink();
            sink.position_child(
                env,
                &container,
                &handles[index],
                self.tiles[index].local_id(),
                top,
                left,
            );
        }
        vcon_core::trace!(top_left = self.top_left, "ring surface repositioned");
        Ok(())
    }
}
