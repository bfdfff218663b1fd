#![forbid(unsafe_code)]

//! Environment-independent display controller.
//!
//! [`Console`] owns a [`Host`], the [`RingSurface`] built under a named root
//! and a glyph-run cache, and exposes the operations the JS API forwards to.
//! It compiles on every target so the whole flow is testable against the
//! headless environment.

use std::fmt;

use vcon_core::color::{ColorError, Rgba};
use vcon_core::config::{ConfigError, DisplayConfig};
use vcon_core::geometry::PixelRect;
use vcon_core::settings::Settings;
use vcon_render::headless::HeadlessEnvironment;
use vcon_render::run_cache::GlyphRunCache;
use vcon_render::surrogate::SurrogateNode;
use vcon_render::{Host, RenderEnvironment, RingSurface, ScrollableSurface, SurfaceError};

/// Failure of a console operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleError {
    Surface(SurfaceError),
    Config(ConfigError),
    Color(ColorError),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Color(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Color(err) => Some(err),
        }
    }
}

impl From<SurfaceError> for ConsoleError {
    fn from(err: SurfaceError) -> Self {
        Self::Surface(err)
    }
}

impl From<ConfigError> for ConsoleError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ColorError> for ConsoleError {
    fn from(err: ColorError) -> Self {
        Self::Color(err)
    }
}

/// A scrollable display mounted under one root node.
pub struct Console<E: RenderEnvironment> {
    host: Host<E>,
    surface: RingSurface,
    runs: GlyphRunCache,
    config: DisplayConfig,
}

impl<E: RenderEnvironment> Console<E> {
    /// Mount a display under the root `root_id` of `env`.
    pub fn new(env: E, root_id: &str, settings: &Settings) -> Result<Self, ConsoleError> {
        let config = DisplayConfig::from_settings(settings)?;
        let mut host = Host::new(env);
        let surface = RingSurface::new(SurrogateNode::root(root_id), &mut host, &config)?;
        Ok(Self {
            host,
            surface,
            runs: GlyphRunCache::default(),
            config,
        })
    }

    /// [`Console::new`] with settings given as a JSON object. Blank input
    /// means all defaults.
    pub fn from_json(env: E, root_id: &str, settings_json: &str) -> Result<Self, ConsoleError> {
        let settings = if settings_json.trim().is_empty() {
            Settings::new()
        } else {
            Settings::from_json_str(settings_json)?
        };
        Self::new(env, root_id, &settings)
    }

    /// Fill a viewport rectangle with a CSS hex colour.
    pub fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: &str,
    ) -> Result<(), ConsoleError> {
        let color: Rgba = color.parse()?;
        self.surface
            .fill_rect(&mut self.host, PixelRect::new(x, y, width, height), color)?;
        Ok(())
    }

    /// Paint `text` from character cell `(col, row)`; returns glyphs drawn.
    pub fn paint_text(
        &mut self,
        col: u32,
        row: u32,
        color: &str,
        text: &str,
    ) -> Result<usize, ConsoleError> {
        let color: Rgba = color.parse()?;
        Ok(self
            .surface
            .paint_text(&mut self.host, col, row, color, text, &mut self.runs)?)
    }

    pub fn pan(&mut self, dx: i32, dy: i32) -> Result<(), ConsoleError> {
        self.surface.pan(&mut self.host, dx, dy)?;
        Ok(())
    }

    #[inline]
    pub fn canvas_x(&self) -> i32 {
        self.surface.canvas_position().0
    }

    #[inline]
    pub fn canvas_y(&self) -> i32 {
        self.surface.canvas_position().1
    }

    #[inline]
    pub fn top_left_index(&self) -> usize {
        self.surface.top_left_index()
    }

    #[inline]
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    #[inline]
    pub fn surface(&self) -> &RingSurface {
        &self.surface
    }

    #[inline]
    pub fn host(&self) -> &Host<E> {
        &self.host
    }

    #[inline]
    pub fn run_cache(&self) -> &GlyphRunCache {
        &self.runs
    }

    /// Handle of the ring container, for teardown.
    pub fn container(&mut self) -> Result<E::Handle, ConsoleError> {
        Ok(self.host.resolve(self.surface.container_node())?)
    }

    /// Forget cached handles so the next operation looks the ring up again.
    pub fn reset_addressing(&mut self) {
        self.host.addressing_mut().reset();
    }
}

impl Console<HeadlessEnvironment> {
    /// Console on a fresh headless environment with a single root.
    pub fn headless(root_id: &str, settings_json: &str) -> Result<Self, ConsoleError> {
        let mut env = HeadlessEnvironment::new();
        env.add_root(root_id);
        Self::from_json(env, root_id, settings_json)
    }

    /// What the viewport currently shows, `#` for painted pixels.
    pub fn viewport_ascii(&mut self) -> Result<String, ConsoleError> {
        let container = self.container()?;
        let (width, height) = self.surface.size();
        Ok(self
            .host
            .env()
            .composite_ascii(container, width, height))
    }
}
