#![forbid(unsafe_code)]

//! Render kernel: glyph rectangle runs, surrogate addressing, and the
//! scrollable four-tile ring surface.

pub mod bitmap;
pub mod environment;
pub mod error;
pub mod font;
pub mod glyph_runs;
pub mod headless;
pub mod host;
pub mod mutation;
pub mod run_cache;
pub mod surface;
pub mod surrogate;

pub use environment::RenderEnvironment;
pub use error::SurfaceError;
pub use host::Host;
pub use surface::{RingSurface, ScrollableSurface};
