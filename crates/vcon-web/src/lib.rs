#![forbid(unsafe_code)]

//! WASM frontend for vcon.
//!
//! Exposes a `wasm-bindgen` class, `VconDisplay`, that mounts a scrollable
//! four-tile display under a DOM element and forwards fills, text and pans
//! to the render kernel. The controller behind it, [`Console`], is generic
//! over the render environment and builds on every target.

pub mod console;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use console::{Console, ConsoleError};

#[cfg(target_arch = "wasm32")]
pub use dom::DomEnvironment;
#[cfg(target_arch = "wasm32")]
pub use wasm::VconDisplay;

/// Native builds drive the same controller against the software environment,
/// so `cargo test --workspace` exercises the full display flow off the web.
#[cfg(not(target_arch = "wasm32"))]
pub type VconDisplay = Console<vcon_render::headless::HeadlessEnvironment>;
