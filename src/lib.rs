//! # Cairn
//!
//! A minimal real-time 3D demo built on wgpu and winit: one window, one
//! WGSL shader pair loaded from disk, one quad, and a free-fly camera
//! driven by WASD and the mouse.
//!
//! The library carries all the machinery; the binary in `main.rs` only
//! initialises logging and runs [`CairnApp`].
//!
//! ```no_run
//! use cairn::CairnApp;
//!
//! fn main() -> anyhow::Result<()> {
//!     CairnApp::new()?.run()
//! }
//! ```

pub mod app;
pub mod gfx;
pub mod wgpu_utils;

pub use app::CairnApp;
