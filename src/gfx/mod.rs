//! # Graphics Module
//!
//! Everything between window events and presented frames:
//!
//! - **Camera** ([`camera`]) - free-fly camera, its controller and the
//!   camera uniform
//! - **Mesh** ([`mesh`]) - vertex format and GPU buffer ownership
//! - **Shaders** ([`shader`]) - WGSL loading and compilation with
//!   stage-tagged errors
//! - **Resources** ([`resources`]) - uniform bind groups and the depth
//!   attachment
//! - **Render Engine** ([`render_engine`]) - surface, device and the
//!   per-frame render pass

pub mod camera;
pub mod mesh;
pub mod render_engine;
pub mod resources;
pub mod shader;

// Re-export commonly used types
pub use camera::fly_camera::FlyCamera;
pub use render_engine::RenderEngine;
