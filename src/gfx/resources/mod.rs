//! GPU resource management
//!
//! Uniform buffers, bind groups and the depth attachment.

pub mod bindings;
pub mod texture_resource;

// Re-export main types
pub use bindings::{GlobalUBO, TransformUBO, TransformUniform, UniformBindings};
pub use texture_resource::TextureResource;
