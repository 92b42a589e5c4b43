//! # Shader Loading
//!
//! Reads WGSL stage sources from disk and compiles them into shader
//! modules. Both files are read before any GPU work starts, so a missing
//! or unreadable file fails without touching the device. Compilation runs
//! under a validation error scope; an invalid module surfaces as a
//! `Compile` error carrying the compiler log instead of falling through
//! to wgpu's uncaptured-error path.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Pipeline stage a shader source belongs to, named for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader source {}: {source}", .path.display())]
    Io {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{stage} shader failed to compile: {message}")]
    Compile { stage: ShaderStage, message: String },
    #[error("shader pipeline failed to link: {message}")]
    Link { message: String },
}

/// One stage's source text, read wholesale from disk.
#[derive(Debug)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub path: PathBuf,
    pub code: String,
}

impl ShaderSource {
    pub fn load(stage: ShaderStage, path: &Path) -> Result<Self, ShaderError> {
        let code = fs::read_to_string(path).map_err(|source| ShaderError::Io {
            stage,
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            stage,
            path: path.to_path_buf(),
            code,
        })
    }
}

/// A compiled vertex/fragment module pair ready for pipeline creation.
pub struct ShaderSet {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

impl ShaderSet {
    /// Read both stage files, then compile both modules.
    pub fn load(
        device: &wgpu::Device,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<Self, ShaderError> {
        let vertex_source = ShaderSource::load(ShaderStage::Vertex, vertex_path)?;
        let fragment_source = ShaderSource::load(ShaderStage::Fragment, fragment_path)?;

        let vertex = compile_module(device, &vertex_source)?;
        let fragment = compile_module(device, &fragment_source)?;

        Ok(Self { vertex, fragment })
    }
}

fn compile_module(
    device: &wgpu::Device,
    source: &ShaderSource,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let label = source.path.display().to_string();

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(source.code.as_str().into()),
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(ShaderError::Compile {
            stage: source.stage,
            message: error.to_string(),
        }),
        None => Ok(module),
    }
}

/// Run pipeline creation under a validation error scope and map any
/// captured error to `Link`. Stage interface mismatches show up here,
/// not at module compilation.
pub fn link_scope<T>(
    device: &wgpu::Device,
    create: impl FnOnce() -> T,
) -> Result<T, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();

    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(ShaderError::Link {
            message: error.to_string(),
        }),
        None => Ok(value),
    }
}
