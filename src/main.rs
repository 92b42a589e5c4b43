use anyhow::Result;
use env_logger::{Builder, Env};

use cairn::CairnApp;

fn main() -> Result<()> {
    // Default to info-level logging; wgpu_hal is noisy below error.
    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .init();

    CairnApp::new()?.run()
}
