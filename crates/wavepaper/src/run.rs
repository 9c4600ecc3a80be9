use anyhow::{Context, Result};
use renderer::{Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::{parse_surface_size, Args};

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let mut config = RendererConfig::default();
    if let Some(ref size) = args.size {
        config.surface_size = parse_surface_size(size)
            .with_context(|| format!("invalid --size value '{size}'"))?;
    }
    if let Some(title) = args.title {
        config.window_title = title;
    }

    tracing::info!(
        width = config.surface_size.0,
        height = config.surface_size.1,
        "starting wavepaper backdrop"
    );
    let mut renderer = Renderer::new(config);
    renderer.run()
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
