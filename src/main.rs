use anyhow::Result;
use hello_vulkan::{logging, BootstrapConfig, Renderer, WindowSettings};
use tracing::info;

fn main() -> Result<()> {
    logging::init()?;

    let config = BootstrapConfig::from_build();
    info!(
        "Starting {} (validations {})",
        config.application_name,
        if config.validation.enabled { "on" } else { "off" }
    );

    let mut renderer = Renderer::try_new(&config, &WindowSettings::default())?;
    renderer.run();

    Ok(())
}
