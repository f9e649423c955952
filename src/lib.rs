mod config;
mod error;
pub mod logging;
mod renderer;
mod vulkan;
mod window;

pub use config::{BootstrapConfig, ValidationSettings, WindowSettings, DEFAULT_VALIDATION_LAYER};
pub use error::{BootstrapError, WindowError};
pub use renderer::Renderer;
pub use vulkan::*;
pub use window::WindowManager;
