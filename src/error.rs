use std::ffi::NulError;

use ash::vk;
use thiserror::Error;

/// Everything that can abort the Vulkan startup sequence. Each variant is raised
/// where the failure is detected and travels up unchanged.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("validation layers requested but not available: {missing:?}")]
    ValidationUnavailable { missing: Vec<String> },
    #[error("failed to enumerate instance layers: {0}")]
    LayerEnumeration(vk::Result),
    #[error("failed to create instance: {0}")]
    InstanceCreation(vk::Result),
    #[error("failed to register debug messenger: {0}")]
    DebugCallbackRegistration(vk::Result),
    #[error("failed to create window surface: {0}")]
    SurfaceCreation(vk::Result),
    #[error("failed to query surface support: {0}")]
    SurfaceQuery(vk::Result),
    #[error("failed to enumerate physical devices: {0}")]
    DeviceEnumeration(vk::Result),
    #[error("unable to find GPUs with Vulkan support")]
    NoDevice,
    #[error("unable to find a suitable GPU")]
    NoSuitableDevice,
    #[error("failed to create logical device: {0}")]
    DeviceCreation(vk::Result),
    #[error("name contains an interior nul byte")]
    InvalidName(#[from] NulError),
}

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("failed to initialize GLFW: {0}")]
    Init(#[from] glfw::InitError),
    #[error("failed to create GLFW window")]
    Creation,
    #[error("Vulkan is not supported by the windowing system")]
    VulkanUnsupported,
}
