use std::rc::Rc;

use anyhow::{Context, Result};
use ash::Entry;
use tracing::info;

use crate::{
    find_queue_families, select_physical_device, BootstrapConfig, BootstrapError, DebugUtilsGuard,
    InstanceGuard, LogicalDeviceGuard, SurfaceGuard, WindowManager, WindowSettings,
};

/// Owns the window and every Vulkan object created at startup. Fields are declared in
/// teardown order: device, surface, debug messenger, instance, then the window.
pub struct Renderer {
    _logical_device: LogicalDeviceGuard,
    _surface: SurfaceGuard,
    _debug_utils: Option<DebugUtilsGuard>,
    _instance: Rc<InstanceGuard>,
    window_manager: WindowManager,
}

impl Renderer {
    /// Opens the window and brings up Vulkan on the first suitable GPU.
    pub fn try_new(config: &BootstrapConfig, window_settings: &WindowSettings) -> Result<Self> {
        let window_manager =
            WindowManager::try_new(window_settings).context("Failed to open window")?;
        let windowing_extensions = window_manager.required_instance_extensions()?;

        let entry = Entry::linked();
        let instance = Rc::new(
            InstanceGuard::try_new(&entry, windowing_extensions, config)
                .context("Failed to create instance")?,
        );

        let debug_utils = if config.validation.enabled {
            Some(DebugUtilsGuard::try_new(&instance)?)
        } else {
            None
        };

        let surface = SurfaceGuard::try_new(&instance, window_manager.window())?;

        let physical_device = select_physical_device(&*instance, &surface)?;
        let queue_families = find_queue_families(&*instance, physical_device, &surface)?
            .complete()
            .ok_or(BootstrapError::NoSuitableDevice)?;
        let logical_device = LogicalDeviceGuard::try_new(
            &instance,
            physical_device,
            queue_families,
            &config.validation,
        )
        .context("Failed to create logical device")?;
        info!(
            "Vulkan initialized (graphics queue {:?}, present queue {:?})",
            logical_device.get_graphics_queue(),
            logical_device.get_present_queue()
        );

        Ok(Self {
            _logical_device: logical_device,
            _surface: surface,
            _debug_utils: debug_utils,
            _instance: instance,
            window_manager,
        })
    }

    /// Runs the event loop until the window is closed. Everything is torn down when the
    /// renderer is dropped.
    pub fn run(&mut self) {
        self.window_manager.run_event_loop();
    }
}
