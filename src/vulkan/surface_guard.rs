use std::{ops::Deref, ptr, rc::Rc};

use ash::{
    extensions::khr::Surface,
    vk::{PhysicalDevice, SurfaceKHR},
};
use glfw::Window;
use tracing::debug;

use super::{instance_guard::InstanceGuard, queue_families::PresentationSupport};
use crate::BootstrapError;

/// RAII for the window surface
pub struct SurfaceGuard {
    surface_loader: Surface,
    surface: SurfaceKHR,
    // need to keep a reference to the instance to ensure we get dropped before it does
    _instance: Rc<InstanceGuard>,
}

impl SurfaceGuard {
    pub fn try_new(instance: &Rc<InstanceGuard>, window: &Window) -> Result<Self, BootstrapError> {
        let mut surface = SurfaceKHR::null();
        window
            .create_window_surface(instance.handle(), ptr::null(), &mut surface)
            .result()
            .map_err(BootstrapError::SurfaceCreation)?;
        let surface_loader = Surface::new(instance.get_entry(), instance);
        debug!("Created window surface");
        Ok(Self {
            surface_loader,
            surface,
            _instance: Rc::clone(instance),
        })
    }
}

impl PresentationSupport for SurfaceGuard {
    fn supports_presentation(
        &self,
        physical_device: PhysicalDevice,
        queue_family_index: u32,
    ) -> Result<bool, BootstrapError> {
        unsafe {
            self.surface_loader.get_physical_device_surface_support(
                physical_device,
                queue_family_index,
                self.surface,
            )
        }
        .map_err(BootstrapError::SurfaceQuery)
    }
}

impl Drop for SurfaceGuard {
    fn drop(&mut self) {
        debug!("Dropping SurfaceGuard");
        unsafe { self.surface_loader.destroy_surface(self.surface, None) };
    }
}

impl Deref for SurfaceGuard {
    type Target = SurfaceKHR;

    fn deref(&self) -> &Self::Target {
        &self.surface
    }
}
