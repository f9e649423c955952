use std::ffi::CStr;

use ash::vk::{self, PhysicalDevice, PhysicalDeviceProperties};
use tracing::{debug, info};

use super::queue_families::{find_queue_families, PresentationSupport, QueueFamilySource};
use crate::BootstrapError;

/// The instance-level queries needed to pick a physical device.
pub trait PhysicalDeviceSource: QueueFamilySource {
    fn physical_devices(&self) -> Result<Vec<PhysicalDevice>, BootstrapError>;
    fn physical_device_properties(&self, physical_device: PhysicalDevice)
        -> PhysicalDeviceProperties;
}

/// Returns the first physical device, in the order the driver reports them, that has
/// both a graphics queue family and a family able to present to `surface`.
pub fn select_physical_device<I, P>(
    instance: &I,
    surface: &P,
) -> Result<PhysicalDevice, BootstrapError>
where
    I: PhysicalDeviceSource + ?Sized,
    P: PresentationSupport + ?Sized,
{
    let physical_devices = instance.physical_devices()?;
    if physical_devices.is_empty() {
        return Err(BootstrapError::NoDevice);
    }
    debug!("Detected {} GPU device(s)", physical_devices.len());

    for physical_device in physical_devices {
        let properties = instance.physical_device_properties(physical_device);
        let name = device_name(&properties);
        info!("Inspecting GPU: {} ({:?})", name, properties.device_type);

        let queue_families = find_queue_families(instance, physical_device, surface)?;
        debug!("Queue families for {}: {:?}", name, queue_families);
        if queue_families.is_complete() {
            info!(
                "Selected GPU: {} (api {}.{}.{})",
                name,
                vk::api_version_major(properties.api_version),
                vk::api_version_minor(properties.api_version),
                vk::api_version_patch(properties.api_version)
            );
            return Ok(physical_device);
        }
    }
    Err(BootstrapError::NoSuitableDevice)
}

pub(crate) fn device_name(properties: &PhysicalDeviceProperties) -> String {
    // the driver always nul terminates device_name within its fixed size array
    unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}
