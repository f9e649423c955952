use std::{ops::Deref, rc::Rc};

use ash::{
    prelude::VkResult,
    vk::{DeviceCreateInfo, DeviceQueueCreateInfo, PhysicalDevice, PhysicalDeviceFeatures, Queue},
    Device,
};
use tracing::debug;

use super::{
    instance_guard::{to_c_strings, InstanceGuard},
    queue_families::CompleteQueueFamilies,
};
use crate::{BootstrapError, ValidationSettings};

static QUEUE_PRIORITIES: [f32; 1] = [1.0];

/// Handles to the queues for submitting instructions to. Both may refer to the same
/// queue when graphics and presentation share a family.
#[derive(Debug, Clone, Copy)]
pub struct QueueHandles {
    pub graphics: Queue,
    pub present: Queue,
}

/// RAII for logical device
pub struct LogicalDeviceGuard {
    device: Device,
    queues: QueueHandles,
    // need to keep a reference to the instance to ensure we get
    // dropped before it does
    _instance: Rc<InstanceGuard>,
}

impl LogicalDeviceGuard {
    /// Creates the logical device with one queue per distinct family in `queue_families`
    /// and fetches the graphics and present queues from it.
    pub fn try_new(
        instance: &Rc<InstanceGuard>,
        physical_device: PhysicalDevice,
        queue_families: CompleteQueueFamilies,
        validation: &ValidationSettings,
    ) -> Result<Self, BootstrapError> {
        debug!("Queue families: {:?}", queue_families);
        let device = create_device(&queue_families, validation, |create_info| unsafe {
            instance.create_device(physical_device, create_info, None)
        })?;

        let [graphics, present] = queue_locations(&queue_families)
            .map(|(family_index, queue_index)| unsafe {
                device.get_device_queue(family_index, queue_index)
            });
        let queues = QueueHandles { graphics, present };
        debug!("Queue handles: {:?}", queues);

        Ok(Self {
            device,
            queues,
            _instance: Rc::clone(instance),
        })
    }

    pub fn get_graphics_queue(&self) -> Queue {
        self.queues.graphics
    }

    pub fn get_present_queue(&self) -> Queue {
        self.queues.present
    }
}

impl Deref for LogicalDeviceGuard {
    type Target = Device;

    fn deref(&self) -> &Self::Target {
        &self.device
    }
}

impl Drop for LogicalDeviceGuard {
    fn drop(&mut self) {
        debug!("Dropping LogicalDeviceGuard");
        unsafe { self.device.destroy_device(None) }
    }
}

/// Assembles the device create info and hands it to `create`: one queue per distinct
/// family, the validation layers when enabled, no extensions and no features.
pub(crate) fn create_device<T, F>(
    queue_families: &CompleteQueueFamilies,
    validation: &ValidationSettings,
    create: F,
) -> Result<T, BootstrapError>
where
    F: FnOnce(&DeviceCreateInfo) -> VkResult<T>,
{
    let device_queue_create_infos = queue_create_infos(queue_families);

    // older implementations still expect the instance layers to be restated here
    let layer_names = to_c_strings(validation.enabled_layers())?;
    let layer_name_pointers = layer_names
        .iter()
        .map(|layer_name| layer_name.as_ptr())
        .collect::<Vec<_>>();

    let enabled_features = PhysicalDeviceFeatures::default();
    let device_create_info = DeviceCreateInfo::builder()
        .queue_create_infos(&device_queue_create_infos)
        .enabled_layer_names(&layer_name_pointers)
        .enabled_features(&enabled_features);

    create(&*device_create_info).map_err(BootstrapError::DeviceCreation)
}

/// The (family, queue) slots the graphics and present queues are fetched from.
fn queue_locations(queue_families: &CompleteQueueFamilies) -> [(u32, u32); 2] {
    [
        (queue_families.graphics_family, 0),
        (queue_families.present_family, 0),
    ]
}

/// One create info per distinct queue family, each asking for a single queue at full
/// priority.
pub fn queue_create_infos(queue_families: &CompleteQueueFamilies) -> Vec<DeviceQueueCreateInfo> {
    queue_families
        .unique_families()
        .into_iter()
        .map(|queue_family_index| {
            DeviceQueueCreateInfo::builder()
                .queue_family_index(queue_family_index)
                .queue_priorities(&QUEUE_PRIORITIES)
                .build()
        })
        .collect()
}
