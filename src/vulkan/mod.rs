mod debug_utils_guard;
mod instance_guard;
mod logical_device_guard;
mod physical_device;
mod queue_families;
mod surface_guard;

pub use debug_utils_guard::DebugUtilsGuard;
pub use instance_guard::{
    check_validation_layer_support, required_extensions, InstanceGuard, LayerSource,
};
pub use logical_device_guard::{queue_create_infos, LogicalDeviceGuard, QueueHandles};
pub use physical_device::{select_physical_device, PhysicalDeviceSource};
pub use queue_families::{
    find_queue_families, CompleteQueueFamilies, PresentationSupport, QueueFamilyIndices,
    QueueFamilySource,
};
pub use surface_guard::SurfaceGuard;
