use std::{collections::HashSet, ffi::CString, ops::Deref};

use ash::{
    extensions::ext::DebugUtils,
    prelude::VkResult,
    vk::{
        ApplicationInfo, InstanceCreateInfo, PhysicalDevice, PhysicalDeviceProperties,
        QueueFamilyProperties, API_VERSION_1_0,
    },
    Entry, Instance,
};
use tracing::debug;

use super::{
    debug_utils_guard::DebugUtilsGuard, physical_device::PhysicalDeviceSource,
    queue_families::QueueFamilySource,
};
use crate::{BootstrapConfig, BootstrapError, ValidationSettings};

const API_VERSION: u32 = API_VERSION_1_0;

/// Reports the layers installed on the host.
pub trait LayerSource {
    fn available_layers(&self) -> Result<Vec<String>, BootstrapError>;
}

impl LayerSource for Entry {
    fn available_layers(&self) -> Result<Vec<String>, BootstrapError> {
        let layer_properties = unsafe { self.enumerate_instance_layer_properties() }
            .map_err(BootstrapError::LayerEnumeration)?;
        Ok(layer_properties
            .iter()
            .map(|properties| {
                // layer_name is a nul terminated fixed size array
                unsafe { std::ffi::CStr::from_ptr(properties.layer_name.as_ptr()) }
                    .to_string_lossy()
                    .into_owned()
            })
            .collect())
    }
}

/// RAII for Instance
pub struct InstanceGuard {
    instance: Instance,
    entry: Entry,
}

impl InstanceGuard {
    /// Creates an Instance to interact with the core of Vulkan. Registers the windowing
    /// extensions plus, when validations are enabled, the debug utils extension and the
    /// validation layers.
    pub fn try_new(
        entry: &Entry,
        windowing_extensions: Vec<String>,
        config: &BootstrapConfig,
    ) -> Result<Self, BootstrapError> {
        let instance = create_instance(entry, windowing_extensions, config, |create_info| {
            unsafe { entry.create_instance(create_info, None) }
        })?;
        Ok(Self {
            instance,
            entry: entry.clone(),
        })
    }

    pub fn get_entry(&self) -> &Entry {
        &self.entry
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        debug!("Dropping InstanceGuard");
        unsafe { self.instance.destroy_instance(None) }
    }
}

impl Deref for InstanceGuard {
    type Target = Instance;

    fn deref(&self) -> &Self::Target {
        &self.instance
    }
}

impl QueueFamilySource for InstanceGuard {
    fn queue_family_properties(
        &self,
        physical_device: PhysicalDevice,
    ) -> Vec<QueueFamilyProperties> {
        unsafe {
            self.instance
                .get_physical_device_queue_family_properties(physical_device)
        }
    }
}

impl PhysicalDeviceSource for InstanceGuard {
    fn physical_devices(&self) -> Result<Vec<PhysicalDevice>, BootstrapError> {
        unsafe { self.instance.enumerate_physical_devices() }
            .map_err(BootstrapError::DeviceEnumeration)
    }

    fn physical_device_properties(
        &self,
        physical_device: PhysicalDevice,
    ) -> PhysicalDeviceProperties {
        unsafe { self.instance.get_physical_device_properties(physical_device) }
    }
}

/// Validates the layer request, assembles the create info and hands it to `create`.
/// `create` is never called when a requested validation layer is missing.
pub(crate) fn create_instance<L, T, F>(
    layers: &L,
    windowing_extensions: Vec<String>,
    config: &BootstrapConfig,
    create: F,
) -> Result<T, BootstrapError>
where
    L: LayerSource + ?Sized,
    F: FnOnce(&InstanceCreateInfo) -> VkResult<T>,
{
    check_validation_layer_support(layers, &config.validation)?;

    let application_name = CString::new(config.application_name.as_str())?;
    let engine_name = CString::new(config.engine_name.as_str())?;
    let application_info = ApplicationInfo::builder()
        .application_name(&application_name)
        .application_version(config.application_version)
        .engine_name(&engine_name)
        .engine_version(config.application_version)
        .api_version(API_VERSION);

    let extension_names = to_c_strings(&required_extensions(
        windowing_extensions,
        &config.validation,
    ))?;
    let extension_name_pointers = extension_names
        .iter()
        .map(|extension_name| extension_name.as_ptr())
        .collect::<Vec<_>>();

    let layer_names = to_c_strings(config.validation.enabled_layers())?;
    let layer_name_pointers = layer_names
        .iter()
        .map(|layer_name| layer_name.as_ptr())
        .collect::<Vec<_>>();

    // lets the messenger report problems during instance creation itself
    let mut debug_create_info = DebugUtilsGuard::get_debug_create_info();

    let mut instance_create_info = InstanceCreateInfo::builder()
        .application_info(&application_info)
        .enabled_extension_names(&extension_name_pointers)
        .enabled_layer_names(&layer_name_pointers);
    if config.validation.enabled {
        instance_create_info = instance_create_info.push_next(&mut debug_create_info);
    }

    create(&*instance_create_info).map_err(BootstrapError::InstanceCreation)
}

/// Returns the instance extensions to enable: the ones the windowing system needs plus
/// the debug utils extension if validations are enabled.
pub fn required_extensions(
    windowing_extensions: Vec<String>,
    validation: &ValidationSettings,
) -> Vec<String> {
    let mut extension_names = windowing_extensions;
    if validation.enabled {
        extension_names.push(DebugUtils::name().to_string_lossy().into_owned());
    }
    debug!("Instance extension names: {:?}", extension_names);
    extension_names
}

/// Fails with `ValidationUnavailable` if validations are enabled and any requested
/// layer is missing from the host.
pub fn check_validation_layer_support<L>(
    layers: &L,
    validation: &ValidationSettings,
) -> Result<(), BootstrapError>
where
    L: LayerSource + ?Sized,
{
    if !validation.enabled {
        return Ok(());
    }

    let available_layers = layers.available_layers()?.into_iter().collect::<HashSet<_>>();
    let missing = validation
        .layers
        .iter()
        .filter(|layer| !available_layers.contains(*layer))
        .cloned()
        .collect::<Vec<_>>();
    debug!("Validation layers: {:?}", validation.layers);

    if missing.is_empty() {
        Ok(())
    } else {
        Err(BootstrapError::ValidationUnavailable { missing })
    }
}

pub(crate) fn to_c_strings(names: &[String]) -> Result<Vec<CString>, BootstrapError> {
    Ok(names
        .iter()
        .map(|name| CString::new(name.as_str()))
        .collect::<Result<Vec<_>, _>>()?)
}
