use std::{ffi::CStr, rc::Rc};

use ash::{
    extensions::ext::DebugUtils,
    vk::{
        self, Bool32, DebugUtilsMessageSeverityFlagsEXT, DebugUtilsMessageTypeFlagsEXT,
        DebugUtilsMessengerCallbackDataEXT, DebugUtilsMessengerCreateInfoEXT,
        DebugUtilsMessengerCreateInfoEXTBuilder, DebugUtilsMessengerEXT,
    },
};
use tracing::{debug, event, Level};

use super::instance_guard::InstanceGuard;
use crate::BootstrapError;

const CREATE_MESSENGER_FN: &CStr = c"vkCreateDebugUtilsMessengerEXT";
const DESTROY_MESSENGER_FN: &CStr = c"vkDestroyDebugUtilsMessengerEXT";

/// RAII for the debug utils messenger. Only created when validations are enabled.
pub struct DebugUtilsGuard {
    debug_utils: DebugUtils,
    messenger: DebugUtilsMessengerEXT,
    // need to keep a reference to instance to ensure we get dropped before instance does
    _instance: Rc<InstanceGuard>,
}

impl DebugUtilsGuard {
    pub fn get_debug_create_info<'a>() -> DebugUtilsMessengerCreateInfoEXTBuilder<'a> {
        DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(
                DebugUtilsMessageSeverityFlagsEXT::ERROR
                    | DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | DebugUtilsMessageSeverityFlagsEXT::VERBOSE,
            )
            .message_type(
                DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
                    | DebugUtilsMessageTypeFlagsEXT::VALIDATION,
            )
            .pfn_user_callback(Some(vulkan_debug_utils_callback))
    }

    /// Registers the messenger with `instance`. The extension entry points are looked up
    /// by name first; a missing one is reported instead of being called.
    pub fn try_new(instance: &Rc<InstanceGuard>) -> Result<Self, BootstrapError> {
        let entry = instance.get_entry();
        for function_name in [CREATE_MESSENGER_FN, DESTROY_MESSENGER_FN] {
            let function =
                unsafe { entry.get_instance_proc_addr(instance.handle(), function_name.as_ptr()) };
            if function.is_none() {
                return Err(BootstrapError::DebugCallbackRegistration(
                    vk::Result::ERROR_EXTENSION_NOT_PRESENT,
                ));
            }
        }

        let debug_utils = DebugUtils::new(entry, instance);
        let create_info = Self::get_debug_create_info();
        let messenger = unsafe { debug_utils.create_debug_utils_messenger(&create_info, None) }
            .map_err(BootstrapError::DebugCallbackRegistration)?;
        debug!("Registered debug utils messenger");

        Ok(Self {
            debug_utils,
            messenger,
            _instance: Rc::clone(instance),
        })
    }
}

impl Drop for DebugUtilsGuard {
    fn drop(&mut self) {
        debug!("Dropping DebugUtilsGuard");
        unsafe {
            self.debug_utils
                .destroy_debug_utils_messenger(self.messenger, None)
        }
    }
}

unsafe extern "system" fn vulkan_debug_utils_callback(
    message_severity: DebugUtilsMessageSeverityFlagsEXT,
    message_type: DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const DebugUtilsMessengerCallbackDataEXT,
    _p_user_data: *mut std::ffi::c_void,
) -> Bool32 {
    let message = if p_callback_data.is_null() || (*p_callback_data).p_message.is_null() {
        String::new()
    } else {
        CStr::from_ptr((*p_callback_data).p_message)
            .to_string_lossy()
            .into_owned()
    };
    let ty = format!("{:?}", message_type).to_lowercase();

    match message_severity {
        DebugUtilsMessageSeverityFlagsEXT::VERBOSE => {
            event!(Level::TRACE, ty = %ty, "validation layer: {}", message)
        }
        DebugUtilsMessageSeverityFlagsEXT::INFO => {
            event!(Level::INFO, ty = %ty, "validation layer: {}", message)
        }
        DebugUtilsMessageSeverityFlagsEXT::WARNING => {
            event!(Level::WARN, ty = %ty, "validation layer: {}", message)
        }
        // ERROR, and anything a newer driver adds
        _ => event!(Level::ERROR, ty = %ty, "validation layer: {}", message),
    }
    // dont skip driver
    vk::FALSE
}
