use std::ffi::CStr;

use ash::{
    ext::debug_utils,
    vk::{
        self, Bool32, DebugUtilsMessageSeverityFlagsEXT, DebugUtilsMessageTypeFlagsEXT,
        DebugUtilsMessengerCallbackDataEXT, DebugUtilsMessengerCreateInfoEXT,
        DebugUtilsMessengerEXT,
    },
    Entry,
};
use tracing::{event, trace, Level};

use crate::Result;

/// Name of the extension the messenger needs, as handed to the instance
pub fn extension_name() -> &'static CStr {
    debug_utils::NAME
}

/// Create info for a messenger reporting every severity and type through tracing.
/// Also chained into the instance create info so creation and destruction are covered.
pub fn messenger_create_info<'a>() -> DebugUtilsMessengerCreateInfoEXT<'a> {
    DebugUtilsMessengerCreateInfoEXT::default()
        .message_severity(
            DebugUtilsMessageSeverityFlagsEXT::ERROR
                | DebugUtilsMessageSeverityFlagsEXT::WARNING
                | DebugUtilsMessageSeverityFlagsEXT::INFO
                | DebugUtilsMessageSeverityFlagsEXT::VERBOSE,
        )
        .message_type(
            DebugUtilsMessageTypeFlagsEXT::GENERAL
                | DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
                | DebugUtilsMessageTypeFlagsEXT::VALIDATION,
        )
        .pfn_user_callback(Some(vulkan_debug_utils_callback))
}

/// Owns a debug messenger; must be dropped before the instance it was created from
pub struct DebugMessenger {
    loader: debug_utils::Instance,
    messenger: DebugUtilsMessengerEXT,
}

impl DebugMessenger {
    pub fn try_new(entry: &Entry, instance: &ash::Instance) -> Result<Self> {
        let loader = debug_utils::Instance::new(entry, instance);
        let create_info = messenger_create_info();
        let messenger = unsafe { loader.create_debug_utils_messenger(&create_info, None)? };
        trace!("Created debug messenger {:?}", messenger);
        Ok(Self { loader, messenger })
    }

    pub fn handle(&self) -> DebugUtilsMessengerEXT {
        self.messenger
    }
}

impl Drop for DebugMessenger {
    fn drop(&mut self) {
        trace!("Destroying debug messenger {:?}", self.messenger);
        unsafe {
            self.loader
                .destroy_debug_utils_messenger(self.messenger, None)
        }
    }
}

unsafe extern "system" fn vulkan_debug_utils_callback(
    message_severity: DebugUtilsMessageSeverityFlagsEXT,
    message_type: DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const DebugUtilsMessengerCallbackDataEXT<'_>,
    _p_user_data: *mut std::ffi::c_void,
) -> Bool32 {
    if p_callback_data.is_null() || (*p_callback_data).p_message.is_null() {
        return vk::FALSE;
    }
    let message = CStr::from_ptr((*p_callback_data).p_message).to_string_lossy();
    let ty = format!("{:?}", message_type).to_lowercase();

    match message_severity {
        DebugUtilsMessageSeverityFlagsEXT::ERROR => {
            event!(Level::ERROR, message = %message, ty = %ty)
        }
        DebugUtilsMessageSeverityFlagsEXT::WARNING => {
            event!(Level::WARN, message = %message, ty = %ty)
        }
        DebugUtilsMessageSeverityFlagsEXT::INFO => {
            event!(Level::INFO, message = %message, ty = %ty)
        }
        _ => event!(Level::TRACE, message = %message, ty = %ty),
    }
    // dont skip driver
    vk::FALSE
}
