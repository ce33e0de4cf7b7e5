use std::{
    ffi::{c_char, CStr, CString},
    fmt,
};

use ash::{
    vk::{self, ApplicationInfo, InstanceCreateInfo, API_VERSION_1_3},
    Entry,
};
use tracing::{debug, trace};

use crate::{
    debug_utils::{self, DebugMessenger},
    physical_device::PhysicalDevice,
    Result,
};

const API_VERSION: u32 = API_VERSION_1_3;

#[cfg(feature = "enable_validations")]
const ENABLE_VALIDATIONS: bool = true;
#[cfg(not(feature = "enable_validations"))]
const ENABLE_VALIDATIONS: bool = false;

const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Packs the version the way Vulkan expects it, with variant 0
    pub fn to_vk(self) -> u32 {
        vk::make_api_version(0, self.major.into(), self.minor.into(), self.patch.into())
    }
}

/// Name and version of either the application or the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppInfo {
    pub name: Option<String>,
    pub version: Version,
}

/// Everything needed to create an [`Instance`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub app: AppInfo,
    pub engine: AppInfo,
    pub api_version: u32,
    pub layers: Vec<String>,
    pub extensions: Vec<String>,
    /// Chains a debug messenger into instance creation and keeps one alive afterwards
    pub debug_utils: bool,
}

impl Default for Descriptor {
    fn default() -> Self {
        let layers = if ENABLE_VALIDATIONS {
            vec![VALIDATION_LAYER.to_owned()]
        } else {
            vec![]
        };
        Self {
            app: AppInfo::default(),
            engine: AppInfo::default(),
            api_version: API_VERSION,
            layers,
            extensions: vec![],
            debug_utils: ENABLE_VALIDATIONS,
        }
    }
}

impl Descriptor {
    pub fn with_app(mut self, name: impl Into<String>, version: Version) -> Self {
        self.app = AppInfo {
            name: Some(name.into()),
            version,
        };
        self
    }

    pub fn with_engine(mut self, name: impl Into<String>, version: Version) -> Self {
        self.engine = AppInfo {
            name: Some(name.into()),
            version,
        };
        self
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layers.push(layer.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    pub fn with_debug_utils(mut self, enabled: bool) -> Self {
        self.debug_utils = enabled;
        self
    }

    /// The extension list actually handed to Vulkan. Debug utils pulls in its own
    /// extension when it was not requested explicitly.
    pub fn enabled_extensions(&self) -> Vec<String> {
        let mut extensions = self.extensions.clone();
        if self.debug_utils {
            let name = debug_utils::extension_name().to_string_lossy();
            if !extensions.iter().any(|extension| *extension == name) {
                extensions.push(name.into_owned());
            }
        }
        extensions
    }
}

struct Inner {
    entry: Entry,
    instance: ash::Instance,
    debug_messenger: Option<DebugMessenger>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        // the messenger belongs to the instance, so it goes first
        self.debug_messenger = None;
        debug!("Destroying VkInstance {:?}", self.instance.handle());
        unsafe { self.instance.destroy_instance(None) }
    }
}

/// Owns a VkInstance and destroys it on drop. A default `Instance` holds nothing.
#[derive(Default)]
pub struct Instance {
    inner: Option<Inner>,
}

impl Instance {
    /// Loads the Vulkan loader and creates an instance from `desc`
    pub fn new(desc: &Descriptor) -> Result<Self> {
        let entry = unsafe { Entry::load()? };
        Self::with_entry(entry, desc)
    }

    /// Creates an instance from `desc` using an already loaded entry
    pub fn with_entry(entry: Entry, desc: &Descriptor) -> Result<Self> {
        let app_name = desc.app.name.as_deref().map(CString::new).transpose()?;
        let engine_name = desc.engine.name.as_deref().map(CString::new).transpose()?;

        let mut app_info = ApplicationInfo::default()
            .application_version(desc.app.version.to_vk())
            .engine_version(desc.engine.version.to_vk())
            .api_version(desc.api_version);
        if let Some(app_name) = app_name.as_deref() {
            app_info = app_info.application_name(app_name);
        }
        if let Some(engine_name) = engine_name.as_deref() {
            app_info = app_info.engine_name(engine_name);
        }

        debug!("Layers to enable: {}", desc.layers.join(", "));
        let enabled_layer_names = desc
            .layers
            .iter()
            .map(|layer_name| CString::new(layer_name.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let enabled_layer_name_ptrs = enabled_layer_names
            .iter()
            .map(|layer_name| layer_name.as_ptr())
            .collect::<Vec<*const c_char>>();

        let extensions = desc.enabled_extensions();
        debug!("Extensions to enable: {}", extensions.join(", "));
        let enabled_extension_names = extensions
            .into_iter()
            .map(CString::new)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let enabled_extension_name_ptrs = enabled_extension_names
            .iter()
            .map(|extension_name| extension_name.as_ptr())
            .collect::<Vec<*const c_char>>();

        let mut debug_messenger_create_info = debug_utils::messenger_create_info();

        let mut instance_create_info = InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_layer_names(&enabled_layer_name_ptrs)
            .enabled_extension_names(&enabled_extension_name_ptrs);
        if desc.debug_utils {
            instance_create_info = instance_create_info.push_next(&mut debug_messenger_create_info);
        }

        let instance = unsafe { entry.create_instance(&instance_create_info, None)? };
        debug!("Created VkInstance {:?}", instance.handle());

        let mut inner = Inner {
            entry,
            instance,
            debug_messenger: None,
        };
        if desc.debug_utils {
            inner.debug_messenger = Some(DebugMessenger::try_new(&inner.entry, &inner.instance)?);
        }

        Ok(Self { inner: Some(inner) })
    }

    /// Whether a live VkInstance is held
    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    /// The raw handle, null when invalid
    pub fn handle(&self) -> vk::Instance {
        self.inner
            .as_ref()
            .map_or(vk::Instance::null(), |inner| inner.instance.handle())
    }

    pub fn raw(&self) -> Option<&ash::Instance> {
        self.inner.as_ref().map(|inner| &inner.instance)
    }

    pub fn entry(&self) -> Option<&Entry> {
        self.inner.as_ref().map(|inner| &inner.entry)
    }

    pub fn debug_messenger(&self) -> Option<&DebugMessenger> {
        self.inner
            .as_ref()
            .and_then(|inner| inner.debug_messenger.as_ref())
    }

    /// Moves the handle out, leaving `self` invalid
    pub fn take(&mut self) -> Instance {
        std::mem::take(self)
    }

    pub fn physical_devices(&self) -> Result<Vec<PhysicalDevice<'_>>> {
        PhysicalDevice::enumerate(self)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("handle", &self.handle())
            .field("debug_messenger", &self.debug_messenger().map(|m| m.handle()))
            .finish()
    }
}

fn property_name(name: &[c_char]) -> String {
    unsafe { CStr::from_ptr(name.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

/// Names of the instance layers the loader can enable
pub fn available_layers(entry: &Entry) -> Result<Vec<String>> {
    let layers = unsafe { entry.enumerate_instance_layer_properties()? };
    trace!("Found {} instance layers", layers.len());
    Ok(layers
        .iter()
        .map(|layer| property_name(&layer.layer_name))
        .collect())
}

/// Names of the instance extensions the loader and its implicit layers offer
pub fn available_extensions(entry: &Entry) -> Result<Vec<String>> {
    let extensions = unsafe { entry.enumerate_instance_extension_properties(None)? };
    trace!("Found {} instance extensions", extensions.len());
    Ok(extensions
        .iter()
        .map(|extension| property_name(&extension.extension_name))
        .collect())
}
