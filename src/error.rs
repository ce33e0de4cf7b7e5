use ash::vk;
use thiserror::Error;

/// Everything that can go wrong while creating an instance or touching its physical devices
#[derive(Debug, Error)]
pub enum Error {
    #[error("error: unable to load the vulkan loader: {0}")]
    Loading(#[from] ash::LoadingError),

    #[error("error: out of host memory.")]
    OutOfHostMemory,

    #[error("error: out of device memory.")]
    OutOfDeviceMemory,

    #[error("error: initialization failed.")]
    InitializationFailed,

    #[error("error: layer not present.")]
    LayerNotPresent,

    #[error("error: extension not present.")]
    ExtensionNotPresent,

    #[error("error: incompatible driver.")]
    IncompatibleDriver,

    #[error("instance is invalid.")]
    InvalidInstance,

    #[error("index is invalid: {index} is out of bounds for {count} physical devices.")]
    InvalidIndex { index: usize, count: usize },

    #[error("layer or extension name contains a null byte")]
    InvalidName(#[from] std::ffi::NulError),

    #[error("error: unexpected vulkan result {0:?}.")]
    Vulkan(vk::Result),
}

impl From<vk::Result> for Error {
    fn from(result: vk::Result) -> Self {
        match result {
            vk::Result::ERROR_OUT_OF_HOST_MEMORY => Error::OutOfHostMemory,
            vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => Error::OutOfDeviceMemory,
            vk::Result::ERROR_INITIALIZATION_FAILED => Error::InitializationFailed,
            vk::Result::ERROR_LAYER_NOT_PRESENT => Error::LayerNotPresent,
            vk::Result::ERROR_EXTENSION_NOT_PRESENT => Error::ExtensionNotPresent,
            vk::Result::ERROR_INCOMPATIBLE_DRIVER => Error::IncompatibleDriver,
            other => Error::Vulkan(other),
        }
    }
}

impl Error {
    /// True for the failures a machine without a usable driver produces
    pub fn is_driver_unavailable(&self) -> bool {
        matches!(
            self,
            Error::Loading(_) | Error::IncompatibleDriver | Error::InitializationFailed
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
