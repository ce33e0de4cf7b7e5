pub mod debug_utils;
pub mod error;
pub mod instance;
pub mod logging;
pub mod physical_device;

#[cfg(test)]
mod test_util;

pub use error::{Error, Result};
pub use instance::Instance;
pub use logging::init as init_logging;
pub use physical_device::PhysicalDevice;
