use std::ffi::CStr;

use ash::vk;
use tracing::trace;

use crate::{Error, Instance, Result};

/// Which physical device to wrap: the owning instance and the enumeration index
#[derive(Debug, Clone, Copy, Default)]
pub struct Descriptor<'instance> {
    pub instance: Option<&'instance Instance>,
    pub index: usize,
}

/// A physical device handle borrowed from the instance that enumerated it.
/// Physical devices are not destroyed, so dropping this releases nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicalDevice<'instance> {
    instance: Option<&'instance Instance>,
    index: usize,
    physical_device: vk::PhysicalDevice,
}

impl<'instance> PhysicalDevice<'instance> {
    /// Number of physical devices visible through `instance`
    pub fn count(instance: &Instance) -> Result<usize> {
        let raw = instance.raw().ok_or(Error::InvalidInstance)?;
        let mut count = 0u32;
        unsafe {
            (raw.fp_v1_0().enumerate_physical_devices)(
                raw.handle(),
                &mut count,
                std::ptr::null_mut(),
            )
        }
        .result()?;
        trace!("Instance {:?} reports {} physical devices", raw.handle(), count);
        Ok(count as usize)
    }

    /// Wraps every physical device of `instance`, in enumeration order
    pub fn enumerate(instance: &'instance Instance) -> Result<Vec<Self>> {
        let count = Self::count(instance)?;
        (0..count)
            .map(|index| {
                Self::new(&Descriptor {
                    instance: Some(instance),
                    index,
                })
            })
            .collect()
    }

    /// Looks up the device at `desc.index`, re-checking the instance and the bound first
    pub fn new(desc: &Descriptor<'instance>) -> Result<Self> {
        let instance = desc.instance.ok_or(Error::InvalidInstance)?;
        let raw = instance.raw().ok_or(Error::InvalidInstance)?;

        let count = Self::count(instance)?;
        if count == 0 || desc.index >= count {
            return Err(Error::InvalidIndex {
                index: desc.index,
                count,
            });
        }

        let physical_devices = unsafe { raw.enumerate_physical_devices()? };
        // the device list can shrink between the two calls
        let physical_device = *physical_devices.get(desc.index).ok_or(Error::InvalidIndex {
            index: desc.index,
            count: physical_devices.len(),
        })?;

        Ok(Self {
            instance: Some(instance),
            index: desc.index,
            physical_device,
        })
    }

    /// Whether a non-null handle is held
    pub fn is_valid(&self) -> bool {
        self.physical_device != vk::PhysicalDevice::null()
    }

    pub fn handle(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    pub fn instance(&self) -> Option<&'instance Instance> {
        self.instance
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn properties(&self) -> Result<vk::PhysicalDeviceProperties> {
        let raw = self
            .instance
            .and_then(Instance::raw)
            .ok_or(Error::InvalidInstance)?;
        Ok(unsafe { raw.get_physical_device_properties(self.physical_device) })
    }

    pub fn name(&self) -> Result<String> {
        let properties = self.properties()?;
        let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) };
        Ok(name.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{instance, test_util::instance_or_skip};

    #[test]
    fn count_rejects_invalid_instance() {
        let instance = Instance::default();
        assert!(matches!(
            PhysicalDevice::count(&instance),
            Err(Error::InvalidInstance)
        ));
        assert!(matches!(
            PhysicalDevice::enumerate(&instance),
            Err(Error::InvalidInstance)
        ));
    }

    #[test]
    fn new_rejects_missing_instance() {
        let desc = Descriptor::default();
        assert!(matches!(
            PhysicalDevice::new(&desc),
            Err(Error::InvalidInstance)
        ));

        let instance = Instance::default();
        let desc = Descriptor {
            instance: Some(&instance),
            index: 0,
        };
        assert!(matches!(
            PhysicalDevice::new(&desc),
            Err(Error::InvalidInstance)
        ));
    }

    #[test]
    fn default_physical_device_is_null() {
        let physical_device = PhysicalDevice::default();
        assert!(!physical_device.is_valid());
        assert_eq!(physical_device.handle(), vk::PhysicalDevice::null());
        assert!(physical_device.instance().is_none());
        assert!(matches!(
            physical_device.properties(),
            Err(Error::InvalidInstance)
        ));
    }

    #[test]
    fn count_on_valid_instance() {
        let Some(instance) = instance_or_skip(&instance::Descriptor::default()) else {
            return;
        };
        assert!(PhysicalDevice::count(&instance).is_ok());
    }

    #[test]
    fn enumerate_matches_count() {
        let Some(instance) = instance_or_skip(&instance::Descriptor::default()) else {
            return;
        };
        let count = PhysicalDevice::count(&instance).unwrap();
        let physical_devices = PhysicalDevice::enumerate(&instance).unwrap();
        assert_eq!(physical_devices.len(), count);
        if count > 0 {
            assert!(!physical_devices.is_empty());
        }
    }

    #[test]
    fn new_rejects_out_of_bounds_index() {
        let Some(instance) = instance_or_skip(&instance::Descriptor::default()) else {
            return;
        };
        let desc = Descriptor {
            instance: Some(&instance),
            index: usize::MAX,
        };
        assert!(matches!(
            PhysicalDevice::new(&desc),
            Err(Error::InvalidIndex {
                index: usize::MAX,
                ..
            })
        ));

        let count = PhysicalDevice::count(&instance).unwrap();
        let desc = Descriptor {
            instance: Some(&instance),
            index: count,
        };
        assert!(matches!(
            PhysicalDevice::new(&desc),
            Err(Error::InvalidIndex { .. })
        ));
    }

    #[test]
    fn new_with_first_index() {
        let Some(instance) = instance_or_skip(&instance::Descriptor::default()) else {
            return;
        };
        if PhysicalDevice::count(&instance).unwrap() == 0 {
            return;
        }
        let desc = Descriptor {
            instance: Some(&instance),
            index: 0,
        };
        let physical_device = PhysicalDevice::new(&desc).unwrap();
        assert!(physical_device.is_valid());
        assert_eq!(physical_device.index(), 0);
    }

    #[test]
    fn enumerated_devices_know_owner_and_index() {
        let Some(instance) = instance_or_skip(&instance::Descriptor::default()) else {
            return;
        };
        let physical_devices = instance.physical_devices().unwrap();
        for (i, physical_device) in physical_devices.iter().enumerate() {
            assert_eq!(physical_device.index(), i);
            assert_ne!(physical_device.handle(), vk::PhysicalDevice::null());
            let Some(owner) = physical_device.instance() else {
                panic!("enumerated device without owner");
            };
            assert!(std::ptr::eq(owner, &instance));
            assert!(!physical_device.name().unwrap().is_empty());
        }
    }
}
