use crate::{instance::Descriptor, Instance};

/// Creates an instance, or returns `None` when this machine has no usable Vulkan driver
pub(crate) fn instance_or_skip(desc: &Descriptor) -> Option<Instance> {
    match Instance::new(desc) {
        Ok(instance) => Some(instance),
        Err(err) if err.is_driver_unavailable() => {
            eprintln!("skipping, no usable vulkan driver: {err}");
            None
        }
        Err(err) => panic!("unexpected failure creating instance: {err}"),
    }
}
