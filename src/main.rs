use anyhow::Result;
use lava::{
    init_logging,
    instance::{self, Descriptor, Version},
    Instance,
};
use tracing::info;

fn main() -> Result<()> {
    init_logging()?;

    let version = Version::new(
        env!("CARGO_PKG_VERSION_MAJOR").parse()?,
        env!("CARGO_PKG_VERSION_MINOR").parse()?,
        env!("CARGO_PKG_VERSION_PATCH").parse()?,
    );
    let desc = Descriptor::default()
        .with_app(env!("CARGO_PKG_NAME"), version)
        .with_engine(env!("CARGO_PKG_NAME"), version);

    let instance = Instance::new(&desc)?;
    if let Some(entry) = instance.entry() {
        info!("Available layers: {}", instance::available_layers(entry)?.join(", "));
        info!(
            "Available extensions: {}",
            instance::available_extensions(entry)?.join(", ")
        );
    }

    let physical_devices = instance.physical_devices()?;
    info!("Found {} physical devices", physical_devices.len());
    for physical_device in &physical_devices {
        let properties = physical_device.properties()?;
        info!(
            "[{}] {} ({:?})",
            physical_device.index(),
            physical_device.name()?,
            properties.device_type
        );
    }

    Ok(())
}
