use anyhow::Result;
use simple_logger::{set_up_color_terminal, SimpleLogger};

/// Installs a colored terminal logger. The level is taken from `RUST_LOG`.
pub fn init() -> Result<()> {
    set_up_color_terminal();
    let logger = SimpleLogger::new().env();
    logger.init()?;
    Ok(())
}
