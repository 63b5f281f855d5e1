//! Prints a receipt total on a Firich display attached to a serial port.
//!
//! ```text
//! cargo run --example serial_firich -- [config.toml]
//! LINEDISP__DISPLAY__OPTIONS__PORT=/dev/ttyS1 cargo run --example serial_firich
//! ```
use linedisp_core::config::ConfigBuilder;
use linedisp_core::logging;
use linedisp_drivers::serial::OPTION_PORT;
use linedisp_drivers::DriverRegistry;

use tracing::info;

fn main() -> anyhow::Result<()> {
    let mut builder = ConfigBuilder::new().with_environment_prefix("linedisp");
    if let Some(path) = std::env::args().nth(1) {
        builder = builder.with_config_file(path);
    }
    let mut config = builder.build()?;

    logging::init_from_config(&config.logging)?;
    linedisp_drivers::init()?;

    if !config.display.options.contains(OPTION_PORT) {
        config.display.options.set(OPTION_PORT, "/dev/ttyUSB0");
    }
    if config.display.encoding.is_none() {
        config.display.encoding = Some("cp866".to_string());
    }

    let registry = DriverRegistry::with_builtin_drivers();
    let line_display = registry.open_configured(&config.display)?;
    info!(?line_display, "Display ready");

    line_display.init()?;
    line_display.print_row(1, "Price:10$ Quant:2")?;
    line_display.print_row(2, "Total:20$")?;
    line_display.close()?;

    Ok(())
}
