//! modlink CLI - talk to an add-on module controller from the shell.
//!
//! Opens the gateway, runs one subcommand against it, and prints what
//! came back. Useful for checking wiring and firmware state without
//! writing a program.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use modlink_core::{Capability, DeviceId, ModuleId};
use modlink_devices::{Led, share};
use modlink_gateway::{Gateway, GatewayConfig};
use modlink_transport::ports;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modlink")]
#[command(author, version, about = "Add-on module controller CLI")]
struct Cli {
    /// Serial port of the controller (auto-detected when omitted)
    #[arg(short, long, env = "MODLINK_PORT")]
    port: Option<String>,

    /// Link baud rate
    #[arg(short, long, default_value_t = 115_200)]
    baud: u32,

    /// Controller address on the bus
    #[arg(short, long, default_value_t = 0)]
    device_id: u8,

    /// Scan settle time in milliseconds
    #[arg(long, default_value_t = 100)]
    timeout_ms: u64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List serial ports and mark the gateway candidate
    Ports,

    /// Connect, discover modules, and print the binding table
    Scan,

    /// Read one capability of one module
    Read {
        /// Module slot address
        module: ModuleId,

        /// Capability name (e.g. potentiometer, joystick-axes, qtr-raw)
        capability: Capability,
    },

    /// Blink an RGB LED module a few times
    Blink {
        /// Module slot address
        module: ModuleId,

        /// Number of blink cycles
        #[arg(long, default_value_t = 5)]
        cycles: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Ports => list_ports(),
        Commands::Scan => {
            let mut gateway = open_gateway(&cli)?;
            print_scan(&gateway);
            gateway.close();
            Ok(())
        }
        Commands::Read { module, capability } => {
            let mut gateway = open_gateway(&cli)?;
            let result = read_capability(&mut gateway, module, capability);
            gateway.close();
            result
        }
        Commands::Blink { module, cycles } => {
            let gateway = share(open_gateway(&cli)?);
            let led = Led::new(gateway.clone(), module);
            led.blink((255, 0, 0), (0, 0, 0), Duration::from_millis(300), cycles)
                .context("blink failed")?;
            gateway.borrow_mut().close();
            Ok(())
        }
    }
}

fn open_gateway(cli: &Cli) -> Result<Gateway<modlink_transport::SerialTransport>> {
    let port = match &cli.port {
        Some(port) => port.clone(),
        None => ports::first_gateway_port()
            .context("no USB gateway port found; pass one with --port")?,
    };
    let device_id = DeviceId::new(cli.device_id).context("bad --device-id")?;
    let config = GatewayConfig::new(&port)
        .with_baud_rate(cli.baud)
        .with_device_id(device_id)
        .with_scan_timeout(Duration::from_millis(cli.timeout_ms));
    Gateway::open(&config).with_context(|| format!("cannot open gateway on {port}"))
}

fn list_ports() -> Result<()> {
    let all = ports::available();
    if all.is_empty() {
        bail!("no serial ports found");
    }
    let candidate = ports::first_gateway_port();
    for info in &all {
        let marker = if Some(&info.port_name) == candidate.as_ref() {
            "  <- gateway candidate"
        } else {
            ""
        };
        println!("{}{}", info.port_name, marker);
    }
    Ok(())
}

fn print_scan(gateway: &Gateway<modlink_transport::SerialTransport>) {
    println!(
        "device {}: {} modules ({:?})",
        gateway.device_id(),
        gateway.modules().len(),
        gateway.module_source()
    );
    for module in gateway.modules() {
        println!("  {module}");
    }

    println!("capabilities:");
    for (capability, binding) in gateway.bindings().iter() {
        println!("  {capability} -> {}", binding.index);
    }
    for capability in gateway.bindings().unavailable() {
        println!("  {capability} -> unavailable");
    }
}

fn read_capability(
    gateway: &mut Gateway<modlink_transport::SerialTransport>,
    module: ModuleId,
    capability: Capability,
) -> Result<()> {
    match gateway.read_capability(module, capability)? {
        Some(reading) => println!("{reading}"),
        None => bail!("{capability} is not supported by this controller"),
    }
    Ok(())
}
