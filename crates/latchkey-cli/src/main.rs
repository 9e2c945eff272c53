//! Latchkey host binary.
//!
//! Runs the door controller on a development machine: storage is an image
//! file standing in for the EEPROM, tags and the wipe button are driven from
//! stdin, and the door and indicator are log lines. Configuration comes from
//! `LATCHKEY_*` environment variables; logging honours `RUST_LOG`.

mod console;
mod input;
mod settings;

use anyhow::Context;
use console::{ConsoleDoor, ConsoleFeedback};
use latchkey_controller::{Controller, ControllerConfig};
use latchkey_hardware::mock::{MockButton, MockReader};
use latchkey_storage::FileStorage;
use settings::HostSettings;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = ControllerConfig::from_env().context("invalid controller configuration")?;
    let settings = HostSettings::from_env().context("invalid host settings")?;

    let storage = FileStorage::open(&settings.storage_path, settings.storage_size)
        .with_context(|| format!("cannot open {}", settings.storage_path.display()))?;
    info!(
        "Latchkey {} using {} ({} bytes)",
        latchkey_core::VERSION,
        settings.storage_path.display(),
        settings.storage_size
    );

    let (reader, tags) = MockReader::with_name("stdin reader");
    let (button, button_handle) = MockButton::new();

    let mut controller = Controller::new(
        config,
        storage,
        reader,
        ConsoleDoor::new(),
        ConsoleFeedback,
        button,
    )?;

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = controller.run() => {
            result?;
            info!("Halted. Restart to enroll a new admin tag.");
        }
        result = input::drive(stdin, &tags, &button_handle) => {
            result?;
            info!("Input closed; shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted; shutting down");
        }
    }

    controller
        .into_storage()
        .sync()
        .context("failed to flush storage image")?;
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
