//! `mentor`: ask the study mentor questions from the terminal.

use anyhow::Context;
use mentor_kernel::cli;
use mentor_kernel::infrastructure::{config::Settings, telemetry::TelemetryBuilder};
use mentor_kernel::mentor::Mentor;
use tokio::io::BufReader;
use tokio::runtime::Handle;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::new().context("Failed to load configuration")?;

    let _guard = TelemetryBuilder::new("mentor")
        .with_settings(&settings.telemetry)
        .init()
        .context("Failed to initialize telemetry")?;

    println!("🤖 Khởi tạo AI Mentor...");

    let mentor = match Mentor::from_settings(&settings, &Handle::current()) {
        Ok(mentor) => mentor,
        Err(e) => {
            error!(error = %e, "Failed to initialize mentor");
            return Err(e);
        }
    };

    info!("Mentor session started");
    cli::run(
        &mentor,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        ctrl_c,
    )
    .await?;
    info!("Mentor session ended");

    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
