use chancy::cli::Cli;
use chancy::config::Settings;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new_with_cli(&cli)?;

    // Initialize tracing; stdout is reserved for the filled values
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Filling {} form pattern(s), {} round(s) each",
        settings.run.forms.len(),
        settings.run.rounds
    );

    let values = chancy::run(&settings)?;
    let output = if settings.run.pretty {
        serde_json::to_string_pretty(&values)?
    } else {
        serde_json::to_string(&values)?
    };
    println!("{}", output);

    Ok(())
}
