use chat_ox::{Cli, run, transport_for};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.into_config();
    tracing::debug!(?config, "configuration resolved");

    let transport = transport_for(&config);
    let mut stdout = std::io::stdout().lock();

    let report = run(&config, transport.as_ref(), &mut stdout).await?;

    tracing::info!(
        mode = ?report.mode,
        response_chars = report.response_chars,
        chunks = report.chunks,
        status = report.status.map(|s| s.as_u16()),
        latency_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
        "chat request completed"
    );

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
