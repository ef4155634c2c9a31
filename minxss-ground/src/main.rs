use std::path::PathBuf;

use clap::Parser;
use minxss_core::protocol::reference::REFERENCE_PACKET;
use minxss_core::{DomainPolicy, PacketParser};
use minxss_ground::{
    Config, FileSource, GroundStation, PacketSource, SourceConfig, StdinSource, TcpSource,
    write_frame,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "minxss-ground")]
#[command(about = "MinXSS CubeSat telemetry decoder")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "minxss-ground.toml")]
    config: PathBuf,

    /// Replay a capture file instead of the configured source
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Decode the built-in reference packet and exit
    #[arg(long)]
    self_test: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "minxss_ground=info,minxss_core=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    let parser = config.parser()?;
    info!(
        fields = parser.table().len(),
        required_len = parser.table().required_len(),
        domain_policy = ?parser.domain_policy(),
        "Field table ready"
    );

    if cli.self_test {
        return self_test(parser);
    }

    let pretty = config.output.pretty;
    let station = GroundStation::new(parser);

    match (cli.input, config.source) {
        (Some(path), _) | (None, SourceConfig::File { path }) => {
            run_station(FileSource::new(path), station, pretty).await
        }
        (None, SourceConfig::Tcp { addr }) => {
            run_station(TcpSource::new(addr), station, pretty).await
        }
        (None, SourceConfig::Stdin) => run_station(StdinSource, station, pretty).await,
    }
}

fn self_test(parser: PacketParser) -> color_eyre::Result<()> {
    let mut station = GroundStation::new(parser.with_domain_policy(DomainPolicy::Record));

    let Some(frame) = station.decode(&REFERENCE_PACKET) else {
        color_eyre::eyre::bail!("reference packet failed to decode");
    };
    write_frame(&mut std::io::stdout(), &frame, true)?;

    info!("Self-test passed");
    Ok(())
}

async fn run_station<S>(source: S, station: GroundStation, pretty: bool) -> color_eyre::Result<()>
where
    S: PacketSource,
{
    let cancel = CancellationToken::new();
    let frames = source.start(cancel.clone()).await?;

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                signal_cancel.cancel();
            }
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    let stats = station
        .run(frames, cancel.clone(), std::io::stdout(), pretty)
        .await;
    cancel.cancel();

    info!(
        decoded = stats.decoded,
        unsynced = stats.unsynced,
        rejected = stats.rejected,
        "minxss-ground stopped"
    );
    Ok(())
}
