use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use callstream_events::{
    EventIngestor, EventMiddleware, IngestConfig, IngestStats, JsonlFrameSource,
};
use callstream_protocol::{EventDecoder, VideoEvent};
use clap::{Parser, ValueEnum};
use parking_lot::Mutex;
use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "callstreamd")]
#[command(about = "Replay captured call-signaling frames (JSON Lines) through the event pipeline")]
struct Cli {
    /// Capture file; reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, default_value_t = 1024)]
    buffer: usize,
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
    /// Exit non-zero when any frame is rejected.
    #[arg(long)]
    strict: bool,
    /// Print every published event, re-encoded, on stdout.
    #[arg(long)]
    echo: bool,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Writes every event that reaches it as one JSON line. Installed last in the
/// middleware chain, so it sees exactly the events that get published.
struct Echo<W> {
    out: Mutex<W>,
}

impl<W> Echo<W> {
    fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> EventMiddleware for Echo<W> {
    fn handle(&self, event: VideoEvent) -> Option<VideoEvent> {
        let mut out = self.out.lock();
        if let Err(error) = writeln!(out, "{}", event.encode()) {
            warn!(%error, event_type = event.type_tag(), "echo failed");
        }
        Some(event)
    }
}

async fn replay(ingestor: &EventIngestor, input: Option<&Path>) -> Result<IngestStats> {
    match input {
        Some(path) => {
            let mut source = JsonlFrameSource::open(path).await?;
            ingestor.run(&mut source).await
        }
        None => {
            let mut source = JsonlFrameSource::new(BufReader::new(tokio::io::stdin()), "stdin");
            ingestor.run(&mut source).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = IngestConfig::new()
        .stream_buffer(cli.buffer)
        .strict(cli.strict);
    let mut ingestor = EventIngestor::new(EventDecoder::standard(), config);
    if cli.echo {
        ingestor = ingestor.with_middleware(Echo::new(std::io::stdout()));
    }

    let mut events = ingestor.hub().subscribe();
    let event_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    info!(
                        event_type = event.type_tag(),
                        call_cid = event.call_cid().unwrap_or("-"),
                        "event.published"
                    );
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event subscriber lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let outcome = replay(&ingestor, cli.input.as_deref()).await;
    let stats = ingestor.stats();

    // Dropping the ingestor closes the hub so the subscriber drains and exits.
    drop(ingestor);
    if let Err(error) = event_task.await {
        warn!(%error, "event task stopped");
    }

    println!("{}", serde_json::to_string_pretty(&stats)?);
    outcome.map(|_| ())
}
