use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_stream::stream;
use async_trait::async_trait;
use callstream_protocol::{ApiError, DecodeError, EventDecoder, VideoEvent};
use futures_util::stream::Stream;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, instrument, warn};

/// Where raw frames come from: a live transport, a capture file, a test.
#[async_trait]
pub trait FrameSource: Send {
    /// Next complete JSON message, or `None` once the source is exhausted.
    async fn next_frame(&mut self) -> Result<Option<String>>;
}

/// Replays a JSON Lines capture, one frame per non-blank line.
#[derive(Debug)]
pub struct JsonlFrameSource<R = BufReader<File>> {
    lines: Lines<R>,
    origin: String,
    line_no: u64,
}

impl JsonlFrameSource<BufReader<File>> {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .await
            .with_context(|| format!("failed opening frame capture {path:?}"))?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl<R> JsonlFrameSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R, origin: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            origin: origin.into(),
            line_no: 0,
        }
    }

    /// Number of lines consumed so far, blank ones included.
    pub fn line_no(&self) -> u64 {
        self.line_no
    }
}

#[async_trait]
impl<R> FrameSource for JsonlFrameSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_frame(&mut self) -> Result<Option<String>> {
        while let Some(line) = self
            .lines
            .next_line()
            .await
            .with_context(|| {
                format!("failed reading line {} of {}", self.line_no + 1, self.origin)
            })?
        {
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Ok(Some(line));
        }
        Ok(None)
    }
}

/// Hand-off point for a live transport: frames pushed into the paired
/// sender come out of [`FrameSource::next_frame`] in order.
#[derive(Debug)]
pub struct ChannelFrameSource {
    receiver: mpsc::Receiver<String>,
}

impl ChannelFrameSource {
    pub fn new(receiver: mpsc::Receiver<String>) -> Self {
        Self { receiver }
    }

    pub fn channel(buffer: usize) -> (mpsc::Sender<String>, Self) {
        let (sender, receiver) = mpsc::channel(buffer);
        (sender, Self::new(receiver))
    }
}

#[async_trait]
impl FrameSource for ChannelFrameSource {
    async fn next_frame(&mut self) -> Result<Option<String>> {
        Ok(self.receiver.recv().await)
    }
}

/// A step between decoding and publishing. Returning `None` consumes the
/// event so later middlewares and subscribers never see it.
pub trait EventMiddleware: Send + Sync {
    fn handle(&self, event: VideoEvent) -> Option<VideoEvent>;
}

impl<F> EventMiddleware for F
where
    F: Fn(VideoEvent) -> Option<VideoEvent> + Send + Sync,
{
    fn handle(&self, event: VideoEvent) -> Option<VideoEvent> {
        self(event)
    }
}

#[derive(Clone, Debug)]
pub struct EventStreamHub {
    sender: broadcast::Sender<VideoEvent>,
}

impl EventStreamHub {
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer.max(1));
        Self { sender }
    }

    /// Returns how many subscribers received the event.
    pub fn publish(&self, event: VideoEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VideoEvent> {
        self.sender.subscribe()
    }

    pub fn subscribe_stream(&self) -> BroadcastStream<VideoEvent> {
        BroadcastStream::new(self.sender.subscribe())
    }

    /// Events for a single call. Lagged notifications are logged and skipped;
    /// the stream ends when the hub is dropped.
    pub fn subscribe_call(
        &self,
        call_cid: impl Into<String>,
    ) -> impl Stream<Item = VideoEvent> + Send + 'static {
        let call_cid = call_cid.into();
        let mut subscription = self.sender.subscribe();
        stream! {
            loop {
                match subscription.recv().await {
                    Ok(event) => {
                        if event.call_cid() == Some(call_cid.as_str()) {
                            yield event;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(%call_cid, skipped, "call stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Capacity of the broadcast hub; slow subscribers lag beyond it.
    pub stream_buffer: usize,
    /// Fail [`EventIngestor::run`] when any frame was rejected.
    pub strict: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            stream_buffer: 1024,
            strict: false,
        }
    }
}

impl IngestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stream_buffer(mut self, stream_buffer: usize) -> Self {
        self.stream_buffer = stream_buffer;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// What happened to one frame.
#[derive(Debug)]
pub enum IngestOutcome {
    Published(&'static str),
    /// Dropped by a middleware.
    Consumed(&'static str),
    /// Discriminator unknown to this build.
    Ignored(String),
    ServerError(ApiError),
    Rejected(DecodeError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub received: u64,
    pub published: u64,
    pub consumed: u64,
    pub ignored: u64,
    pub malformed: u64,
    pub missing_discriminator: u64,
    pub invalid_payload: u64,
    pub server_errors: u64,
}

impl IngestStats {
    /// Frames that were malformed or violated the event contract.
    /// Unrecognized types are not rejections.
    pub fn rejected(&self) -> u64 {
        self.malformed + self.missing_discriminator + self.invalid_payload
    }

    fn record(&mut self, outcome: &IngestOutcome) {
        self.received += 1;
        match outcome {
            IngestOutcome::Published(_) => self.published += 1,
            IngestOutcome::Consumed(_) => self.consumed += 1,
            IngestOutcome::Ignored(_)
            | IngestOutcome::Rejected(DecodeError::UnrecognizedEventType(_)) => {
                self.ignored += 1;
            }
            IngestOutcome::ServerError(_) => self.server_errors += 1,
            IngestOutcome::Rejected(DecodeError::MalformedJson(_)) => self.malformed += 1,
            IngestOutcome::Rejected(DecodeError::MissingDiscriminator) => {
                self.missing_discriminator += 1;
            }
            IngestOutcome::Rejected(DecodeError::PayloadInvalid { .. }) => {
                self.invalid_payload += 1;
            }
        }
    }
}

/// Decodes frames, runs them through the middleware chain and publishes
/// the survivors on an [`EventStreamHub`].
pub struct EventIngestor {
    decoder: EventDecoder,
    hub: EventStreamHub,
    middlewares: Vec<Arc<dyn EventMiddleware>>,
    stats: Mutex<IngestStats>,
    config: IngestConfig,
}

impl EventIngestor {
    pub fn new(decoder: EventDecoder, config: IngestConfig) -> Self {
        Self {
            decoder,
            hub: EventStreamHub::new(config.stream_buffer),
            middlewares: Vec::new(),
            stats: Mutex::new(IngestStats::default()),
            config,
        }
    }

    /// Middlewares run in the order they are added.
    pub fn with_middleware(mut self, middleware: impl EventMiddleware + 'static) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn hub(&self) -> &EventStreamHub {
        &self.hub
    }

    pub fn decoder(&self) -> &EventDecoder {
        &self.decoder
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn stats(&self) -> IngestStats {
        *self.stats.lock()
    }

    #[instrument(skip(self, frame), fields(bytes = frame.len()))]
    pub fn ingest(&self, frame: &str) -> IngestOutcome {
        let outcome = self.process(frame);
        self.stats.lock().record(&outcome);
        outcome
    }

    fn process(&self, frame: &str) -> IngestOutcome {
        let value: Value = match serde_json::from_str(frame) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "dropping malformed frame");
                return IngestOutcome::Rejected(DecodeError::MalformedJson(err));
            }
        };

        if let Some(error) = self.decoder.error_frame(&value) {
            warn!(
                code = error.code,
                status = error.status_code,
                message = %error.message,
                "server sent an error frame"
            );
            return IngestOutcome::ServerError(error);
        }

        let event = match self.decoder.decode_value(value) {
            Ok(event) => event,
            Err(DecodeError::UnrecognizedEventType(event_type)) => {
                debug!(%event_type, "skipping unrecognized event type");
                return IngestOutcome::Ignored(event_type);
            }
            Err(err) => {
                warn!(error = %err, event_type = ?err.event_type(), "rejecting frame");
                return IngestOutcome::Rejected(err);
            }
        };

        let decoded_type = event.type_tag();
        let Some(event) = self
            .middlewares
            .iter()
            .try_fold(event, |event, middleware| middleware.handle(event))
        else {
            debug!(event_type = decoded_type, "event consumed by middleware");
            return IngestOutcome::Consumed(decoded_type);
        };

        let event_type = event.type_tag();
        let receivers = self.hub.publish(event);
        debug!(event_type, receivers, "event published");
        IngestOutcome::Published(event_type)
    }

    /// Drains `source`. Only a source error ends the loop early; with
    /// `strict` set, a run that rejected any frame is reported as an error
    /// once the source is exhausted.
    #[instrument(skip_all)]
    pub async fn run(&self, source: &mut dyn FrameSource) -> Result<IngestStats> {
        while let Some(frame) = source.next_frame().await.context("frame source failed")? {
            self.ingest(&frame);
        }

        let stats = self.stats();
        info!(
            received = stats.received,
            published = stats.published,
            ignored = stats.ignored,
            rejected = stats.rejected(),
            "frame source exhausted"
        );
        if self.config.strict && stats.rejected() > 0 {
            bail!(
                "{} of {} frames rejected",
                stats.rejected(),
                stats.received
            );
        }
        Ok(stats)
    }
}
