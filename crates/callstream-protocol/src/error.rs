//! Error types for event classification and decoding.

use callstream_codec::CodecError;
use thiserror::Error;

/// Why an incoming message did not become a [`VideoEvent`](crate::VideoEvent).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed json: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("message has no string `type` discriminator")]
    MissingDiscriminator,
    #[error("unrecognized event type: {0}")]
    UnrecognizedEventType(String),
    #[error("invalid `{event_type}` payload: {source}")]
    PayloadInvalid {
        event_type: String,
        #[source]
        source: CodecError,
    },
}

/// How loudly a consumer should report a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Expected during rolling server upgrades; safe to skip quietly.
    Soft,
    /// A malformed or contract-violating message.
    Loud,
}

impl DecodeError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnrecognizedEventType(_) => Severity::Soft,
            Self::MalformedJson(_) | Self::MissingDiscriminator | Self::PayloadInvalid { .. } => {
                Severity::Loud
            }
        }
    }

    /// Discriminator of the message, when one was read.
    pub fn event_type(&self) -> Option<&str> {
        match self {
            Self::UnrecognizedEventType(event_type) | Self::PayloadInvalid { event_type, .. } => {
                Some(event_type)
            }
            Self::MalformedJson(_) | Self::MissingDiscriminator => None,
        }
    }
}

/// Errors raised while building an [`EventRegistry`](crate::EventRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("discriminator registered twice: {0}")]
    DuplicateDiscriminator(String),
}
