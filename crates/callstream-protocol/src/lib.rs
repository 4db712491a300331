//! # callstream-protocol: call-signaling event taxonomy
//!
//! Turns raw JSON messages from the signaling WebSocket into typed
//! [`VideoEvent`] values and back.
//!
//! Decoding reads the `type` discriminator, looks it up in a frozen
//! [`EventRegistry`] and decodes the rest of the object against the
//! registered payload shape. Unknown discriminators are a soft
//! [`DecodeError::UnrecognizedEventType`], so newer servers never break
//! older clients.
//!
//! ## Module Overview
//!
//! - [`models`]: shared records (calls, users, members, sessions, errors)
//! - [`payloads`]: one record per event discriminator
//! - [`event`]: the [`VideoEvent`] union and its tag table
//! - [`registry`]: [`EventRegistry`] and its builder
//! - [`decoder`]: [`EventDecoder`]
//! - [`error`]: [`DecodeError`], [`RegistryError`], [`Severity`]

pub mod decoder;
pub mod error;
pub mod event;
pub mod models;
pub mod payloads;
pub mod registry;

#[cfg(test)]
mod fixtures;

pub use decoder::EventDecoder;
pub use error::{DecodeError, RegistryError, Severity};
pub use event::{EventRecord, TYPE_KEY, VideoEvent};
pub use models::{
    ApiError, CallClosedCaption, CallParticipantResponse, CallRecording, CallResponse,
    CallSessionResponse, CallTranscription, ErrorFrame, MemberResponse, OwnCapability,
    OwnUserResponse, ReactionResponse, RecordingType, UserResponse,
};
pub use payloads::EventPayload;
pub use registry::{EventRegistry, EventRegistryBuilder, Registration};
