//! Discriminator → payload decoder registry.

use std::collections::HashMap;
use std::fmt;

use callstream_codec::{CodecError, Record, Shape};
use serde_json::{Map, Value};

use crate::error::RegistryError;
use crate::event::{EventRecord, VideoEvent};

type DecodeFn = fn(&Map<String, Value>) -> Result<VideoEvent, CodecError>;

/// One registry entry: a discriminator, the shape it decodes into and the
/// function that builds the union case.
///
/// The discriminator always comes from the payload's [`EventRecord::TYPE`],
/// so a decoded event re-encodes under the tag it was read with.
#[derive(Clone, Copy)]
pub struct Registration {
    discriminator: &'static str,
    shape: &'static Shape,
    decode: DecodeFn,
}

impl Registration {
    pub fn of<R: EventRecord>() -> Self {
        Self {
            discriminator: R::TYPE,
            shape: R::SHAPE,
            decode: decode_as::<R>,
        }
    }

    pub fn discriminator(&self) -> &'static str {
        self.discriminator
    }

    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Decode a payload object whose `type` key has already been removed.
    pub fn decode(&self, payload: &Map<String, Value>) -> Result<VideoEvent, CodecError> {
        (self.decode)(payload)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("discriminator", &self.discriminator)
            .field("shape", &self.shape.name)
            .finish()
    }
}

fn decode_as<R>(payload: &Map<String, Value>) -> Result<VideoEvent, CodecError>
where
    R: Record + Into<VideoEvent>,
{
    R::decode_object(payload).map(Into::into)
}

/// Collects registrations, rejecting duplicate discriminators.
#[derive(Debug, Default)]
pub struct EventRegistryBuilder {
    entries: HashMap<&'static str, Registration>,
}

impl EventRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<R: EventRecord>(self) -> Result<Self, RegistryError> {
        self.add(Registration::of::<R>())
    }

    pub fn add(mut self, registration: Registration) -> Result<Self, RegistryError> {
        if self.entries.contains_key(registration.discriminator) {
            return Err(RegistryError::DuplicateDiscriminator(
                registration.discriminator.to_owned(),
            ));
        }
        self.entries.insert(registration.discriminator, registration);
        Ok(self)
    }

    /// Adds every canonical [`VideoEvent`] variant.
    pub fn with_standard_events(self) -> Result<Self, RegistryError> {
        VideoEvent::registrations().try_fold(self, Self::add)
    }

    pub fn build(self) -> EventRegistry {
        EventRegistry {
            entries: self.entries,
        }
    }
}

/// Frozen lookup table from discriminator to [`Registration`].
///
/// Built once and shared behind an `Arc`; there is no mutation after
/// [`EventRegistryBuilder::build`].
#[derive(Debug, Clone)]
pub struct EventRegistry {
    entries: HashMap<&'static str, Registration>,
}

impl EventRegistry {
    pub fn builder() -> EventRegistryBuilder {
        EventRegistryBuilder::new()
    }

    /// The canonical registry over every [`VideoEvent`] variant.
    pub fn standard() -> Self {
        Self {
            entries: VideoEvent::registrations()
                .map(|registration| (registration.discriminator, registration))
                .collect(),
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, discriminator: &str) -> Option<&Registration> {
        self.entries.get(discriminator)
    }

    pub fn contains(&self, discriminator: &str) -> bool {
        self.entries.contains_key(discriminator)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered discriminators, sorted.
    pub fn discriminators(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.entries.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}
