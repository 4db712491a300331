//! Discriminated decoding of raw event messages.

use std::sync::Arc;

use callstream_codec::Record;
use serde_json::Value;

use crate::error::DecodeError;
use crate::event::{TYPE_KEY, VideoEvent};
use crate::models::{ApiError, ErrorFrame};
use crate::registry::EventRegistry;

/// Stateless decoder over a shared, frozen [`EventRegistry`].
///
/// Cheap to clone; every clone shares the same registry.
#[derive(Debug, Clone)]
pub struct EventDecoder {
    registry: Arc<EventRegistry>,
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::standard()
    }
}

impl EventDecoder {
    pub fn new(registry: Arc<EventRegistry>) -> Self {
        Self { registry }
    }

    pub fn standard() -> Self {
        Self::new(Arc::new(EventRegistry::standard()))
    }

    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    pub fn decode_str(&self, text: &str) -> Result<VideoEvent, DecodeError> {
        let value: Value = serde_json::from_str(text)?;
        self.decode_value(value)
    }

    pub fn decode_slice(&self, bytes: &[u8]) -> Result<VideoEvent, DecodeError> {
        let value: Value = serde_json::from_slice(bytes)?;
        self.decode_value(value)
    }

    /// Classify by `type`, then decode the remaining keys against the
    /// registered shape. Anything other than a JSON object has no
    /// discriminator.
    pub fn decode_value(&self, value: Value) -> Result<VideoEvent, DecodeError> {
        let Value::Object(mut payload) = value else {
            return Err(DecodeError::MissingDiscriminator);
        };
        let event_type = match payload.remove(TYPE_KEY) {
            Some(Value::String(event_type)) => event_type,
            _ => return Err(DecodeError::MissingDiscriminator),
        };
        let Some(registration) = self.registry.get(&event_type) else {
            return Err(DecodeError::UnrecognizedEventType(event_type));
        };
        registration
            .decode(&payload)
            .map_err(|source| DecodeError::PayloadInvalid { event_type, source })
    }

    pub fn encode(&self, event: &VideoEvent) -> Value {
        event.encode()
    }

    pub fn encode_to_string(&self, event: &VideoEvent) -> String {
        event.encode().to_string()
    }

    /// Recognize a `{"error": {...}}` frame. Returns `None` for events and
    /// for anything that does not carry a well-formed error body.
    pub fn decode_error_frame(&self, text: &str) -> Option<ApiError> {
        let value: Value = serde_json::from_str(text).ok()?;
        self.error_frame(&value)
    }

    pub fn error_frame(&self, value: &Value) -> Option<ApiError> {
        let object = value.as_object()?;
        if object.contains_key(TYPE_KEY) {
            return None;
        }
        ErrorFrame::decode_object(object)
            .ok()
            .map(|frame| frame.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, TS};
    use crate::models::OwnCapability;
    use crate::Severity;
    use callstream_codec::{CodecError, Field};
    use proptest::prelude::*;
    use serde_json::json;

    fn decoder() -> EventDecoder {
        EventDecoder::standard()
    }

    #[test]
    fn every_discriminator_round_trips() {
        let decoder = decoder();
        for tag in VideoEvent::DISCRIMINATORS {
            let Some(input) = fixtures::event(tag) else {
                panic!("no fixture for {tag}");
            };
            let text = input.to_string();
            let event = decoder
                .decode_str(&text)
                .unwrap_or_else(|err| panic!("{tag}: {err}"));
            assert_eq!(event.type_tag(), *tag);
            assert_eq!(decoder.encode(&event), input, "{tag} re-encodes");
            assert_eq!(decoder.decode_str(&text).unwrap(), event, "{tag} is idempotent");
            assert_eq!(
                decoder.decode_value(event.encode()).unwrap(),
                event,
                "{tag} survives encode then decode"
            );
            assert_eq!(
                event.call_cid(),
                input.get("call_cid").and_then(Value::as_str),
                "{tag} call_cid"
            );
            assert_eq!(event.payload_shape(), decoder.registry().get(tag).unwrap().shape());
        }
    }

    #[test]
    fn call_created_scenario() {
        let input = fixtures::event("call.created").unwrap();
        let event = decoder().decode_value(input.clone()).unwrap();
        let VideoEvent::CallCreated(created) = &event else {
            panic!("expected call.created, got {}", event.type_tag());
        };
        assert_eq!(created.call_cid, "default:123");
        assert_eq!(created.call.call_type, "default");
        assert_eq!(created.members.len(), 2);
        assert_eq!(event.call_cid(), Some("default:123"));
        assert_eq!(event.created_at().to_rfc3339(), "2024-05-01T10:00:00+00:00");

        let encoded = event.encode();
        let (Some(encoded), Some(input)) = (encoded.as_object(), input.as_object()) else {
            panic!("events encode to objects");
        };
        let mut encoded_keys: Vec<_> = encoded.keys().collect();
        let mut input_keys: Vec<_> = input.keys().collect();
        encoded_keys.sort();
        input_keys.sort();
        assert_eq!(encoded_keys, input_keys);
        for (key, value) in input {
            assert_eq!(encoded.get(key), Some(value), "{key}");
        }
    }

    #[test]
    fn unknown_type_is_a_soft_failure() {
        let err = decoder()
            .decode_str(r#"{"type":"future.event.v99","foo":"bar"}"#)
            .unwrap_err();
        assert!(matches!(&err, DecodeError::UnrecognizedEventType(t) if t == "future.event.v99"));
        assert_eq!(err.severity(), Severity::Soft);
    }

    #[test]
    fn legacy_user_events_are_not_registered() {
        let err = decoder()
            .decode_str(&format!(r#"{{"type":"user.banned","created_at":"{TS}"}}"#))
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnrecognizedEventType(_)));
    }

    #[test]
    fn missing_discriminator() {
        let decoder = decoder();
        for text in [
            r#"{"call_cid":"abc"}"#,
            r#"{"type":42,"call_cid":"abc"}"#,
            r#"{"type":null}"#,
            r#"["call.created"]"#,
            r#""call.created""#,
        ] {
            let err = decoder.decode_str(text).unwrap_err();
            assert!(
                matches!(err, DecodeError::MissingDiscriminator),
                "{text}: {err}"
            );
            assert_eq!(err.severity(), Severity::Loud);
        }
    }

    #[test]
    fn malformed_json() {
        let decoder = decoder();
        for text in ["", "{", r#"{"type":"call.created""#, "not json"] {
            assert!(matches!(
                decoder.decode_str(text),
                Err(DecodeError::MalformedJson(_))
            ));
        }
        assert!(matches!(
            decoder.decode_slice(&[0xff, 0xfe]),
            Err(DecodeError::MalformedJson(_))
        ));
    }

    #[test]
    fn discriminator_is_case_sensitive() {
        let mut input = fixtures::event("call.created").unwrap();
        input["type"] = json!("Call.Created");
        assert!(matches!(
            decoder().decode_value(input),
            Err(DecodeError::UnrecognizedEventType(_))
        ));
    }

    #[test]
    fn payload_errors_carry_the_nested_path() {
        let mut input = fixtures::event("call.created").unwrap();
        let Some(user) = input["members"][1]["user"].as_object_mut() else {
            panic!("fixture member has a user");
        };
        user.remove("role");
        let err = decoder().decode_value(input).unwrap_err();
        let DecodeError::PayloadInvalid { event_type, source } = err else {
            panic!("expected PayloadInvalid, got {err}");
        };
        assert_eq!(event_type, "call.created");
        assert_eq!(
            source,
            CodecError::missing("CallCreatedEvent", "members[1].user.role")
        );
    }

    #[test]
    fn required_null_is_invalid() {
        let mut input = fixtures::event("call.deleted").unwrap();
        input["call"]["created_by"]["id"] = Value::Null;
        let err = decoder().decode_value(input).unwrap_err();
        let DecodeError::PayloadInvalid { source, .. } = err else {
            panic!("expected PayloadInvalid, got {err}");
        };
        assert!(matches!(
            source,
            CodecError::TypeMismatch { ref field, actual: "null", .. }
                if field == "call.created_by.id"
        ));
    }

    #[test]
    fn optional_fields_keep_absent_null_and_value_apart() {
        let decoder = decoder();
        let base = fixtures::event("call.ended").unwrap();

        let mut absent = base.clone();
        absent.as_object_mut().unwrap().remove("user");
        let mut null = base.clone();
        null["user"] = Value::Null;

        let decoded: Vec<_> = [absent.clone(), null.clone(), base.clone()]
            .into_iter()
            .map(|input| match decoder.decode_value(input).unwrap() {
                VideoEvent::CallEnded(ended) => ended,
                other => panic!("unexpected {}", other.type_tag()),
            })
            .collect();
        assert!(decoded[0].user.is_absent());
        assert!(decoded[1].user.is_null());
        assert!(matches!(&decoded[2].user, Field::Value(user) if user.id == "alice"));

        for (input, ended) in [absent, null, base].into_iter().zip(decoded) {
            assert_eq!(VideoEvent::from(ended).encode(), input);
        }
    }

    #[test]
    fn unknown_capabilities_decode_to_unknown() {
        let mut input = fixtures::event("call.permissions_updated").unwrap();
        input["own_capabilities"] = json!(["send-audio", "levitate"]);
        let event = decoder().decode_value(input.clone()).unwrap();
        let VideoEvent::UpdatedCallPermissions(updated) = &event else {
            panic!("expected call.permissions_updated");
        };
        assert_eq!(
            updated.own_capabilities,
            vec![
                OwnCapability::SendAudio,
                OwnCapability::Unknown("levitate".into())
            ]
        );
        assert_eq!(event.encode(), input);
    }

    #[test]
    fn unknown_nested_keys_survive_re_encoding() {
        let mut input = fixtures::event("call.updated").unwrap();
        input["call"]["ingress"] = json!({"rtmp": {"address": "rtmp://edge"}});
        input["call"]["join_ahead_time_seconds"] = json!(30);
        input["call"]["created_by"]["avatar_frame"] = json!("gold");
        let event = decoder().decode_value(input.clone()).unwrap();
        assert_eq!(event.encode(), input);
    }

    #[test]
    fn unknown_top_level_keys_are_ignored() {
        let mut input = fixtures::event("call.session_started").unwrap();
        input["shard"] = json!("eu-west");
        let event = decoder().decode_value(input).unwrap();
        assert!(event.encode().get("shard").is_none());
    }

    #[test]
    fn encode_to_string_parses_back() {
        let decoder = decoder();
        let event = decoder
            .decode_value(fixtures::event("call.reaction_new").unwrap())
            .unwrap();
        let text = decoder.encode_to_string(&event);
        assert_eq!(decoder.decode_str(&text).unwrap(), event);
        assert_eq!(serde_json::to_value(&event).unwrap(), event.encode());
    }

    #[test]
    fn health_checks_are_classified() {
        let decoder = decoder();
        for (tag, expected) in [
            ("health.check", true),
            ("connection.ok", true),
            ("call.ring", false),
            ("connection.error", false),
        ] {
            let event = decoder.decode_value(fixtures::event(tag).unwrap()).unwrap();
            assert_eq!(event.is_health_check(), expected, "{tag}");
        }
    }

    #[test]
    fn error_frames_are_not_events() {
        let decoder = decoder();
        let frame = json!({"error": fixtures::api_error()}).to_string();
        let error = decoder.decode_error_frame(&frame).unwrap();
        assert_eq!(error.code, 43);
        assert_eq!(error.status_code, 401);
        assert!(matches!(
            decoder.decode_str(&frame),
            Err(DecodeError::MissingDiscriminator)
        ));

        let event = fixtures::event("connection.error").unwrap().to_string();
        assert!(decoder.decode_error_frame(&event).is_none());
        assert!(decoder.decode_error_frame(r#"{"error":"boom"}"#).is_none());
        assert!(decoder.decode_error_frame("{").is_none());
    }

    #[test]
    fn decoder_is_shareable() {
        fn assert_shareable<T: Clone + Send + Sync + 'static>() {}
        assert_shareable::<EventDecoder>();
        assert_shareable::<VideoEvent>();
    }

    #[test]
    fn partial_registry_rejects_other_types() {
        let registry = EventRegistry::builder()
            .register::<crate::payloads::CallDeletedEvent>()
            .unwrap()
            .build();
        let decoder = EventDecoder::new(Arc::new(registry));
        assert!(decoder
            .decode_value(fixtures::event("call.deleted").unwrap())
            .is_ok());
        assert!(matches!(
            decoder.decode_value(fixtures::event("call.created").unwrap()),
            Err(DecodeError::UnrecognizedEventType(_))
        ));
    }

    #[test]
    fn partial_registry_decodes_what_it_encodes() {
        let registry = EventRegistry::builder()
            .register::<crate::payloads::CallDeletedEvent>()
            .unwrap()
            .build();
        let decoder = EventDecoder::new(Arc::new(registry));

        let event = decoder
            .decode_value(fixtures::event("call.deleted").unwrap())
            .unwrap();
        assert_eq!(event.type_tag(), "call.deleted");
        let again = decoder.decode_value(decoder.encode(&event)).unwrap();
        assert_eq!(again, event);

        let mut renamed = fixtures::event("call.deleted").unwrap();
        renamed[TYPE_KEY] = json!("call.removed");
        assert!(matches!(
            decoder.decode_value(renamed),
            Err(DecodeError::UnrecognizedEventType(tag)) if tag == "call.removed"
        ));
    }

    #[test]
    fn identical_frames_hash_identically() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hashed = |event: &VideoEvent| {
            let mut state = DefaultHasher::new();
            event.hash(&mut state);
            state.finish()
        };
        let decoder = decoder();
        let text = fixtures::event("call.created").unwrap().to_string();
        let first = decoder.decode_str(&text).unwrap();
        let second = decoder.decode_str(&text).unwrap();
        assert_eq!(hashed(&first), hashed(&second));
    }

    fn optional_user() -> impl Strategy<Value = Option<Value>> {
        prop_oneof![
            Just(None),
            Just(Some(Value::Null)),
            "[a-z]{1,8}".prop_map(|id| Some(fixtures::user(&id))),
        ]
    }

    fn optional_reason() -> impl Strategy<Value = Option<Value>> {
        prop_oneof![
            Just(None),
            Just(Some(Value::Null)),
            "[a-z ]{0,12}".prop_map(|reason| Some(json!(reason))),
        ]
    }

    proptest! {
        #[test]
        fn call_ended_optionals_round_trip(user in optional_user(), reason in optional_reason()) {
            let decoder = decoder();
            let mut input = fixtures::event("call.ended").unwrap();
            let Some(object) = input.as_object_mut() else {
                panic!("call.ended fixture is an object");
            };
            object.remove("user");
            object.remove("reason");
            if let Some(user) = &user {
                object.insert("user".to_owned(), user.clone());
            }
            if let Some(reason) = &reason {
                object.insert("reason".to_owned(), reason.clone());
            }

            let event = decoder.decode_value(input.clone()).unwrap();
            let VideoEvent::CallEnded(ended) = &event else {
                panic!("expected call.ended, got {}", event.type_tag());
            };
            prop_assert_eq!(ended.user.is_absent(), user.is_none());
            prop_assert_eq!(ended.user.is_null(), user == Some(Value::Null));
            prop_assert_eq!(ended.reason.is_absent(), reason.is_none());
            prop_assert_eq!(ended.reason.is_null(), reason == Some(Value::Null));
            prop_assert_eq!(
                ended.reason.as_option().map(String::as_str),
                reason.as_ref().and_then(Value::as_str)
            );
            prop_assert_eq!(decoder.encode(&event), input);
            prop_assert_eq!(decoder.decode_value(event.encode()).unwrap(), event);
        }
    }
}
