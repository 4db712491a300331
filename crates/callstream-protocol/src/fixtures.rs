//! Wire fixtures shared by the decoder tests. One payload per canonical
//! discriminator, written with every defaulted key present so a decode then
//! encode reproduces the input exactly.

use serde_json::{Value, json};

pub(crate) const TS: &str = "2024-05-01T10:00:00Z";
const LATER: &str = "2024-05-01T10:30:00Z";
const CID: &str = "default:123";

pub(crate) fn user(id: &str) -> Value {
    json!({
        "id": id,
        "role": "user",
        "teams": ["blue"],
        "custom": {"color": "red"},
        "language": "en",
        "created_at": TS,
        "updated_at": TS,
        "name": id.to_uppercase(),
        "image": null,
        "invisible": false,
    })
}

pub(crate) fn member(id: &str) -> Value {
    json!({
        "user": user(id),
        "user_id": id,
        "custom": {},
        "created_at": TS,
        "updated_at": TS,
        "role": "host",
    })
}

pub(crate) fn participant(id: &str) -> Value {
    json!({
        "user": user(id),
        "user_session_id": format!("{id}-session"),
        "role": "user",
        "joined_at": TS,
    })
}

pub(crate) fn session() -> Value {
    json!({
        "id": "sess-1",
        "participants": [participant("alice")],
        "participants_count_by_role": {"user": 1},
        "accepted_by": {"bob": TS},
        "rejected_by": {},
        "missed_by": {},
        "anonymous_participant_count": 0,
        "started_at": TS,
        "ended_at": null,
    })
}

pub(crate) fn call() -> Value {
    json!({
        "cid": CID,
        "id": "123",
        "type": "default",
        "created_by": user("alice"),
        "custom": {"topic": "standup"},
        "backstage": false,
        "blocked_user_ids": [],
        "created_at": TS,
        "updated_at": TS,
        "current_session_id": "sess-1",
        "recording": false,
        "transcribing": false,
        "captioning": false,
        "settings": {"audio": {"mic_default_on": true}},
        "egress": {"broadcasting": false, "hls": null},
        "session": session(),
        "starts_at": null,
    })
}

pub(crate) fn own_user() -> Value {
    json!({
        "id": "alice",
        "role": "user",
        "teams": [],
        "custom": {},
        "language": "en",
        "banned": false,
        "online": true,
        "devices": [{"id": "device-1", "push_provider": "apn"}],
        "created_at": TS,
        "updated_at": TS,
        "total_unread_count": 0,
        "mutes": [],
    })
}

pub(crate) fn api_error() -> Value {
    json!({
        "code": 43,
        "message": "token expired",
        "StatusCode": 401,
        "more_info": "https://example.invalid/errors",
        "details": [],
        "duration": "0.42ms",
        "unrecoverable": true,
    })
}

fn recording_artifact(filename: &str) -> Value {
    json!({
        "filename": filename,
        "url": format!("https://cdn.example.invalid/{filename}"),
        "start_time": TS,
        "end_time": LATER,
        "session_id": "sess-1",
    })
}

fn merge(mut base: Value, extra: Value) -> Value {
    if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
        base.extend(extra);
    }
    base
}

fn scoped(tag: &str, extra: Value) -> Value {
    merge(json!({"type": tag, "call_cid": CID, "created_at": TS}), extra)
}

fn global(tag: &str, extra: Value) -> Value {
    merge(json!({"type": tag, "created_at": TS}), extra)
}

/// Fixture for `tag`, or `None` when the discriminator has none.
pub(crate) fn event(tag: &str) -> Option<Value> {
    let value = match tag {
        "app.updated" => global(tag, json!({"app": {"file_upload_config": {}}})),
        "call.accepted" => scoped(tag, json!({"call": call(), "user": user("bob")})),
        "call.blocked_user" => scoped(
            tag,
            json!({"user": user("mallory"), "blocked_by_user": user("alice")}),
        ),
        "call.closed_caption" => scoped(
            tag,
            json!({"closed_caption": {
                "speaker_id": "alice",
                "text": "good morning",
                "start_time": TS,
                "end_time": "2024-05-01T10:00:02.250Z",
            }}),
        ),
        "call.closed_captions_failed"
        | "call.closed_captions_started"
        | "call.closed_captions_stopped"
        | "call.hls_broadcasting_failed" => scoped(tag, json!({})),
        "call.created" => scoped(
            tag,
            json!({"call": call(), "members": [member("alice"), member("bob")]}),
        ),
        "call.deleted" | "call.live_started" | "call.hls_broadcasting_stopped" => {
            scoped(tag, json!({"call": call()}))
        }
        "call.ended" => scoped(
            tag,
            json!({"call": call(), "user": user("alice"), "reason": "timeout"}),
        ),
        "call.frame_recording_failed"
        | "call.frame_recording_started"
        | "call.frame_recording_stopped" => {
            scoped(tag, json!({"call": call(), "egress_id": "egress-7"}))
        }
        "call.frame_recording_ready" => scoped(
            tag,
            json!({
                "egress_id": "egress-7",
                "session_id": "sess-1",
                "track_type": "TRACK_TYPE_VIDEO",
                "url": "https://cdn.example.invalid/frame.jpg",
                "captured_at": "2024-05-01T10:05:00.500Z",
                "users": {"alice": user("alice")},
            }),
        ),
        "call.hls_broadcasting_started" => scoped(
            tag,
            json!({"call": call(), "hls_playlist_url": "https://cdn.example.invalid/live.m3u8"}),
        ),
        "call.kicked_user" => scoped(tag, json!({"user": user("mallory")})),
        "call.member_added" | "call.member_updated" => {
            scoped(tag, json!({"call": call(), "members": [member("carol")]}))
        }
        "call.member_removed" => scoped(tag, json!({"call": call(), "members": ["carol"]})),
        "call.member_updated_permission" => scoped(
            tag,
            json!({
                "call": call(),
                "capabilities_by_role": {"host": ["end-call", "mute-users"], "user": []},
                "members": [member("carol")],
            }),
        ),
        "call.missed" => scoped(
            tag,
            json!({
                "call": call(),
                "members": [member("bob")],
                "notify_user": true,
                "session_id": "sess-1",
                "user": user("alice"),
            }),
        ),
        "call.moderation_blur" => {
            scoped(tag, json!({"user_id": "mallory", "custom": {"score": 0.93}}))
        }
        "call.moderation_warning" => scoped(
            tag,
            json!({"user_id": "mallory", "message": "be nice", "custom": {}}),
        ),
        "call.notification" => scoped(
            tag,
            json!({
                "call": call(),
                "members": [member("bob")],
                "session_id": "sess-1",
                "user": user("alice"),
            }),
        ),
        "call.permission_request" => scoped(
            tag,
            json!({"permissions": ["send-audio", "screenshare"], "user": user("bob")}),
        ),
        "call.permissions_updated" => scoped(
            tag,
            json!({"own_capabilities": ["send-audio", "send-video"], "user": user("bob")}),
        ),
        "call.reaction_new" => scoped(
            tag,
            json!({"reaction": {
                "type": "like",
                "user": user("bob"),
                "emoji_code": ":like:",
                "custom": {},
            }}),
        ),
        "call.recording_failed" | "call.recording_started" | "call.recording_stopped" => scoped(
            tag,
            json!({"egress_id": "egress-9", "recording_type": "composite"}),
        ),
        "call.recording_ready" => scoped(
            tag,
            json!({
                "call_recording": recording_artifact("rec.mp4"),
                "egress_id": "egress-9",
            }),
        ),
        "call.rejected" => scoped(
            tag,
            json!({"call": call(), "user": user("bob"), "reason": null}),
        ),
        "call.ring" => scoped(
            tag,
            json!({
                "call": call(),
                "members": [member("alice"), member("bob")],
                "session_id": "sess-1",
                "user": user("alice"),
                "video": true,
            }),
        ),
        "call.rtmp_broadcast_failed"
        | "call.rtmp_broadcast_started"
        | "call.rtmp_broadcast_stopped" => scoped(tag, json!({"name": "youtube"})),
        "call.session_ended" | "call.session_started" => {
            scoped(tag, json!({"call": call(), "session_id": "sess-1"}))
        }
        "call.session_participant_count_updated" => scoped(
            tag,
            json!({
                "anonymous_participant_count": 2,
                "participants_count_by_role": {"host": 1, "user": 4},
                "session_id": "sess-1",
            }),
        ),
        "call.session_participant_joined" => scoped(
            tag,
            json!({"participant": participant("bob"), "session_id": "sess-1"}),
        ),
        "call.session_participant_left" => scoped(
            tag,
            json!({
                "participant": participant("bob"),
                "session_id": "sess-1",
                "duration_seconds": 754,
            }),
        ),
        "call.stats_report_ready" => scoped(tag, json!({"session_id": "sess-1"})),
        "call.transcription_failed" => {
            scoped(tag, json!({"egress_id": "egress-3", "error": "quota"}))
        }
        "call.transcription_ready" => scoped(
            tag,
            json!({
                "call_transcription": recording_artifact("transcript.jsonl"),
                "egress_id": "egress-3",
            }),
        ),
        "call.transcription_started" | "call.transcription_stopped" => {
            scoped(tag, json!({"egress_id": "egress-3"}))
        }
        "call.unblocked_user" => scoped(tag, json!({"user": user("mallory")})),
        "call.updated" => scoped(
            tag,
            json!({
                "call": call(),
                "capabilities_by_role": {"host": ["end-call"]},
            }),
        ),
        "call.user_feedback_submitted" => scoped(
            tag,
            json!({
                "rating": 4,
                "session_id": "sess-1",
                "user": user("bob"),
                "sdk": "stream-video-swift",
                "sdk_version": "1.0.0",
                "custom": {"network": "wifi"},
            }),
        ),
        "call.user_muted" => scoped(
            tag,
            json!({
                "from_user_id": "alice",
                "muted_user_ids": ["bob", "carol"],
                "reason": "noise",
            }),
        ),
        "connection.error" => global(
            tag,
            json!({"connection_id": "conn-1", "error": api_error()}),
        ),
        "connection.ok" => global(tag, json!({"connection_id": "conn-1", "me": own_user()})),
        "custom" => scoped(
            tag,
            json!({"custom": {"kind": "raise-hand", "level": 2}, "user": user("bob")}),
        ),
        "health.check" => global(
            tag,
            json!({"connection_id": "conn-1", "cid": "", "received_at": null}),
        ),
        "user.updated" => global(tag, json!({"user": user("bob")})),
        _ => return None,
    };
    Some(value)
}
