//! Shared payload records embedded in call-signaling events.
//!
//! Every record that the server is known to grow over time (users, calls,
//! members) declares a `rest` bag so unknown keys survive a re-encode.

use callstream_codec::{Custom, record, wire_enum};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;

// ─── Enums ─────────────────────────────────────────────────────────────────

wire_enum! {
    /// A permission the connected user holds inside a call.
    pub enum OwnCapability {
        BlockUsers => "block-users",
        ChangeMaxDuration => "change-max-duration",
        CreateCall => "create-call",
        CreateReaction => "create-reaction",
        EnableNoiseCancellation => "enable-noise-cancellation",
        EndCall => "end-call",
        JoinBackstage => "join-backstage",
        JoinCall => "join-call",
        JoinEndedCall => "join-ended-call",
        KickUser => "kick-user",
        MuteUsers => "mute-users",
        PinForEveryone => "pin-for-everyone",
        ReadCall => "read-call",
        RemoveCallMember => "remove-call-member",
        Screenshare => "screenshare",
        SendAudio => "send-audio",
        SendVideo => "send-video",
        StartBroadcastCall => "start-broadcast-call",
        StartClosedCaptionsCall => "start-closed-captions-call",
        StartFrameRecordCall => "start-frame-record-call",
        StartRecordCall => "start-record-call",
        StartTranscriptionCall => "start-transcription-call",
        StopBroadcastCall => "stop-broadcast-call",
        StopClosedCaptionsCall => "stop-closed-captions-call",
        StopFrameRecordCall => "stop-frame-record-call",
        StopRecordCall => "stop-record-call",
        StopTranscriptionCall => "stop-transcription-call",
        UpdateCall => "update-call",
        UpdateCallMember => "update-call-member",
        UpdateCallPermissions => "update-call-permissions",
        UpdateCallSettings => "update-call-settings",
    }
}

wire_enum! {
    pub enum RecordingType {
        Composite => "composite",
        Individual => "individual",
        Raw => "raw",
    }
}

// ─── Users ─────────────────────────────────────────────────────────────────

record! {
    /// A user as embedded in call, member and participant payloads.
    pub struct UserResponse {
        id: required String,
        role: required String,
        teams: default Vec<String> = Vec::new(),
        custom: default Custom = Custom::new(),
        language: default String = String::new(),
        created_at: required DateTime<Utc>,
        updated_at: required DateTime<Utc>,
        name: optional String,
        image: optional String,
        deleted_at: optional DateTime<Utc>,
        last_active: optional DateTime<Utc>,
        online: optional bool,
        banned: optional bool,
        blocked_user_ids: optional Vec<String>,
        extra: rest Custom,
    }
}

record! {
    /// The connected user, as reported by `connection.ok`.
    pub struct OwnUserResponse {
        id: required String,
        role: required String,
        teams: default Vec<String> = Vec::new(),
        custom: default Custom = Custom::new(),
        language: default String = String::new(),
        banned: required bool,
        online: required bool,
        devices: default Vec<Value> = Vec::new(),
        created_at: required DateTime<Utc>,
        updated_at: required DateTime<Utc>,
        name: optional String,
        image: optional String,
        deleted_at: optional DateTime<Utc>,
        last_active: optional DateTime<Utc>,
        total_unread_count: default u64 = 0,
        extra: rest Custom,
    }
}

// ─── Calls ─────────────────────────────────────────────────────────────────

record! {
    pub struct CallParticipantResponse {
        user: required UserResponse,
        user_session_id: required String,
        role: required String,
        joined_at: required DateTime<Utc>,
    }
}

record! {
    /// The running session of a call. Timestamps in the per-user maps record
    /// when each user accepted, rejected or missed the ring.
    pub struct CallSessionResponse {
        id: required String,
        participants: default Vec<CallParticipantResponse> = Vec::new(),
        participants_count_by_role: default IndexMap<String, i64> = IndexMap::new(),
        accepted_by: default IndexMap<String, DateTime<Utc>> = IndexMap::new(),
        rejected_by: default IndexMap<String, DateTime<Utc>> = IndexMap::new(),
        missed_by: default IndexMap<String, DateTime<Utc>> = IndexMap::new(),
        anonymous_participant_count: default u32 = 0,
        started_at: optional DateTime<Utc>,
        ended_at: optional DateTime<Utc>,
        live_started_at: optional DateTime<Utc>,
        live_ended_at: optional DateTime<Utc>,
    }
}

record! {
    /// Call state as sent with lifecycle events. Settings, egress and ingress
    /// blocks are carried as opaque documents.
    pub struct CallResponse {
        cid: required String,
        id: required String,
        call_type: required String as "type",
        created_by: required UserResponse,
        custom: default Custom = Custom::new(),
        backstage: required bool,
        blocked_user_ids: default Vec<String> = Vec::new(),
        created_at: required DateTime<Utc>,
        updated_at: required DateTime<Utc>,
        current_session_id: default String = String::new(),
        recording: required bool,
        transcribing: required bool,
        captioning: default bool = false,
        settings: required Value,
        egress: optional Value,
        ingress: optional Value,
        starts_at: optional DateTime<Utc>,
        ended_at: optional DateTime<Utc>,
        session: optional CallSessionResponse,
        team: optional String,
        thumbnails: optional Value,
        extra: rest Custom,
    }
}

record! {
    pub struct MemberResponse {
        user: required UserResponse,
        user_id: required String,
        custom: default Custom = Custom::new(),
        created_at: required DateTime<Utc>,
        updated_at: required DateTime<Utc>,
        role: optional String,
        deleted_at: optional DateTime<Utc>,
        extra: rest Custom,
    }
}

record! {
    pub struct ReactionResponse {
        reaction_type: required String as "type",
        user: required UserResponse,
        custom: optional Custom,
        emoji_code: optional String,
    }
}

// ─── Egress artifacts ──────────────────────────────────────────────────────

record! {
    pub struct CallRecording {
        filename: required String,
        url: required String,
        start_time: required DateTime<Utc>,
        end_time: required DateTime<Utc>,
        session_id: default String = String::new(),
    }
}

record! {
    pub struct CallTranscription {
        filename: required String,
        url: required String,
        start_time: required DateTime<Utc>,
        end_time: required DateTime<Utc>,
        session_id: default String = String::new(),
    }
}

record! {
    pub struct CallClosedCaption {
        speaker_id: required String,
        text: required String,
        start_time: required DateTime<Utc>,
        end_time: required DateTime<Utc>,
        user: optional UserResponse,
    }
}

// ─── Errors ────────────────────────────────────────────────────────────────

record! {
    /// Error body returned by the server, either inside `connection.error` or
    /// as a standalone error frame.
    pub struct ApiError {
        code: required i64,
        message: required String,
        status_code: required i64 as "StatusCode",
        more_info: default String = String::new(),
        details: default Vec<i64> = Vec::new(),
        duration: default String = String::new(),
        unrecoverable: optional bool,
        exception_fields: optional IndexMap<String, String>,
    }
}

record! {
    /// `{"error": {...}}`: a server error that is not an event.
    pub struct ErrorFrame {
        error: required ApiError,
        extra: rest Custom,
    }
}
