//! Payload records, one per event discriminator.
//!
//! Payloads never declare a `type` field: the discriminator is owned by the
//! [`VideoEvent`](crate::VideoEvent) case and written back on encode.

use callstream_codec::{Custom, record};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;

use crate::models::{
    ApiError, CallClosedCaption, CallParticipantResponse, CallRecording, CallResponse,
    CallTranscription, MemberResponse, OwnCapability, OwnUserResponse, ReactionResponse,
    RecordingType, UserResponse,
};

/// Fields every event payload exposes regardless of its variant.
pub trait EventPayload {
    /// Call the event belongs to, for call-scoped events.
    fn call_cid(&self) -> Option<&str>;

    fn created_at(&self) -> DateTime<Utc>;
}

// ─── Application & connection ──────────────────────────────────────────────

record! {
    pub struct AppUpdatedEvent {
        created_at: required DateTime<Utc>,
        app: required Value,
    }
}

record! {
    /// First message on a fresh connection.
    pub struct ConnectedEvent {
        connection_id: required String,
        created_at: required DateTime<Utc>,
        me: required OwnUserResponse,
    }
}

record! {
    pub struct ConnectionErrorEvent {
        connection_id: required String,
        created_at: required DateTime<Utc>,
        error: required ApiError,
    }
}

record! {
    pub struct HealthCheckEvent {
        connection_id: required String,
        created_at: required DateTime<Utc>,
        cid: optional String,
        received_at: optional DateTime<Utc>,
    }
}

record! {
    pub struct UserUpdatedEvent {
        created_at: required DateTime<Utc>,
        user: required UserResponse,
        received_at: optional DateTime<Utc>,
    }
}

// ─── Call lifecycle ────────────────────────────────────────────────────────

record! {
    pub struct CallCreatedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        members: required Vec<MemberResponse>,
    }
}

record! {
    pub struct CallUpdatedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        capabilities_by_role: required IndexMap<String, Vec<String>>,
    }
}

record! {
    pub struct CallDeletedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
    }
}

record! {
    pub struct CallEndedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        user: optional UserResponse,
        reason: optional String,
    }
}

record! {
    pub struct CallLiveStartedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
    }
}

record! {
    pub struct CallAcceptedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        user: required UserResponse,
    }
}

record! {
    pub struct CallRejectedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        user: required UserResponse,
        reason: optional String,
    }
}

record! {
    pub struct CallRingEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        members: required Vec<MemberResponse>,
        session_id: required String,
        user: required UserResponse,
        video: required bool,
    }
}

record! {
    pub struct CallMissedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        members: required Vec<MemberResponse>,
        notify_user: required bool,
        session_id: required String,
        user: required UserResponse,
    }
}

record! {
    pub struct CallNotificationEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        members: required Vec<MemberResponse>,
        session_id: required String,
        user: required UserResponse,
    }
}

// ─── Membership & permissions ──────────────────────────────────────────────

record! {
    pub struct CallMemberAddedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        members: required Vec<MemberResponse>,
    }
}

record! {
    /// `members` holds the removed user ids.
    pub struct CallMemberRemovedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        members: required Vec<String>,
    }
}

record! {
    pub struct CallMemberUpdatedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        members: required Vec<MemberResponse>,
    }
}

record! {
    pub struct CallMemberUpdatedPermissionEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        capabilities_by_role: required IndexMap<String, Vec<String>>,
        members: required Vec<MemberResponse>,
    }
}

record! {
    pub struct PermissionRequestEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        permissions: required Vec<String>,
        user: required UserResponse,
    }
}

record! {
    pub struct UpdatedCallPermissionsEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        own_capabilities: required Vec<OwnCapability>,
        user: required UserResponse,
    }
}

record! {
    pub struct BlockedUserEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        user: required UserResponse,
        blocked_by_user: optional UserResponse,
    }
}

record! {
    pub struct UnblockedUserEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        user: required UserResponse,
    }
}

record! {
    pub struct KickedUserEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        user: required UserResponse,
        kicked_by_user: optional UserResponse,
    }
}

record! {
    pub struct CallUserMutedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        from_user_id: required String,
        muted_user_ids: required Vec<String>,
        reason: required String,
    }
}

// ─── Moderation, reactions, feedback ───────────────────────────────────────

record! {
    pub struct CallModerationBlurEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        user_id: required String,
        custom: default Custom = Custom::new(),
    }
}

record! {
    pub struct CallModerationWarningEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        user_id: required String,
        message: required String,
        custom: default Custom = Custom::new(),
    }
}

record! {
    pub struct CallReactionEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        reaction: required ReactionResponse,
    }
}

record! {
    pub struct CallUserFeedbackSubmittedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        rating: required i64,
        session_id: required String,
        user: required UserResponse,
        reason: optional String,
        sdk: optional String,
        sdk_version: optional String,
        custom: optional Custom,
    }
}

record! {
    /// Application-defined event sent through the call channel.
    pub struct CustomVideoEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        custom: required Custom,
        user: required UserResponse,
    }
}

// ─── Sessions ──────────────────────────────────────────────────────────────

record! {
    pub struct CallSessionStartedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        session_id: required String,
    }
}

record! {
    pub struct CallSessionEndedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        session_id: required String,
    }
}

record! {
    pub struct CallSessionParticipantJoinedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        participant: required CallParticipantResponse,
        session_id: required String,
    }
}

record! {
    pub struct CallSessionParticipantLeftEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        participant: required CallParticipantResponse,
        session_id: required String,
        duration_seconds: required i64,
        reason: optional String,
    }
}

record! {
    pub struct CallSessionParticipantCountsUpdatedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        anonymous_participant_count: required u32,
        participants_count_by_role: required IndexMap<String, i64>,
        session_id: required String,
    }
}

record! {
    pub struct CallStatsReportReadyEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        session_id: required String,
    }
}

// ─── Closed captions ───────────────────────────────────────────────────────

record! {
    pub struct ClosedCaptionEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        closed_caption: required CallClosedCaption,
    }
}

record! {
    pub struct CallClosedCaptionsFailedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
    }
}

record! {
    pub struct CallClosedCaptionsStartedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
    }
}

record! {
    pub struct CallClosedCaptionsStoppedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
    }
}

// ─── Broadcasting ──────────────────────────────────────────────────────────

record! {
    pub struct CallHLSBroadcastingFailedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
    }
}

record! {
    pub struct CallHLSBroadcastingStartedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        hls_playlist_url: required String,
        call: required CallResponse,
    }
}

record! {
    pub struct CallHLSBroadcastingStoppedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
    }
}

record! {
    pub struct CallRtmpBroadcastFailedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        name: required String,
    }
}

record! {
    pub struct CallRtmpBroadcastStartedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        name: required String,
    }
}

record! {
    pub struct CallRtmpBroadcastStoppedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        name: required String,
    }
}

// ─── Recording & egress ────────────────────────────────────────────────────

record! {
    pub struct CallRecordingStartedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        egress_id: required String,
        recording_type: optional RecordingType,
    }
}

record! {
    pub struct CallRecordingStoppedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        egress_id: required String,
        recording_type: optional RecordingType,
    }
}

record! {
    pub struct CallRecordingFailedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        egress_id: required String,
        recording_type: optional RecordingType,
    }
}

record! {
    pub struct CallRecordingReadyEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call_recording: required CallRecording,
        egress_id: required String,
        recording_type: optional RecordingType,
    }
}

record! {
    pub struct CallFrameRecordingStartedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        egress_id: required String,
    }
}

record! {
    pub struct CallFrameRecordingStoppedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        egress_id: required String,
    }
}

record! {
    pub struct CallFrameRecordingFailedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call: required CallResponse,
        egress_id: required String,
    }
}

record! {
    pub struct CallFrameRecordingFrameReadyEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        egress_id: required String,
        session_id: required String,
        track_type: required String,
        url: required String,
        captured_at: required DateTime<Utc>,
        users: required IndexMap<String, UserResponse>,
    }
}

record! {
    pub struct CallTranscriptionStartedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        egress_id: required String,
    }
}

record! {
    pub struct CallTranscriptionStoppedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        egress_id: required String,
    }
}

record! {
    pub struct CallTranscriptionFailedEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        egress_id: required String,
        error: optional String,
    }
}

record! {
    pub struct CallTranscriptionReadyEvent {
        call_cid: required String,
        created_at: required DateTime<Utc>,
        call_transcription: required CallTranscription,
        egress_id: required String,
    }
}

// ─── Shared accessors ──────────────────────────────────────────────────────

macro_rules! event_payloads {
    (call: [$($scoped:ty),* $(,)?], global: [$($global:ty),* $(,)?] $(,)?) => {
        $(
            impl EventPayload for $scoped {
                fn call_cid(&self) -> Option<&str> {
                    Some(&self.call_cid)
                }

                fn created_at(&self) -> DateTime<Utc> {
                    self.created_at
                }
            }
        )*
        $(
            impl EventPayload for $global {
                fn call_cid(&self) -> Option<&str> {
                    None
                }

                fn created_at(&self) -> DateTime<Utc> {
                    self.created_at
                }
            }
        )*
    };
}

event_payloads! {
    call: [
        BlockedUserEvent,
        CallAcceptedEvent,
        CallClosedCaptionsFailedEvent,
        CallClosedCaptionsStartedEvent,
        CallClosedCaptionsStoppedEvent,
        CallCreatedEvent,
        CallDeletedEvent,
        CallEndedEvent,
        CallFrameRecordingFailedEvent,
        CallFrameRecordingFrameReadyEvent,
        CallFrameRecordingStartedEvent,
        CallFrameRecordingStoppedEvent,
        CallHLSBroadcastingFailedEvent,
        CallHLSBroadcastingStartedEvent,
        CallHLSBroadcastingStoppedEvent,
        CallLiveStartedEvent,
        CallMemberAddedEvent,
        CallMemberRemovedEvent,
        CallMemberUpdatedEvent,
        CallMemberUpdatedPermissionEvent,
        CallMissedEvent,
        CallModerationBlurEvent,
        CallModerationWarningEvent,
        CallNotificationEvent,
        CallReactionEvent,
        CallRecordingFailedEvent,
        CallRecordingReadyEvent,
        CallRecordingStartedEvent,
        CallRecordingStoppedEvent,
        CallRejectedEvent,
        CallRingEvent,
        CallRtmpBroadcastFailedEvent,
        CallRtmpBroadcastStartedEvent,
        CallRtmpBroadcastStoppedEvent,
        CallSessionEndedEvent,
        CallSessionParticipantCountsUpdatedEvent,
        CallSessionParticipantJoinedEvent,
        CallSessionParticipantLeftEvent,
        CallSessionStartedEvent,
        CallStatsReportReadyEvent,
        CallTranscriptionFailedEvent,
        CallTranscriptionReadyEvent,
        CallTranscriptionStartedEvent,
        CallTranscriptionStoppedEvent,
        CallUpdatedEvent,
        CallUserFeedbackSubmittedEvent,
        CallUserMutedEvent,
        ClosedCaptionEvent,
        CustomVideoEvent,
        KickedUserEvent,
        PermissionRequestEvent,
        UnblockedUserEvent,
        UpdatedCallPermissionsEvent,
    ],
    global: [
        AppUpdatedEvent,
        ConnectedEvent,
        ConnectionErrorEvent,
        HealthCheckEvent,
        UserUpdatedEvent,
    ],
}
