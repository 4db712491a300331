//! The [`VideoEvent`] tagged union.
//!
//! The canonical event table is a single `video_events!` invocation. Each line
//! binds a union case to its payload record and wire discriminator; the macro
//! derives the enum, the tag table, accessors and registry entries from it.

use callstream_codec::{Record, Shape};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::payloads::*;
use crate::registry::Registration;

/// Wire key holding the event discriminator.
pub const TYPE_KEY: &str = "type";

/// A payload record bound to exactly one [`VideoEvent`] case and its
/// discriminator.
pub trait EventRecord: Record + Into<VideoEvent> {
    const TYPE: &'static str;
}

macro_rules! video_events {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident($payload:ty) = $tag:literal
        ),* $(,)?
    ) => {
        /// A decoded call-signaling event. Exactly one case per discriminator.
        #[allow(clippy::large_enum_variant)]
        #[derive(Debug, Clone, PartialEq, Hash)]
        pub enum VideoEvent {
            $(
                $(#[$meta])*
                $variant($payload),
            )*
        }

        impl VideoEvent {
            /// Every canonical discriminator, in table order.
            pub const DISCRIMINATORS: &'static [&'static str] = &[$($tag),*];

            /// Discriminator written into `type` when this event is encoded.
            pub fn type_tag(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => $tag,)*
                }
            }

            pub fn payload_shape(&self) -> &'static Shape {
                match self {
                    $(Self::$variant(_) => <$payload as Record>::SHAPE,)*
                }
            }

            fn payload(&self) -> &dyn EventPayload {
                match self {
                    $(Self::$variant(payload) => payload,)*
                }
            }

            fn encode_payload(&self) -> Map<String, Value> {
                match self {
                    $(Self::$variant(payload) => payload.encode_object(),)*
                }
            }

            pub(crate) fn registrations() -> impl Iterator<Item = Registration> {
                [$(Registration::of::<$payload>()),*].into_iter()
            }
        }

        $(
            impl From<$payload> for VideoEvent {
                fn from(payload: $payload) -> Self {
                    Self::$variant(payload)
                }
            }

            impl EventRecord for $payload {
                const TYPE: &'static str = $tag;
            }
        )*
    };
}

video_events! {
    AppUpdated(AppUpdatedEvent) = "app.updated",
    CallAccepted(CallAcceptedEvent) = "call.accepted",
    BlockedUser(BlockedUserEvent) = "call.blocked_user",
    ClosedCaption(ClosedCaptionEvent) = "call.closed_caption",
    CallClosedCaptionsFailed(CallClosedCaptionsFailedEvent) = "call.closed_captions_failed",
    CallClosedCaptionsStarted(CallClosedCaptionsStartedEvent) = "call.closed_captions_started",
    CallClosedCaptionsStopped(CallClosedCaptionsStoppedEvent) = "call.closed_captions_stopped",
    CallCreated(CallCreatedEvent) = "call.created",
    CallDeleted(CallDeletedEvent) = "call.deleted",
    CallEnded(CallEndedEvent) = "call.ended",
    CallFrameRecordingFailed(CallFrameRecordingFailedEvent) = "call.frame_recording_failed",
    CallFrameRecordingFrameReady(CallFrameRecordingFrameReadyEvent) = "call.frame_recording_ready",
    CallFrameRecordingStarted(CallFrameRecordingStartedEvent) = "call.frame_recording_started",
    CallFrameRecordingStopped(CallFrameRecordingStoppedEvent) = "call.frame_recording_stopped",
    CallHLSBroadcastingFailed(CallHLSBroadcastingFailedEvent) = "call.hls_broadcasting_failed",
    CallHLSBroadcastingStarted(CallHLSBroadcastingStartedEvent) = "call.hls_broadcasting_started",
    CallHLSBroadcastingStopped(CallHLSBroadcastingStoppedEvent) = "call.hls_broadcasting_stopped",
    KickedUser(KickedUserEvent) = "call.kicked_user",
    CallLiveStarted(CallLiveStartedEvent) = "call.live_started",
    CallMemberAdded(CallMemberAddedEvent) = "call.member_added",
    CallMemberRemoved(CallMemberRemovedEvent) = "call.member_removed",
    CallMemberUpdated(CallMemberUpdatedEvent) = "call.member_updated",
    CallMemberUpdatedPermission(CallMemberUpdatedPermissionEvent) = "call.member_updated_permission",
    CallMissed(CallMissedEvent) = "call.missed",
    CallModerationBlur(CallModerationBlurEvent) = "call.moderation_blur",
    CallModerationWarning(CallModerationWarningEvent) = "call.moderation_warning",
    CallNotification(CallNotificationEvent) = "call.notification",
    PermissionRequest(PermissionRequestEvent) = "call.permission_request",
    UpdatedCallPermissions(UpdatedCallPermissionsEvent) = "call.permissions_updated",
    CallReaction(CallReactionEvent) = "call.reaction_new",
    CallRecordingFailed(CallRecordingFailedEvent) = "call.recording_failed",
    CallRecordingReady(CallRecordingReadyEvent) = "call.recording_ready",
    CallRecordingStarted(CallRecordingStartedEvent) = "call.recording_started",
    CallRecordingStopped(CallRecordingStoppedEvent) = "call.recording_stopped",
    CallRejected(CallRejectedEvent) = "call.rejected",
    CallRing(CallRingEvent) = "call.ring",
    CallRtmpBroadcastFailed(CallRtmpBroadcastFailedEvent) = "call.rtmp_broadcast_failed",
    CallRtmpBroadcastStarted(CallRtmpBroadcastStartedEvent) = "call.rtmp_broadcast_started",
    CallRtmpBroadcastStopped(CallRtmpBroadcastStoppedEvent) = "call.rtmp_broadcast_stopped",
    CallSessionEnded(CallSessionEndedEvent) = "call.session_ended",
    CallSessionParticipantCountsUpdated(CallSessionParticipantCountsUpdatedEvent) = "call.session_participant_count_updated",
    CallSessionParticipantJoined(CallSessionParticipantJoinedEvent) = "call.session_participant_joined",
    CallSessionParticipantLeft(CallSessionParticipantLeftEvent) = "call.session_participant_left",
    CallSessionStarted(CallSessionStartedEvent) = "call.session_started",
    CallStatsReportReady(CallStatsReportReadyEvent) = "call.stats_report_ready",
    CallTranscriptionFailed(CallTranscriptionFailedEvent) = "call.transcription_failed",
    CallTranscriptionReady(CallTranscriptionReadyEvent) = "call.transcription_ready",
    CallTranscriptionStarted(CallTranscriptionStartedEvent) = "call.transcription_started",
    CallTranscriptionStopped(CallTranscriptionStoppedEvent) = "call.transcription_stopped",
    UnblockedUser(UnblockedUserEvent) = "call.unblocked_user",
    CallUpdated(CallUpdatedEvent) = "call.updated",
    CallUserFeedbackSubmitted(CallUserFeedbackSubmittedEvent) = "call.user_feedback_submitted",
    CallUserMuted(CallUserMutedEvent) = "call.user_muted",
    ConnectionError(ConnectionErrorEvent) = "connection.error",
    /// Sent once after the connection is authenticated.
    Connected(ConnectedEvent) = "connection.ok",
    Custom(CustomVideoEvent) = "custom",
    /// Keep-alive; carries no call state.
    HealthCheck(HealthCheckEvent) = "health.check",
    UserUpdated(UserUpdatedEvent) = "user.updated",
}

impl VideoEvent {
    pub fn call_cid(&self) -> Option<&str> {
        self.payload().call_cid()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.payload().created_at()
    }

    /// Connection keep-alives: `health.check` and `connection.ok`.
    pub fn is_health_check(&self) -> bool {
        matches!(self, Self::HealthCheck(_) | Self::Connected(_))
    }

    /// Payload fields plus the `type` discriminator of this case.
    pub fn encode(&self) -> Value {
        let mut object = self.encode_payload();
        object.insert(TYPE_KEY.to_owned(), Value::String(self.type_tag().to_owned()));
        Value::Object(object)
    }
}

impl Serialize for VideoEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode().serialize(serializer)
    }
}
