mod anchor;
mod manager;
mod publisher;
mod traits;

pub use anchor::{AnchorState, Clock, SystemClock, TimestampAnchor};
pub use manager::PresenceManager;
pub use publisher::{compose_lines, project_name, PresencePublisher};
pub use traits::{
    ActivityKind, Completion, CompletionReceiver, CompletionSender, PresenceBackend,
    PresencePayload, PresenceRequest, RequestKind,
};
