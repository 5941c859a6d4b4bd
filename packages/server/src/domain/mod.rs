//! Domain layer: room state machine, buzz arbitration and the ports
//! (`RoomRepository`, `MessagePusher`) the usecases depend on.

pub mod arbitration;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use arbitration::{BuzzOutcome, arbitrate};
pub use entity::{Participant, Room, RoomPhase};
pub use error::{DomainError, MessagePushError, RepositoryError};
pub use event::RoomEvent;
pub use message_pusher::{BindOutcome, Binding, ConnectionHandle, MessagePusher, PusherChannel};
pub use repository::{JoinOutcome, RoomRepository};
pub use value_object::{ConnectionId, ParticipantId, RoomCode, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
