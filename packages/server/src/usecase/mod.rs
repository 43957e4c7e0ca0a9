//! UseCase layer: the operations the UI layer drives.

mod broadcast;
mod connect_participant;
mod disconnect_participant;
mod error;
mod moderate_members;
mod send_message;

pub use broadcast::Broadcaster;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::SendError;
pub use moderate_members::ModerateMembersUseCase;
pub use send_message::SendMessageUseCase;
