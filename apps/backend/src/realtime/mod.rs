pub mod hub;
pub mod protocol;

pub use hub::RoomHub;
pub use protocol::{ErrorCode, ServerMsg};
