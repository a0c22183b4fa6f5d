pub mod rooms;

pub use rooms::{ActionReply, GameAction, RoomService};
