pub mod room_code;
