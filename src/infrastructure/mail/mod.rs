pub mod messages;
pub mod smtp;
pub mod transport;
