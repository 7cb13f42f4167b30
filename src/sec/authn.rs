pub mod session;
pub mod password;
pub mod totp;
pub mod initiator;
