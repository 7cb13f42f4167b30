pub mod error;
pub mod validation;

pub mod users;
pub mod support;
pub mod sec;
pub mod otp;

pub mod assistant;
