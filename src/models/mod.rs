//! Typed records shared across layers.

pub mod attachment;
pub mod email;
pub mod response;
pub mod user;
