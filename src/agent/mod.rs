//! Conversation driver: the bounded tool-use loop.

mod generator;

pub use generator::ResponseGenerator;
