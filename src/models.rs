//! These models represent the state the agent carries between turns
//!
//! A `Conversation` is the ordered list of `Message`s that is sent, verbatim, to the
//! completion endpoint. Nothing else in the crate holds message history.
pub mod conversation;
pub mod message;
