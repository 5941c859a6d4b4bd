//! Hayaoshi room server library.
//!
//! Coordinates rooms of connected participants for a live buzzer quiz:
//! participants join a room over WebSocket, a moderator starts a question,
//! and the first accepted buzz wins until the next question.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod bootstrap;
