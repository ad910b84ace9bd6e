// Saved practice sessions, attached to applications by id.

pub mod handlers;
