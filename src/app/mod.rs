//! Demo application: state, event loop plumbing and input handling.

pub mod event;
pub mod handler;
pub mod layout;
pub mod state;
