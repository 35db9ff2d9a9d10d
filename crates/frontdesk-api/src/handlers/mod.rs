//! Request handlers grouped by console view

pub mod appointments;
pub mod calls;
pub mod chat;
pub mod health;
pub mod settings;
pub mod stats;
