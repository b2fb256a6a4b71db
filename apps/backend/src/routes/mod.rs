pub mod admin;
pub mod auth;
pub mod completions;
pub mod habits;
pub mod user;
