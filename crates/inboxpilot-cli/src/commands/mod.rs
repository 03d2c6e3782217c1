pub mod auth;
pub mod config;
pub mod events;
pub mod extract;
pub mod run;
pub mod streak;
