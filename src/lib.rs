pub mod auth;
pub mod commands;
pub mod config;
pub mod duration;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod listing;
pub mod session;
pub mod video;
pub mod youtube;
