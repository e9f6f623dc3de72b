pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod editor;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod listing;
pub mod server;
