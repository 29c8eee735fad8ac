pub mod accounts;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod providers;
pub mod storage;

pub mod api;
pub mod auth;
