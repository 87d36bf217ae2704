pub mod api;
pub mod config;
pub mod db;
pub mod health;
pub mod reading_cache;
pub mod response_store;
pub mod sensors;
pub mod vision;
