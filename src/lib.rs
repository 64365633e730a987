pub mod auth;
pub mod compose;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod ooxml;
pub mod providers;
pub mod themes;
