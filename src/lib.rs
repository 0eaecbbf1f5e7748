// src/lib.rs

//! Board watcher library
//!
//! Watches paginated bulletin boards, detects posts published since the last
//! scan and routes them to subscribers by keyword rules.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
