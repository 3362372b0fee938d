// src/lib.rs

//! TamilMV Bot Library

pub mod bot;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
