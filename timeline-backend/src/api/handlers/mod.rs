// src/api/handlers/mod.rs
pub mod calendar_handler;
pub mod system_handler;
