// src/service/mod.rs
pub mod calendar_service;
