// src/api/dto/mod.rs
pub mod calendar_dto;
