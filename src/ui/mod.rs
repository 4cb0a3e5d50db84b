// src/ui/mod.rs
pub mod field_errors;
pub mod notification;
