// src/services/mod.rs
pub mod submit;
pub mod transport;
