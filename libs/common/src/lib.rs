//! Common library for the L-Bar conversion service
//!
//! This crate provides shared functionality used by the conversion service:
//! on-disk storage for generated artifacts and per-request identifier
//! generation.

pub mod error;
pub mod request_id;
pub mod storage;
