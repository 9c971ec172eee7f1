//! Import/export pipeline.
//!
//! Format adapters decode external bytes into untyped rows, field mappers
//! turn rows into validated record payloads, and the services orchestrate
//! the whole transfer against a [`crate::RecordStore`].

pub mod formats;
pub mod mapping;
pub mod services;
pub mod traits;
