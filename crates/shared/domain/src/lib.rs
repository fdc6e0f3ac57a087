//! # Domain Models
//!
//! Pure types shared by the server and any client build: configuration, the
//! registration entity, static reference data and the validation schema.
//! Keep it lean: no I/O or networking here.

pub mod config;
pub mod constants;
pub mod reference;
pub mod registration;
pub mod registry;
pub mod validation;
