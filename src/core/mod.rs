//! Core library components.
//!
//! This module contains the reusable engine for selective config file
//! encryption: the document model and codecs, the path language, the
//! cipher, and the change-detecting [`SecureFile`] that composes them.
//!
//! [`SecureFile`]: file::SecureFile

// Public API
pub mod cipher;
pub mod file;
pub mod format;
pub mod path;
pub mod value;

// Codec implementations, dispatched through `format::Format`
pub(crate) mod dotenv;
pub(crate) mod json;
pub(crate) mod yaml;
