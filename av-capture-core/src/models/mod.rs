//! Plain data types: configuration, device descriptors, media buffers,
//! and the error taxonomy.

pub mod config;
pub mod device;
pub mod error;
pub mod media;
