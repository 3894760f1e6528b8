//! Persist fixed-width rows in a binary table over a seekable stream.
//!
//! # Status
//!
//! `bintable-storage` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

pub mod stream;
pub mod table;
