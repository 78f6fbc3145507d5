//! Library crate backing the `stagecast` binary.
//!
//! The commands operate on project document files (the JSON form of a
//! backend's record lists) so that mapping configs can be validated,
//! canonicalized, and diffed outside a live editing session.

pub mod commands;
pub mod input;
