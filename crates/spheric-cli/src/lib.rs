//! Spheric CLI library.
//!
//! This crate provides the command implementations behind the `spheric`
//! binary: loop generation, SMF inspection and logging setup.

pub mod commands;
pub mod logging;
