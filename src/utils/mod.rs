//! This is the documentation for all mcpabe utils
//!
//! Currently those are:
//! aes
//! policy
//! secretsharing
//! tools
//!
pub mod aes;
pub mod policy;
pub mod secretsharing;
pub mod tools;
