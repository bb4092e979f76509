//! This is the documentation for all MCP-ABE schemes
//!
//! Currently those are:
//! * MCP-ABE basic variant
//! * MCP-ABE binding variant
//!
pub mod mcpabe;
