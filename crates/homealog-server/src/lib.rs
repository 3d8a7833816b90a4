//! Front end for the Home-Alog inventory graph: configuration loading,
//! outcome rendering, and the MCP tool server.

pub mod config;
pub mod render;
pub mod server;

pub use config::{HomealogConfig, ServerConfig};
pub use server::{prepare_schema, HomealogMcp};
