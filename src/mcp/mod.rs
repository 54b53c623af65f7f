//! Model Context Protocol surface: tool dispatch and the rmcp server handler.

pub mod dispatcher;
pub mod server;

pub use server::TtsServer;
