//! Toolset abstraction for grouping related tools.
//!
//! A toolset produces the tools the agent may choose from. The OpenAPI
//! toolset is the only producer in this crate, but the pipeline only sees
//! this trait.

use std::sync::Arc;

use super::base_tool::BaseTool;

/// Base trait for toolsets - collections of related tools.
///
/// [`close`](BaseToolset::close) releases whatever the toolset holds
/// (connections, clients). Not calling it may leak resources but won't cause
/// undefined behavior.
#[async_trait::async_trait]
pub trait BaseToolset: Send + Sync {
    /// Returns all tools in the toolset, in a stable order.
    ///
    /// Clones the `Arc`s, not the tools themselves.
    async fn get_tools(&self) -> Vec<Arc<dyn BaseTool>>;

    /// Performs cleanup and releases resources held by the toolset.
    async fn close(&self);
}
