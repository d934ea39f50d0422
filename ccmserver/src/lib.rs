//! # ccmserver - High-level Axum server wrapper
//!
//! A thin, ergonomic layer over Axum for the CCMusic backend services.
//!
//! ## Features
//!
//! - **Simple JSON routes**: add API endpoints with `add_route()`
//! - **Stateful handlers**: GET/POST handlers with shared state
//! - **Sub-routers**: mount whole APIs with `add_router()`
//! - **Logging**: console tracing plus an in-memory ring buffer served
//!   at `/log-dump`
//! - **Graceful shutdown**: clean stop on Ctrl+C
//!
//! ## Example
//!
//! ```rust,no_run
//! use ccmserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut server = ServerBuilder::new("MyAPI", "127.0.0.1", 8080).build();
//!
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await;
//!     server.wait().await;
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{log_dump, LogState, LoggingOptions};
pub use server::{Server, ServerBuilder, ServerInfo};
