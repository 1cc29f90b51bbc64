//! # Taskly - terminal client for a remote task manager
//!
//! Keeps a remote task collection, an authentication session and the local
//! view state (page, search, filter, ordering) consistent against a task API.
//!
//! ## Features
//!
//! - **HTTP Client Adapter**: bearer auth, single coalesced refresh on 401,
//!   session teardown on 403, one notification per failure
//! - **Session Store**: encrypted credential persistence with a 7 day window
//! - **Task Query Engine**: last-request-wins page fetching
//! - **Task Mutations**: create, edit, delete, toggle with refetch
//! - **View State Controller**: location mirroring, hydration, debounced search
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskly::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
