//! Core library modules for taskly.
//!
//! ## Features
//!
//! - **Session**: credential store with refresh coalescing and encrypted persistence
//! - **Task data**: task model, query parameters and their location encoding
//! - **Query engine**: last-request-wins page fetching driven by the view state
//! - **Mutations**: create, edit, delete and toggle with refetch
//! - **View state**: hydration, location mirroring and debounced search
//! - **Infrastructure**: configuration, data storage, messages, console rendering
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskly::libs::app::App;
//! use taskly::libs::config::Config;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let app = App::open(&Config::read()?)?;
//! let params = app.view.hydrate();
//! let outcome = app.query.run(params).await;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod data_storage;
pub mod guard;
pub mod location;
pub mod messages;
pub mod mutations;
pub mod notify;
pub mod query;
pub mod query_engine;
pub mod secret;
pub mod session;
pub mod task;
pub mod token;
pub mod view;
pub mod view_state;
