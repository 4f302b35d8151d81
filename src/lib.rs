//! This crate provides a weekly tracker of tasks and meetings.
//!
//! Records are kept in in-memory [`Table`]s, owned by a [`Tracker`] that also holds what the user currently looks at (selected week, status filter, grouping).
//!
//! The tables can be imported from and exported to a workbook file on the local disk (see [`local_file`]), or to a file of a remote repository. \
//! In the latter case, a [`Provider`](provider::Provider) merges the in-memory tables into the remote document before pushing them, so that no remote record is lost.
//! It is usually backed by a [`Client`](client::Client) to a GitHub repository.

pub mod traits;
pub mod error;
pub use error::TrackerError;

pub mod item;
pub use item::RecordId;
mod task;
pub use task::{Task, TaskPatch, TaskStatus};
mod meeting;
pub use meeting::{Meeting, MeetingPatch};
pub mod table;
pub use table::Table;
pub mod week;
pub mod document;
pub mod state;
pub use state::Tracker;

pub mod provider;
pub use provider::Provider;
pub mod client;
pub mod local_file;
#[cfg(any(test, feature = "mock_remote_store"))]
pub mod mock_behaviour;
#[cfg(any(test, feature = "mock_remote_store"))]
pub mod mock_store;

pub mod config;
pub mod utils;
