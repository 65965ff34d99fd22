// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `CorpQuery` Store
//!
//! Record storage for the `CorpQuery` service.
//!
//! This crate provides:
//!
//! - **RecordStore**: The flat key-value seam the scraper and router share
//! - **MemoryStore**: Process-local backend
//! - **FileStore**: Durable JSON-file backend
//! - **History**: Record keys and the newest-first history listing
//!
//! ## Usage
//!
//! ```ignore
//! use corpquery_store::{recent_history, save_record, FileStore};
//!
//! let store = FileStore::open("records.json").await?;
//! let key = save_record(&store, &record).await?;
//! let latest = recent_history(&store, 50).await?;
//! ```

pub mod error;
pub mod file;
pub mod history;
pub mod memory;
pub mod persistence;
pub mod store;

pub use error::StoreError;
pub use file::FileStore;
pub use history::{DEFAULT_HISTORY_LIMIT, KEY_PREFIX, recent_history, record_key, save_record};
pub use memory::MemoryStore;
pub use persistence::{default_data_dir, default_store_path, load_json, save_json};
pub use store::RecordStore;
