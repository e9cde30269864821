// Copyright 2024 Vincent Chan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Typed access to a `books` collection on a MongoDB-compatible store.
//!
//! Open a [`StoreConnection`], take its [`BookCollection`] and run
//! operations on it. Every operation returns a structured value; nothing
//! in this crate prints.
//!
//! ```no_run
//! use bookstore_core::{Config, StoreConnection};
//!
//! # async fn run() -> bookstore_core::Result<()> {
//! let config = Config::load()?;
//! let conn = StoreConnection::connect(&config.store).await?;
//! let books = conn.books().find_by_genre("Dystopian").await;
//! conn.close().await;
//! println!("{} books", books?.len());
//! # Ok(())
//! # }
//! ```

mod bson_utils;
mod collection;
mod connection;
mod errors;

pub mod aggregate;
pub mod config;
pub mod explain;
pub mod index;
pub mod model;

pub use collection::BookCollection;
pub use config::{Config, QueryParams, StoreConfig};
pub use connection::StoreConnection;
pub use errors::{Error, IndexConflictStruct, Result};
pub use explain::ExecutionReport;
pub use index::{IndexDirection, IndexOutcome, IndexSpec};
pub use model::{AuthorCount, Book, DecadeCount, GenreAveragePrice, WriteOutcome};
