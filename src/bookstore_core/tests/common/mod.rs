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

use std::env;
use bookstore_core::{Book, BookCollection, StoreConfig, StoreConnection};

pub const ENV_TEST_URI: &str = "BOOKSTORE_TEST_URI";

/// Connects to the store named by `BOOKSTORE_TEST_URI` and drops
/// `db_name` so every test starts empty.
///
/// Tests calling this are `#[ignore]`d; run them with
/// `BOOKSTORE_TEST_URI=mongodb://localhost:27017 cargo test -- --ignored`.
#[allow(dead_code)]
pub async fn prepare_collection(db_name: &str) -> (StoreConnection, BookCollection) {
    let _ = env_logger::builder().is_test(true).try_init();

    let uri = env::var(ENV_TEST_URI)
        .unwrap_or_else(|_| panic!("{} must point at a running store", ENV_TEST_URI));

    let config = StoreConfig {
        uri,
        database: db_name.to_string(),
        collection: "books".to_string(),
        app_name: Some("bookstore-tests".to_string()),
        server_selection_timeout_ms: Some(5000),
    };
    let conn = StoreConnection::connect(&config).await.unwrap();
    conn.database().drop().await.unwrap();
    let books = conn.books();
    (conn, books)
}

#[allow(dead_code)]
pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new("1984", "George Orwell", "Dystopian", 1949, 15.0),
        Book::new("Animal Farm", "George Orwell", "Political Satire", 1945, 8.5),
        Book::new("Brave New World", "Aldous Huxley", "Dystopian", 1932, 12.0),
        Book::new("The Road", "Cormac McCarthy", "Dystopian", 2006, 14.0),
        Book::new("Never Let Me Go", "Kazuo Ishiguro", "Dystopian", 2005, 11.0),
        Book::new("Neuromancer", "William Gibson", "Science Fiction", 1984, 10.0),
        Book::new("Dune", "Frank Herbert", "Science Fiction", 1965, 9.0),
        Book::new("Beloved", "Toni Morrison", "Fiction", 1987, 13.0),
        Book::new("The Remains of the Day", "Kazuo Ishiguro", "Fiction", 1989, 12.5),
        Book::new("Homage to Catalonia", "George Orwell", "Memoir", 1938, 7.0),
        Book::new("Possession", "A. S. Byatt", "Fiction", 1990, 16.0),
    ]
}

#[allow(dead_code)]
pub async fn prepare_with_samples(db_name: &str) -> (StoreConnection, BookCollection) {
    let (conn, books) = prepare_collection(db_name).await;
    let samples = sample_books();
    let inserted = books.insert_books(&samples).await.unwrap();
    assert_eq!(inserted, samples.len());
    (conn, books)
}
