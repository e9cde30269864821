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

use bson::{doc, Document};
use futures::TryStreamExt;
use log::debug;
use mongodb::{Collection, Database};
use serde::de::DeserializeOwned;
use crate::errors::{Error, Result};
use crate::model::{Book, WriteOutcome, FIELD_AUTHOR, FIELD_GENRE, FIELD_PRICE, FIELD_PUBLISHED_YEAR, FIELD_TITLE};

/// The books collection of one store connection.
///
/// Every operation is a single round trip (or a single cursor drained to
/// the end) and completes before it returns.
#[derive(Clone)]
pub struct BookCollection {
    database: Database,
    inner: Collection<Document>,
}

pub(crate) fn title_filter(title: &str) -> Document {
    doc! { FIELD_TITLE: title }
}

pub(crate) fn decode_all<T: DeserializeOwned>(docs: Vec<Document>, what: &'static str) -> Result<Vec<T>> {
    docs.into_iter()
        .map(|doc| bson::from_document::<T>(doc).map_err(Error::decode(what)))
        .collect()
}

impl BookCollection {

    pub fn new(database: Database, name: &str) -> BookCollection {
        let inner = database.collection::<Document>(name);
        BookCollection { database, inner }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    #[inline]
    pub(crate) fn raw(&self) -> &Collection<Document> {
        &self.inner
    }

    #[inline]
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub async fn find_by_genre(&self, genre: &str) -> Result<Vec<Book>> {
        self.find_books("find by genre", doc! { FIELD_GENRE: genre }).await
    }

    /// Strictly later than `year`.
    pub async fn find_published_after(&self, year: i32) -> Result<Vec<Book>> {
        self.find_books("find by published year", doc! {
            FIELD_PUBLISHED_YEAR: {
                "$gt": year,
            },
        }).await
    }

    pub async fn find_by_author(&self, author: &str) -> Result<Vec<Book>> {
        self.find_books("find by author", doc! { FIELD_AUTHOR: author }).await
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Vec<Book>> {
        self.find_books("find by title", title_filter(title)).await
    }

    async fn find_books(&self, op: &'static str, filter: Document) -> Result<Vec<Book>> {
        debug!("{}: {}", op, filter);
        let cursor = self.inner.find(filter).await.map_err(Error::operation(op))?;
        let docs = cursor.try_collect::<Vec<Document>>().await.map_err(Error::operation(op))?;
        debug!("{}: {} documents", op, docs.len());
        decode_all(docs, "book")
    }

    /// Sets the price of the first book with this title.
    pub async fn update_price(&self, title: &str, price: f64) -> Result<WriteOutcome> {
        let result = self.inner.update_one(
            title_filter(title),
            doc! {
                "$set": {
                    FIELD_PRICE: price,
                },
            },
        ).await.map_err(Error::operation("update price"))?;
        debug!("update price of '{}': matched {}, modified {}", title, result.matched_count, result.modified_count);
        Ok(WriteOutcome::from_count(result.modified_count))
    }

    /// Removes the first book with this title.
    pub async fn delete_by_title(&self, title: &str) -> Result<WriteOutcome> {
        let result = self.inner.delete_one(title_filter(title))
            .await
            .map_err(Error::operation("delete by title"))?;
        debug!("delete '{}': deleted {}", title, result.deleted_count);
        Ok(WriteOutcome::from_count(result.deleted_count))
    }

    pub async fn insert_books(&self, books: &[Book]) -> Result<usize> {
        if books.is_empty() {
            return Ok(0);
        }
        let mut docs: Vec<Document> = Vec::with_capacity(books.len());
        for book in books {
            docs.push(bson::to_document(book)?);
        }
        let result = self.inner.insert_many(docs).await.map_err(Error::operation("insert books"))?;
        Ok(result.inserted_ids.len())
    }

}

#[cfg(test)]
mod tests {
    use bson::doc;
    use crate::collection::{decode_all, title_filter};
    use crate::errors::Error;
    use crate::model::{AuthorCount, Book};

    #[test]
    fn test_title_filter() {
        assert_eq!(title_filter("1984"), doc! { "title": "1984" });
    }

    #[test]
    fn test_decode_all_tolerates_loose_books() {
        let docs = vec![
            doc! {
                "title": "1984",
                "author": "George Orwell",
                "genre": "Dystopian",
                "published_year": 1949,
                "price": 15,
            },
            doc! {
                "title": "Loose Leaf",
                "genre": "Dystopian",
                "published_year": 2003.0,
                "price": "free",
            },
        ];
        let books = decode_all::<Book>(docs, "book").unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].published_year, Some(2003));
        assert_eq!(books[1].price, None);
    }

    #[test]
    fn test_decode_all_reports_bad_row() {
        let docs = vec![
            doc! { "_id": "George Orwell", "count": 3 },
            doc! { "_id": "Aldous Huxley", "count": "many" },
        ];
        let err = decode_all::<AuthorCount>(docs, "author count").unwrap_err();
        assert!(matches!(err, Error::Decode { what: "author count", .. }));
    }
}
