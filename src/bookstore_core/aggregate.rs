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

//! Server-side aggregation pipelines over the books collection.
//!
//! The pipelines are plain `Vec<Document>` values so they can be checked
//! without a store; [`BookCollection`] runs them and decodes the rows.

use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use log::debug;
use serde::de::DeserializeOwned;
use crate::collection::{decode_all, BookCollection};
use crate::errors::{Error, Result};
use crate::model::{AuthorCount, DecadeCount, GenreAveragePrice};

/// `{ _id: genre, avgPrice }` per genre, unordered.
pub fn average_price_by_genre_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": "$genre",
                "avgPrice": { "$avg": "$price" },
            },
        },
    ]
}

/// The author with the most books. Ties are resolved by the store.
pub fn top_author_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": "$author",
                "count": { "$sum": 1 },
            },
        },
        doc! {
            "$sort": { "count": -1 },
        },
        doc! {
            "$limit": 1,
        },
    ]
}

/// The decade bucket of a year, rounding towards negative infinity so
/// that it agrees with `$floor` on the server.
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// `{ decade, count }` ascending by decade, where
/// `decade = floor(published_year / 10) * 10`. Books whose year is
/// missing or not a number land in one `decade: null` row.
pub fn count_by_decade_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": {
                    "$cond": [
                        { "$isNumber": "$published_year" },
                        { "$floor": { "$divide": ["$published_year", 10] } },
                        Bson::Null,
                    ],
                },
                "count": { "$sum": 1 },
            },
        },
        doc! {
            "$project": {
                "_id": 0,
                // $floor answers a double, keep the decade integral
                "decade": {
                    "$toInt": { "$multiply": ["$_id", 10] },
                },
                "count": 1,
            },
        },
        doc! {
            "$sort": { "decade": 1 },
        },
    ]
}

impl BookCollection {

    async fn aggregate_rows<T: DeserializeOwned>(&self, op: &'static str, pipeline: Vec<Document>) -> Result<Vec<T>> {
        debug!("{}: {:?}", op, pipeline);
        let cursor = self.raw().aggregate(pipeline).await.map_err(Error::operation(op))?;
        let docs = cursor.try_collect::<Vec<Document>>().await.map_err(Error::operation(op))?;
        debug!("{}: {} rows", op, docs.len());
        decode_all(docs, op)
    }

    pub async fn average_price_by_genre(&self) -> Result<Vec<GenreAveragePrice>> {
        self.aggregate_rows("average price by genre", average_price_by_genre_pipeline()).await
    }

    pub async fn top_author(&self) -> Result<Option<AuthorCount>> {
        let rows = self.aggregate_rows::<AuthorCount>("top author", top_author_pipeline()).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn count_by_decade(&self) -> Result<Vec<DecadeCount>> {
        self.aggregate_rows("count by decade", count_by_decade_pipeline()).await
    }

}
