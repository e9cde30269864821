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

use bson::Bson;
use serde::{Deserialize, Serialize};
use crate::bson_utils::{lenient_f64, lenient_i32, lenient_string};

pub const FIELD_ID: &str = "_id";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_AUTHOR: &str = "author";
pub const FIELD_GENRE: &str = "genre";
pub const FIELD_PUBLISHED_YEAR: &str = "published_year";
pub const FIELD_PRICE: &str = "price";

/// A document of the books collection.
///
/// The store does not enforce this shape, so every field is optional.
/// Numbers are read whatever their BSON width (int32, int64, double,
/// decimal128); a field of an unusable type reads as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Bson>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32", skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Book {

    pub fn new(title: &str, author: &str, genre: &str, published_year: i32, price: f64) -> Book {
        Book {
            id: None,
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            genre: Some(genre.to_string()),
            published_year: Some(published_year),
            price: Some(price),
        }
    }

}

/// Status of a single-document write.
///
/// Touching zero documents is reported, not raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WriteOutcome {
    Applied,
    NotFound,
}

impl WriteOutcome {

    pub(crate) fn from_count(count: u64) -> WriteOutcome {
        if count > 0 {
            WriteOutcome::Applied
        } else {
            WriteOutcome::NotFound
        }
    }

    #[inline]
    pub fn is_applied(&self) -> bool {
        *self == WriteOutcome::Applied
    }

}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreAveragePrice {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub genre: Option<String>,
    #[serde(rename = "avgPrice", default, deserialize_with = "lenient_f64")]
    pub average_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorCount {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub author: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadeCount {
    pub decade: Option<i32>,
    pub count: i64,
}
