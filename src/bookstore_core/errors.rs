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

use bson::de::Error as BsonDeErr;
use bson::ser::Error as BsonSerErr;
use bson::Document;
use std::io;
use thiserror::Error;

#[derive(Debug)]
pub struct IndexConflictStruct {
    pub name: String,
    pub existing: Document,
    pub requested: Document,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot connect to '{uri}': {source}")]
    Connection {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("{op} failed: {source}")]
    Operation {
        op: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("cannot decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: BsonDeErr,
    },
    #[error("cannot encode document: {source}")]
    Encode {
        #[source]
        source: BsonSerErr,
    },
    #[error("index '{}' already exists with keys {}, requested {}", .0.name, .0.existing, .0.requested)]
    IndexConflict(Box<IndexConflictStruct>),
    #[error("malformed reply, missing '{0}'")]
    MalformedReply(&'static str),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {

    pub(crate) fn operation(op: &'static str) -> impl FnOnce(mongodb::error::Error) -> Error {
        move |source| Error::Operation { op, source }
    }

    pub(crate) fn decode(what: &'static str) -> impl FnOnce(BsonDeErr) -> Error {
        move |source| Error::Decode { what, source }
    }

    /// Errors of this class happen before any operation ran.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

}

impl From<IndexConflictStruct> for Error {
    fn from(value: IndexConflictStruct) -> Self {
        Error::IndexConflict(Box::new(value))
    }
}

impl From<BsonSerErr> for Error {
    fn from(source: BsonSerErr) -> Self {
        Error::Encode { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use bson::doc;
    use crate::errors::{Error, IndexConflictStruct};

    #[test]
    fn test_index_conflict_message() {
        let err: Error = IndexConflictStruct {
            name: "title_1".to_string(),
            existing: doc! { "title": -1 },
            requested: doc! { "title": 1 },
        }.into();
        let msg = err.to_string();
        assert!(msg.contains("title_1"));
        assert!(msg.contains("\"title\": -1"));
        assert!(!err.is_connection());
    }

    #[test]
    fn test_config_message() {
        let err = Error::Config("empty database name".to_string());
        assert_eq!(err.to_string(), "config error: empty database name");
    }
}
