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

use bson::{Bson, Document};
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::error::ErrorKind;
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use serde::Serialize;
use crate::bson_utils::same_key_pattern;
use crate::collection::BookCollection;
use crate::errors::{Error, IndexConflictStruct, Result};
use crate::model::{FIELD_AUTHOR, FIELD_PUBLISHED_YEAR, FIELD_TITLE};

const NAMESPACE_NOT_FOUND: i32 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexDirection {
    Ascending,
    Descending,
}

impl IndexDirection {

    #[inline]
    pub fn as_i32(&self) -> i32 {
        match self {
            IndexDirection::Ascending => 1,
            IndexDirection::Descending => -1,
        }
    }

}

/// The key pattern of an index, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSpec {
    keys: Vec<(String, IndexDirection)>,
}

impl IndexSpec {

    pub fn new(keys: &[(&str, IndexDirection)]) -> IndexSpec {
        IndexSpec {
            keys: keys.iter()
                .map(|(field, direction)| (field.to_string(), *direction))
                .collect(),
        }
    }

    pub fn title() -> IndexSpec {
        IndexSpec::new(&[(FIELD_TITLE, IndexDirection::Ascending)])
    }

    pub fn author_year() -> IndexSpec {
        IndexSpec::new(&[
            (FIELD_AUTHOR, IndexDirection::Ascending),
            (FIELD_PUBLISHED_YEAR, IndexDirection::Descending),
        ])
    }

    /// Same naming the server uses when none is given: `author_1_published_year_-1`.
    pub fn name(&self) -> String {
        self.keys.iter()
            .map(|(field, direction)| format!("{}_{}", field, direction.as_i32()))
            .collect::<Vec<String>>()
            .join("_")
    }

    pub fn keys_document(&self) -> Document {
        let mut doc = Document::new();
        for (field, direction) in &self.keys {
            doc.insert(field.clone(), Bson::Int32(direction.as_i32()));
        }
        doc
    }

    #[inline]
    pub fn is_compound(&self) -> bool {
        self.keys.len() > 1
    }

}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IndexOutcome {
    Created(String),
    /// An index with the same key pattern exists, possibly under another name.
    AlreadyPresent(String),
}

impl IndexOutcome {

    pub fn name(&self) -> &str {
        match self {
            IndexOutcome::Created(name) => name,
            IndexOutcome::AlreadyPresent(name) => name,
        }
    }

}

/// What to do with `spec` given the indexes already on the collection.
pub(crate) fn resolve_existing(spec: &IndexSpec, existing: &[IndexModel]) -> Result<Option<IndexOutcome>> {
    let requested = spec.keys_document();
    let name = spec.name();

    for model in existing {
        let existing_name = model.options.as_ref().and_then(|o| o.name.clone());
        if same_key_pattern(&model.keys, &requested) {
            return Ok(Some(IndexOutcome::AlreadyPresent(existing_name.unwrap_or(name))));
        }
        if existing_name.as_deref() == Some(name.as_str()) {
            return Err(IndexConflictStruct {
                name,
                existing: model.keys.clone(),
                requested,
            }.into());
        }
    }

    Ok(None)
}

impl BookCollection {

    pub async fn list_indexes(&self) -> Result<Vec<IndexModel>> {
        let cursor = match self.raw().list_indexes().await {
            Ok(cursor) => cursor,
            Err(err) => {
                if matches!(*err.kind, ErrorKind::Command(ref cmd) if cmd.code == NAMESPACE_NOT_FOUND) {
                    debug!("collection {} does not exist yet, no indexes", self.name());
                    return Ok(vec![]);
                }
                return Err(Error::Operation { op: "list indexes", source: err });
            }
        };
        cursor.try_collect::<Vec<IndexModel>>()
            .await
            .map_err(Error::operation("list indexes"))
    }

    /// Creates the index unless one with the same key pattern exists.
    ///
    /// An index that already holds the requested name with a different key
    /// pattern is reported as [`Error::IndexConflict`] and left alone.
    pub async fn ensure_index(&self, spec: &IndexSpec) -> Result<IndexOutcome> {
        let existing = self.list_indexes().await?;
        if let Some(outcome) = resolve_existing(spec, &existing)? {
            debug!("index {} already present on {}", outcome.name(), self.name());
            return Ok(outcome);
        }

        let mut options = IndexOptions::default();
        options.name = Some(spec.name());
        let model = IndexModel::builder()
            .keys(spec.keys_document())
            .options(options)
            .build();

        let result = self.raw().create_index(model)
            .await
            .map_err(Error::operation("create index"))?;
        info!("created index {} on {}", result.index_name, self.name());
        Ok(IndexOutcome::Created(result.index_name))
    }

}

#[cfg(test)]
mod tests {
    use bson::doc;
    use mongodb::options::IndexOptions;
    use mongodb::IndexModel;
    use crate::errors::Error;
    use crate::index::{resolve_existing, IndexDirection, IndexOutcome, IndexSpec};

    fn model(keys: bson::Document, name: &str) -> IndexModel {
        let mut options = IndexOptions::default();
        options.name = Some(name.to_string());
        IndexModel::builder()
            .keys(keys)
            .options(options)
            .build()
    }

    #[test]
    fn test_spec_names() {
        assert_eq!(IndexSpec::title().name(), "title_1");
        assert_eq!(IndexSpec::author_year().name(), "author_1_published_year_-1");
        assert!(IndexSpec::author_year().is_compound());
        assert!(!IndexSpec::title().is_compound());
    }

    #[test]
    fn test_keys_document_keeps_order() {
        assert_eq!(
            IndexSpec::author_year().keys_document(),
            doc! { "author": 1, "published_year": -1 },
        );
        let spec = IndexSpec::new(&[("price", IndexDirection::Descending)]);
        assert_eq!(spec.keys_document(), doc! { "price": -1 });
    }

    #[test]
    fn test_resolve_missing() {
        let existing = vec![model(doc! { "_id": 1 }, "_id_")];
        let outcome = resolve_existing(&IndexSpec::title(), &existing).unwrap();
        assert_eq!(outcome, None);
    }

    #[test]
    fn test_resolve_present_under_other_name() {
        let existing = vec![
            model(doc! { "_id": 1 }, "_id_"),
            model(doc! { "author": 1i64, "published_year": -1i64 }, "by_author"),
        ];
        let outcome = resolve_existing(&IndexSpec::author_year(), &existing).unwrap();
        assert_eq!(outcome, Some(IndexOutcome::AlreadyPresent("by_author".to_string())));
    }

    #[test]
    fn test_resolve_conflicting_name() {
        let existing = vec![model(doc! { "title": -1 }, "title_1")];
        let err = resolve_existing(&IndexSpec::title(), &existing).unwrap_err();
        assert!(matches!(err, Error::IndexConflict(_)));
    }

    #[test]
    fn test_opposite_direction_is_not_present() {
        let existing = vec![model(doc! { "title": -1 }, "title_-1")];
        let outcome = resolve_existing(&IndexSpec::title(), &existing).unwrap();
        assert_eq!(outcome, None);
    }
}
