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
use std::time::Duration;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::errors::{Error, Result};

pub const ENV_CONFIG_FILE: &str = "BOOKSTORE_CONFIG";
pub const ENV_URI: &str = "BOOKSTORE_URI";
pub const ENV_DATABASE: &str = "BOOKSTORE_DATABASE";
pub const ENV_COLLECTION: &str = "BOOKSTORE_COLLECTION";
pub const ENV_SERVER_SELECTION_TIMEOUT_MS: &str = "BOOKSTORE_SERVER_SELECTION_TIMEOUT_MS";

/// Where the books live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub app_name: Option<String>,
    /// Passed through to the driver. `None` keeps the driver default.
    pub server_selection_timeout_ms: Option<u64>,
}

impl StoreConfig {

    pub fn server_selection_timeout(&self) -> Option<Duration> {
        self.server_selection_timeout_ms.map(Duration::from_millis)
    }

}

impl Default for StoreConfig {

    fn default() -> Self {
        StoreConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "plp_bookstore".to_string(),
            collection: "books".to_string(),
            app_name: Some("bookstore".to_string()),
            server_selection_timeout_ms: None,
        }
    }

}

/// The literal values each step queries with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    pub genre: String,
    pub published_after: i32,
    pub author: String,
    pub update_title: String,
    pub new_price: f64,
    pub delete_title: String,
    pub explain_title: String,
}

impl Default for QueryParams {

    fn default() -> Self {
        QueryParams {
            genre: "Dystopian".to_string(),
            published_after: 2000,
            author: "George Orwell".to_string(),
            update_title: "1984".to_string(),
            new_price: 19.99,
            delete_title: "Brave New World".to_string(),
            explain_title: "1984".to_string(),
        }
    }

}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub params: QueryParams,
}

impl Config {

    /// Defaults, then the JSON file named by `BOOKSTORE_CONFIG`, then
    /// the `BOOKSTORE_*` store overrides.
    pub fn load() -> Result<Config> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_FILE) {
            Some(path) => {
                debug!("reading config file: {}", path);
                let content = std::fs::read_to_string(&path)?;
                Config::from_json_str(&content)?
            }
            None => Config::default(),
        };

        if let Some(uri) = lookup(ENV_URI) {
            config.store.uri = uri;
        }
        if let Some(database) = lookup(ENV_DATABASE) {
            config.store.database = database;
        }
        if let Some(collection) = lookup(ENV_COLLECTION) {
            config.store.collection = collection;
        }
        if let Some(timeout) = lookup(ENV_SERVER_SELECTION_TIMEOUT_MS) {
            let ms = timeout.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("{} is not a number of milliseconds: '{}'", ENV_SERVER_SELECTION_TIMEOUT_MS, timeout))
            })?;
            config.store.server_selection_timeout_ms = Some(ms);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Config> {
        let config = serde_json::from_str::<Config>(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.uri.trim().is_empty() {
            return Err(Error::Config("store uri is empty".to_string()));
        }
        if self.store.database.trim().is_empty() {
            return Err(Error::Config("database name is empty".to_string()));
        }
        if self.store.collection.trim().is_empty() {
            return Err(Error::Config("collection name is empty".to_string()));
        }
        Ok(())
    }

}
