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

use bson::doc;
use log::{debug, info};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use crate::collection::BookCollection;
use crate::config::StoreConfig;
use crate::errors::{Error, Result};

/// One client to the store, opened by [`StoreConnection::connect`] and
/// released by [`StoreConnection::close`].
///
/// The handle is passed explicitly to whoever runs operations; there is no
/// process-wide client.
pub struct StoreConnection {
    client: Client,
    database: Database,
    collection_name: String,
    uri: String,
}

impl StoreConnection {

    /// Parses the URI, builds the client and pings the database so an
    /// unreachable store fails here and not on the first query.
    pub async fn connect(config: &StoreConfig) -> Result<StoreConnection> {
        let connection_error = |source| Error::Connection {
            uri: config.uri.clone(),
            source,
        };

        let mut options = ClientOptions::parse(config.uri.as_str()).await.map_err(connection_error)?;
        if let Some(app_name) = &config.app_name {
            options.app_name = Some(app_name.clone());
        }
        if let Some(timeout) = config.server_selection_timeout() {
            options.server_selection_timeout = Some(timeout);
        }

        let client = Client::with_options(options).map_err(connection_error)?;
        let database = client.database(&config.database);

        debug!("ping {} on {}", config.database, config.uri);
        if let Err(source) = database.run_command(doc! { "ping": 1 }).await {
            // the client may already hold monitors and pooled sockets
            client.shutdown().await;
            return Err(connection_error(source));
        }
        info!("connected to {}", config.uri);

        Ok(StoreConnection {
            client,
            database,
            collection_name: config.collection.clone(),
            uri: config.uri.clone(),
        })
    }

    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[inline]
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn books(&self) -> BookCollection {
        BookCollection::new(self.database.clone(), &self.collection_name)
    }

    /// Consumes the handle, so it can only be released once.
    pub async fn close(self) {
        self.client.shutdown().await;
        info!("connection to {} closed", self.uri);
    }

}

#[cfg(test)]
mod tests {
    use crate::config::StoreConfig;
    use crate::connection::StoreConnection;

    #[tokio::test]
    async fn test_invalid_uri() {
        let config = StoreConfig {
            uri: "not-a-mongodb-uri".to_string(),
            ..StoreConfig::default()
        };
        let err = StoreConnection::connect(&config).await.err().unwrap();
        assert!(err.is_connection());
        assert!(err.to_string().contains("not-a-mongodb-uri"));
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let config = StoreConfig {
            uri: "mongodb://127.0.0.1:1".to_string(),
            server_selection_timeout_ms: Some(200),
            ..StoreConfig::default()
        };
        let err = StoreConnection::connect(&config).await.err().unwrap();
        assert!(err.is_connection());
    }
}
