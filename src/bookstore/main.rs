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

//! Runs the bookstore query sequence once against the configured store.
//!
//! Configuration comes from the environment only:
//!
//! * `BOOKSTORE_URI`, `BOOKSTORE_DATABASE`, `BOOKSTORE_COLLECTION`
//! * `BOOKSTORE_SERVER_SELECTION_TIMEOUT_MS`
//! * `BOOKSTORE_CONFIG`, a JSON file with `store` and `params` sections
//! * `BOOKSTORE_OUTPUT=log` to report through the logger instead of stdout
//!
//! `RUST_LOG=bookstore=debug,bookstore_core=debug` shows every filter and count.

mod report;
mod runner;

use std::env;
use std::io;
use std::process::exit;
use anyhow::Context;
use bookstore_core::Config;
use log::error;
use crate::report::{ConsoleReporter, LogReporter};
use crate::runner::BookstoreQueryRunner;

const ENV_OUTPUT: &str = "BOOKSTORE_OUTPUT";

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::load().context("cannot load configuration") {
        Ok(config) => config,
        Err(err) => {
            error!("{:#}", err);
            exit(1);
        }
    };

    // the reporter has already shown the failure
    if run(config).await.is_err() {
        exit(1);
    }
}

async fn run(config: Config) -> bookstore_core::Result<()> {
    match env::var(ENV_OUTPUT).as_deref() {
        Ok("log") => BookstoreQueryRunner::new(config, LogReporter).run().await,
        _ => BookstoreQueryRunner::new(config, ConsoleReporter::new(io::stdout())).run().await,
    }
}
