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
use log::debug;
use serde::Serialize;
use crate::bson_utils::get_i64;
use crate::collection::{title_filter, BookCollection};
use crate::errors::{Error, Result};

const INDEX_SCAN_STAGE: &str = "IXSCAN";

/// The `executionStats` of an explained query, plus the winning plan when
/// the server reported one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionReport {
    stats: Document,
    winning_plan: Option<Document>,
}

impl ExecutionReport {

    pub fn from_reply(reply: &Document) -> Result<ExecutionReport> {
        let stats = reply.get_document("executionStats")
            .map_err(|_| Error::MalformedReply("executionStats"))?
            .clone();

        let winning_plan = reply.get_document("queryPlanner")
            .and_then(|planner| planner.get_document("winningPlan"))
            .ok()
            .map(|plan| {
                // slot based engines nest the classic plan one level down
                plan.get_document("queryPlan").unwrap_or(plan).clone()
            });

        Ok(ExecutionReport {
            stats,
            winning_plan,
        })
    }

    #[inline]
    pub fn stats(&self) -> &Document {
        &self.stats
    }

    pub fn returned(&self) -> Option<i64> {
        get_i64(&self.stats, "nReturned")
    }

    pub fn docs_examined(&self) -> Option<i64> {
        get_i64(&self.stats, "totalDocsExamined")
    }

    pub fn keys_examined(&self) -> Option<i64> {
        get_i64(&self.stats, "totalKeysExamined")
    }

    pub fn execution_millis(&self) -> Option<i64> {
        get_i64(&self.stats, "executionTimeMillis")
    }

    /// Stage names from the root of the winning plan down its `inputStage`
    /// chain, e.g. `["FETCH", "IXSCAN"]`.
    pub fn plan_stages(&self) -> Vec<String> {
        let mut stages = vec![];
        let mut current = self.winning_plan.as_ref();
        while let Some(stage) = current {
            if let Ok(name) = stage.get_str("stage") {
                stages.push(name.to_string());
            }
            current = stage.get_document("inputStage").ok();
        }
        stages
    }

    pub fn uses_index(&self) -> bool {
        self.plan_stages().iter().any(|stage| stage == INDEX_SCAN_STAGE)
    }

}

impl BookCollection {

    /// Explains `{ title }` with `executionStats` verbosity. The query runs
    /// on the server but no documents come back.
    pub async fn explain_title_query(&self, title: &str) -> Result<ExecutionReport> {
        let command = doc! {
            "explain": {
                "find": self.name(),
                "filter": title_filter(title),
            },
            "verbosity": "executionStats",
        };
        debug!("explain: {}", command);
        let reply = self.database().run_command(command)
            .await
            .map_err(Error::operation("explain"))?;
        ExecutionReport::from_reply(&reply)
    }

}
