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

//! Presentation of step outcomes. The runner never prints; it hands each
//! outcome to a [`Reporter`].

use std::io::Write;
use bookstore_core::{Error, IndexOutcome, WriteOutcome};
use log::{debug, error, info};
use serde_json::Value;
use crate::runner::StepOutcome;

pub(crate) trait Reporter {

    fn step(&mut self, outcome: &StepOutcome);

    fn failed(&mut self, err: &Error);

    fn closed(&mut self);

}

fn write_status(outcome: WriteOutcome) -> &'static str {
    match outcome {
        WriteOutcome::Applied => "Success",
        WriteOutcome::NotFound => "Not found",
    }
}

/// One line describing the outcome.
pub(crate) fn summary(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Connected { uri } => format!("Connected to {}", uri),
        StepOutcome::Books { step, criteria, books } => {
            format!("Found {} {} {}", books.len(), step, criteria)
        }
        StepOutcome::Write { step, title, outcome } => {
            format!("{} \"{}\": {}", capitalize(step.label()), title, write_status(*outcome))
        }
        StepOutcome::GenreAverages(rows) => {
            format!("Average price by genre: {} genres", rows.len())
        }
        StepOutcome::TopAuthor(top) => match top {
            Some(top) => format!(
                "Author with the most books: {} ({})",
                top.author.as_deref().unwrap_or("<no author>"),
                top.count,
            ),
            None => "Author with the most books: none".to_string(),
        },
        StepOutcome::Decades(rows) => {
            format!("Books by decade: {} decades", rows.len())
        }
        StepOutcome::Index { step, outcome } => match outcome {
            IndexOutcome::Created(name) => format!("Created {} ({})", step, name),
            IndexOutcome::AlreadyPresent(name) => format!("Kept existing {} ({})", step, name),
        },
        StepOutcome::Plan { title, report } => format!(
            "Execution stats for title \"{}\": returned {}, examined {} docs and {} keys, index used: {}",
            title,
            opt_count(report.returned()),
            opt_count(report.docs_examined()),
            opt_count(report.keys_examined()),
            if report.uses_index() { "yes" } else { "no" },
        ),
    }
}

fn opt_count(value: Option<i64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "?".to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The documents or rows behind the summary, if the step produced any.
pub(crate) fn payload(outcome: &StepOutcome) -> Option<serde_json::Result<Value>> {
    match outcome {
        StepOutcome::Books { books, .. } => Some(serde_json::to_value(books)),
        StepOutcome::GenreAverages(rows) => Some(serde_json::to_value(rows)),
        StepOutcome::TopAuthor(top) => Some(serde_json::to_value(top)),
        StepOutcome::Decades(rows) => Some(serde_json::to_value(rows)),
        StepOutcome::Plan { report, .. } => Some(serde_json::to_value(report.stats())),
        StepOutcome::Connected { .. } | StepOutcome::Write { .. } | StepOutcome::Index { .. } => None,
    }
}

/// Human-readable lines with pretty-printed payloads.
pub(crate) struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {

    pub(crate) fn new(out: W) -> Self {
        ConsoleReporter { out }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{}", text) {
            debug!("console write failed: {}", err);
        }
    }

}

impl<W: Write> Reporter for ConsoleReporter<W> {

    fn step(&mut self, outcome: &StepOutcome) {
        self.line(&summary(outcome));
        match payload(outcome) {
            Some(Ok(value)) => {
                let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
                self.line(&text);
            }
            Some(Err(err)) => self.line(&format!("<cannot render payload: {}>", err)),
            None => (),
        }
    }

    fn failed(&mut self, err: &Error) {
        self.line(&format!("Error: {}", err));
    }

    fn closed(&mut self) {
        self.line("Connection closed");
    }

}

/// One `info` record per step, payloads at `debug`.
pub(crate) struct LogReporter;

impl Reporter for LogReporter {

    fn step(&mut self, outcome: &StepOutcome) {
        info!("{}", summary(outcome));
        if let Some(Ok(value)) = payload(outcome) {
            debug!("{}: {}", outcome.step(), value);
        }
    }

    fn failed(&mut self, err: &Error) {
        error!("{}", err);
    }

    fn closed(&mut self) {
        info!("connection closed");
    }

}

#[cfg(test)]
mod tests {
    use bookstore_core::{AuthorCount, Book, Error, IndexOutcome, WriteOutcome};
    use crate::report::{payload, summary, ConsoleReporter, Reporter};
    use crate::runner::{Step, StepOutcome};

    #[test]
    fn test_write_summaries() {
        let applied = StepOutcome::Write {
            step: Step::UpdatePrice,
            title: "1984".to_string(),
            outcome: WriteOutcome::Applied,
        };
        assert_eq!(summary(&applied), "Update price \"1984\": Success");

        let missing = StepOutcome::Write {
            step: Step::DeleteBook,
            title: "Brave New World".to_string(),
            outcome: WriteOutcome::NotFound,
        };
        assert_eq!(summary(&missing), "Delete book \"Brave New World\": Not found");
        assert!(payload(&missing).is_none());
    }

    #[test]
    fn test_books_summary_and_payload() {
        let outcome = StepOutcome::Books {
            step: Step::BooksInGenre,
            criteria: "\"Dystopian\"".to_string(),
            books: vec![Book::new("1984", "George Orwell", "Dystopian", 1949, 15.0)],
        };
        assert_eq!(summary(&outcome), "Found 1 books in genre \"Dystopian\"");

        let value = payload(&outcome).unwrap().unwrap();
        assert_eq!(value[0]["title"], "1984");
        assert_eq!(value[0]["published_year"], 1949);
        assert!(value[0].get("_id").is_none());
    }

    #[test]
    fn test_top_author_summary() {
        let outcome = StepOutcome::TopAuthor(Some(AuthorCount {
            author: Some("George Orwell".to_string()),
            count: 3,
        }));
        assert_eq!(summary(&outcome), "Author with the most books: George Orwell (3)");
        assert_eq!(summary(&StepOutcome::TopAuthor(None)), "Author with the most books: none");
    }

    #[test]
    fn test_console_reporter_order() {
        let mut reporter = ConsoleReporter::new(Vec::<u8>::new());
        reporter.step(&StepOutcome::Connected {
            uri: "mongodb://localhost:27017".to_string(),
        });
        reporter.step(&StepOutcome::Index {
            step: Step::TitleIndex,
            outcome: IndexOutcome::Created("title_1".to_string()),
        });
        reporter.failed(&Error::MalformedReply("executionStats"));
        reporter.closed();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            "Connected to mongodb://localhost:27017",
            "Created index on title (title_1)",
            "Error: malformed reply, missing 'executionStats'",
            "Connection closed",
        ]);
    }
}
