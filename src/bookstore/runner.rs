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

use std::fmt;
use bookstore_core::{
    AuthorCount, Book, BookCollection, Config, DecadeCount, ExecutionReport, GenreAveragePrice,
    IndexOutcome, IndexSpec, Result, StoreConnection, WriteOutcome,
};
use log::debug;
use crate::report::Reporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Connect,
    BooksInGenre,
    BooksPublishedAfter,
    BooksByAuthor,
    UpdatePrice,
    DeleteBook,
    AveragePriceByGenre,
    TopAuthor,
    BooksByDecade,
    TitleIndex,
    AuthorYearIndex,
    ExplainTitleQuery,
}

impl Step {

    #[cfg(test)]
    pub(crate) const ALL: [Step; 12] = [
        Step::Connect,
        Step::BooksInGenre,
        Step::BooksPublishedAfter,
        Step::BooksByAuthor,
        Step::UpdatePrice,
        Step::DeleteBook,
        Step::AveragePriceByGenre,
        Step::TopAuthor,
        Step::BooksByDecade,
        Step::TitleIndex,
        Step::AuthorYearIndex,
        Step::ExplainTitleQuery,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Step::Connect => "connect",
            Step::BooksInGenre => "books in genre",
            Step::BooksPublishedAfter => "books published after",
            Step::BooksByAuthor => "books by author",
            Step::UpdatePrice => "update price",
            Step::DeleteBook => "delete book",
            Step::AveragePriceByGenre => "average price by genre",
            Step::TopAuthor => "author with the most books",
            Step::BooksByDecade => "books by decade",
            Step::TitleIndex => "index on title",
            Step::AuthorYearIndex => "index on author and published year",
            Step::ExplainTitleQuery => "execution stats",
        }
    }

}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The structured result of one step, handed to a [`Reporter`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StepOutcome {
    Connected {
        uri: String,
    },
    Books {
        step: Step,
        criteria: String,
        books: Vec<Book>,
    },
    Write {
        step: Step,
        title: String,
        outcome: WriteOutcome,
    },
    GenreAverages(Vec<GenreAveragePrice>),
    TopAuthor(Option<AuthorCount>),
    Decades(Vec<DecadeCount>),
    Index {
        step: Step,
        outcome: IndexOutcome,
    },
    Plan {
        title: String,
        report: ExecutionReport,
    },
}

impl StepOutcome {

    pub(crate) fn step(&self) -> Step {
        match self {
            StepOutcome::Connected { .. } => Step::Connect,
            StepOutcome::Books { step, .. } => *step,
            StepOutcome::Write { step, .. } => *step,
            StepOutcome::GenreAverages(_) => Step::AveragePriceByGenre,
            StepOutcome::TopAuthor(_) => Step::TopAuthor,
            StepOutcome::Decades(_) => Step::BooksByDecade,
            StepOutcome::Index { step, .. } => *step,
            StepOutcome::Plan { .. } => Step::ExplainTitleQuery,
        }
    }

}

/// Connects, runs the eleven operations in order, then disconnects.
///
/// The first failing operation ends the run. The failure is handed to the
/// reporter once, and every run ends with a closure notice, including a
/// run whose connect failed.
pub(crate) struct BookstoreQueryRunner<R: Reporter> {
    config: Config,
    reporter: R,
}

impl<R: Reporter> BookstoreQueryRunner<R> {

    pub(crate) fn new(config: Config, reporter: R) -> Self {
        BookstoreQueryRunner {
            config,
            reporter,
        }
    }

    #[cfg(test)]
    pub(crate) fn reporter(&self) -> &R {
        &self.reporter
    }

    pub(crate) async fn run(&mut self) -> Result<()> {
        let conn = match StoreConnection::connect(&self.config.store).await {
            Ok(conn) => conn,
            Err(err) => {
                debug!("connect failed, nothing to close");
                self.reporter.failed(&err);
                self.reporter.closed();
                return Err(err);
            }
        };
        self.reporter.step(&StepOutcome::Connected {
            uri: conn.uri().to_string(),
        });

        let result = self.run_operations(&conn.books()).await;
        if let Err(err) = &result {
            self.reporter.failed(err);
        }

        conn.close().await;
        self.reporter.closed();
        result
    }

    fn emit(&mut self, outcome: StepOutcome) {
        debug!("step done: {}", outcome.step());
        self.reporter.step(&outcome);
    }

    async fn run_operations(&mut self, books: &BookCollection) -> Result<()> {
        let params = self.config.params.clone();

        let found = books.find_by_genre(&params.genre).await?;
        self.emit(StepOutcome::Books {
            step: Step::BooksInGenre,
            criteria: format!("\"{}\"", params.genre),
            books: found,
        });

        let found = books.find_published_after(params.published_after).await?;
        self.emit(StepOutcome::Books {
            step: Step::BooksPublishedAfter,
            criteria: params.published_after.to_string(),
            books: found,
        });

        let found = books.find_by_author(&params.author).await?;
        self.emit(StepOutcome::Books {
            step: Step::BooksByAuthor,
            criteria: params.author.clone(),
            books: found,
        });

        let outcome = books.update_price(&params.update_title, params.new_price).await?;
        self.emit(StepOutcome::Write {
            step: Step::UpdatePrice,
            title: params.update_title.clone(),
            outcome,
        });

        let outcome = books.delete_by_title(&params.delete_title).await?;
        self.emit(StepOutcome::Write {
            step: Step::DeleteBook,
            title: params.delete_title.clone(),
            outcome,
        });

        let rows = books.average_price_by_genre().await?;
        self.emit(StepOutcome::GenreAverages(rows));

        let top = books.top_author().await?;
        self.emit(StepOutcome::TopAuthor(top));

        let rows = books.count_by_decade().await?;
        self.emit(StepOutcome::Decades(rows));

        let outcome = books.ensure_index(&IndexSpec::title()).await?;
        self.emit(StepOutcome::Index {
            step: Step::TitleIndex,
            outcome,
        });

        let outcome = books.ensure_index(&IndexSpec::author_year()).await?;
        self.emit(StepOutcome::Index {
            step: Step::AuthorYearIndex,
            outcome,
        });

        let report = books.explain_title_query(&params.explain_title).await?;
        self.emit(StepOutcome::Plan {
            title: params.explain_title.clone(),
            report,
        });

        Ok(())
    }

}
