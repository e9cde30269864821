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

mod common;

use bookstore_core::IndexSpec;
use common::prepare_with_samples;

#[tokio::test]
#[ignore = "needs BOOKSTORE_TEST_URI"]
async fn test_explain_before_and_after_index() {
    let (conn, books) = prepare_with_samples("bookstore-test-explain").await;

    let scan = books.explain_title_query("1984").await.unwrap();
    assert_eq!(scan.returned(), Some(1));
    assert!(!scan.uses_index());
    assert_eq!(scan.docs_examined(), Some(common::sample_books().len() as i64));

    books.ensure_index(&IndexSpec::title()).await.unwrap();

    let indexed = books.explain_title_query("1984").await.unwrap();
    assert_eq!(indexed.returned(), Some(1));
    assert!(indexed.uses_index());
    assert_eq!(indexed.keys_examined(), Some(1));
    assert_eq!(indexed.docs_examined(), Some(1));

    // explain must not touch the data
    assert_eq!(1, books.find_by_title("1984").await.unwrap().len());

    conn.close().await;
}
