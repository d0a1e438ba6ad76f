//! End-to-end session tests: load real files from disk, explore them,
//! and generate queries through the public facade.

use querytutor::{Error, Session};
use std::io::Write;
use tempfile::NamedTempFile;

fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const BOOKS_CSV: &str = "\
title,author,price,stock
Dune,Herbert,12.5,30
Hyperion,Simmons,9.0,12
Emma,Austen,7.25,40
Persuasion,Austen,8.0,5
";

const PHONES_JSON: &str = r#"[
    { "brand": "Nokia", "price": "199", "specs": { "ram": 6, "rating": "4.1" } },
    { "brand": "Sony", "price": "349", "specs": { "ram": 8, "rating": "4.4" } }
]"#;

#[test]
fn test_load_csv_and_explore() {
    let file = temp_file(".csv", BOOKS_CSV);
    let mut session = Session::with_seed(1);
    let name = session.load(file.path()).unwrap();

    let summary = session.explore(&name).unwrap();
    assert!(summary.starts_with(&format!("Exploring table: {}", name)));
    assert!(summary.contains("Columns: title, author, price, stock"));
    assert!(summary.contains("\"title\":\"Dune\""));
    // Numeric-looking cells are normalized on load.
    assert!(summary.contains("\"stock\":30"));
}

#[test]
fn test_load_json_and_explore_nested_attributes() {
    let file = temp_file(".json", PHONES_JSON);
    let mut session = Session::with_seed(1);
    let name = session.load(file.path()).unwrap();

    let summary = session.explore(&name).unwrap();
    assert!(summary.starts_with(&format!("Exploring collection: {}", name)));
    assert!(summary.contains("specs.ram"));
    assert!(summary.contains("specs.rating"));
    assert!(summary.contains("brand"));
}

#[test]
fn test_load_rejects_unknown_extension() {
    let file = temp_file(".parquet", "not really");
    let mut session = Session::new();
    assert!(matches!(
        session.load(file.path()),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_extension_dispatch_is_case_insensitive() {
    let file = temp_file(".CSV", BOOKS_CSV);
    let mut session = Session::with_seed(1);
    let name = session.load(file.path()).unwrap();
    assert!(session.store().table(&name).is_some());
}

#[test]
fn test_sample_queries_from_loaded_csv_all_have_outputs() {
    let file = temp_file(".csv", BOOKS_CSV);
    let mut session = Session::with_seed(9);
    let name = session.load(file.path()).unwrap();

    let results = session.sample_queries(&name);
    assert!(!results.is_empty());
    for result in &results {
        assert!(result.output.is_some(), "no output for: {}", result.query);
        assert!(!result.description.is_empty());
    }
}

#[test]
fn test_sample_queries_from_loaded_json_all_have_outputs() {
    let file = temp_file(".json", PHONES_JSON);
    let mut session = Session::with_seed(9);
    let name = session.load(file.path()).unwrap();

    let results = session.sample_queries(&name);
    assert!(!results.is_empty());
    for result in &results {
        assert!(result.output.is_some(), "no output for: {}", result.query);
    }
}

#[test]
fn test_construct_routing_follows_dataset_backend() {
    let csv = temp_file(".csv", BOOKS_CSV);
    let json = temp_file(".json", PHONES_JSON);
    let mut session = Session::with_seed(2);
    let table = session.load(csv.path()).unwrap();
    let collection = session.load(json.path()).unwrap();

    // "group" is a document-side alias and means nothing relationally.
    assert!(matches!(
        session.queries_by_construct(&table, "group"),
        Err(Error::UnknownConstruct(_))
    ));
    let batch = session.queries_by_construct(&collection, "group").unwrap();
    assert_eq!(batch.len(), 1);
    assert!(batch[0].query.contains("$group"));

    // "group by" is the relational spelling.
    let batch = session.queries_by_construct(&table, "group by").unwrap();
    assert_eq!(batch.len(), 1);
    assert!(batch[0].query.contains("GROUP BY"));
}

#[test]
fn test_unloaded_dataset_yields_explanatory_result() {
    let mut session = Session::with_seed(2);
    let batch = session.queries_by_construct("ghost", "where").unwrap();
    assert_eq!(batch.len(), 1);
    assert!(batch[0].output.is_none());
    assert!(batch[0].query.starts_with("Error:"));
}

#[test]
fn test_seeded_sessions_agree() {
    let csv = temp_file(".csv", BOOKS_CSV);

    let mut first = Session::with_seed(123);
    let mut second = Session::with_seed(123);
    let name_a = first.load(csv.path()).unwrap();
    let name_b = second.load(csv.path()).unwrap();
    assert_eq!(name_a, name_b);

    assert_eq!(first.sample_queries(&name_a), second.sample_queries(&name_b));
}
