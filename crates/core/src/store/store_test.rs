use std::{collections::HashSet, fs, path::Path};

use proptest::prelude::*;
use tempfile::tempdir;

use super::{is_safe_slug, slugify, Author, PromptRecord, RecordStore};

fn write_record(dir: &Path, stem: &str, title: &str, tags: &[&str]) {
    let tags = tags
        .iter()
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(", ");
    let text = format!(
        "[prompt]\ntitle = \"{}\"\ntags = [{}]\ncontent = \"Content for {} that is long enough.\"\n",
        title, tags, title
    );
    fs::write(dir.join(format!("{}.toml", stem)), text).unwrap();
}

#[test]
fn test_missing_directory_yields_nothing() {
    let dir = tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("nope"));

    assert!(store.list_all().is_empty());
    assert!(store.tag_counts().is_empty());
    assert!(store.find_by_title("anything").is_none());
}

#[test]
fn test_list_by_tag_is_case_insensitive() {
    let dir = tempdir().unwrap();
    write_record(dir.path(), "a", "Alpha", &["Rust", "cli"]);
    write_record(dir.path(), "b", "Beta", &["rust"]);
    write_record(dir.path(), "c", "Gamma", &["python"]);
    let store = RecordStore::new(dir.path());

    let upper = store.list_by_tag("RUST");
    let lower = store.list_by_tag("rust");

    assert_eq!(upper, lower);
    assert_eq!(
        upper.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
        vec!["Alpha", "Beta"]
    );
}

#[test]
fn test_broken_files_are_skipped() {
    let dir = tempdir().unwrap();
    write_record(dir.path(), "good", "Good", &["x"]);
    fs::write(dir.path().join("bad.toml"), "[prompt\ntitle = ").unwrap();
    fs::write(dir.path().join("empty.toml"), "").unwrap();
    fs::write(dir.path().join("notes.txt"), "not a record").unwrap();
    let store = RecordStore::new(dir.path());

    let all = store.list_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Good");
    assert_eq!(store.tag_counts().get("x"), Some(&1));
}

#[test]
fn test_find_by_title_is_exact_and_first_wins() {
    let dir = tempdir().unwrap();
    write_record(dir.path(), "01-first", "Shared", &["one"]);
    write_record(dir.path(), "02-second", "Shared", &["two"]);
    let store = RecordStore::new(dir.path());

    let found = store.find_by_title("Shared").unwrap();
    assert_eq!(found.slug.as_deref(), Some("01-first"));
    assert!(store.find_by_title("shared").is_none());
}

#[test]
fn test_find_by_slug_tells_duplicate_titles_apart() {
    let dir = tempdir().unwrap();
    write_record(dir.path(), "01-first", "Shared", &["one"]);
    write_record(dir.path(), "02-second", "Shared", &["two"]);
    let store = RecordStore::new(dir.path());

    let second = store.find_by_slug("02-second").unwrap();
    assert_eq!(second.tags, vec!["two".to_string()]);
    assert!(store.find_by_slug("03-missing").is_none());
}

#[test]
fn test_tag_counts_lowercases() {
    let dir = tempdir().unwrap();
    write_record(dir.path(), "a", "A", &["Rust", "CLI"]);
    write_record(dir.path(), "b", "B", &["rust"]);
    let store = RecordStore::new(dir.path());

    let counts = store.tag_counts();
    assert_eq!(counts.get("rust"), Some(&2));
    assert_eq!(counts.get("cli"), Some(&1));
    assert!(counts.get("Rust").is_none());
}

#[test]
fn test_save_writes_a_loadable_file() {
    let dir = tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("records"));

    let mut record = PromptRecord::new("Explain This Code", "Explain the selected code step by step.")
        .with_tags(["explain"])
        .with_author(Author {
            name:  "Ada".into(),
            email: Some("ada@example.com".into()),
            url:   None,
        });
    let path = store.save(&mut record).unwrap();

    assert_eq!(path.file_name().unwrap(), "explain-this-code.toml");
    assert!(record.created_at.is_some());
    assert!(record.updated_at.is_some());

    let loaded = store.find_by_slug("explain-this-code").unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn test_save_without_slug_never_overwrites() {
    let dir = tempdir().unwrap();
    let store = RecordStore::new(dir.path());

    let mut first = PromptRecord::new("Same Title", "first body of content");
    let mut second = PromptRecord::new("Same Title", "second body of content");
    let p1 = store.save(&mut first).unwrap();
    let p2 = store.save(&mut second).unwrap();

    assert_ne!(p1, p2);
    assert_eq!(second.slug.as_deref(), Some("same-title-2"));
    assert_eq!(store.list_all().len(), 2);
}

#[test]
fn test_save_with_slug_replaces_and_keeps_created_at() {
    let dir = tempdir().unwrap();
    let store = RecordStore::new(dir.path());

    let mut record = PromptRecord::new("Versioned", "body of the first version");
    store.save(&mut record).unwrap();
    let created = record.created_at;

    record.content = "body of the second version".into();
    store.save(&mut record).unwrap();

    let all = store.list_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].content, "body of the second version");
    assert_eq!(all[0].created_at, created);
}

#[test]
fn test_unsafe_slug_stays_inside_directory() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("records");
    let store = RecordStore::new(&dir);

    let mut record = PromptRecord::new("Escape", "tries to leave the directory");
    record.slug = Some("../escaped".into());
    let path = store.save(&mut record).unwrap();

    assert_eq!(path, dir.join("escaped.toml"));
    assert_eq!(record.slug.as_deref(), Some("escaped"));
    assert!(!tmp.path().join("escaped.toml").exists());

    write_record(tmp.path(), "outside", "Outside", &[]);
    assert!(store.find_by_slug("../outside").is_none());
}

#[test]
fn test_is_safe_slug() {
    assert!(is_safe_slug("review-code"));
    assert!(is_safe_slug("v1.2"));
    for bad in ["", "../x", "a/b", "a\\b", ".hidden", "a..b"] {
        assert!(!is_safe_slug(bad), "{bad:?}");
    }
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Explain This Code"), "explain-this-code");
    assert_eq!(slugify("  --Hello,   World!--  "), "hello-world");
    assert_eq!(slugify("C++ & Rust"), "c-rust");
    assert_eq!(slugify("日本語"), "");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Counts add up to the number of (record, distinct lower-cased tag)
    /// pairs across all records.
    #[test]
    fn prop_tag_counts_sum_to_tag_pairs(
        records in prop::collection::vec(
            prop::collection::vec("[a-cA-C]{1,2}", 0..4),
            0..8,
        )
    ) {
        let dir = tempdir().unwrap();
        let mut expected = 0;
        for (i, tags) in records.iter().enumerate() {
            let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
            write_record(dir.path(), &format!("r{i}"), &format!("Title {i}"), &tags);
            expected += tags.len();
        }

        let counts = RecordStore::new(dir.path()).tag_counts();
        let total: usize = counts.values().sum();
        prop_assert_eq!(total, expected);

        let distinct: HashSet<String> = records
            .iter()
            .flatten()
            .map(|t| t.to_lowercase())
            .collect();
        prop_assert_eq!(counts.len(), distinct.len());
    }

    #[test]
    fn prop_list_by_tag_ignores_case(tag in "[a-zA-Z]{1,6}") {
        let dir = tempdir().unwrap();
        write_record(dir.path(), "a", "A", &[tag.as_str()]);
        write_record(dir.path(), "b", "B", &["unrelated-tag"]);
        let store = RecordStore::new(dir.path());

        prop_assert_eq!(
            store.list_by_tag(&tag.to_uppercase()),
            store.list_by_tag(&tag.to_lowercase())
        );
        prop_assert_eq!(store.list_by_tag(&tag).len(), 1);
    }
}
