//! Search and filter queries through the session.

use medfile_core::error::ErrorKind;
use medfile_core::types::{SortKey, SortOrder};
use medfile_entity::file::BulkPatch;
use medfile_service::{Entry, EntryKind, SearchFilters};

use crate::helpers::Practice;

fn names(entries: &[Entry<'_>]) -> Vec<String> {
    entries.iter().map(|e| e.name().to_string()).collect()
}

#[tokio::test]
async fn test_blood_lab_scenario() {
    let p = Practice::new().await;

    let hits = p
        .manager
        .query("blood", &SearchFilters::new().category("lab"))
        .unwrap();

    assert_eq!(names(&hits), vec!["Blood Test Results"]);
    assert_eq!(hits[0].as_file().map(|f| f.id), Some(p.blood_test));
}

#[tokio::test]
async fn test_term_alone_matches_folders_and_files() {
    let p = Practice::new().await;

    let hits = p.manager.query("Blood", &SearchFilters::new()).unwrap();

    assert_eq!(
        names(&hits),
        vec!["Blood Bank", "Blood Donation Form", "Blood Test Results"]
    );
    assert_eq!(hits[0].kind(), EntryKind::Folders);
}

#[tokio::test]
async fn test_query_is_restartable_and_live() {
    let mut p = Practice::new().await;
    let filters = SearchFilters::new().tag("reviewed");

    assert!(p.manager.query("", &filters).unwrap().is_empty());

    p.manager
        .apply_bulk_patch(&[p.consent], &BulkPatch::new().add_tags(["reviewed"]))
        .await
        .unwrap();

    let first = names(&p.manager.query("", &filters).unwrap());
    let second = names(&p.manager.query("", &filters).unwrap());
    assert_eq!(first, vec!["consent.pdf"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_results_follow_moves() {
    let mut p = Practice::new().await;

    p.manager
        .move_files(&[p.jane_report], p.john)
        .await
        .unwrap();

    let within_john = p
        .manager
        .query("report", &SearchFilters::new().within(p.john))
        .unwrap();
    assert_eq!(names(&within_john), vec!["report (1).pdf", "report.pdf"]);
}

#[tokio::test]
async fn test_patient_scope_and_kind() {
    let p = Practice::new().await;

    let folders = p
        .manager
        .query("", &SearchFilters::new().patient_only().kind(EntryKind::Folders))
        .unwrap();
    assert_eq!(names(&folders), vec!["Jane Doe", "John Roe"]);

    let files = p
        .manager
        .query("", &SearchFilters::new().patient_only())
        .unwrap();
    assert_eq!(files.iter().filter(|e| e.kind() == EntryKind::Files).count(), 5);
}

#[tokio::test]
async fn test_sorting_by_update_time() {
    let mut p = Practice::new().await;
    p.manager
        .apply_bulk_patch(&[p.consent], &BulkPatch::new().description("signed"))
        .await
        .unwrap();

    let hits = p
        .manager
        .query(
            "",
            &SearchFilters::new()
                .kind(EntryKind::Files)
                .sort(SortOrder::desc(SortKey::UpdatedAt)),
        )
        .unwrap();

    assert_eq!(hits[0].as_file().map(|f| f.id), Some(p.consent));
}

#[tokio::test]
async fn test_confidential_filter() {
    let p = Practice::new().await;

    let hits = p
        .manager
        .query("", &SearchFilters::new().confidential(true))
        .unwrap();

    assert_eq!(names(&hits), vec!["chest-xray.png"]);
}

#[tokio::test]
async fn test_unknown_category_filter_rejected() {
    let p = Practice::new().await;

    let err = p
        .manager
        .query("", &SearchFilters::new().category("unknown"))
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
}
