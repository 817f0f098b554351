//! Selection behavior across navigation and committed operations.

use medfile_entity::file::BulkPatch;
use medfile_service::SearchFilters;

use crate::helpers::Practice;

#[tokio::test]
async fn test_selection_survives_navigation() {
    let mut p = Practice::new().await;
    let picked = [p.jane_report, p.blood_test, p.xray];

    p.manager.navigate(p.jane).unwrap();
    p.manager.select_all(&picked);
    p.manager.navigate(p.admin).unwrap();
    p.manager.navigate(p.blood_bank).unwrap();

    assert_eq!(p.manager.selection().ids(), &picked);
}

#[tokio::test]
async fn test_selection_cleared_after_bulk_patch() {
    let mut p = Practice::new().await;
    let picked = [p.jane_report, p.blood_test, p.xray];
    p.manager.select_all(&picked);
    p.manager.navigate(p.john).unwrap();

    let report = p
        .manager
        .apply_bulk_patch(&picked, &BulkPatch::new().add_tags(["q1-review"]))
        .await
        .unwrap();

    assert!(report.is_complete_success());
    assert!(p.manager.selection().is_empty());
}

#[tokio::test]
async fn test_successful_patch_clears_selection_beyond_batch() {
    let mut p = Practice::new().await;
    p.manager.select_all(&[p.jane_report, p.blood_test, p.xray, p.invoice]);

    let report = p
        .manager
        .apply_bulk_patch(
            &[p.jane_report, p.blood_test, p.xray],
            &BulkPatch::new().confidential(true),
        )
        .await
        .unwrap();

    assert!(report.is_complete_success());
    assert!(!report.is_succeeded(&p.invoice));
    assert!(p.manager.selection().is_empty());
}

#[tokio::test]
async fn test_selection_across_search_results() {
    let mut p = Practice::new().await;
    let hits: Vec<_> = p
        .manager
        .query("report", &SearchFilters::new())
        .unwrap()
        .iter()
        .filter_map(|e| e.as_file().map(|f| f.id))
        .collect();
    assert_eq!(hits.len(), 2);

    p.manager.select_all(&hits);
    p.manager.navigate(p.blood_bank).unwrap();

    assert!(p.manager.is_selected(p.jane_report));
    assert!(p.manager.is_selected(p.john_report));
}

#[tokio::test]
async fn test_toggle_and_clear() {
    let mut p = Practice::new().await;

    assert!(p.manager.toggle(p.consent));
    assert!(p.manager.is_selected(p.consent));
    assert!(!p.manager.toggle(p.consent));
    assert!(!p.manager.is_selected(p.consent));

    p.manager.select_all(&[p.consent, p.invoice, p.consent]);
    assert_eq!(p.manager.selection().len(), 2);
    p.manager.clear_selection();
    assert!(p.manager.selection().is_empty());
}

#[tokio::test]
async fn test_select_visible_adds_current_folder_files() {
    let mut p = Practice::new().await;
    p.manager.toggle(p.invoice);
    p.manager.navigate(p.jane).unwrap();

    let added = p.manager.select_visible();

    assert_eq!(added, 3);
    assert_eq!(p.manager.selection().len(), 4);
    assert!(p.manager.is_selected(p.invoice));
}

#[tokio::test]
async fn test_navigate_to_unknown_folder_keeps_state() {
    let mut p = Practice::new().await;
    p.manager.navigate(p.jane).unwrap();
    p.manager.toggle(p.xray);

    assert!(p.manager.navigate(medfile_core::types::FolderId::new()).is_err());
    assert_eq!(p.manager.current_folder(), p.jane);
    assert!(p.manager.is_selected(p.xray));
}
