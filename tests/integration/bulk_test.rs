//! Bulk metadata edits through the session.

use std::collections::BTreeSet;

use medfile_core::error::{AppError, ErrorKind};
use medfile_core::events::{EventPayload, FileEvent};
use medfile_core::types::{FileId, PrincipalId};
use medfile_entity::file::{BulkPatch, SharedWithUpdate};
use medfile_entity::outcome::FailureReason;

use crate::helpers::Practice;

#[tokio::test]
async fn test_empty_patch_leaves_files_unchanged() {
    let mut p = Practice::new().await;
    let ids = [p.jane_report, p.xray, p.consent];
    let before: Vec<_> = ids
        .iter()
        .map(|id| p.manager.hierarchy().get_file(*id).cloned())
        .collect();

    let report = p
        .manager
        .apply_bulk_patch(&ids, &BulkPatch::new())
        .await
        .unwrap();

    assert_eq!(report.succeeded.len(), 3);
    let after: Vec<_> = ids
        .iter()
        .map(|id| p.manager.hierarchy().get_file(*id).cloned())
        .collect();
    assert_eq!(before, after);
    assert_eq!(p.store.mutation_count(), 0);
}

#[tokio::test]
async fn test_tags_to_add_is_idempotent() {
    let mut p = Practice::new().await;
    let ids = [p.jane_report, p.consent];
    let patch = BulkPatch::new().add_tags(["reviewed", "blood"]);

    p.manager.apply_bulk_patch(&ids, &patch).await.unwrap();
    let once: Vec<BTreeSet<String>> = ids
        .iter()
        .map(|id| p.manager.hierarchy().get_file(*id).unwrap().tags.clone())
        .collect();

    p.manager.apply_bulk_patch(&ids, &patch).await.unwrap();
    let twice: Vec<BTreeSet<String>> = ids
        .iter()
        .map(|id| p.manager.hierarchy().get_file(*id).unwrap().tags.clone())
        .collect();

    assert_eq!(once, twice);
    assert!(once.iter().all(|tags| tags.contains("reviewed") && tags.contains("blood")));
}

#[tokio::test]
async fn test_absent_fields_are_kept() {
    let mut p = Practice::new().await;
    let patch = BulkPatch::new().category("clinical-notes");

    p.manager
        .apply_bulk_patch(&[p.xray, p.consent], &patch)
        .await
        .unwrap();

    let xray = p.manager.hierarchy().get_file(p.xray).unwrap();
    assert_eq!(xray.category, "clinical-notes");
    assert!(xray.confidential);
    let consent = p.manager.hierarchy().get_file(p.consent).unwrap();
    assert!(!consent.confidential);
    assert_eq!(consent.category, "clinical-notes");
}

#[tokio::test]
async fn test_partial_success_is_reported_per_file() {
    let mut p = Practice::new().await;
    let ghost = FileId::new();
    p.store
        .fail_next(p.invoice, AppError::conflict("record locked by billing"));

    let report = p
        .manager
        .apply_bulk_patch(
            &[p.jane_report, ghost, p.invoice],
            &BulkPatch::new().description("Reviewed 2025-03"),
        )
        .await
        .unwrap();

    assert!(report.is_succeeded(&p.jane_report));
    assert_eq!(report.reason(&ghost), Some(&FailureReason::NotFound));
    assert_eq!(report.reason(&p.invoice).map(|r| r.code()), Some("store-rejected"));
    assert_eq!(report.len(), 3);
}

#[tokio::test]
async fn test_updated_at_refreshed_only_for_succeeded() {
    let mut p = Practice::new().await;
    let before_report = p.manager.hierarchy().get_file(p.jane_report).unwrap().updated_at;
    let before_consent = p.manager.hierarchy().get_file(p.consent).unwrap().updated_at;
    p.store.fail_next(p.consent, AppError::conflict("locked"));

    p.manager
        .apply_bulk_patch(&[p.jane_report, p.consent], &BulkPatch::new().confidential(true))
        .await
        .unwrap();

    assert!(p.manager.hierarchy().get_file(p.jane_report).unwrap().updated_at >= before_report);
    assert_eq!(
        p.manager.hierarchy().get_file(p.consent).unwrap().updated_at,
        before_consent
    );
}

#[tokio::test]
async fn test_unknown_category_is_validation_failure() {
    let mut p = Practice::new().await;

    let report = p
        .manager
        .apply_bulk_patch(&[p.jane_report, p.consent], &BulkPatch::new().category("misc"))
        .await
        .unwrap();

    assert_eq!(report.reason(&p.jane_report), Some(&FailureReason::Validation));
    assert_eq!(report.reason(&p.consent), Some(&FailureReason::Validation));
    assert_eq!(p.store.mutation_count(), 0);
}

#[tokio::test]
async fn test_share_list_replace_and_clear() {
    let mut p = Practice::new().await;
    let nurse = PrincipalId::new();

    p.manager
        .apply_bulk_patch(
            &[p.xray],
            &BulkPatch::new().shared_with(SharedWithUpdate::Replace(BTreeSet::from([nurse]))),
        )
        .await
        .unwrap();
    assert!(p.manager.hierarchy().get_file(p.xray).unwrap().shared_with.contains(&nurse));

    p.manager
        .apply_bulk_patch(&[p.xray], &BulkPatch::new().shared_with(SharedWithUpdate::Clear))
        .await
        .unwrap();
    assert!(p.manager.hierarchy().get_file(p.xray).unwrap().shared_with.is_empty());
    assert!(p.store.peek_file(p.xray).unwrap().shared_with.is_empty());
}

#[tokio::test]
async fn test_connectivity_loss_is_single_fatal_error() {
    let mut p = Practice::new().await;
    p.manager.select_all(&[p.jane_report, p.consent]);
    p.store.set_online(false);

    let err = p
        .manager
        .apply_bulk_patch(&[p.jane_report, p.consent], &BulkPatch::new().confidential(true))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    assert_eq!(p.manager.selection().len(), 2);
}

#[tokio::test]
async fn test_patched_event_published() {
    let mut p = Practice::new().await;
    let mut events = p.manager.subscribe();

    p.manager
        .apply_bulk_patch(&[p.consent], &BulkPatch::new().add_tags(["signed"]))
        .await
        .unwrap();

    let event = events.recv().await.unwrap();
    match event.payload {
        EventPayload::File(FileEvent::Patched {
            file_id,
            changed_fields,
        }) => {
            assert_eq!(file_id, p.consent);
            assert_eq!(changed_fields, vec!["tags".to_string()]);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_vanished_file_is_evicted_and_deselected() {
    let mut p = Practice::new().await;
    p.manager.select_all(&[p.consent, p.invoice]);
    p.store.remove_file(p.consent);

    let report = p
        .manager
        .apply_bulk_patch(&[p.consent, p.invoice], &BulkPatch::new().description("x"))
        .await
        .unwrap();

    assert_eq!(report.reason(&p.consent), Some(&FailureReason::NotFound));
    assert!(!p.manager.hierarchy().contains_file(p.consent));
    assert!(!p.manager.is_selected(p.consent));
    assert!(p.manager.selection().is_empty());
}
