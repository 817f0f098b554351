//! Session lifecycle: loading, navigation, pending intents, refresh.

use medfile_core::config::AppConfig;
use medfile_core::error::ErrorKind;
use medfile_core::events::{EventPayload, FileEvent};
use medfile_entity::file::BulkPatch;
use medfile_entity::outcome::FailureReason;
use medfile_service::PendingIntent;

use crate::helpers::Practice;

#[tokio::test]
async fn test_open_loads_whole_hierarchy() {
    let p = Practice::new().await;

    assert_eq!(p.manager.hierarchy().folder_count(), 6);
    assert_eq!(p.manager.hierarchy().file_count(), 7);
    assert_eq!(p.manager.current_folder(), p.root);

    let tree = p.manager.current_tree().unwrap();
    assert_eq!(tree.total_folders(), 6);
    assert_eq!(tree.total_files(), 7);
}

#[tokio::test]
async fn test_breadcrumbs_and_listing() {
    let mut p = Practice::new().await;
    p.manager.navigate(p.jane).unwrap();

    let crumbs: Vec<String> = p
        .manager
        .breadcrumbs()
        .unwrap()
        .into_iter()
        .map(|f| f.name.clone())
        .collect();
    assert_eq!(crumbs, vec!["Practice", "Patients", "Jane Doe"]);

    let listing = p.manager.list_current().unwrap();
    assert!(listing.folders.is_empty());
    assert_eq!(listing.files.len(), 3);
}

#[tokio::test]
async fn test_cancelled_intent_issues_no_calls() {
    let mut p = Practice::new().await;
    p.manager.select_all(&[p.consent, p.invoice]);

    p.manager
        .stage_bulk_edit(BulkPatch::new().confidential(true))
        .unwrap();
    assert!(matches!(
        p.manager.pending(),
        Some(PendingIntent::BulkEdit { file_ids, .. }) if file_ids.len() == 2
    ));

    let discarded = p.manager.cancel_pending();
    assert!(discarded.is_some());
    assert!(p.manager.pending().is_none());
    assert_eq!(p.store.mutation_count(), 0);
    assert_eq!(p.manager.selection().len(), 2);
    assert!(!p.manager.hierarchy().get_file(p.consent).unwrap().confidential);
}

#[tokio::test]
async fn test_confirmed_move_intent() {
    let mut p = Practice::new().await;
    p.manager.select_all(&[p.jane_report]);
    p.manager.stage_move(p.john).unwrap();

    let report = p.manager.confirm_pending().await.unwrap();

    assert_eq!(
        report.renamed.get(&p.jane_report).map(String::as_str),
        Some("report (1).pdf")
    );
    assert!(p.manager.selection().is_empty());
    assert!(p.manager.pending().is_none());
}

#[tokio::test]
async fn test_staging_requires_selection_and_single_intent() {
    let mut p = Practice::new().await;

    let err = p.manager.stage_move(p.admin).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    p.manager.toggle(p.consent);
    p.manager.stage_move(p.admin).unwrap();
    let err = p
        .manager
        .stage_bulk_edit(BulkPatch::new().description("x"))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    p.manager.cancel_pending();
    let err = p.manager.confirm_pending().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_intent_captures_selection_at_staging() {
    let mut p = Practice::new().await;
    p.manager.select_all(&[p.consent]);
    p.manager
        .stage_bulk_edit(BulkPatch::new().add_tags(["signed"]))
        .unwrap();
    p.manager.toggle(p.invoice);

    let report = p.manager.confirm_pending().await.unwrap();

    assert_eq!(report.len(), 1);
    assert!(report.is_succeeded(&p.consent));
    assert!(p.manager.is_selected(p.invoice));
}

#[tokio::test]
async fn test_refresh_file_picks_up_remote_change() {
    let mut p = Practice::new().await;
    let mut remote = p.store.peek_file(p.invoice).unwrap();
    remote.description = "Paid".to_string();
    remote.folder_id = p.blood_bank;
    p.store.put_file(remote);

    let refreshed = p.manager.refresh_file(p.invoice).await.unwrap().cloned();

    assert_eq!(refreshed.map(|f| f.description), Some("Paid".to_string()));
    assert!(p.names_in(p.admin).is_empty());
    assert_eq!(p.names_in(p.blood_bank).len(), 2);
}

#[tokio::test]
async fn test_refresh_file_evicts_deleted_file() {
    let mut p = Practice::new().await;
    let mut events = p.manager.subscribe();
    p.manager.toggle(p.invoice);
    p.store.remove_file(p.invoice);

    let refreshed = p.manager.refresh_file(p.invoice).await.unwrap();

    assert!(refreshed.is_none());
    assert!(!p.manager.hierarchy().contains_file(p.invoice));
    assert!(!p.manager.is_selected(p.invoice));
    let event = events.recv().await.unwrap();
    assert!(matches!(
        event.payload,
        EventPayload::File(FileEvent::Evicted { file_id }) if file_id == p.invoice
    ));
}

#[tokio::test]
async fn test_configured_taxonomy_drives_validation() {
    let config = AppConfig::from_toml_str(
        r#"
        [[taxonomy.categories]]
        key = "lab"
        label = "Lab"

        [[taxonomy.categories]]
        key = "billing"
        label = "Billing"

        [engine]
        max_in_flight = 1
        "#,
    )
    .unwrap();
    let mut p = Practice::with_config(config).await;

    let report = p
        .manager
        .apply_bulk_patch(&[p.invoice], &BulkPatch::new().category("billing"))
        .await
        .unwrap();
    assert!(report.is_succeeded(&p.invoice));

    let rejected = p
        .manager
        .apply_bulk_patch(&[p.consent], &BulkPatch::new().category("admin"))
        .await
        .unwrap();
    assert_eq!(rejected.reason(&p.consent), Some(&FailureReason::Validation));
}

#[tokio::test]
async fn test_open_fails_when_store_offline() {
    let p = Practice::new().await;
    p.store.set_online(false);

    let err = medfile_service::FileManager::open(
        std::sync::Arc::new(p.store.clone()),
        p.root,
        &AppConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(err.is_connectivity_loss());
    assert_eq!(err.message, "Document store is not reachable");
}
