//! Moving files and folders through the session.

use medfile_core::error::AppError;
use medfile_core::events::{EventPayload, FileEvent};
use medfile_core::types::FolderId;
use medfile_entity::folder::Folder;
use medfile_entity::outcome::FailureReason;

use crate::helpers::Practice;

#[tokio::test]
async fn test_collision_scenario_between_patient_folders() {
    let mut p = Practice::new().await;
    // Leave only report.pdf in Jane's folder.
    p.manager
        .move_files(&[p.blood_test, p.xray], p.admin)
        .await
        .unwrap();
    assert_eq!(p.names_in(p.jane), vec!["report.pdf"]);

    let report = p
        .manager
        .move_files(&[p.jane_report], p.john)
        .await
        .unwrap();

    assert!(report.is_succeeded(&p.jane_report));
    assert_eq!(
        report.renamed.get(&p.jane_report).map(String::as_str),
        Some("report (1).pdf")
    );
    assert!(p.manager.hierarchy().files_in(p.jane).is_empty());
    assert_eq!(
        p.names_in(p.john),
        vec!["consent.pdf", "report (1).pdf", "report.pdf"]
    );
    assert_eq!(p.name_of(p.john_report), "report.pdf");
}

#[tokio::test]
async fn test_renamed_files_remain_retrievable() {
    let mut p = Practice::new().await;

    p.manager
        .move_files(&[p.jane_report], p.john)
        .await
        .unwrap();

    let moved = p.manager.hierarchy().get_file(p.jane_report).unwrap();
    let existing = p.manager.hierarchy().get_file(p.john_report).unwrap();
    assert_eq!(moved.folder_id, p.john);
    assert_ne!(moved.name, existing.name);
}

#[tokio::test]
async fn test_no_op_move_succeeds() {
    let mut p = Practice::new().await;

    let report = p.manager.move_files(&[p.consent], p.john).await.unwrap();

    assert!(report.is_succeeded(&p.consent));
    assert!(report.renamed.is_empty());
    assert_eq!(p.store.mutation_count(), 0);
}

#[tokio::test]
async fn test_files_move_out_of_patient_folder() {
    let mut p = Practice::new().await;

    let report = p
        .manager
        .move_files(&[p.xray, p.blood_test], p.blood_bank)
        .await
        .unwrap();

    assert!(report.is_complete_success());
    assert_eq!(
        p.names_in(p.blood_bank),
        vec!["Blood Donation Form", "Blood Test Results", "chest-xray.png"]
    );
}

#[tokio::test]
async fn test_unknown_destination() {
    let mut p = Practice::new().await;

    let report = p
        .manager
        .move_files(&[p.consent], FolderId::new())
        .await
        .unwrap();

    assert_eq!(report.reason(&p.consent), Some(&FailureReason::InvalidDestination));
    assert_eq!(p.manager.hierarchy().get_file(p.consent).unwrap().folder_id, p.john);
}

#[tokio::test]
async fn test_folder_into_own_descendant_fails_with_cycle() {
    let mut p = Practice::new().await;
    let before = p.manager.hierarchy().clone();

    let report = p
        .manager
        .move_folders(&[p.admin], p.blood_bank)
        .await
        .unwrap();

    assert_eq!(report.reason(&p.admin), Some(&FailureReason::Cycle));
    let after = p.manager.hierarchy();
    assert_eq!(
        after.get_path(p.blood_bank).unwrap(),
        before.get_path(p.blood_bank).unwrap()
    );
    assert_eq!(after.folder_count(), before.folder_count());
    assert_eq!(p.store.mutation_count(), 0);
}

#[tokio::test]
async fn test_patient_folder_cannot_nest_in_patient_folder() {
    let mut p = Practice::new().await;

    let report = p.manager.move_folders(&[p.john], p.jane).await.unwrap();

    assert_eq!(report.reason(&p.john), Some(&FailureReason::NestedPatientFolder));
    assert_eq!(
        p.manager.hierarchy().get_folder(p.john).unwrap().parent_id,
        Some(p.patients)
    );
}

#[tokio::test]
async fn test_subtree_holding_patient_folder_cannot_enter_patient_scope() {
    let mut p = Practice::new().await;

    let report = p.manager.move_folders(&[p.john], p.root).await.unwrap();
    assert!(report.is_succeeded(&p.john));

    let nested = p.manager.move_folders(&[p.patients], p.john).await.unwrap();
    assert_eq!(
        nested.reason(&p.patients),
        Some(&FailureReason::NestedPatientFolder)
    );
    assert_eq!(
        p.manager.hierarchy().get_folder(p.patients).unwrap().parent_id,
        Some(p.root)
    );
}

#[tokio::test]
async fn test_folder_move_carries_subtree() {
    let mut p = Practice::new().await;

    let report = p
        .manager
        .move_folders(&[p.blood_bank], p.patients)
        .await
        .unwrap();

    assert!(report.is_succeeded(&p.blood_bank));
    let path: Vec<String> = p
        .manager
        .hierarchy()
        .get_path(p.blood_bank)
        .unwrap()
        .into_iter()
        .map(|f: &Folder| f.name.clone())
        .collect();
    assert_eq!(path, vec!["Practice", "Patients", "Blood Bank"]);
    assert_eq!(p.names_in(p.blood_bank), vec!["Blood Donation Form"]);
}

#[tokio::test]
async fn test_root_folder_cannot_move() {
    let mut p = Practice::new().await;

    let report = p.manager.move_folders(&[p.root], p.admin).await.unwrap();

    assert_eq!(report.reason(&p.root), Some(&FailureReason::InvalidDestination));
}

#[tokio::test]
async fn test_moved_event_carries_rename() {
    let mut p = Practice::new().await;
    let mut events = p.manager.subscribe();

    p.manager
        .move_files(&[p.jane_report], p.john)
        .await
        .unwrap();

    let event = events.recv().await.unwrap();
    assert!(matches!(
        event.payload,
        EventPayload::File(FileEvent::Moved { file_id, renamed_to: Some(ref name), .. })
            if file_id == p.jane_report && name == "report (1).pdf"
    ));
}

#[tokio::test]
async fn test_failed_items_stay_selected_after_move() {
    let mut p = Practice::new().await;
    p.manager.select_all(&[p.consent, p.invoice]);
    p.store
        .fail_next(p.invoice, AppError::conflict("locked"));

    let report = p
        .manager
        .move_files(&[p.consent, p.invoice], p.jane)
        .await
        .unwrap();

    assert!(report.is_succeeded(&p.consent));
    assert!(!report.is_succeeded(&p.invoice));
    assert!(!p.manager.is_selected(p.consent));
    assert!(p.manager.is_selected(p.invoice));
}
