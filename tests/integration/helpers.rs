//! Shared fixture for integration tests.

use std::sync::Arc;

use medfile_core::config::AppConfig;
use medfile_core::types::{FileId, FolderId};
use medfile_docstore::{MemoryDocumentStore, Snapshot};
use medfile_entity::file::File;
use medfile_entity::folder::Folder;
use medfile_service::FileManager;

/// A small practice hierarchy:
///
/// ```text
/// Practice/
/// ├── Administration/
/// │   ├── Blood Bank/           Blood Donation Form (admin)
/// │   └── invoice.pdf (invoice)
/// └── Patients/
///     ├── Jane Doe/ [patient]   report.pdf, Blood Test Results, chest-xray.png
///     └── John Roe/ [patient]   report.pdf, consent.pdf
/// ```
pub struct Practice {
    /// The backing store, for inspection and fault injection.
    pub store: MemoryDocumentStore,
    /// The session under test.
    pub manager: FileManager,
    pub root: FolderId,
    pub patients: FolderId,
    pub jane: FolderId,
    pub john: FolderId,
    pub admin: FolderId,
    pub blood_bank: FolderId,
    pub jane_report: FileId,
    pub blood_test: FileId,
    pub xray: FileId,
    pub john_report: FileId,
    pub consent: FileId,
    pub donation: FileId,
    pub invoice: FileId,
}

impl Practice {
    /// Build the fixture and open a session over it.
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// Build the fixture with a specific configuration.
    pub async fn with_config(config: AppConfig) -> Self {
        let root = Folder::root("Practice");
        let patients = Folder::new(root.id, "Patients");
        let jane = Folder::patient(patients.id, "Jane Doe");
        let john = Folder::patient(patients.id, "John Roe");
        let admin = Folder::new(root.id, "Administration");
        let blood_bank = Folder::new(admin.id, "Blood Bank");

        let jane_report = File::new(jane.id, "report.pdf", "lab").with_tags(["blood"]);
        let blood_test = File::new(jane.id, "Blood Test Results", "lab").with_tags(["blood"]);
        let xray = File::new(jane.id, "chest-xray.png", "imaging").with_confidential(true);
        let john_report = File::new(john.id, "report.pdf", "lab");
        let consent = File::new(john.id, "consent.pdf", "consent");
        let donation = File::new(blood_bank.id, "Blood Donation Form", "admin");
        let invoice = File::new(admin.id, "invoice.pdf", "invoice");

        let ids = (
            root.id,
            patients.id,
            jane.id,
            john.id,
            admin.id,
            blood_bank.id,
        );
        let file_ids = (
            jane_report.id,
            blood_test.id,
            xray.id,
            john_report.id,
            consent.id,
            donation.id,
            invoice.id,
        );

        let store = MemoryDocumentStore::from_snapshot(Snapshot {
            root_id: root.id,
            folders: vec![root, patients, jane, john, admin, blood_bank],
            files: vec![
                jane_report,
                blood_test,
                xray,
                john_report,
                consent,
                donation,
                invoice,
            ],
        })
        .expect("valid snapshot");

        let manager = FileManager::open(Arc::new(store.clone()), ids.0, &config)
            .await
            .expect("hierarchy loads");

        Self {
            store,
            manager,
            root: ids.0,
            patients: ids.1,
            jane: ids.2,
            john: ids.3,
            admin: ids.4,
            blood_bank: ids.5,
            jane_report: file_ids.0,
            blood_test: file_ids.1,
            xray: file_ids.2,
            john_report: file_ids.3,
            consent: file_ids.4,
            donation: file_ids.5,
            invoice: file_ids.6,
        }
    }

    /// Name of a file as the session sees it.
    pub fn name_of(&self, id: FileId) -> String {
        self.manager
            .hierarchy()
            .get_file(id)
            .map(|f| f.name.clone())
            .expect("file exists")
    }

    /// Names of the files directly in a folder, sorted.
    pub fn names_in(&self, folder: FolderId) -> Vec<String> {
        self.manager
            .hierarchy()
            .files_in(folder)
            .into_iter()
            .map(|f| f.name.clone())
            .collect()
    }
}
