use std::sync::Arc;

use crate::config::Settings;
use crate::ingest::ArchiveIngestor;
use crate::project::ProjectRepository;
use crate::storage::FsStorage;

/// Shared state handed to every request handler
pub struct AppState {
    pub settings: Arc<Settings>,
    pub storage: Arc<FsStorage>,
    pub repository: ProjectRepository<FsStorage>,
    pub ingestor: ArchiveIngestor<FsStorage>,
}

impl AppState {
    pub fn new(settings: Arc<Settings>) -> Self {
        let storage = Arc::new(FsStorage::new(&settings.docs_dir));
        let repository = ProjectRepository::new(Arc::clone(&storage), Arc::clone(&settings));
        let ingestor = ArchiveIngestor::new(repository.clone());
        Self {
            settings,
            storage,
            repository,
            ingestor,
        }
    }
}
