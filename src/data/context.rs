use std::path::Path;

use anyhow::{Context, Result};

use super::loader::load_file;
use super::model::{Catalog, ClientCatalog};

/// Both datasets, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DataContext {
    pub catalog: Catalog,
    pub clients: ClientCatalog,
}

impl DataContext {
    /// Load the catalog and the client catalog. Any failure is fatal.
    pub fn load(catalog_path: &Path, clients_path: &Path) -> Result<Self> {
        let catalog = Catalog::from_records(load_file(catalog_path).context("wine catalog")?);
        let clients =
            ClientCatalog::from_records(load_file(clients_path).context("client catalog")?);

        if catalog.is_empty() {
            log::warn!("{} holds no wine", catalog_path.display());
        }
        if clients.is_empty() {
            log::warn!("{} holds no client bottle", clients_path.display());
        }
        log::info!(
            "Catalog: {} wines, {} countries, {} varieties; {} client bottles",
            catalog.len(),
            catalog.countries().len(),
            catalog.varieties().len(),
            clients.len()
        );
        Ok(DataContext { catalog, clients })
    }
}
