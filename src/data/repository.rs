//! Repository: everything a data distribution loads to, linked and
//! verified. Built from a [`DataIndex`]; unaware of how the files got on
//! disk. One game system is required, catalogs are layered over it.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::data::catalog::Catalog;
use crate::data::game_system::GameSystem;
use crate::data::index::{DataIndex, PackageKind};
use crate::data::links::EntryHandle;
use crate::data::registry::{Linker, Registry};
use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

pub struct Repository {
    pub index: DataIndex,
    pub game_system: Arc<GameSystem>,
    pub catalogs: Vec<Arc<Catalog>>,
    system_registry: Arc<Registry>,
    catalog_registries: Vec<Arc<Registry>>,
}

impl Repository {
    /// Load every file the index declares, build per-package registries
    /// and verify all catalog links. Fails without a game system entry.
    pub fn from_index(index: DataIndex) -> Result<Repository, DataError> {
        let mut game_system = None;
        let mut catalogs = Vec::new();

        for entry in &index.entries {
            let path = index.path_of(entry);
            let element = Element::from_file(&path)?;
            match entry.kind {
                PackageKind::GameSystem => {
                    game_system = Some(Arc::new(GameSystem::from_xml(&element)?));
                }
                PackageKind::Catalog => {
                    catalogs.push(Arc::new(Catalog::from_xml(&element)?));
                }
            }
            debug!(file = %path.display(), kind = entry.kind.as_str(), "loaded package file");
        }

        let game_system = game_system.ok_or(DataError::MissingGameSystem)?;
        let system_registry = Arc::new(Registry::from_game_system(&game_system));
        let catalog_registries: Vec<Arc<Registry>> = catalogs
            .iter()
            .map(|catalog| Arc::new(Registry::from_catalog(catalog)))
            .collect();

        let repository = Repository {
            index,
            game_system,
            catalogs,
            system_registry,
            catalog_registries,
        };

        for catalog in &repository.catalogs {
            repository.linker_for(catalog)?.verify_catalog(catalog)?;
        }

        Ok(repository)
    }

    pub fn from_file(path: &Path) -> Result<Repository, DataError> {
        Repository::from_index(DataIndex::from_file(path)?)
    }

    pub fn find_catalog(&self, id: &Identifier) -> Option<&Arc<Catalog>> {
        self.catalogs.iter().find(|catalog| &catalog.id == id)
    }

    /// Linker scoped for one catalog: its own pool first, imported
    /// catalogs next, the game system last.
    pub fn linker_for(&self, catalog: &Catalog) -> Result<Linker, DataError> {
        let mut linker = Linker::new();
        let position = self
            .catalogs
            .iter()
            .position(|c| c.id == catalog.id)
            .ok_or_else(|| DataError::DanglingReference {
                kind: "catalogue",
                id: catalog.id.clone(),
            })?;
        linker.push_scope(Arc::clone(&self.catalog_registries[position]));
        for import in &catalog.catalog_links {
            let imported = self
                .catalogs
                .iter()
                .position(|c| c.id == import.target_id)
                .ok_or_else(|| DataError::DanglingReference {
                    kind: "catalogue",
                    id: import.target_id.clone(),
                })?;
            linker.push_scope(Arc::clone(&self.catalog_registries[imported]));
        }
        linker.push_scope(Arc::clone(&self.system_registry));
        Ok(linker)
    }

    /// Root pick in a catalog by either side of its link: the link id
    /// first, the shared target id as fallback.
    pub fn find_entry(
        &self,
        catalog: &Catalog,
        id: &Identifier,
    ) -> Result<Option<EntryHandle>, DataError> {
        let linker = self.linker_for(catalog)?;
        let roots = linker.root_entries(catalog)?;
        if let Some(handle) = roots.iter().find(|handle| handle.id() == id) {
            return Ok(Some(handle.clone()));
        }
        Ok(roots.into_iter().find(|handle| handle.definition_id() == id))
    }
}
