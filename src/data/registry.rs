//! Shared-definition registry and link resolution. Each package (game
//! system or catalog) gets one `Registry` of id-to-definition pools,
//! built once after parsing; a `Linker` stacks registries in lookup
//! order (catalog first, then the game system underneath) and turns link
//! nodes into resolved handles.
//!
//! Registering the same id twice within one registry is a programming
//! error and panics; package files guarantee id uniqueness and the
//! loader builds each registry exactly once.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::data::catalog::Catalog;
use crate::data::category::{CategoryEntry, CategoryLink};
use crate::data::entry::SelectionEntry;
use crate::data::game_system::GameSystem;
use crate::data::group::SelectionEntryGroup;
use crate::data::info::{InfoGroup, InfoLink, InfoLinkKind, InfoTarget, Rule};
use crate::data::links::{EntryHandle, EntryLink, GroupHandle, LinkKind};
use crate::data::profile::Profile;
use crate::error::DataError;
use crate::ident::Identifier;

fn register<T>(pool: &mut HashMap<Identifier, Arc<T>>, kind: &str, id: &Identifier, value: &Arc<T>) {
    if pool.insert(id.clone(), Arc::clone(value)).is_some() {
        panic!("duplicate {kind} id {id} registered in one package");
    }
}

/// Id-to-definition pools for one package.
#[derive(Debug, Default)]
pub struct Registry {
    selection_entries: HashMap<Identifier, Arc<SelectionEntry>>,
    selection_entry_groups: HashMap<Identifier, Arc<SelectionEntryGroup>>,
    category_entries: HashMap<Identifier, Arc<CategoryEntry>>,
    profiles: HashMap<Identifier, Arc<Profile>>,
    rules: HashMap<Identifier, Arc<Rule>>,
    info_groups: HashMap<Identifier, Arc<InfoGroup>>,
}

impl Registry {
    pub fn from_game_system(system: &GameSystem) -> Registry {
        let mut registry = Registry::default();
        for category in &system.category_entries {
            register(
                &mut registry.category_entries,
                "category entry",
                &category.id,
                category,
            );
        }
        for entry in &system.shared_selection_entries {
            registry.register_entry_tree(entry);
        }
        for group in &system.shared_selection_entry_groups {
            registry.register_group_tree(group);
        }
        for profile in &system.shared_profiles {
            register(&mut registry.profiles, "profile", &profile.id, profile);
        }
        for rule in &system.shared_rules {
            register(&mut registry.rules, "rule", &rule.id, rule);
        }
        for group in &system.shared_info_groups {
            register(&mut registry.info_groups, "info group", &group.id, group);
        }
        debug!(
            package = %system.name,
            entries = registry.selection_entries.len(),
            groups = registry.selection_entry_groups.len(),
            categories = registry.category_entries.len(),
            "registered game system definitions"
        );
        registry
    }

    pub fn from_catalog(catalog: &Catalog) -> Registry {
        let mut registry = Registry::default();
        for category in &catalog.category_entries {
            register(
                &mut registry.category_entries,
                "category entry",
                &category.id,
                category,
            );
        }
        for entry in &catalog.shared_selection_entries {
            registry.register_entry_tree(entry);
        }
        for group in &catalog.shared_selection_entry_groups {
            registry.register_group_tree(group);
        }
        for profile in &catalog.shared_profiles {
            register(&mut registry.profiles, "profile", &profile.id, profile);
        }
        for rule in catalog.rules.iter().chain(catalog.shared_rules.iter()) {
            register(&mut registry.rules, "rule", &rule.id, rule);
        }
        for group in &catalog.shared_info_groups {
            register(&mut registry.info_groups, "info group", &group.id, group);
        }
        debug!(
            package = %catalog.name,
            entries = registry.selection_entries.len(),
            groups = registry.selection_entry_groups.len(),
            categories = registry.category_entries.len(),
            "registered catalog definitions"
        );
        registry
    }

    /// Links may target entries nested inside a shared subtree, so
    /// registration descends through child entries and groups.
    fn register_entry_tree(&mut self, entry: &Arc<SelectionEntry>) {
        register(
            &mut self.selection_entries,
            "selection entry",
            &entry.id,
            entry,
        );
        for child in &entry.selection_entries {
            self.register_entry_tree(child);
        }
        for group in &entry.selection_entry_groups {
            self.register_group_tree(group);
        }
    }

    fn register_group_tree(&mut self, group: &Arc<SelectionEntryGroup>) {
        register(
            &mut self.selection_entry_groups,
            "selection entry group",
            &group.id,
            group,
        );
        for child in &group.selection_entries {
            self.register_entry_tree(child);
        }
        for nested in &group.selection_entry_groups {
            self.register_group_tree(nested);
        }
    }
}

/// A resolved category link: link plus target, reads through to the target.
#[derive(Debug, Clone)]
pub struct CategoryRef {
    pub link: CategoryLink,
    pub target: Arc<CategoryEntry>,
}

impl CategoryRef {
    pub fn name(&self) -> &str {
        &self.target.name
    }

    pub fn primary(&self) -> bool {
        self.link.primary
    }
}

/// A resolved info link.
#[derive(Debug, Clone)]
pub struct InfoRef {
    pub link: InfoLink,
    pub target: InfoTarget,
}

/// What an entry link resolves to, by its declared kind.
#[derive(Debug, Clone)]
pub enum ResolvedLink {
    Entry(EntryHandle),
    Group(GroupHandle),
}

/// Ordered stack of package registries. Lookup walks scopes in push
/// order, so the loader pushes the catalog before the game system.
#[derive(Debug, Default)]
pub struct Linker {
    scopes: Vec<Arc<Registry>>,
}

impl Linker {
    pub fn new() -> Linker {
        Linker { scopes: Vec::new() }
    }

    pub fn push_scope(&mut self, registry: Arc<Registry>) {
        self.scopes.push(registry);
    }

    fn lookup<'a, T>(
        &'a self,
        pool: impl Fn(&'a Registry) -> &'a HashMap<Identifier, Arc<T>>,
        id: &Identifier,
    ) -> Option<&'a Arc<T>> {
        self.scopes.iter().find_map(|scope| pool(scope).get(id))
    }

    /// Resolve an entry link to the handle matching its declared kind. A
    /// missing target, or a target registered under the other kind, is a
    /// dangling reference.
    pub fn resolve_entry_link(&self, link: &Arc<EntryLink>) -> Result<ResolvedLink, DataError> {
        match link.kind {
            LinkKind::SelectionEntry => self
                .lookup(|r| &r.selection_entries, &link.target_id)
                .map(|target| {
                    ResolvedLink::Entry(EntryHandle::Linked {
                        link: Arc::clone(link),
                        target: Arc::clone(target),
                    })
                }),
            LinkKind::SelectionEntryGroup => self
                .lookup(|r| &r.selection_entry_groups, &link.target_id)
                .map(|target| {
                    ResolvedLink::Group(GroupHandle::Linked {
                        link: Arc::clone(link),
                        target: Arc::clone(target),
                    })
                }),
        }
        .ok_or_else(|| DataError::DanglingReference {
            kind: link.kind.as_str(),
            id: link.target_id.clone(),
        })
    }

    pub fn resolve_category_link(&self, link: &CategoryLink) -> Result<CategoryRef, DataError> {
        self.lookup(|r| &r.category_entries, &link.target_id)
            .map(|target| CategoryRef {
                link: link.clone(),
                target: Arc::clone(target),
            })
            .ok_or_else(|| DataError::DanglingReference {
                kind: "category",
                id: link.target_id.clone(),
            })
    }

    pub fn resolve_info_link(&self, link: &InfoLink) -> Result<InfoRef, DataError> {
        let target = match link.kind {
            InfoLinkKind::Profile => self
                .lookup(|r| &r.profiles, &link.target_id)
                .map(|t| InfoTarget::Profile(Arc::clone(t))),
            InfoLinkKind::Rule => self
                .lookup(|r| &r.rules, &link.target_id)
                .map(|t| InfoTarget::Rule(Arc::clone(t))),
            InfoLinkKind::InfoGroup => self
                .lookup(|r| &r.info_groups, &link.target_id)
                .map(|t| InfoTarget::Group(Arc::clone(t))),
        };
        target
            .map(|target| InfoRef {
                link: link.clone(),
                target,
            })
            .ok_or_else(|| DataError::DanglingReference {
                kind: link.kind.as_str(),
                id: link.target_id.clone(),
            })
    }

    /// Children of an entry as handles: owned children first, then the
    /// entry's links resolved in declaration order.
    pub fn entry_children(
        &self,
        handle: &EntryHandle,
    ) -> Result<(Vec<EntryHandle>, Vec<GroupHandle>), DataError> {
        let entry = handle.entry();
        self.resolve_children(
            &entry.selection_entries,
            &entry.selection_entry_groups,
            &entry.entry_links,
        )
    }

    pub fn group_children(
        &self,
        handle: &GroupHandle,
    ) -> Result<(Vec<EntryHandle>, Vec<GroupHandle>), DataError> {
        let group = handle.group();
        self.resolve_children(
            &group.selection_entries,
            &group.selection_entry_groups,
            &group.entry_links,
        )
    }

    fn resolve_children(
        &self,
        entries: &[Arc<SelectionEntry>],
        groups: &[Arc<SelectionEntryGroup>],
        links: &[Arc<EntryLink>],
    ) -> Result<(Vec<EntryHandle>, Vec<GroupHandle>), DataError> {
        let mut entry_handles: Vec<EntryHandle> = entries
            .iter()
            .map(|e| EntryHandle::Direct(Arc::clone(e)))
            .collect();
        let mut group_handles: Vec<GroupHandle> = groups
            .iter()
            .map(|g| GroupHandle::Direct(Arc::clone(g)))
            .collect();
        for link in links {
            match self.resolve_entry_link(link)? {
                ResolvedLink::Entry(handle) => entry_handles.push(handle),
                ResolvedLink::Group(handle) => group_handles.push(handle),
            }
        }
        Ok((entry_handles, group_handles))
    }

    /// Walk every link reachable from a catalog's root entry links and
    /// fail on the first dangling one. Run once after all scopes are
    /// pushed so later instantiation cannot hit resolution errors.
    pub fn verify_catalog(&self, catalog: &Catalog) -> Result<(), DataError> {
        for link in &catalog.entry_links {
            match self.resolve_entry_link(link)? {
                ResolvedLink::Entry(handle) => self.verify_entry(&handle)?,
                ResolvedLink::Group(handle) => self.verify_group(&handle)?,
            }
        }
        debug!(catalog = %catalog.name, "verified catalog links");
        Ok(())
    }

    fn verify_entry(&self, handle: &EntryHandle) -> Result<(), DataError> {
        for link in handle.category_links() {
            self.resolve_category_link(link)?;
        }
        let (entries, groups) = self.entry_children(handle)?;
        for child in &entries {
            self.verify_entry(child)?;
        }
        for group in &groups {
            self.verify_group(group)?;
        }
        Ok(())
    }

    fn verify_group(&self, handle: &GroupHandle) -> Result<(), DataError> {
        let (entries, groups) = self.group_children(handle)?;
        for child in &entries {
            self.verify_entry(child)?;
        }
        for group in &groups {
            self.verify_group(group)?;
        }
        Ok(())
    }

    /// Root-level picks a catalog offers: its entry links resolved, in
    /// declaration order.
    pub fn root_entries(&self, catalog: &Catalog) -> Result<Vec<EntryHandle>, DataError> {
        let mut handles = Vec::new();
        for link in &catalog.entry_links {
            if let ResolvedLink::Entry(handle) = self.resolve_entry_link(link)? {
                handles.push(handle);
            }
        }
        Ok(handles)
    }

    /// First root entry whose link id or definition id matches, the way a
    /// caller holding an id from either side of a link expects.
    pub fn find_root_entry(
        &self,
        catalog: &Catalog,
        id: &Identifier,
    ) -> Result<Option<EntryHandle>, DataError> {
        Ok(self
            .root_entries(catalog)?
            .into_iter()
            .find(|handle| handle.matches(id)))
    }
}
