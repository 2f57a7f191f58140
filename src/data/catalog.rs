//! Catalog root: a faction package layered over a game system. Root entry
//! links name what the faction can field; the shared pools hold the
//! definitions those links resolve to.

use std::sync::Arc;

use crate::data::category::CategoryEntry;
use crate::data::entry::SelectionEntry;
use crate::data::group::SelectionEntryGroup;
use crate::data::info::{InfoGroup, Publication, Rule};
use crate::data::links::EntryLink;
use crate::data::profile::{Profile, ProfileType};
use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

/// An import of another catalog's shared pools.
#[derive(Debug, Clone)]
pub struct CatalogLink {
    pub id: Identifier,
    pub name: String,
    pub target_id: Identifier,
    pub import_root_entries: bool,
}

impl CatalogLink {
    pub const ELEMENT: &'static str = "catalogueLink";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        Ok(CatalogLink {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            target_id: element.attribute("targetId").as_identifier()?,
            import_root_entries: element.attribute("importRootEntries").as_bool()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub id: Identifier,
    pub name: String,
    pub revision: i64,
    pub battlescribe_version: String,
    pub library: bool,
    pub game_system_id: Identifier,
    pub game_system_revision: i64,
    pub publications: Vec<Publication>,
    pub profile_types: Vec<ProfileType>,
    pub category_entries: Vec<Arc<CategoryEntry>>,
    pub entry_links: Vec<Arc<EntryLink>>,
    pub rules: Vec<Arc<Rule>>,
    pub shared_selection_entries: Vec<Arc<SelectionEntry>>,
    pub shared_selection_entry_groups: Vec<Arc<SelectionEntryGroup>>,
    pub shared_profiles: Vec<Arc<Profile>>,
    pub shared_rules: Vec<Arc<Rule>>,
    pub shared_info_groups: Vec<Arc<InfoGroup>>,
    pub catalog_links: Vec<CatalogLink>,
}

impl Catalog {
    pub const ELEMENT: &'static str = "catalogue";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut catalog = Catalog {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            revision: element.attribute("revision").as_i64()?,
            battlescribe_version: element.attribute("battleScribeVersion").as_string()?,
            library: element.attribute("library").as_bool()?,
            game_system_id: element.attribute("gameSystemId").as_identifier()?,
            game_system_revision: element.attribute("gameSystemRevision").as_i64()?,
            publications: Vec::new(),
            profile_types: Vec::new(),
            category_entries: Vec::new(),
            entry_links: Vec::new(),
            rules: Vec::new(),
            shared_selection_entries: Vec::new(),
            shared_selection_entry_groups: Vec::new(),
            shared_profiles: Vec::new(),
            shared_rules: Vec::new(),
            shared_info_groups: Vec::new(),
            catalog_links: Vec::new(),
        };

        for child in element.children_at("publications/publication") {
            catalog.publications.push(Publication::from_xml(child)?);
        }
        for child in element.children_at("profileTypes/profileType") {
            catalog.profile_types.push(ProfileType::from_xml(child)?);
        }
        for child in element.children_at("categoryEntries/categoryEntry") {
            catalog
                .category_entries
                .push(Arc::new(CategoryEntry::from_xml(child)?));
        }
        for child in element.children_at("entryLinks/entryLink") {
            catalog.entry_links.push(Arc::new(EntryLink::from_xml(child)?));
        }
        for child in element.children_at("rules/rule") {
            catalog.rules.push(Arc::new(Rule::from_xml(child)?));
        }
        for child in element.children_at("sharedSelectionEntries/selectionEntry") {
            catalog
                .shared_selection_entries
                .push(Arc::new(SelectionEntry::from_xml(child)?));
        }
        for child in element.children_at("sharedSelectionEntryGroups/selectionEntryGroup") {
            catalog
                .shared_selection_entry_groups
                .push(Arc::new(SelectionEntryGroup::from_xml(child)?));
        }
        for child in element.children_at("sharedProfiles/profile") {
            catalog
                .shared_profiles
                .push(Arc::new(Profile::from_xml(child)?));
        }
        for child in element.children_at("sharedRules/rule") {
            catalog.shared_rules.push(Arc::new(Rule::from_xml(child)?));
        }
        for child in element.children_at("sharedInfoGroups/infoGroup") {
            catalog
                .shared_info_groups
                .push(Arc::new(InfoGroup::from_xml(child)?));
        }
        for child in element.children_at("catalogueLinks/catalogueLink") {
            catalog.catalog_links.push(CatalogLink::from_xml(child)?);
        }

        Ok(catalog)
    }
}
