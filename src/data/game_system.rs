//! Game system root: the base package every catalog extends. Declares
//! cost/profile types, the category vocabulary, force shapes and the
//! system-wide shared pools.

use std::sync::Arc;

use crate::data::category::CategoryEntry;
use crate::data::cost::CostType;
use crate::data::entry::SelectionEntry;
use crate::data::force::ForceEntry;
use crate::data::group::SelectionEntryGroup;
use crate::data::info::{InfoGroup, Publication, Rule};
use crate::data::links::EntryLink;
use crate::data::profile::{Profile, ProfileType};
use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

#[derive(Debug, Clone)]
pub struct GameSystem {
    pub id: Identifier,
    pub name: String,
    pub revision: i64,
    pub battlescribe_version: String,
    pub publications: Vec<Publication>,
    pub cost_types: Vec<CostType>,
    pub profile_types: Vec<ProfileType>,
    pub category_entries: Vec<Arc<CategoryEntry>>,
    pub force_entries: Vec<Arc<ForceEntry>>,
    pub entry_links: Vec<Arc<EntryLink>>,
    pub shared_selection_entries: Vec<Arc<SelectionEntry>>,
    pub shared_selection_entry_groups: Vec<Arc<SelectionEntryGroup>>,
    pub shared_profiles: Vec<Arc<Profile>>,
    pub shared_rules: Vec<Arc<Rule>>,
    pub shared_info_groups: Vec<Arc<InfoGroup>>,
}

impl GameSystem {
    pub const ELEMENT: &'static str = "gameSystem";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut system = GameSystem {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            revision: element.attribute("revision").as_i64()?,
            battlescribe_version: element.attribute("battleScribeVersion").as_string()?,
            publications: Vec::new(),
            cost_types: Vec::new(),
            profile_types: Vec::new(),
            category_entries: Vec::new(),
            force_entries: Vec::new(),
            entry_links: Vec::new(),
            shared_selection_entries: Vec::new(),
            shared_selection_entry_groups: Vec::new(),
            shared_profiles: Vec::new(),
            shared_rules: Vec::new(),
            shared_info_groups: Vec::new(),
        };

        for child in element.children_at("publications/publication") {
            system.publications.push(Publication::from_xml(child)?);
        }
        for child in element.children_at("costTypes/costType") {
            system.cost_types.push(CostType::from_xml(child)?);
        }
        for child in element.children_at("profileTypes/profileType") {
            system.profile_types.push(ProfileType::from_xml(child)?);
        }
        for child in element.children_at("categoryEntries/categoryEntry") {
            system
                .category_entries
                .push(Arc::new(CategoryEntry::from_xml(child)?));
        }
        for child in element.children_at("forceEntries/forceEntry") {
            system
                .force_entries
                .push(Arc::new(ForceEntry::from_xml(child)?));
        }
        for child in element.children_at("entryLinks/entryLink") {
            system.entry_links.push(Arc::new(EntryLink::from_xml(child)?));
        }
        for child in element.children_at("sharedSelectionEntries/selectionEntry") {
            system
                .shared_selection_entries
                .push(Arc::new(SelectionEntry::from_xml(child)?));
        }
        for child in element.children_at("sharedSelectionEntryGroups/selectionEntryGroup") {
            system
                .shared_selection_entry_groups
                .push(Arc::new(SelectionEntryGroup::from_xml(child)?));
        }
        for child in element.children_at("sharedProfiles/profile") {
            system.shared_profiles.push(Arc::new(Profile::from_xml(child)?));
        }
        for child in element.children_at("sharedRules/rule") {
            system.shared_rules.push(Arc::new(Rule::from_xml(child)?));
        }
        for child in element.children_at("sharedInfoGroups/infoGroup") {
            system
                .shared_info_groups
                .push(Arc::new(InfoGroup::from_xml(child)?));
        }

        Ok(system)
    }

    pub fn find_force_entry(&self, name: &str) -> Option<&Arc<ForceEntry>> {
        self.force_entries.iter().find(|force| force.name == name)
    }

    pub fn find_cost_type(&self, id: &Identifier) -> Option<&CostType> {
        self.cost_types.iter().find(|cost_type| &cost_type.id == id)
    }
}
