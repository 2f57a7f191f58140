//! Selection entry groups: named clusters of alternatives under an entry.
//! A group never carries a count of its own; its selected total is the sum
//! over the entries in its subtree, nested subgroups included.

use std::sync::Arc;

use crate::data::constraint::Constraint;
use crate::data::entry::SelectionEntry;
use crate::data::links::EntryLink;
use crate::data::modifier::Modifier;
use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

#[derive(Debug, Clone)]
pub struct SelectionEntryGroup {
    pub id: Identifier,
    pub name: String,
    pub hidden: bool,
    pub collective: bool,
    pub import: bool,
    /// Seeds one selection on the matching child when the group is first
    /// instantiated.
    pub default_entry_id: Option<Identifier>,
    pub constraints: Vec<Arc<Constraint>>,
    pub modifiers: Vec<Modifier>,
    pub selection_entries: Vec<Arc<SelectionEntry>>,
    pub selection_entry_groups: Vec<Arc<SelectionEntryGroup>>,
    pub entry_links: Vec<Arc<EntryLink>>,
}

impl SelectionEntryGroup {
    pub const ELEMENT: &'static str = "selectionEntryGroup";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut group = SelectionEntryGroup {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            hidden: element.attribute("hidden").as_bool()?,
            collective: element.attribute("collective").as_bool()?,
            import: element.attribute("import").as_bool()?,
            default_entry_id: element.attribute("defaultSelectionEntryId").as_opt_identifier(),
            constraints: Vec::new(),
            modifiers: Vec::new(),
            selection_entries: Vec::new(),
            selection_entry_groups: Vec::new(),
            entry_links: Vec::new(),
        };

        for child in element.children_at("constraints/constraint") {
            group.constraints.push(Arc::new(Constraint::from_xml(child)?));
        }
        for child in element.children_at("modifiers/modifier") {
            group.modifiers.push(Modifier::from_xml(child)?);
        }
        for child in element.children_at("selectionEntries/selectionEntry") {
            group
                .selection_entries
                .push(Arc::new(SelectionEntry::from_xml(child)?));
        }
        for child in element.children_at("selectionEntryGroups/selectionEntryGroup") {
            group
                .selection_entry_groups
                .push(Arc::new(SelectionEntryGroup::from_xml(child)?));
        }
        for child in element.children_at("entryLinks/entryLink") {
            group.entry_links.push(Arc::new(EntryLink::from_xml(child)?));
        }

        Ok(group)
    }
}
