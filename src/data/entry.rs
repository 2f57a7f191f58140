//! Selection entries: the selectable things a roster is built from. An
//! entry owns its child entries, child groups and entry links; links are
//! resolved against the registry at instantiation time, not here.

use std::sync::Arc;

use crate::data::category::CategoryLink;
use crate::data::constraint::Constraint;
use crate::data::cost::Cost;
use crate::data::group::SelectionEntryGroup;
use crate::data::info::{InfoLink, Rule};
use crate::data::links::EntryLink;
use crate::data::modifier::Modifier;
use crate::data::profile::Profile;
use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEntryKind {
    Model,
    Unit,
    Upgrade,
}

impl SelectionEntryKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "model" => Some(SelectionEntryKind::Model),
            "unit" => Some(SelectionEntryKind::Unit),
            "upgrade" => Some(SelectionEntryKind::Upgrade),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionEntryKind::Model => "model",
            SelectionEntryKind::Unit => "unit",
            SelectionEntryKind::Upgrade => "upgrade",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionEntry {
    pub id: Identifier,
    pub name: String,
    pub hidden: bool,
    pub collective: bool,
    pub import: bool,
    pub kind: SelectionEntryKind,
    pub costs: Vec<Cost>,
    pub constraints: Vec<Arc<Constraint>>,
    pub modifiers: Vec<Modifier>,
    pub profiles: Vec<Profile>,
    pub rules: Vec<Rule>,
    pub info_links: Vec<InfoLink>,
    pub category_links: Vec<CategoryLink>,
    pub selection_entries: Vec<Arc<SelectionEntry>>,
    pub selection_entry_groups: Vec<Arc<SelectionEntryGroup>>,
    pub entry_links: Vec<Arc<EntryLink>>,
}

impl SelectionEntry {
    pub const ELEMENT: &'static str = "selectionEntry";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut entry = SelectionEntry {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            hidden: element.attribute("hidden").as_bool()?,
            collective: element.attribute("collective").as_bool()?,
            import: element.attribute("import").as_bool()?,
            kind: element
                .attribute("type")
                .as_enum("selection entry type", SelectionEntryKind::parse)?,
            costs: Vec::new(),
            constraints: Vec::new(),
            modifiers: Vec::new(),
            profiles: Vec::new(),
            rules: Vec::new(),
            info_links: Vec::new(),
            category_links: Vec::new(),
            selection_entries: Vec::new(),
            selection_entry_groups: Vec::new(),
            entry_links: Vec::new(),
        };

        for child in element.children_at("costs/cost") {
            entry.costs.push(Cost::from_xml(child)?);
        }
        for child in element.children_at("constraints/constraint") {
            entry.constraints.push(Arc::new(Constraint::from_xml(child)?));
        }
        for child in element.children_at("modifiers/modifier") {
            entry.modifiers.push(Modifier::from_xml(child)?);
        }
        for child in element.children_at("profiles/profile") {
            entry.profiles.push(Profile::from_xml(child)?);
        }
        for child in element.children_at("rules/rule") {
            entry.rules.push(Rule::from_xml(child)?);
        }
        for child in element.children_at("infoLinks/infoLink") {
            entry.info_links.push(InfoLink::from_xml(child)?);
        }
        for child in element.children_at("categoryLinks/categoryLink") {
            entry.category_links.push(CategoryLink::from_xml(child)?);
        }
        for child in element.children_at("selectionEntries/selectionEntry") {
            entry
                .selection_entries
                .push(Arc::new(SelectionEntry::from_xml(child)?));
        }
        for child in element.children_at("selectionEntryGroups/selectionEntryGroup") {
            entry
                .selection_entry_groups
                .push(Arc::new(SelectionEntryGroup::from_xml(child)?));
        }
        for child in element.children_at("entryLinks/entryLink") {
            entry.entry_links.push(Arc::new(EntryLink::from_xml(child)?));
        }

        Ok(entry)
    }

    /// The category link flagged primary, if the entry declares one.
    pub fn primary_category(&self) -> Option<&CategoryLink> {
        self.category_links.iter().find(|link| link.primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entry_with_children() {
        let element = Element::from_str(
            r#"<selectionEntry id="aaaa-0000-0000-0001" name="Sergeant" type="model">
                 <costs><cost name="pts" typeId="cccc-0000-0000-0001" value="10"/></costs>
                 <constraints>
                   <constraint id="bbbb-0000-0000-0001" field="selections" scope="parent" value="1" type="max"/>
                 </constraints>
                 <categoryLinks>
                   <categoryLink id="dddd-0000-0000-0001" name="Leader" targetId="eeee-0000-0000-0001" primary="true"/>
                 </categoryLinks>
                 <selectionEntries>
                   <selectionEntry id="aaaa-0000-0000-0002" name="Chainsword" type="upgrade"/>
                 </selectionEntries>
               </selectionEntry>"#,
        )
        .unwrap();
        let entry = SelectionEntry::from_xml(&element).unwrap();
        assert_eq!(entry.kind, SelectionEntryKind::Model);
        assert_eq!(entry.costs[0].value, 10.0);
        assert_eq!(entry.constraints.len(), 1);
        assert_eq!(entry.selection_entries[0].name, "Chainsword");
        assert_eq!(entry.primary_category().unwrap().name, "Leader");
    }

    #[test]
    fn upgrade_without_children_is_leaf() {
        let element = Element::from_str(
            r#"<selectionEntry id="aaaa-0000-0000-0003" name="Frag Grenades" type="upgrade" hidden="true"/>"#,
        )
        .unwrap();
        let entry = SelectionEntry::from_xml(&element).unwrap();
        assert!(entry.hidden);
        assert!(entry.selection_entries.is_empty());
        assert!(entry.entry_links.is_empty());
    }
}
