//! Entry links and the resolved handles built from them. A link is a
//! by-id reference into a shared pool plus local overlays (costs,
//! constraints, modifiers, category links). A handle is what the rest of
//! the crate walks: either an entry/group used directly, or a link paired
//! with its resolved target, presenting the merged view.

use std::sync::Arc;

use crate::data::category::CategoryLink;
use crate::data::constraint::Constraint;
use crate::data::cost::Cost;
use crate::data::entry::{SelectionEntry, SelectionEntryKind};
use crate::data::group::SelectionEntryGroup;
use crate::data::info::{InfoLink, Rule};
use crate::data::modifier::Modifier;
use crate::data::profile::Profile;
use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    SelectionEntry,
    SelectionEntryGroup,
}

impl LinkKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "selectionEntry" => Some(LinkKind::SelectionEntry),
            "selectionEntryGroup" => Some(LinkKind::SelectionEntryGroup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::SelectionEntry => "selectionEntry",
            LinkKind::SelectionEntryGroup => "selectionEntryGroup",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntryLink {
    pub id: Identifier,
    pub name: String,
    pub hidden: bool,
    pub collective: bool,
    pub import: bool,
    pub target_id: Identifier,
    pub kind: LinkKind,
    pub costs: Vec<Cost>,
    pub constraints: Vec<Arc<Constraint>>,
    pub modifiers: Vec<Modifier>,
    pub category_links: Vec<CategoryLink>,
    pub info_links: Vec<InfoLink>,
}

impl EntryLink {
    pub const ELEMENT: &'static str = "entryLink";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut link = EntryLink {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            hidden: element.attribute("hidden").as_bool()?,
            collective: element.attribute("collective").as_bool()?,
            import: element.attribute("import").as_bool()?,
            target_id: element.attribute("targetId").as_identifier()?,
            kind: element
                .attribute("type")
                .as_enum("entry link type", LinkKind::parse)?,
            costs: Vec::new(),
            constraints: Vec::new(),
            modifiers: Vec::new(),
            category_links: Vec::new(),
            info_links: Vec::new(),
        };

        for child in element.children_at("costs/cost") {
            link.costs.push(Cost::from_xml(child)?);
        }
        for child in element.children_at("constraints/constraint") {
            link.constraints.push(Arc::new(Constraint::from_xml(child)?));
        }
        for child in element.children_at("modifiers/modifier") {
            link.modifiers.push(Modifier::from_xml(child)?);
        }
        for child in element.children_at("categoryLinks/categoryLink") {
            link.category_links.push(CategoryLink::from_xml(child)?);
        }
        for child in element.children_at("infoLinks/infoLink") {
            link.info_links.push(InfoLink::from_xml(child)?);
        }

        Ok(link)
    }
}

/// A selection entry as reachable from some parent: either owned in place
/// or pulled in through a link. Reference transparency lives here; callers
/// read the merged view and never care which variant they hold.
#[derive(Debug, Clone)]
pub enum EntryHandle {
    Direct(Arc<SelectionEntry>),
    Linked {
        link: Arc<EntryLink>,
        target: Arc<SelectionEntry>,
    },
}

impl EntryHandle {
    /// Identity of this occurrence. Two links to the same shared entry are
    /// distinct occurrences with distinct ids.
    pub fn id(&self) -> &Identifier {
        match self {
            EntryHandle::Direct(entry) => &entry.id,
            EntryHandle::Linked { link, .. } => &link.id,
        }
    }

    /// Identity of the underlying definition, shared across all links to it.
    pub fn definition_id(&self) -> &Identifier {
        match self {
            EntryHandle::Direct(entry) => &entry.id,
            EntryHandle::Linked { target, .. } => &target.id,
        }
    }

    /// True when `id` names either this occurrence or its definition.
    pub fn matches(&self, id: &Identifier) -> bool {
        self.id() == id || self.definition_id() == id
    }

    pub fn entry(&self) -> &Arc<SelectionEntry> {
        match self {
            EntryHandle::Direct(entry) => entry,
            EntryHandle::Linked { target, .. } => target,
        }
    }

    pub fn name(&self) -> &str {
        &self.entry().name
    }

    pub fn kind(&self) -> SelectionEntryKind {
        self.entry().kind
    }

    pub fn hidden(&self) -> bool {
        match self {
            EntryHandle::Direct(entry) => entry.hidden,
            EntryHandle::Linked { link, target } => link.hidden || target.hidden,
        }
    }

    pub fn collective(&self) -> bool {
        match self {
            EntryHandle::Direct(entry) => entry.collective,
            EntryHandle::Linked { link, target } => link.collective || target.collective,
        }
    }

    /// Link costs replace the definition's when the link declares any.
    pub fn costs(&self) -> &[Cost] {
        match self {
            EntryHandle::Direct(entry) => &entry.costs,
            EntryHandle::Linked { link, target } => {
                if link.costs.is_empty() {
                    &target.costs
                } else {
                    &link.costs
                }
            }
        }
    }

    /// Definition constraints first, then any the link adds.
    pub fn constraints(&self) -> Vec<Arc<Constraint>> {
        match self {
            EntryHandle::Direct(entry) => entry.constraints.clone(),
            EntryHandle::Linked { link, target } => target
                .constraints
                .iter()
                .chain(link.constraints.iter())
                .cloned()
                .collect(),
        }
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &Modifier> {
        let (own, extra) = match self {
            EntryHandle::Direct(entry) => (&entry.modifiers, None),
            EntryHandle::Linked { link, target } => (&target.modifiers, Some(&link.modifiers)),
        };
        own.iter().chain(extra.into_iter().flatten())
    }

    pub fn category_links(&self) -> impl Iterator<Item = &CategoryLink> {
        let (own, extra) = match self {
            EntryHandle::Direct(entry) => (&entry.category_links, None),
            EntryHandle::Linked { link, target } => {
                (&target.category_links, Some(&link.category_links))
            }
        };
        own.iter().chain(extra.into_iter().flatten())
    }

    pub fn primary_category(&self) -> Option<&CategoryLink> {
        self.category_links().find(|link| link.primary)
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.entry().profiles
    }

    pub fn rules(&self) -> &[Rule] {
        &self.entry().rules
    }

    pub fn info_links(&self) -> impl Iterator<Item = &InfoLink> {
        let (own, extra) = match self {
            EntryHandle::Direct(entry) => (&entry.info_links, None),
            EntryHandle::Linked { link, target } => (&target.info_links, Some(&link.info_links)),
        };
        own.iter().chain(extra.into_iter().flatten())
    }
}

/// A selection entry group as reachable from some parent, mirroring
/// [`EntryHandle`].
#[derive(Debug, Clone)]
pub enum GroupHandle {
    Direct(Arc<SelectionEntryGroup>),
    Linked {
        link: Arc<EntryLink>,
        target: Arc<SelectionEntryGroup>,
    },
}

impl GroupHandle {
    pub fn id(&self) -> &Identifier {
        match self {
            GroupHandle::Direct(group) => &group.id,
            GroupHandle::Linked { link, .. } => &link.id,
        }
    }

    pub fn definition_id(&self) -> &Identifier {
        match self {
            GroupHandle::Direct(group) => &group.id,
            GroupHandle::Linked { target, .. } => &target.id,
        }
    }

    pub fn matches(&self, id: &Identifier) -> bool {
        self.id() == id || self.definition_id() == id
    }

    pub fn group(&self) -> &Arc<SelectionEntryGroup> {
        match self {
            GroupHandle::Direct(group) => group,
            GroupHandle::Linked { target, .. } => target,
        }
    }

    pub fn name(&self) -> &str {
        &self.group().name
    }

    pub fn hidden(&self) -> bool {
        match self {
            GroupHandle::Direct(group) => group.hidden,
            GroupHandle::Linked { link, target } => link.hidden || target.hidden,
        }
    }

    pub fn default_entry_id(&self) -> Option<&Identifier> {
        self.group().default_entry_id.as_ref()
    }

    pub fn constraints(&self) -> Vec<Arc<Constraint>> {
        match self {
            GroupHandle::Direct(group) => group.constraints.clone(),
            GroupHandle::Linked { link, target } => target
                .constraints
                .iter()
                .chain(link.constraints.iter())
                .cloned()
                .collect(),
        }
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &Modifier> {
        let (own, extra) = match self {
            GroupHandle::Direct(group) => (&group.modifiers, None),
            GroupHandle::Linked { link, target } => (&target.modifiers, Some(&link.modifiers)),
        };
        own.iter().chain(extra.into_iter().flatten())
    }
}
