//! Generic pre-order search over definition trees. Instance-side search
//! lives on [`crate::roster::Roster::find_instances`]; this module covers
//! the immutable side, traversing straight through links so a matcher
//! sees a linked entry exactly where the link sits.

use std::sync::Arc;

use crate::data::catalog::Catalog;
use crate::data::category::CategoryEntry;
use crate::data::force::ForceEntry;
use crate::data::game_system::GameSystem;
use crate::data::info::{InfoGroup, Rule};
use crate::data::links::{EntryHandle, GroupHandle};
use crate::data::profile::Profile;
use crate::data::registry::{Linker, ResolvedLink};
use crate::error::DataError;
use crate::ident::Identifier;

/// One definition node as seen by a matcher.
#[derive(Debug, Clone)]
pub enum DefNode {
    GameSystem(Arc<GameSystem>),
    Catalog(Arc<Catalog>),
    ForceEntry(Arc<ForceEntry>),
    CategoryEntry(Arc<CategoryEntry>),
    Entry(EntryHandle),
    Group(GroupHandle),
    Profile(Arc<Profile>),
    Rule(Arc<Rule>),
    InfoGroup(Arc<InfoGroup>),
}

impl DefNode {
    pub fn name(&self) -> &str {
        match self {
            DefNode::GameSystem(node) => &node.name,
            DefNode::Catalog(node) => &node.name,
            DefNode::ForceEntry(node) => &node.name,
            DefNode::CategoryEntry(node) => &node.name,
            DefNode::Entry(handle) => handle.name(),
            DefNode::Group(handle) => handle.name(),
            DefNode::Profile(node) => &node.name,
            DefNode::Rule(node) => &node.name,
            DefNode::InfoGroup(node) => &node.name,
        }
    }

    /// Occurrence identity; for linked entries this is the link id.
    pub fn id(&self) -> &Identifier {
        match self {
            DefNode::GameSystem(node) => &node.id,
            DefNode::Catalog(node) => &node.id,
            DefNode::ForceEntry(node) => &node.id,
            DefNode::CategoryEntry(node) => &node.id,
            DefNode::Entry(handle) => handle.id(),
            DefNode::Group(handle) => handle.id(),
            DefNode::Profile(node) => &node.id,
            DefNode::Rule(node) => &node.id,
            DefNode::InfoGroup(node) => &node.id,
        }
    }
}

/// Pre-order search, self before children. Links are traversed
/// transparently: a link contributes its resolved handle as one node and
/// the target's children underneath it.
pub fn find_by_matcher(
    linker: &Linker,
    root: &DefNode,
    matcher: &impl Fn(&DefNode) -> bool,
) -> Result<Vec<DefNode>, DataError> {
    let mut found = Vec::new();
    visit(linker, root, matcher, &mut found)?;
    Ok(found)
}

fn visit(
    linker: &Linker,
    node: &DefNode,
    matcher: &impl Fn(&DefNode) -> bool,
    found: &mut Vec<DefNode>,
) -> Result<(), DataError> {
    if matcher(node) {
        found.push(node.clone());
    }
    for child in children(linker, node)? {
        visit(linker, &child, matcher, found)?;
    }
    Ok(())
}

fn children(linker: &Linker, node: &DefNode) -> Result<Vec<DefNode>, DataError> {
    let mut children = Vec::new();
    match node {
        DefNode::GameSystem(system) => {
            children.extend(system.category_entries.iter().cloned().map(DefNode::CategoryEntry));
            children.extend(system.force_entries.iter().cloned().map(DefNode::ForceEntry));
            for link in &system.entry_links {
                children.push(resolve(linker, link)?);
            }
            children.extend(
                system
                    .shared_selection_entries
                    .iter()
                    .map(|entry| DefNode::Entry(EntryHandle::Direct(Arc::clone(entry)))),
            );
            children.extend(
                system
                    .shared_selection_entry_groups
                    .iter()
                    .map(|group| DefNode::Group(GroupHandle::Direct(Arc::clone(group)))),
            );
            children.extend(system.shared_profiles.iter().cloned().map(DefNode::Profile));
            children.extend(system.shared_rules.iter().cloned().map(DefNode::Rule));
            children.extend(system.shared_info_groups.iter().cloned().map(DefNode::InfoGroup));
        }
        DefNode::Catalog(catalog) => {
            children.extend(catalog.category_entries.iter().cloned().map(DefNode::CategoryEntry));
            for link in &catalog.entry_links {
                children.push(resolve(linker, link)?);
            }
            children.extend(catalog.rules.iter().cloned().map(DefNode::Rule));
            children.extend(
                catalog
                    .shared_selection_entries
                    .iter()
                    .map(|entry| DefNode::Entry(EntryHandle::Direct(Arc::clone(entry)))),
            );
            children.extend(
                catalog
                    .shared_selection_entry_groups
                    .iter()
                    .map(|group| DefNode::Group(GroupHandle::Direct(Arc::clone(group)))),
            );
            children.extend(catalog.shared_profiles.iter().cloned().map(DefNode::Profile));
            children.extend(catalog.shared_rules.iter().cloned().map(DefNode::Rule));
            children.extend(catalog.shared_info_groups.iter().cloned().map(DefNode::InfoGroup));
        }
        DefNode::Entry(handle) => {
            children.extend(
                handle
                    .profiles()
                    .iter()
                    .map(|profile| DefNode::Profile(Arc::new(profile.clone()))),
            );
            children.extend(
                handle
                    .rules()
                    .iter()
                    .map(|rule| DefNode::Rule(Arc::new(rule.clone()))),
            );
            let (entries, groups) = linker.entry_children(handle)?;
            children.extend(entries.into_iter().map(DefNode::Entry));
            children.extend(groups.into_iter().map(DefNode::Group));
        }
        DefNode::Group(handle) => {
            let (entries, groups) = linker.group_children(handle)?;
            children.extend(entries.into_iter().map(DefNode::Entry));
            children.extend(groups.into_iter().map(DefNode::Group));
        }
        DefNode::InfoGroup(group) => {
            children.extend(
                group
                    .profiles
                    .iter()
                    .map(|profile| DefNode::Profile(Arc::new(profile.clone()))),
            );
            children.extend(
                group
                    .rules
                    .iter()
                    .map(|rule| DefNode::Rule(Arc::new(rule.clone()))),
            );
        }
        DefNode::ForceEntry(_)
        | DefNode::CategoryEntry(_)
        | DefNode::Profile(_)
        | DefNode::Rule(_) => {}
    }
    Ok(children)
}

fn resolve(linker: &Linker, link: &Arc<crate::data::links::EntryLink>) -> Result<DefNode, DataError> {
    Ok(match linker.resolve_entry_link(link)? {
        ResolvedLink::Entry(handle) => DefNode::Entry(handle),
        ResolvedLink::Group(handle) => DefNode::Group(handle),
    })
}
