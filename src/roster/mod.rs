//! Mutable roster state. A roster owns one arena of instance nodes;
//! parent/child relations are arena indices, never pointers, and every
//! node wraps its immutable definition handle. Definitions are shared and
//! never written to; all mutation lands in the per-node fields here.
//!
//! Children are instantiated eagerly, once, when a selection is added.
//! After that only the mutable fields change, driven by the evaluator in
//! [`eval`].

mod eval;
mod report;

pub use report::{ValidationDiagnostic, ValidationReport, ValidationSeverity};

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::data::constraint::Constraint;
use crate::data::cost::Cost;
use crate::data::force::ForceEntry;
use crate::data::game_system::GameSystem;
use crate::data::links::{EntryHandle, GroupHandle};
use crate::data::registry::Linker;
use crate::error::{DataError, EvalError};
use crate::ident::Identifier;

/// Index of a node in a roster's arena. Only meaningful for the roster
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A shared constraint plus the per-roster value override modifiers may
/// install. The override replaces the declared value until a modifier
/// clears it.
#[derive(Debug, Clone)]
pub struct ConstraintInstance {
    pub constraint: Arc<Constraint>,
    pub value_override: Option<f64>,
}

impl ConstraintInstance {
    fn new(constraint: Arc<Constraint>) -> Self {
        ConstraintInstance {
            constraint,
            value_override: None,
        }
    }

    pub fn value(&self) -> f64 {
        self.value_override.unwrap_or(self.constraint.value)
    }

    pub fn set_value(&mut self, value: Option<f64>) {
        self.value_override = value;
    }
}

/// A definition cost plus its per-roster override.
#[derive(Debug, Clone)]
pub struct CostInstance {
    pub cost: Cost,
    pub value_override: Option<f64>,
}

impl CostInstance {
    fn new(cost: Cost) -> Self {
        CostInstance {
            cost,
            value_override: None,
        }
    }

    pub fn value(&self) -> f64 {
        self.value_override.unwrap_or(self.cost.value)
    }

    pub fn set_value(&mut self, value: Option<f64>) {
        self.value_override = value;
    }
}

#[derive(Debug)]
pub(crate) struct ForceNode {
    pub(crate) force: Arc<ForceEntry>,
    pub(crate) selections: Vec<NodeId>,
    pub(crate) errors: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct EntryNode {
    pub(crate) handle: EntryHandle,
    pub(crate) selected: u32,
    pub(crate) min: Option<i64>,
    pub(crate) max: Option<i64>,
    pub(crate) name_override: Option<String>,
    pub(crate) hidden_override: Option<bool>,
    pub(crate) constraints: Vec<ConstraintInstance>,
    pub(crate) costs: Vec<CostInstance>,
    pub(crate) errors: Vec<String>,
    pub(crate) entries: Vec<NodeId>,
    pub(crate) groups: Vec<NodeId>,
}

#[derive(Debug)]
pub(crate) struct GroupNode {
    pub(crate) handle: GroupHandle,
    pub(crate) min: Option<i64>,
    pub(crate) max: Option<i64>,
    pub(crate) hidden_override: Option<bool>,
    pub(crate) constraints: Vec<ConstraintInstance>,
    pub(crate) errors: Vec<String>,
    pub(crate) entries: Vec<NodeId>,
    pub(crate) groups: Vec<NodeId>,
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Force(ForceNode),
    Entry(EntryNode),
    Group(GroupNode),
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

/// One army list under construction.
pub struct Roster {
    name: String,
    game_system: Arc<GameSystem>,
    linker: Linker,
    pub(crate) nodes: Vec<Node>,
    pub(crate) force_ids: Vec<NodeId>,
    pub(crate) min: Option<i64>,
    pub(crate) max: Option<i64>,
    pub(crate) errors: Vec<String>,
}

impl Roster {
    pub fn new(game_system: Arc<GameSystem>, linker: Linker, name: impl Into<String>) -> Roster {
        Roster {
            name: name.into(),
            game_system,
            linker,
            nodes: Vec::new(),
            force_ids: Vec::new(),
            min: None,
            max: None,
            errors: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn game_system(&self) -> &Arc<GameSystem> {
        &self.game_system
    }

    pub fn forces(&self) -> &[NodeId] {
        &self.force_ids
    }

    fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent, kind });
        id
    }

    pub fn add_force(&mut self, force: &Arc<ForceEntry>) -> NodeId {
        let id = self.push_node(
            None,
            NodeKind::Force(ForceNode {
                force: Arc::clone(force),
                selections: Vec::new(),
                errors: Vec::new(),
            }),
        );
        self.force_ids.push(id);
        debug!(force = %force.name, "added force");
        id
    }

    /// Instantiate an entry subtree under a force. The whole definition
    /// subtree is mirrored eagerly; group defaults seed initial selection.
    pub fn add_selection(
        &mut self,
        force: NodeId,
        handle: &EntryHandle,
    ) -> Result<NodeId, DataError> {
        debug_assert!(matches!(self.nodes[force.0].kind, NodeKind::Force(_)));
        let id = self.instantiate_entry(Some(force), handle, 1)?;
        if let NodeKind::Force(node) = &mut self.nodes[force.0].kind {
            node.selections.push(id);
        }
        debug!(entry = handle.name(), "added selection");
        Ok(id)
    }

    fn instantiate_entry(
        &mut self,
        parent: Option<NodeId>,
        handle: &EntryHandle,
        selected: u32,
    ) -> Result<NodeId, DataError> {
        let constraints = handle
            .constraints()
            .into_iter()
            .map(ConstraintInstance::new)
            .collect();
        let costs = handle.costs().iter().cloned().map(CostInstance::new).collect();
        let id = self.push_node(
            parent,
            NodeKind::Entry(EntryNode {
                handle: handle.clone(),
                selected,
                min: None,
                max: None,
                name_override: None,
                hidden_override: None,
                constraints,
                costs,
                errors: Vec::new(),
                entries: Vec::new(),
                groups: Vec::new(),
            }),
        );

        let (child_entries, child_groups) = self.linker.entry_children(handle)?;
        let mut entry_ids = Vec::with_capacity(child_entries.len());
        for child in &child_entries {
            // Entries directly under an entry are part of it, not picks.
            entry_ids.push(self.instantiate_entry(Some(id), child, 1)?);
        }
        let mut group_ids = Vec::with_capacity(child_groups.len());
        for group in &child_groups {
            group_ids.push(self.instantiate_group(id, group)?);
        }
        if let NodeKind::Entry(node) = &mut self.nodes[id.0].kind {
            node.entries = entry_ids;
            node.groups = group_ids;
        }
        Ok(id)
    }

    fn instantiate_group(
        &mut self,
        parent: NodeId,
        handle: &GroupHandle,
    ) -> Result<NodeId, DataError> {
        let constraints = handle
            .constraints()
            .into_iter()
            .map(ConstraintInstance::new)
            .collect();
        let id = self.push_node(
            Some(parent),
            NodeKind::Group(GroupNode {
                handle: handle.clone(),
                min: None,
                max: None,
                hidden_override: None,
                constraints,
                errors: Vec::new(),
                entries: Vec::new(),
                groups: Vec::new(),
            }),
        );

        let default = handle.default_entry_id().cloned();
        let (child_entries, child_groups) = self.linker.group_children(handle)?;
        let mut entry_ids = Vec::with_capacity(child_entries.len());
        for child in &child_entries {
            let selected = match &default {
                Some(default) if child.matches(default) => 1,
                _ => 0,
            };
            entry_ids.push(self.instantiate_entry(Some(id), child, selected)?);
        }
        let mut group_ids = Vec::with_capacity(child_groups.len());
        for group in &child_groups {
            group_ids.push(self.instantiate_group(id, group)?);
        }
        if let NodeKind::Group(node) = &mut self.nodes[id.0].kind {
            node.entries = entry_ids;
            node.groups = group_ids;
        }
        Ok(id)
    }

    pub fn set_selected_count(&mut self, node: NodeId, count: u32) {
        if let NodeKind::Entry(entry) = &mut self.nodes[node.0].kind {
            entry.selected = count;
        }
    }

    /// Exclusive selection within a group: deselect every child entry,
    /// select the target, then recompute the whole roster.
    pub fn set_selected_instance(
        &mut self,
        group: NodeId,
        target: NodeId,
    ) -> Result<(), EvalError> {
        let children = match &self.nodes[group.0].kind {
            NodeKind::Group(node) => node.entries.clone(),
            _ => Vec::new(),
        };
        for child in children {
            self.set_selected_count(child, u32::from(child == target));
        }
        self.compute_state()
    }

    /// Re-derive every computed field from current selections. See
    /// [`eval`] for the pass structure.
    pub fn compute_state(&mut self) -> Result<(), EvalError> {
        eval::compute_state(self)
    }

    pub fn instance(&self, id: NodeId) -> InstanceRef<'_> {
        InstanceRef { roster: self, id }
    }

    /// Pre-order search over the whole instance tree, self before
    /// children, forces in insertion order.
    pub fn find_instances(&self, predicate: impl Fn(InstanceRef<'_>) -> bool) -> Vec<NodeId> {
        let mut found = Vec::new();
        for force in &self.force_ids {
            self.visit(*force, &predicate, &mut found);
        }
        found
    }

    fn visit(
        &self,
        id: NodeId,
        predicate: &impl Fn(InstanceRef<'_>) -> bool,
        found: &mut Vec<NodeId>,
    ) {
        if predicate(self.instance(id)) {
            found.push(id);
        }
        for child in self.children_of(id) {
            self.visit(child, predicate, found);
        }
    }

    pub(crate) fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        match &self.nodes[id.0].kind {
            NodeKind::Force(node) => node.selections.clone(),
            NodeKind::Entry(node) => {
                node.entries.iter().chain(node.groups.iter()).copied().collect()
            }
            NodeKind::Group(node) => {
                node.entries.iter().chain(node.groups.iter()).copied().collect()
            }
        }
    }

    pub(crate) fn selected_of(&self, id: NodeId) -> u32 {
        match &self.nodes[id.0].kind {
            NodeKind::Force(_) => 1,
            NodeKind::Entry(node) => node.selected,
            // A group's selected total is the sum over its subtree, so
            // choices living in nested subgroups still count.
            NodeKind::Group(node) => node
                .entries
                .iter()
                .chain(node.groups.iter())
                .map(|child| self.selected_of(*child))
                .sum(),
        }
    }

    /// Total selected count across every entry instance.
    pub fn selected_total(&self) -> u32 {
        self.nodes
            .iter()
            .map(|node| match &node.kind {
                NodeKind::Entry(entry) => entry.selected,
                _ => 0,
            })
            .sum()
    }

    /// Roster-wide total for one cost type: selected count times resolved
    /// cost value, summed over every entry carrying that cost.
    pub fn cost_total(&self, type_id: &Identifier) -> f64 {
        self.nodes
            .iter()
            .map(|node| match &node.kind {
                NodeKind::Entry(entry) => entry
                    .costs
                    .iter()
                    .filter(|cost| &cost.cost.type_id == type_id)
                    .map(|cost| f64::from(entry.selected) * cost.value())
                    .sum(),
                _ => 0.0,
            })
            .sum()
    }

    /// All validation errors of the last pass, roster-level first.
    pub fn validation_report(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        for error in &self.errors {
            report.push(ValidationSeverity::Error, self.name.clone(), error.clone());
        }
        for force in &self.force_ids {
            self.collect_errors(*force, &mut report);
        }
        report
    }

    fn collect_errors(&self, id: NodeId, report: &mut ValidationReport) {
        let instance = self.instance(id);
        for error in instance.errors() {
            report.push(ValidationSeverity::Error, instance.name(), error.clone());
        }
        for child in self.children_of(id) {
            self.collect_errors(child, report);
        }
    }

    /// Read-only snapshot for rendering or persistence collaborators.
    pub fn summary(&self) -> RosterSummary {
        RosterSummary {
            name: self.name.clone(),
            game_system: self.game_system.name.clone(),
            cost_totals: self
                .game_system
                .cost_types
                .iter()
                .map(|cost_type| CostTotal {
                    name: cost_type.name.clone(),
                    value: self.cost_total(&cost_type.id),
                })
                .collect(),
            errors: self.errors.clone(),
            forces: self
                .force_ids
                .iter()
                .map(|force| {
                    let instance = self.instance(*force);
                    ForceSummary {
                        name: instance.name().to_string(),
                        errors: instance.errors().to_vec(),
                        selections: self
                            .children_of(*force)
                            .iter()
                            .map(|child| self.summarize(*child))
                            .collect(),
                    }
                })
                .collect(),
        }
    }

    fn summarize(&self, id: NodeId) -> NodeSummary {
        let instance = self.instance(id);
        NodeSummary {
            name: instance.name().to_string(),
            kind: instance.kind_name(),
            hidden: instance.is_hidden(),
            selected: instance.selected(),
            min: instance.min(),
            max: instance.max(),
            errors: instance.errors().to_vec(),
            children: self
                .children_of(id)
                .iter()
                .map(|child| self.summarize(*child))
                .collect(),
        }
    }
}

/// Read view over one instance node.
#[derive(Clone, Copy)]
pub struct InstanceRef<'a> {
    roster: &'a Roster,
    id: NodeId,
}

impl<'a> InstanceRef<'a> {
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<InstanceRef<'a>> {
        self.roster.nodes[self.id.0]
            .parent
            .map(|parent| self.roster.instance(parent))
    }

    pub fn children(&self) -> Vec<InstanceRef<'a>> {
        self.roster
            .children_of(self.id)
            .into_iter()
            .map(|child| self.roster.instance(child))
            .collect()
    }

    fn kind(&self) -> &'a NodeKind {
        &self.roster.nodes[self.id.0].kind
    }

    pub fn is_force(&self) -> bool {
        matches!(self.kind(), NodeKind::Force(_))
    }

    pub fn is_entry(&self) -> bool {
        matches!(self.kind(), NodeKind::Entry(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind(), NodeKind::Group(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind() {
            NodeKind::Force(_) => "force",
            NodeKind::Entry(_) => "selectionEntry",
            NodeKind::Group(_) => "selectionEntryGroup",
        }
    }

    /// Identity of this occurrence (link id when the wrapped definition
    /// came through a link).
    pub fn id(&self) -> &'a Identifier {
        match self.kind() {
            NodeKind::Force(node) => &node.force.id,
            NodeKind::Entry(node) => node.handle.id(),
            NodeKind::Group(node) => node.handle.id(),
        }
    }

    /// Identity of the shared definition behind this node.
    pub fn definition_id(&self) -> &'a Identifier {
        match self.kind() {
            NodeKind::Force(node) => &node.force.id,
            NodeKind::Entry(node) => node.handle.definition_id(),
            NodeKind::Group(node) => node.handle.definition_id(),
        }
    }

    pub fn matches(&self, id: &Identifier) -> bool {
        self.id() == id || self.definition_id() == id
    }

    pub fn name(&self) -> &'a str {
        match self.kind() {
            NodeKind::Force(node) => &node.force.name,
            NodeKind::Entry(node) => node
                .name_override
                .as_deref()
                .unwrap_or_else(|| node.handle.name()),
            NodeKind::Group(node) => node.handle.name(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        match self.kind() {
            NodeKind::Force(node) => node.force.hidden,
            NodeKind::Entry(node) => node.hidden_override.unwrap_or_else(|| node.handle.hidden()),
            NodeKind::Group(node) => node.hidden_override.unwrap_or_else(|| node.handle.hidden()),
        }
    }

    pub fn selected(&self) -> u32 {
        self.roster.selected_of(self.id)
    }

    pub fn min(&self) -> Option<i64> {
        match self.kind() {
            NodeKind::Force(_) => None,
            NodeKind::Entry(node) => node.min,
            NodeKind::Group(node) => node.min,
        }
    }

    pub fn max(&self) -> Option<i64> {
        match self.kind() {
            NodeKind::Force(_) => None,
            NodeKind::Entry(node) => node.max,
            NodeKind::Group(node) => node.max,
        }
    }

    pub fn errors(&self) -> &'a [String] {
        match self.kind() {
            NodeKind::Force(node) => &node.errors,
            NodeKind::Entry(node) => &node.errors,
            NodeKind::Group(node) => &node.errors,
        }
    }

    pub fn constraints(&self) -> &'a [ConstraintInstance] {
        match self.kind() {
            NodeKind::Force(_) => &[],
            NodeKind::Entry(node) => &node.constraints,
            NodeKind::Group(node) => &node.constraints,
        }
    }

    pub fn costs(&self) -> &'a [CostInstance] {
        match self.kind() {
            NodeKind::Entry(node) => &node.costs,
            _ => &[],
        }
    }
}

/// Serializable snapshot of a whole roster.
#[derive(Debug, Clone, Serialize)]
pub struct RosterSummary {
    pub name: String,
    pub game_system: String,
    pub cost_totals: Vec<CostTotal>,
    pub errors: Vec<String>,
    pub forces: Vec<ForceSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostTotal {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForceSummary {
    pub name: String,
    pub errors: Vec<String>,
    pub selections: Vec<NodeSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub name: String,
    pub kind: &'static str,
    pub hidden: bool,
    pub selected: u32,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub errors: Vec<String>,
    pub children: Vec<NodeSummary>,
}
