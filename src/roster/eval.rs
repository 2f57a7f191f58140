//! The rule evaluator. `compute_state` re-derives every computed field of
//! a roster from its current selections: one pre-order pass that applies
//! constraints, then modifiers, at each node before descending into child
//! entries and child groups.
//!
//! The condition language is interpreted strictly: a `(field, scope)`
//! pairing or comparator outside the supported table is a fatal
//! [`EvalError`], never a silent skip. Constraint violations, by
//! contrast, are ordinary validation errors on the affected instance.

use std::sync::Arc;

use tracing::warn;

use crate::data::condition::{Comparator, Condition, ConditionGroup, GroupOperator};
use crate::data::constraint::{Constraint, ConstraintKind};
use crate::data::modifier::{Modifier, ModifierField, ModifierOp};
use crate::error::EvalError;
use crate::ident::Identifier;
use crate::roster::{NodeId, NodeKind, Roster};

pub(crate) fn compute_state(roster: &mut Roster) -> Result<(), EvalError> {
    reset(roster);

    for force in roster.force_ids.clone() {
        let selections = match &roster.nodes[force.0].kind {
            NodeKind::Force(node) => node.selections.clone(),
            _ => Vec::new(),
        };
        for selection in selections {
            eval_node(roster, selection)?;
        }
    }

    let report = roster.validation_report();
    if report.has_errors() {
        warn!(
            roster = roster.name(),
            errors = report.diagnostics.len(),
            "compute pass ended with validation errors"
        );
    }
    Ok(())
}

/// Errors and bounds are recomputed from scratch every pass. Constraint
/// and cost value overrides persist; `set` modifiers rewrite them either
/// way each pass.
fn reset(roster: &mut Roster) {
    roster.errors.clear();
    roster.min = None;
    roster.max = None;
    for node in &mut roster.nodes {
        match &mut node.kind {
            NodeKind::Force(force) => force.errors.clear(),
            NodeKind::Entry(entry) => {
                entry.errors.clear();
                entry.min = None;
                entry.max = None;
            }
            NodeKind::Group(group) => {
                group.errors.clear();
                group.min = None;
                group.max = None;
            }
        }
    }
}

fn eval_node(roster: &mut Roster, id: NodeId) -> Result<(), EvalError> {
    apply_constraints(roster, id)?;
    apply_modifiers(roster, id)?;

    let (entries, groups) = match &roster.nodes[id.0].kind {
        NodeKind::Entry(node) => (node.entries.clone(), node.groups.clone()),
        NodeKind::Group(node) => (node.entries.clone(), node.groups.clone()),
        NodeKind::Force(_) => (Vec::new(), Vec::new()),
    };
    for child in entries {
        eval_node(roster, child)?;
    }
    for child in groups {
        eval_node(roster, child)?;
    }
    Ok(())
}

fn constraints_of(roster: &Roster, id: NodeId) -> Vec<(Arc<Constraint>, f64)> {
    let instances = match &roster.nodes[id.0].kind {
        NodeKind::Entry(node) => &node.constraints,
        NodeKind::Group(node) => &node.constraints,
        NodeKind::Force(_) => return Vec::new(),
    };
    instances
        .iter()
        .map(|instance| (Arc::clone(&instance.constraint), instance.value()))
        .collect()
}

fn apply_constraints(roster: &mut Roster, id: NodeId) -> Result<(), EvalError> {
    for (constraint, value) in constraints_of(roster, id) {
        let valid = all_conditions_hold(
            roster,
            id,
            &constraint.conditions,
            &constraint.condition_groups,
        )?;
        if !valid {
            continue;
        }
        let bound = value as i64;
        match constraint.scope.as_str() {
            "force" => {
                // Aggregated over every instance of the same shared
                // definition, wherever it sits in the roster.
                let shared = roster.instance(id).definition_id().clone();
                let total = f64::from(shared_selected_total(roster, &shared));
                set_bound(roster, id, constraint.kind, bound);
                if let Some(message) = violation(constraint.kind, total, value) {
                    push_error(roster, id, message);
                }
            }
            "parent" => {
                let total = f64::from(roster.selected_of(id));
                set_bound(roster, id, constraint.kind, bound);
                if let Some(message) = violation(constraint.kind, total, value) {
                    push_error(roster, id, message);
                }
            }
            "roster" => {
                let total = roster_total(roster, &constraint);
                match constraint.kind {
                    ConstraintKind::Min => roster.min = Some(bound),
                    ConstraintKind::Max => roster.max = Some(bound),
                }
                if let Some(message) = violation(constraint.kind, total, value) {
                    roster.errors.push(message);
                }
            }
            other => return Err(EvalError::UnhandledScope(other.to_string())),
        }
    }
    Ok(())
}

/// Roster totals compare selected counts, except when the constraint's
/// field names a cost type; then the roster's cost total for that type is
/// the measured quantity. Cost totals stay fractional so a part-point
/// overrun still trips the bound.
fn roster_total(roster: &Roster, constraint: &Constraint) -> f64 {
    if Identifier::is_id_shaped(&constraint.field) {
        let type_id = Identifier::new(&constraint.field);
        if roster.game_system().find_cost_type(&type_id).is_some() {
            return roster.cost_total(&type_id);
        }
    }
    f64::from(roster.selected_total())
}

fn shared_selected_total(roster: &Roster, shared: &Identifier) -> u32 {
    roster
        .find_instances(|instance| instance.is_entry() && instance.definition_id() == shared)
        .into_iter()
        .map(|node| roster.selected_of(node))
        .sum()
}

fn set_bound(roster: &mut Roster, id: NodeId, kind: ConstraintKind, bound: i64) {
    let (min, max) = match &mut roster.nodes[id.0].kind {
        NodeKind::Entry(node) => (&mut node.min, &mut node.max),
        NodeKind::Group(node) => (&mut node.min, &mut node.max),
        NodeKind::Force(_) => return,
    };
    match kind {
        ConstraintKind::Min => *min = Some(bound),
        ConstraintKind::Max => *max = Some(bound),
    }
}

fn violation(kind: ConstraintKind, total: f64, bound: f64) -> Option<String> {
    match kind {
        ConstraintKind::Min if total < bound => Some(format!(
            "min constraint violated: {total} selected, at least {bound} required"
        )),
        ConstraintKind::Max if total > bound => Some(format!(
            "max constraint violated: {total} selected, at most {bound} allowed"
        )),
        _ => None,
    }
}

fn push_error(roster: &mut Roster, id: NodeId, message: String) {
    match &mut roster.nodes[id.0].kind {
        NodeKind::Force(node) => node.errors.push(message),
        NodeKind::Entry(node) => node.errors.push(message),
        NodeKind::Group(node) => node.errors.push(message),
    }
}

fn modifiers_of(roster: &Roster, id: NodeId) -> Vec<Modifier> {
    match &roster.nodes[id.0].kind {
        NodeKind::Entry(node) => node.handle.modifiers().cloned().collect(),
        NodeKind::Group(node) => node.handle.modifiers().cloned().collect(),
        NodeKind::Force(_) => Vec::new(),
    }
}

fn apply_modifiers(roster: &mut Roster, id: NodeId) -> Result<(), EvalError> {
    for modifier in modifiers_of(roster, id) {
        let valid = all_conditions_hold(
            roster,
            id,
            &modifier.conditions,
            &modifier.condition_groups,
        )?;
        apply_modifier(roster, id, &modifier, valid)?;
    }
    Ok(())
}

/// `set` is asymmetric on purpose: a valid pass writes the override, an
/// invalid pass actively clears it back to the definition value.
fn apply_modifier(
    roster: &mut Roster,
    id: NodeId,
    modifier: &Modifier,
    valid: bool,
) -> Result<(), EvalError> {
    match modifier.op {
        ModifierOp::Set => match &modifier.field {
            ModifierField::Hidden => {
                let hidden = valid.then(|| modifier.value == "true");
                match &mut roster.nodes[id.0].kind {
                    NodeKind::Entry(node) => node.hidden_override = hidden,
                    NodeKind::Group(node) => node.hidden_override = hidden,
                    NodeKind::Force(_) => {}
                }
                Ok(())
            }
            ModifierField::Name => {
                let name = valid.then(|| interpolate_name(&modifier.value, roster.selected_of(id)));
                match &mut roster.nodes[id.0].kind {
                    NodeKind::Entry(node) => {
                        node.name_override = name;
                        Ok(())
                    }
                    _ => Err(EvalError::UnimplementedModifier {
                        operation: modifier.op.as_str(),
                        field: modifier.field.to_string(),
                    }),
                }
            }
            ModifierField::Reference(target) => {
                let value = valid.then(|| parse_number(&modifier.value));
                write_reference(roster, id, target, |_| value)
            }
            ModifierField::Unsupported(_) => Err(EvalError::UnimplementedModifier {
                operation: modifier.op.as_str(),
                field: modifier.field.to_string(),
            }),
        },
        ModifierOp::Increment | ModifierOp::Decrement => match &modifier.field {
            ModifierField::Reference(target) => {
                let delta = match modifier.op {
                    ModifierOp::Decrement => -parse_number(&modifier.value),
                    _ => parse_number(&modifier.value),
                };
                write_reference(roster, id, target, |current| {
                    valid.then(|| current + delta)
                })
            }
            _ => Err(EvalError::UnimplementedModifier {
                operation: modifier.op.as_str(),
                field: modifier.field.to_string(),
            }),
        },
        ModifierOp::Add | ModifierOp::Append | ModifierOp::Remove | ModifierOp::SetPrimary => {
            Err(EvalError::UnimplementedModifier {
                operation: modifier.op.as_str(),
                field: modifier.field.to_string(),
            })
        }
    }
}

/// An id-shaped modifier field names either a constraint or a cost on the
/// carrying node; constraints are checked first. No match is fatal.
fn write_reference(
    roster: &mut Roster,
    id: NodeId,
    target: &Identifier,
    new_value: impl Fn(f64) -> Option<f64>,
) -> Result<(), EvalError> {
    let (constraints, costs) = match &mut roster.nodes[id.0].kind {
        NodeKind::Entry(node) => (&mut node.constraints, Some(&mut node.costs)),
        NodeKind::Group(node) => (&mut node.constraints, None),
        NodeKind::Force(_) => {
            return Err(EvalError::UnknownModifierTarget { id: target.clone() })
        }
    };
    if let Some(instance) = constraints
        .iter_mut()
        .find(|instance| &instance.constraint.id == target)
    {
        let value = new_value(instance.value());
        instance.set_value(value);
        return Ok(());
    }
    if let Some(costs) = costs {
        if let Some(instance) = costs
            .iter_mut()
            .find(|instance| &instance.cost.type_id == target)
        {
            let value = new_value(instance.value());
            instance.set_value(value);
            return Ok(());
        }
    }
    Err(EvalError::UnknownModifierTarget { id: target.clone() })
}

fn parse_number(raw: &str) -> f64 {
    raw.parse().unwrap_or(0.0)
}

/// `1x Something` interpolates the current selected count into the name.
fn interpolate_name(value: &str, selected: u32) -> String {
    match value.strip_prefix("1x ") {
        Some(rest) => format!("{selected}x {rest}"),
        None => value.to_string(),
    }
}

fn all_conditions_hold(
    roster: &Roster,
    id: NodeId,
    conditions: &[Condition],
    groups: &[ConditionGroup],
) -> Result<bool, EvalError> {
    for condition in conditions {
        if !condition_holds(roster, id, condition)? {
            return Ok(false);
        }
    }
    for group in groups {
        if !group_holds(roster, id, group)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// `and` over an empty group is vacuously true, `or` vacuously false.
fn group_holds(roster: &Roster, id: NodeId, group: &ConditionGroup) -> Result<bool, EvalError> {
    match group.operator {
        GroupOperator::And => {
            for condition in &group.conditions {
                if !condition_holds(roster, id, condition)? {
                    return Ok(false);
                }
            }
            for nested in &group.groups {
                if !group_holds(roster, id, nested)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        GroupOperator::Or => {
            for condition in &group.conditions {
                if condition_holds(roster, id, condition)? {
                    return Ok(true);
                }
            }
            for nested in &group.groups {
                if group_holds(roster, id, nested)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn condition_holds(roster: &Roster, id: NodeId, condition: &Condition) -> Result<bool, EvalError> {
    let unhandled_comparator = || {
        Err(EvalError::UnhandledComparator {
            comparator: condition.comparator.as_str(),
            field: condition.field.clone(),
            scope: condition.scope.clone(),
        })
    };

    if condition.field == "selections" {
        match condition.scope.as_str() {
            // Number of selected instances carrying a category link to the
            // named category, roster-wide.
            "force" => {
                let count = f64::from(category_member_count(roster, &condition.child_id));
                return match condition.comparator {
                    Comparator::EqualTo => Ok(count == condition.value),
                    Comparator::AtLeast => Ok(count >= condition.value),
                    _ => unhandled_comparator(),
                };
            }
            // Does this node, or any selection above it, claim the named
            // category.
            "ancestor" => {
                let found = self_or_ancestor_has_category(roster, id, &condition.child_id);
                return match condition.comparator {
                    Comparator::InstanceOf => Ok(found),
                    Comparator::NotInstanceOf => Ok(!found),
                    _ => unhandled_comparator(),
                };
            }
            // Immediate parent only, never any further ancestor.
            "parent" => {
                let count = match roster.instance(id).parent() {
                    Some(parent) if parent.matches(&condition.child_id) => 1.0,
                    _ => 0.0,
                };
                return match condition.comparator {
                    Comparator::InstanceOf => Ok(count == 1.0),
                    Comparator::NotInstanceOf => Ok(count == 0.0),
                    Comparator::EqualTo => Ok(count == condition.value),
                    Comparator::AtLeast => Ok(count >= condition.value),
                    Comparator::GreaterThan => Ok(count > condition.value),
                    _ => unhandled_comparator(),
                };
            }
            // The top-level pick under the force this node sits in.
            "primary-category" => {
                let found = root_selection_has_primary(roster, id, &condition.child_id);
                return match condition.comparator {
                    Comparator::InstanceOf => Ok(found),
                    Comparator::NotInstanceOf => Ok(!found),
                    _ => unhandled_comparator(),
                };
            }
            scope if Identifier::is_id_shaped(scope) => {
                let scope_id = Identifier::new(scope);
                let total = f64::from(scoped_selected_total(roster, &scope_id, &condition.child_id));
                return match condition.comparator {
                    Comparator::InstanceOf => Ok(total == 1.0),
                    Comparator::NotInstanceOf => Ok(total == 0.0),
                    Comparator::EqualTo => Ok(total == condition.value),
                    Comparator::AtLeast => Ok(total >= condition.value),
                    Comparator::LessThan => Ok(total < condition.value),
                    Comparator::GreaterThan => Ok(total > condition.value),
                    _ => unhandled_comparator(),
                };
            }
            _ => {}
        }
    }

    if condition.field == "forces" && condition.scope == "roster" {
        let count = roster.forces().len() as f64;
        return match condition.comparator {
            Comparator::EqualTo => Ok(count == condition.value),
            Comparator::AtLeast => Ok(count >= condition.value),
            Comparator::GreaterThan => Ok(count > condition.value),
            Comparator::LessThan => Ok(count < condition.value),
            _ => unhandled_comparator(),
        };
    }

    Err(EvalError::UnhandledCondition {
        field: condition.field.clone(),
        scope: condition.scope.clone(),
        child_id: condition.child_id.clone(),
    })
}

fn category_member_count(roster: &Roster, category: &Identifier) -> u32 {
    roster
        .find_instances(|instance| {
            instance.is_entry()
                && instance.selected() > 0
                && node_has_category(roster, instance.node_id(), category)
        })
        .len() as u32
}

fn node_has_category(roster: &Roster, id: NodeId, category: &Identifier) -> bool {
    match &roster.nodes[id.0].kind {
        NodeKind::Entry(node) => node
            .handle
            .category_links()
            .any(|link| &link.target_id == category),
        _ => false,
    }
}

fn self_or_ancestor_has_category(roster: &Roster, id: NodeId, category: &Identifier) -> bool {
    let mut current = Some(id);
    while let Some(node) = current {
        if node_has_category(roster, node, category) {
            return true;
        }
        current = roster.nodes[node.0].parent;
    }
    false
}

/// Walk up to the selection directly under a force, then test its primary
/// category link.
fn root_selection_has_primary(roster: &Roster, id: NodeId, category: &Identifier) -> bool {
    let mut current = id;
    while let Some(parent) = roster.nodes[current.0].parent {
        if matches!(roster.nodes[parent.0].kind, NodeKind::Force(_)) {
            break;
        }
        current = parent;
    }
    match &roster.nodes[current.0].kind {
        NodeKind::Entry(node) => node
            .handle
            .category_links()
            .any(|link| link.primary && &link.target_id == category),
        _ => false,
    }
}

/// Selected total of `child_id` instances inside subtrees rooted at nodes
/// sharing the scope id.
fn scoped_selected_total(roster: &Roster, scope: &Identifier, child_id: &Identifier) -> u32 {
    let roots = roster.find_instances(|instance| instance.definition_id() == scope);
    let mut total = 0;
    for root in roots {
        total += subtree_selected(roster, root, child_id);
    }
    total
}

fn subtree_selected(roster: &Roster, id: NodeId, child_id: &Identifier) -> u32 {
    let mut total = 0;
    if let NodeKind::Entry(node) = &roster.nodes[id.0].kind {
        if node.handle.definition_id() == child_id {
            total += node.selected;
        }
    }
    for child in roster.children_of(id) {
        total += subtree_selected(roster, child, child_id);
    }
    total
}
