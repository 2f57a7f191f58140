//! Conditions and condition groups: the declarative predicates modifiers
//! and constraints attach to. This module is pure data; interpretation
//! against a live roster happens in the evaluator.

use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

/// Comparison operator carried by a condition. Which comparators are
/// meaningful depends on the `(field, scope)` combination; the evaluator
/// rejects unsupported pairings as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    AtLeast,
    EqualTo,
    NotEqualTo,
    GreaterThan,
    LessThan,
    InstanceOf,
    NotInstanceOf,
}

impl Comparator {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "atLeast" => Some(Comparator::AtLeast),
            "equalTo" => Some(Comparator::EqualTo),
            "notEqualTo" => Some(Comparator::NotEqualTo),
            "greaterThan" => Some(Comparator::GreaterThan),
            "lessThan" => Some(Comparator::LessThan),
            "instanceOf" => Some(Comparator::InstanceOf),
            "notInstanceOf" => Some(Comparator::NotInstanceOf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::AtLeast => "atLeast",
            Comparator::EqualTo => "equalTo",
            Comparator::NotEqualTo => "notEqualTo",
            Comparator::GreaterThan => "greaterThan",
            Comparator::LessThan => "lessThan",
            Comparator::InstanceOf => "instanceOf",
            Comparator::NotInstanceOf => "notInstanceOf",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Condition {
    pub field: String,
    pub scope: String,
    pub value: f64,
    pub percent_value: bool,
    pub shared: bool,
    pub include_child_selections: bool,
    pub include_child_forces: bool,
    pub child_id: Identifier,
    pub comparator: Comparator,
}

impl Condition {
    pub const ELEMENT: &'static str = "condition";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        Ok(Condition {
            field: element.attribute("field").as_string()?,
            scope: element.attribute("scope").as_string()?,
            value: element.attribute("value").as_f64()?,
            percent_value: element.attribute("percentValue").as_bool()?,
            shared: element.attribute("shared").as_bool()?,
            include_child_selections: element.attribute("includeChildSelections").as_bool()?,
            include_child_forces: element.attribute("includeChildForces").as_bool()?,
            child_id: element.attribute("childId").as_identifier()?,
            comparator: element
                .attribute("type")
                .as_enum("condition type", Comparator::parse)?,
        })
    }
}

/// How a group combines its children: `and` requires all to hold (vacuously
/// true when empty), `or` requires any (vacuously false when empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOperator {
    And,
    Or,
}

impl GroupOperator {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "and" => Some(GroupOperator::And),
            "or" => Some(GroupOperator::Or),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConditionGroup {
    pub operator: GroupOperator,
    pub conditions: Vec<Condition>,
    pub groups: Vec<ConditionGroup>,
}

impl ConditionGroup {
    pub const ELEMENT: &'static str = "conditionGroup";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut group = ConditionGroup {
            operator: element
                .attribute("type")
                .as_enum("condition group type", GroupOperator::parse)?,
            conditions: Vec::new(),
            groups: Vec::new(),
        };

        for child in element.children_at("conditions/condition") {
            group.conditions.push(Condition::from_xml(child)?);
        }
        for child in element.children_at("conditionGroups/conditionGroup") {
            group.groups.push(ConditionGroup::from_xml(child)?);
        }

        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_condition_attributes() {
        let element = Element::from_str(
            r#"<condition field="selections" scope="ancestor" value="1.0" childId="aaaa-bbbb-cccc-dddd" type="instanceOf"/>"#,
        )
        .unwrap();
        let condition = Condition::from_xml(&element).unwrap();
        assert_eq!(condition.field, "selections");
        assert_eq!(condition.scope, "ancestor");
        assert_eq!(condition.comparator, Comparator::InstanceOf);
        assert_eq!(condition.child_id.value(), "aaaa-bbbb-cccc-dddd");
        assert!(!condition.shared);
    }

    #[test]
    fn rejects_wrong_element() {
        let element = Element::from_str(r#"<constraint type="min"/>"#).unwrap();
        assert!(matches!(
            Condition::from_xml(&element),
            Err(DataError::UnexpectedNode { .. })
        ));
    }

    #[test]
    fn parses_nested_groups() {
        let element = Element::from_str(
            r#"<conditionGroup type="or">
                 <conditions>
                   <condition field="forces" scope="roster" value="2" childId="any" type="atLeast"/>
                 </conditions>
                 <conditionGroups>
                   <conditionGroup type="and"/>
                 </conditionGroups>
               </conditionGroup>"#,
        )
        .unwrap();
        let group = ConditionGroup::from_xml(&element).unwrap();
        assert_eq!(group.operator, GroupOperator::Or);
        assert_eq!(group.conditions.len(), 1);
        assert_eq!(group.groups.len(), 1);
        assert_eq!(group.groups[0].operator, GroupOperator::And);
    }
}
