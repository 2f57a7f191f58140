//! Selection-count constraints: declarative min/max bounds whose
//! aggregation domain is named by `scope` (`parent`, `force`, `roster`).

use crate::data::condition::{Condition, ConditionGroup};
use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Min,
    Max,
}

impl ConstraintKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "min" => Some(ConstraintKind::Min),
            "max" => Some(ConstraintKind::Max),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Min => "min",
            ConstraintKind::Max => "max",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Constraint {
    pub id: Identifier,
    /// `selections`, or a cost-type id for roster-scoped cost limits.
    pub field: String,
    pub scope: String,
    pub value: f64,
    pub percent_value: bool,
    pub shared: bool,
    pub include_child_selections: bool,
    pub include_child_forces: bool,
    pub kind: ConstraintKind,
    pub conditions: Vec<Condition>,
    pub condition_groups: Vec<ConditionGroup>,
}

impl Constraint {
    pub const ELEMENT: &'static str = "constraint";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut constraint = Constraint {
            id: element.attribute("id").as_identifier()?,
            field: element.attribute("field").as_string()?,
            scope: element.attribute("scope").as_string()?,
            value: element.attribute("value").as_f64()?,
            percent_value: element.attribute("percentValue").as_bool()?,
            shared: element.attribute("shared").as_bool()?,
            include_child_selections: element.attribute("includeChildSelections").as_bool()?,
            include_child_forces: element.attribute("includeChildForces").as_bool()?,
            kind: element
                .attribute("type")
                .as_enum("constraint type", ConstraintKind::parse)?,
            conditions: Vec::new(),
            condition_groups: Vec::new(),
        };

        for child in element.children_at("conditions/condition") {
            constraint.conditions.push(Condition::from_xml(child)?);
        }
        for child in element.children_at("conditionGroups/conditionGroup") {
            constraint
                .condition_groups
                .push(ConditionGroup::from_xml(child)?);
        }

        Ok(constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_min_constraint() {
        let element = Element::from_str(
            r#"<constraint id="1111-2222-3333-4444" field="selections" scope="parent" value="1.0" type="min"/>"#,
        )
        .unwrap();
        let constraint = Constraint::from_xml(&element).unwrap();
        assert_eq!(constraint.kind, ConstraintKind::Min);
        assert_eq!(constraint.scope, "parent");
        assert_eq!(constraint.value, 1.0);
        assert!(constraint.conditions.is_empty());
    }

    #[test]
    fn unknown_kind_is_malformed() {
        let element = Element::from_str(
            r#"<constraint id="1111-2222-3333-4444" field="selections" scope="parent" value="1" type="exactly"/>"#,
        )
        .unwrap();
        assert!(matches!(
            Constraint::from_xml(&element),
            Err(DataError::InvalidValue { .. })
        ));
    }
}
