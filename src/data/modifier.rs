//! Modifiers: conditional writes against instance state. The raw `field`
//! string is classified once at build time into [`ModifierField`]; the
//! evaluator then dispatches on the enum instead of re-parsing strings.

use std::fmt;

use crate::data::condition::{Condition, ConditionGroup};
use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

/// Operation kinds the data format declares. Only `set`, `increment` and
/// `decrement` are covered by this engine; the rest parse but are fatal to
/// apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierOp {
    Set,
    Increment,
    Decrement,
    Add,
    Append,
    Remove,
    SetPrimary,
}

impl ModifierOp {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "set" => Some(ModifierOp::Set),
            "increment" => Some(ModifierOp::Increment),
            "decrement" => Some(ModifierOp::Decrement),
            "add" => Some(ModifierOp::Add),
            "append" => Some(ModifierOp::Append),
            "remove" => Some(ModifierOp::Remove),
            "set-primary" => Some(ModifierOp::SetPrimary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierOp::Set => "set",
            ModifierOp::Increment => "increment",
            ModifierOp::Decrement => "decrement",
            ModifierOp::Add => "add",
            ModifierOp::Append => "append",
            ModifierOp::Remove => "remove",
            ModifierOp::SetPrimary => "set-primary",
        }
    }
}

/// Where a modifier writes. An id-shaped field names a constraint or cost
/// on the target; which of the two is resolved at apply time since the id
/// alone cannot tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifierField {
    Hidden,
    Name,
    Reference(Identifier),
    /// A literal field this engine does not implement; fatal when applied.
    Unsupported(String),
}

impl ModifierField {
    pub fn classify(raw: &str) -> Self {
        if Identifier::is_id_shaped(raw) {
            return ModifierField::Reference(Identifier::new(raw));
        }
        match raw {
            "hidden" => ModifierField::Hidden,
            "name" => ModifierField::Name,
            other => ModifierField::Unsupported(other.to_string()),
        }
    }
}

impl fmt::Display for ModifierField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifierField::Hidden => write!(f, "hidden"),
            ModifierField::Name => write!(f, "name"),
            ModifierField::Reference(id) => write!(f, "{id}"),
            ModifierField::Unsupported(raw) => write!(f, "{raw}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Modifier {
    pub op: ModifierOp,
    pub field: ModifierField,
    pub value: String,
    pub conditions: Vec<Condition>,
    pub condition_groups: Vec<ConditionGroup>,
}

impl Modifier {
    pub const ELEMENT: &'static str = "modifier";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut modifier = Modifier {
            op: element
                .attribute("type")
                .as_enum("modifier type", ModifierOp::parse)?,
            field: ModifierField::classify(element.attribute("field").as_str()?),
            value: element.attribute("value").as_string()?,
            conditions: Vec::new(),
            condition_groups: Vec::new(),
        };

        for child in element.children_at("conditions/condition") {
            modifier.conditions.push(Condition::from_xml(child)?);
        }
        for child in element.children_at("conditionGroups/conditionGroup") {
            modifier
                .condition_groups
                .push(ConditionGroup::from_xml(child)?);
        }

        Ok(modifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_fields_at_build_time() {
        assert_eq!(ModifierField::classify("hidden"), ModifierField::Hidden);
        assert_eq!(ModifierField::classify("name"), ModifierField::Name);
        assert_eq!(
            ModifierField::classify("38fe-f863-513a-9012"),
            ModifierField::Reference(Identifier::new("38fe-f863-513a-9012"))
        );
        assert!(matches!(
            ModifierField::classify("category"),
            ModifierField::Unsupported(_)
        ));
    }

    #[test]
    fn parses_modifier_with_conditions() {
        let element = Element::from_str(
            r#"<modifier type="set" field="hidden" value="true">
                 <conditions>
                   <condition field="selections" scope="parent" value="0" childId="aaaa-bbbb-cccc-dddd" type="notInstanceOf"/>
                 </conditions>
               </modifier>"#,
        )
        .unwrap();
        let modifier = Modifier::from_xml(&element).unwrap();
        assert_eq!(modifier.op, ModifierOp::Set);
        assert_eq!(modifier.field, ModifierField::Hidden);
        assert_eq!(modifier.value, "true");
        assert_eq!(modifier.conditions.len(), 1);
    }
}
