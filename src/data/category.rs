//! Categories: the tagging layer. Category entries declare a tag, category
//! links attach a tag to an entry (at most one marked primary).

use crate::data::constraint::Constraint;
use crate::data::modifier::Modifier;
use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

#[derive(Debug, Clone)]
pub struct CategoryEntry {
    pub id: Identifier,
    pub name: String,
    pub hidden: bool,
    pub constraints: Vec<Constraint>,
    pub modifiers: Vec<Modifier>,
}

impl CategoryEntry {
    pub const ELEMENT: &'static str = "categoryEntry";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut entry = CategoryEntry {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            hidden: element.attribute("hidden").as_bool()?,
            constraints: Vec::new(),
            modifiers: Vec::new(),
        };
        for child in element.children_at("constraints/constraint") {
            entry.constraints.push(Constraint::from_xml(child)?);
        }
        for child in element.children_at("modifiers/modifier") {
            entry.modifiers.push(Modifier::from_xml(child)?);
        }
        Ok(entry)
    }
}

/// Attaches a category to the entry that carries the link.
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub id: Identifier,
    pub name: String,
    pub hidden: bool,
    pub target_id: Identifier,
    pub primary: bool,
    pub modifiers: Vec<Modifier>,
}

impl CategoryLink {
    pub const ELEMENT: &'static str = "categoryLink";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut link = CategoryLink {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            hidden: element.attribute("hidden").as_bool()?,
            target_id: element.attribute("targetId").as_identifier()?,
            primary: element.attribute("primary").as_bool()?,
            modifiers: Vec::new(),
        };
        for child in element.children_at("modifiers/modifier") {
            link.modifiers.push(Modifier::from_xml(child)?);
        }
        Ok(link)
    }
}
