//! Force entries: the detachment shapes a game system offers. A force
//! carries the category links its selections may claim, plus constraints
//! and modifiers of its own.

use std::sync::Arc;

use crate::data::category::CategoryLink;
use crate::data::constraint::Constraint;
use crate::data::modifier::Modifier;
use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

#[derive(Debug, Clone)]
pub struct ForceEntry {
    pub id: Identifier,
    pub name: String,
    pub hidden: bool,
    pub category_links: Vec<CategoryLink>,
    pub constraints: Vec<Arc<Constraint>>,
    pub modifiers: Vec<Modifier>,
}

impl ForceEntry {
    pub const ELEMENT: &'static str = "forceEntry";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut force = ForceEntry {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            hidden: element.attribute("hidden").as_bool()?,
            category_links: Vec::new(),
            constraints: Vec::new(),
            modifiers: Vec::new(),
        };
        for child in element.children_at("categoryLinks/categoryLink") {
            force.category_links.push(CategoryLink::from_xml(child)?);
        }
        for child in element.children_at("modifiers/modifier") {
            force.modifiers.push(Modifier::from_xml(child)?);
        }
        for child in element.children_at("constraints/constraint") {
            force.constraints.push(Arc::new(Constraint::from_xml(child)?));
        }
        Ok(force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_force_entry() {
        let element = Element::from_str(
            r#"<forceEntry id="f0f0-f0f0-f0f0-f0f0" name="Kill Team List">
                 <categoryLinks>
                   <categoryLink id="c1c1-c1c1-c1c1-c1c1" name="Leader" targetId="c2c2-c2c2-c2c2-c2c2"/>
                 </categoryLinks>
               </forceEntry>"#,
        )
        .unwrap();
        let force = ForceEntry::from_xml(&element).unwrap();
        assert_eq!(force.name, "Kill Team List");
        assert_eq!(force.category_links.len(), 1);
    }
}
