//! Costs attached to selection entries and the cost types a game system
//! declares (points, power level, credits and the like).

use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

#[derive(Debug, Clone)]
pub struct Cost {
    pub name: String,
    pub type_id: Identifier,
    pub value: f64,
}

impl Cost {
    pub const ELEMENT: &'static str = "cost";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        Ok(Cost {
            name: element.attribute("name").as_string()?,
            type_id: element.attribute("typeId").as_identifier()?,
            value: element.attribute("value").as_f64()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CostType {
    pub id: Identifier,
    pub name: String,
    pub default_cost_limit: f64,
    pub hidden: bool,
}

impl CostType {
    pub const ELEMENT: &'static str = "costType";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        Ok(CostType {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            default_cost_limit: element.attribute("defaultCostLimit").as_f64()?,
            hidden: element.attribute("hidden").as_bool()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cost() {
        let element =
            Element::from_str(r#"<cost name="pts" typeId="c001-0000-0000-0001" value="12.0"/>"#)
                .unwrap();
        let cost = Cost::from_xml(&element).unwrap();
        assert_eq!(cost.name, "pts");
        assert_eq!(cost.value, 12.0);
    }
}
