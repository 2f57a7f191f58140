//! Profiles: typed stat blocks. A profile type declares characteristic
//! slots; a profile fills them with display values.

use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

#[derive(Debug, Clone)]
pub struct CharacteristicType {
    pub id: Identifier,
    pub name: String,
}

impl CharacteristicType {
    pub const ELEMENT: &'static str = "characteristicType";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        Ok(CharacteristicType {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProfileType {
    pub id: Identifier,
    pub name: String,
    pub characteristic_types: Vec<CharacteristicType>,
}

impl ProfileType {
    pub const ELEMENT: &'static str = "profileType";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut profile_type = ProfileType {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            characteristic_types: Vec::new(),
        };
        for child in element.children_at("characteristicTypes/characteristicType") {
            profile_type
                .characteristic_types
                .push(CharacteristicType::from_xml(child)?);
        }
        Ok(profile_type)
    }
}

/// A filled characteristic slot; the value is the element text.
#[derive(Debug, Clone)]
pub struct Characteristic {
    pub name: String,
    pub type_id: Identifier,
    pub value: String,
}

impl Characteristic {
    pub const ELEMENT: &'static str = "characteristic";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        Ok(Characteristic {
            name: element.attribute("name").as_string()?,
            type_id: element.attribute("typeId").as_identifier()?,
            value: element.text().to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Identifier,
    pub name: String,
    pub hidden: bool,
    pub type_id: Identifier,
    pub type_name: String,
    pub characteristics: Vec<Characteristic>,
}

impl Profile {
    pub const ELEMENT: &'static str = "profile";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut profile = Profile {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            hidden: element.attribute("hidden").as_bool()?,
            type_id: element.attribute("typeId").as_identifier()?,
            type_name: element.attribute("typeName").as_string()?,
            characteristics: Vec::new(),
        };
        for child in element.children_at("characteristics/characteristic") {
            profile
                .characteristics
                .push(Characteristic::from_xml(child)?);
        }
        Ok(profile)
    }
}
