//! Informational nodes: rules, info groups and the links that pull shared
//! copies of them into entries. These never affect computation; they ride
//! along so a rendered roster can show rule text next to selections.

use std::sync::Arc;

use crate::data::modifier::Modifier;
use crate::data::profile::Profile;
use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

#[derive(Debug, Clone)]
pub struct Rule {
    pub id: Identifier,
    pub name: String,
    pub hidden: bool,
    pub description: String,
}

impl Rule {
    pub const ELEMENT: &'static str = "rule";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        Ok(Rule {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            hidden: element.attribute("hidden").as_bool()?,
            description: element
                .first_child("description")
                .map(|d| d.text().to_string())
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct InfoGroup {
    pub id: Identifier,
    pub name: String,
    pub hidden: bool,
    pub profiles: Vec<Profile>,
    pub rules: Vec<Rule>,
    pub info_links: Vec<InfoLink>,
}

impl InfoGroup {
    pub const ELEMENT: &'static str = "infoGroup";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut group = InfoGroup {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            hidden: element.attribute("hidden").as_bool()?,
            profiles: Vec::new(),
            rules: Vec::new(),
            info_links: Vec::new(),
        };
        for child in element.children_at("profiles/profile") {
            group.profiles.push(Profile::from_xml(child)?);
        }
        for child in element.children_at("rules/rule") {
            group.rules.push(Rule::from_xml(child)?);
        }
        for child in element.children_at("infoLinks/infoLink") {
            group.info_links.push(InfoLink::from_xml(child)?);
        }
        Ok(group)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoLinkKind {
    Profile,
    Rule,
    InfoGroup,
}

impl InfoLinkKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "profile" => Some(InfoLinkKind::Profile),
            "rule" => Some(InfoLinkKind::Rule),
            "infoGroup" => Some(InfoLinkKind::InfoGroup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InfoLinkKind::Profile => "profile",
            InfoLinkKind::Rule => "rule",
            InfoLinkKind::InfoGroup => "infoGroup",
        }
    }
}

/// A by-id reference to a shared profile, rule or info group.
#[derive(Debug, Clone)]
pub struct InfoLink {
    pub id: Identifier,
    pub name: String,
    pub hidden: bool,
    pub target_id: Identifier,
    pub kind: InfoLinkKind,
    pub modifiers: Vec<Modifier>,
}

impl InfoLink {
    pub const ELEMENT: &'static str = "infoLink";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut link = InfoLink {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
            hidden: element.attribute("hidden").as_bool()?,
            target_id: element.attribute("targetId").as_identifier()?,
            kind: element
                .attribute("type")
                .as_enum("info link type", InfoLinkKind::parse)?,
            modifiers: Vec::new(),
        };
        for child in element.children_at("modifiers/modifier") {
            link.modifiers.push(Modifier::from_xml(child)?);
        }
        Ok(link)
    }
}

/// A resolved info link: the link record plus whichever shared node it
/// points at.
#[derive(Debug, Clone)]
pub enum InfoTarget {
    Profile(Arc<Profile>),
    Rule(Arc<Rule>),
    Group(Arc<InfoGroup>),
}

#[derive(Debug, Clone)]
pub struct Publication {
    pub id: Identifier,
    pub name: String,
}

impl Publication {
    pub const ELEMENT: &'static str = "publication";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        Ok(Publication {
            id: element.attribute("id").as_identifier()?,
            name: element.attribute("name").as_string()?,
        })
    }
}
