//! Typed node reader over package markup: a light owned element tree built
//! with quick-xml, plus attribute accessors that convert raw strings into
//! the scalar/enum/identifier values the definition model constructors take.
//!
//! Namespace prefixes are dropped while reading, so constructors match on
//! local element names only.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::DataError;
use crate::ident::Identifier;

/// One parsed element: local name, attributes in document order, child
/// elements and accumulated text content.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Parse a whole document and return its root element.
    pub fn from_str(input: &str) -> Result<Element, DataError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Element::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Element::from_start(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::End(_) => {
                    // quick-xml rejects mismatched end tags before we get here.
                    let element = match stack.pop() {
                        Some(element) => element,
                        None => return Err(DataError::MissingRoot),
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape()?);
                    }
                }
                Event::Eof => return Err(DataError::MissingRoot),
                _ => {}
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Element, DataError> {
        let raw = fs::read_to_string(path)?;
        Element::from_str(&raw)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element, DataError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(DataError::Xml)?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Discriminator validation: every constructor checks the element name
    /// it was handed before reading anything else.
    pub fn expect_name(&self, expected: &'static str) -> Result<(), DataError> {
        if self.name == expected {
            Ok(())
        } else {
            Err(DataError::UnexpectedNode {
                expected,
                found: self.name.clone(),
            })
        }
    }

    /// Child elements matching a relative path such as `conditions/condition`.
    pub fn children_at<'a>(&'a self, path: &'a str) -> Vec<&'a Element> {
        let mut current = vec![self];
        for segment in path.split('/') {
            let mut next = Vec::new();
            for element in current {
                next.extend(element.children.iter().filter(|c| c.name == segment));
            }
            current = next;
        }
        current
    }

    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn attribute<'a>(&'a self, name: &'static str) -> Attr<'a> {
        Attr {
            element: &self.name,
            name,
            value: self
                .attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
        }
    }
}

/// A single attribute slot, possibly absent, with typed conversions.
#[derive(Debug, Clone, Copy)]
pub struct Attr<'a> {
    element: &'a str,
    name: &'static str,
    value: Option<&'a str>,
}

impl<'a> Attr<'a> {
    pub fn as_opt_str(&self) -> Option<&'a str> {
        self.value
    }

    pub fn as_str(&self) -> Result<&'a str, DataError> {
        self.value.ok_or(DataError::MissingAttribute {
            element: self.element.to_string(),
            attribute: self.name,
        })
    }

    pub fn as_string(&self) -> Result<String, DataError> {
        self.as_str().map(str::to_string)
    }

    /// Absent boolean attributes read as false; package files omit flags
    /// that hold their default.
    pub fn as_bool(&self) -> Result<bool, DataError> {
        match self.value {
            None => Ok(false),
            Some("true") | Some("1") | Some("yes") | Some("on") => Ok(true),
            Some("false") | Some("0") | Some("no") | Some("off") => Ok(false),
            Some(other) => Err(self.invalid(other, "boolean")),
        }
    }

    pub fn as_i64(&self) -> Result<i64, DataError> {
        let raw = self.as_str()?;
        raw.parse().map_err(|_| self.invalid(raw, "integer"))
    }

    pub fn as_f64(&self) -> Result<f64, DataError> {
        let raw = self.as_str()?;
        raw.parse().map_err(|_| self.invalid(raw, "number"))
    }

    pub fn as_identifier(&self) -> Result<Identifier, DataError> {
        let raw = self.as_str()?;
        Identifier::from_str(raw).ok_or_else(|| self.invalid(raw, "identifier"))
    }

    pub fn as_opt_identifier(&self) -> Option<Identifier> {
        self.value.and_then(Identifier::from_str)
    }

    /// Enum attributes: `parse` maps the raw token, unknown tokens are a
    /// malformed-document error naming the expected kind.
    pub fn as_enum<T>(
        &self,
        kind: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, DataError> {
        let raw = self.as_str()?;
        parse(raw).ok_or_else(|| self.invalid(raw, kind))
    }

    fn invalid(&self, value: &str, expected: &'static str) -> DataError {
        DataError::InvalidValue {
            element: self.element.to_string(),
            attribute: self.name,
            value: value.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        <catalogue xmlns="http://example.invalid/schema" id="a796-a947-905e-205c" revision="3" library="false">
          <constraints>
            <constraint value="2.0" type="max"/>
            <constraint value="1" type="min"/>
          </constraints>
          <rules><rule id="r1"><description>Stay in cover.</description></rule></rules>
        </catalogue>"#;

    #[test]
    fn parses_nested_elements_and_attributes() {
        let root = Element::from_str(DOC).unwrap();
        assert_eq!(root.name(), "catalogue");
        assert_eq!(root.attribute("revision").as_i64().unwrap(), 3);
        assert!(!root.attribute("library").as_bool().unwrap());
        assert_eq!(
            root.attribute("id").as_identifier().unwrap().value(),
            "a796-a947-905e-205c"
        );

        let constraints = root.children_at("constraints/constraint");
        assert_eq!(constraints.len(), 2);
        assert_eq!(constraints[0].attribute("value").as_f64().unwrap(), 2.0);
    }

    #[test]
    fn text_content_is_accumulated() {
        let root = Element::from_str(DOC).unwrap();
        let rule = root.children_at("rules/rule")[0];
        assert_eq!(rule.first_child("description").unwrap().text(), "Stay in cover.");
    }

    #[test]
    fn missing_boolean_reads_as_false() {
        let root = Element::from_str(DOC).unwrap();
        assert!(!root.attribute("hidden").as_bool().unwrap());
    }

    #[test]
    fn expect_name_rejects_other_elements() {
        let root = Element::from_str(DOC).unwrap();
        assert!(root.expect_name("catalogue").is_ok());
        assert!(matches!(
            root.expect_name("gameSystem"),
            Err(DataError::UnexpectedNode { .. })
        ));
    }

    #[test]
    fn missing_required_attribute_is_an_error() {
        let root = Element::from_str(DOC).unwrap();
        assert!(matches!(
            root.attribute("name").as_str(),
            Err(DataError::MissingAttribute { .. })
        ));
    }
}
