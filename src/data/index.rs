//! Package index: the `index.xml` manifest naming every file in a data
//! distribution. The index knows nothing about file contents; it maps
//! declared entries (id, name, kind, revision) to paths under a base
//! directory.

use std::path::{Path, PathBuf};

use crate::error::DataError;
use crate::ident::Identifier;
use crate::xml::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    GameSystem,
    Catalog,
}

impl PackageKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "gamesystem" => Some(PackageKind::GameSystem),
            "catalogue" => Some(PackageKind::Catalog),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::GameSystem => "gamesystem",
            PackageKind::Catalog => "catalogue",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataIndexEntry {
    pub id: Identifier,
    pub name: String,
    pub file_path: String,
    pub kind: PackageKind,
    pub revision: i64,
}

impl DataIndexEntry {
    pub const ELEMENT: &'static str = "dataIndexEntry";

    pub fn from_xml(element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        Ok(DataIndexEntry {
            id: element.attribute("dataId").as_identifier()?,
            name: element.attribute("dataName").as_string()?,
            file_path: element.attribute("filePath").as_string()?,
            kind: element
                .attribute("dataType")
                .as_enum("data index entry type", PackageKind::parse)?,
            revision: element.attribute("dataRevision").as_i64()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DataIndex {
    pub base_path: PathBuf,
    pub name: String,
    pub battlescribe_version: String,
    pub entries: Vec<DataIndexEntry>,
}

impl DataIndex {
    pub const ELEMENT: &'static str = "dataIndex";

    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let base_path = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        let element = Element::from_file(path)?;
        DataIndex::from_xml(base_path, &element)
    }

    pub fn from_xml(base_path: PathBuf, element: &Element) -> Result<Self, DataError> {
        element.expect_name(Self::ELEMENT)?;

        let mut index = DataIndex {
            base_path,
            name: element.attribute("name").as_string()?,
            battlescribe_version: element.attribute("battleScribeVersion").as_string()?,
            entries: Vec::new(),
        };
        for child in element.children_at("dataIndexEntries/dataIndexEntry") {
            index.entries.push(DataIndexEntry::from_xml(child)?);
        }
        Ok(index)
    }

    /// Absolute location of an entry's file.
    pub fn path_of(&self, entry: &DataIndexEntry) -> PathBuf {
        self.base_path.join(&entry.file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_index_with_typed_entries() {
        let element = Element::from_str(
            r#"<dataIndex xmlns="http://example.invalid/dataIndexSchema" name="Test Data" battleScribeVersion="2.03">
                 <dataIndexEntries>
                   <dataIndexEntry dataId="1234-1234-1234-1234" dataName="Test System" filePath="system.gst" dataType="gamesystem" dataBattleScribeVersion="2.03" dataRevision="7"/>
                   <dataIndexEntry dataId="abcd-abcd-abcd-abcd" dataName="Test Faction" filePath="faction.cat" dataType="catalogue" dataBattleScribeVersion="2.03" dataRevision="12"/>
                 </dataIndexEntries>
               </dataIndex>"#,
        )
        .unwrap();
        let index = DataIndex::from_xml(PathBuf::from("/packages"), &element).unwrap();
        assert_eq!(index.entries.len(), 2);
        assert_eq!(index.entries[0].kind, PackageKind::GameSystem);
        assert_eq!(
            index.path_of(&index.entries[1]),
            PathBuf::from("/packages/faction.cat")
        );
    }

    #[test]
    fn unknown_entry_kind_is_malformed() {
        let element = Element::from_str(
            r#"<dataIndexEntry dataId="1234-1234-1234-1234" dataName="X" filePath="x.bin" dataType="roster" dataRevision="1"/>"#,
        )
        .unwrap();
        assert!(matches!(
            DataIndexEntry::from_xml(&element),
            Err(DataError::InvalidValue { .. })
        ));
    }
}
