//! The definition model: immutable game-data nodes parsed once per
//! package, the per-package shared registry, and the loading surface that
//! turns an index file into a linked repository.

pub mod catalog;
pub mod category;
pub mod condition;
pub mod constraint;
pub mod cost;
pub mod entry;
pub mod force;
pub mod game_system;
pub mod group;
pub mod index;
pub mod info;
pub mod links;
pub mod modifier;
pub mod profile;
pub mod registry;
pub mod repository;

pub use catalog::{Catalog, CatalogLink};
pub use category::{CategoryEntry, CategoryLink};
pub use condition::{Comparator, Condition, ConditionGroup, GroupOperator};
pub use constraint::{Constraint, ConstraintKind};
pub use cost::{Cost, CostType};
pub use entry::{SelectionEntry, SelectionEntryKind};
pub use force::ForceEntry;
pub use game_system::GameSystem;
pub use group::SelectionEntryGroup;
pub use index::{DataIndex, DataIndexEntry, PackageKind};
pub use info::{InfoGroup, InfoLink, InfoLinkKind, InfoTarget, Publication, Rule};
pub use links::{EntryHandle, EntryLink, GroupHandle, LinkKind};
pub use modifier::{Modifier, ModifierField, ModifierOp};
pub use profile::{Characteristic, CharacteristicType, Profile, ProfileType};
pub use registry::{CategoryRef, InfoRef, Linker, Registry, ResolvedLink};
pub use repository::Repository;
