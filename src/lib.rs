//! Roster computation core for tabletop wargame data packages.
//!
//! Publisher-authored packages (a game system plus catalogs, XML on disk)
//! are parsed into an immutable definition model, shared definitions are
//! registered and links resolved, and a mutable [`roster::Roster`]
//! mirrors the chosen definitions. [`roster::Roster::compute_state`]
//! interprets the declarative constraint/condition/modifier language over
//! the instance tree and records validation errors.
//!
//! ```no_run
//! use muster::data::Repository;
//! use muster::roster::Roster;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = Repository::from_file(Path::new("packages/index.xml"))?;
//! let catalog = &repository.catalogs[0];
//! let linker = repository.linker_for(catalog)?;
//!
//! let roots = linker.root_entries(catalog)?;
//!
//! let force_entry = repository
//!     .game_system
//!     .find_force_entry("Strike Team")
//!     .expect("force entry");
//! let mut roster = Roster::new(repository.game_system.clone(), linker, "My List");
//! let force = roster.add_force(force_entry);
//! for handle in &roots {
//!     roster.add_selection(force, handle)?;
//! }
//! roster.compute_state()?;
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod ident;
pub mod query;
pub mod roster;
pub mod xml;

pub use error::{DataError, EvalError};
pub use ident::Identifier;
