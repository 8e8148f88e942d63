//! Declare external command-line tools as callable climate-data operators.
//!
//! A [`Catalog`] parses `${...}` command templates into operator contracts,
//! infers capability flags from the placeholders, and registers derived
//! variables per project. Execution stays behind the [`Driver`] seam.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod contract;
pub mod derived;
pub mod docs;
pub mod driver;
pub mod error;
pub mod facade;
pub mod parser;
pub mod probe;
pub mod standard;

// Re-export main types
pub use catalog::{Catalog, CatalogBuilder};
pub use config::Config;
pub use contract::{
    CapabilityFlags, OperatorContract, OutputFormat, OutputNameRule, ScriptDeclaration,
};
pub use derived::{DerivedSpec, DerivedVariableEntry, WILDCARD_PROJECT};
pub use driver::{ApplyRequest, Driver, Params, RecordingDriver};
pub use error::{DefinitionError, DerivationError, Error};
pub use facade::OperatorFacade;
pub use parser::{parse_template, CommandTemplate, ParseError};

// Re-export the declaration-file API for convenience
pub use standard::{declare_standard_operators, load_declaration_file, DeclarationFile};
