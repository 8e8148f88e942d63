//! Declaration files and the embedded standard operator set.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::contract::ScriptDeclaration;
use crate::error::{DefinitionError, Error};

/// A TOML file of operator declarations, one `[[operator]]` table each.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarationFile {
    #[serde(default, rename = "operator")]
    pub operators: Vec<ScriptDeclaration>,
}

/// Parse a declaration file from disk.
pub fn load_declaration_file(path: &Path) -> anyhow::Result<DeclarationFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read declaration file {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("Failed to parse declaration file {}", path.display()))
}

/// Declare every operator in `file`, stopping at the first error.
pub fn declare_all(catalog: &mut Catalog, file: &DeclarationFile) -> Result<usize, Error> {
    for decl in &file.operators {
        catalog.declare(decl.clone())?;
    }
    Ok(file.operators.len())
}

/// Declare the operators of `file` whose executables are installed,
/// skipping the rest with a warning. Any other failure aborts.
pub fn declare_available(catalog: &mut Catalog, file: &DeclarationFile) -> Result<usize, Error> {
    let mut declared = 0;
    for decl in &file.operators {
        match catalog.declare(decl.clone()) {
            Ok(()) => declared += 1,
            Err(Error::Definition(DefinitionError::ExecutableNotFound { name, command })) => {
                warn!("skipping operator {}: command {} not found", name, command);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(declared)
}

/// The standard operator set shipped with the crate.
pub fn standard_operators() -> &'static DeclarationFile {
    static STANDARD: OnceLock<DeclarationFile> = OnceLock::new();
    STANDARD.get_or_init(|| {
        toml::from_str(include_str!("standard_operators.toml"))
            .expect("embedded standard operator table is valid TOML")
    })
}

/// Declare the standard operators whose tools are installed.
pub fn declare_standard_operators(catalog: &mut Catalog) -> Result<usize, Error> {
    let declared = declare_available(catalog, standard_operators())?;
    info!("declared {} standard operators", declared);
    Ok(declared)
}
