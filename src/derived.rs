//! Derived variables: computed quantities registered per project.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::driver::Params;

/// Wildcard project: entries visible to every project unless shadowed.
pub const WILDCARD_PROJECT: &str = "*";

/// How one derived variable is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedVariableEntry {
    /// Operator that computes it.
    pub operator: String,
    /// Named output carrying the variable; `None` is the primary output.
    pub output: Option<String>,
    /// Variable names of the operator's inputs, in rank order.
    pub source_variables: Vec<String>,
    /// Extra parameters forwarded at evaluation.
    pub params: Params,
}

/// What a `derive` call names: one variable on the primary output, or a
/// map from output labels to derived-variable names. The label `out`
/// stands for the primary output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedSpec {
    Primary(String),
    Outputs(BTreeMap<String, String>),
}

impl From<&str> for DerivedSpec {
    fn from(variable: &str) -> Self {
        DerivedSpec::Primary(variable.to_string())
    }
}

impl From<String> for DerivedSpec {
    fn from(variable: String) -> Self {
        DerivedSpec::Primary(variable)
    }
}

impl From<BTreeMap<String, String>> for DerivedSpec {
    fn from(outputs: BTreeMap<String, String>) -> Self {
        DerivedSpec::Outputs(outputs)
    }
}

/// Registry of derived variables, keyed by project then variable name.
#[derive(Debug, Clone, Default)]
pub struct DerivedVariables {
    by_project: HashMap<String, HashMap<String, DerivedVariableEntry>>,
}

impl DerivedVariables {
    pub(crate) fn insert(&mut self, project: &str, variable: String, entry: DerivedVariableEntry) {
        self.by_project
            .entry(project.to_string())
            .or_default()
            .insert(variable, entry);
    }

    /// Entry for `variable`: project-specific first, wildcard second.
    pub fn get(&self, variable: &str, project: &str) -> Option<&DerivedVariableEntry> {
        self.by_project
            .get(project)
            .and_then(|entries| entries.get(variable))
            .or_else(|| {
                self.by_project
                    .get(WILDCARD_PROJECT)
                    .and_then(|entries| entries.get(variable))
            })
    }

    pub fn contains(&self, variable: &str, project: &str) -> bool {
        self.get(variable, project).is_some()
    }

    /// Variable names visible to `project` (wildcard included), sorted.
    pub fn variables(&self, project: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .by_project
            .get(project)
            .into_iter()
            .chain(self.by_project.get(WILDCARD_PROJECT))
            .flat_map(|entries| entries.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub(crate) fn clear(&mut self) {
        self.by_project.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(operator: &str) -> DerivedVariableEntry {
        DerivedVariableEntry {
            operator: operator.to_string(),
            output: None,
            source_variables: vec!["tas".to_string()],
            params: Params::new(),
        }
    }

    #[test]
    fn test_project_entry_shadows_the_wildcard() {
        let mut registry = DerivedVariables::default();
        registry.insert(WILDCARD_PROJECT, "crest".to_string(), entry("minus"));
        registry.insert("erai", "crest".to_string(), entry("rescale"));

        assert_eq!(registry.get("crest", "erai").unwrap().operator, "rescale");
        assert_eq!(registry.get("crest", "cmip6").unwrap().operator, "minus");
        assert!(registry.contains("crest", "anything"));
        assert_eq!(registry.get("absent", "erai"), None);
    }

    #[test]
    fn test_variables_merges_project_and_wildcard() {
        let mut registry = DerivedVariables::default();
        registry.insert(WILDCARD_PROJECT, "crest".to_string(), entry("minus"));
        registry.insert("erai", "ta".to_string(), entry("rescale"));

        assert_eq!(registry.variables("erai"), vec!["crest", "ta"]);
        assert_eq!(registry.variables("cmip6"), vec!["crest"]);
    }
}
