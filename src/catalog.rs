//! The operator catalog: declaration pipeline, lookups and derived
//! variables, owned by an explicit context value.

use std::collections::{HashMap, HashSet};

use serde_json::Value as JsonValue;
use tracing::{debug, error, warn};

use crate::contract::{OperatorContract, ScriptDeclaration};
use crate::derived::{DerivedSpec, DerivedVariableEntry, DerivedVariables};
use crate::docs::{DocSource, NoDocs};
use crate::driver::{Driver, Params};
use crate::error::{DefinitionError, DerivationError, Error};
use crate::facade::OperatorFacade;
use crate::parser::parse_template;
use crate::probe::{base_command, ExecProbe, PathProbe};

/// Names no operator may take: the catalog's own entry points and the CLI
/// subcommands that dispatch by operator name.
const DEFAULT_RESERVED: &[&str] = &[
    "declare", "derive", "apply", "lookup", "reset", "inspect", "check", "list",
];

/* ===================== Catalog ===================== */

/// Registry of declared operators and derived variables.
///
/// All state lives in this value; nothing is ambient. Declarations happen
/// at startup and lookups dominate afterwards, single-threaded.
pub struct Catalog {
    scripts: HashMap<String, ScriptEntry>,
    internals: HashSet<String>,
    derived: DerivedVariables,
    reserved: HashSet<String>,
    probe: Box<dyn ExecProbe>,
    docs: Box<dyn DocSource>,
}

struct ScriptEntry {
    contract: OperatorContract,
    doc: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Catalog probing the host `PATH`, with no documentation source.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /* ----- declaration ----- */

    /// Declare a script operator.
    ///
    /// The pipeline: name-clash check, redefinition warning, executable
    /// probe, template parse, contract build, insert. On any error the
    /// catalog is left exactly as it was and the error is logged.
    pub fn declare(&mut self, decl: ScriptDeclaration) -> Result<(), Error> {
        self.try_declare(decl).inspect_err(|e| error!("{}", e))
    }

    fn try_declare(&mut self, decl: ScriptDeclaration) -> Result<(), Error> {
        let name = decl.name().to_string();
        if self.is_reserved(&name) || self.internals.contains(&name) {
            return Err(Error::NameClash { name });
        }
        if self.scripts.contains_key(&name) {
            warn!("redefining operator {}", name);
        }

        let base = base_command(decl.command());
        let executable =
            self.probe
                .resolve(&base)
                .ok_or_else(|| DefinitionError::ExecutableNotFound {
                    name: name.clone(),
                    command: base.clone(),
                })?;

        let template = parse_template(decl.command())?;
        let contract = OperatorContract::build(&decl, template, executable)?;
        let doc = self
            .docs
            .doc_for(&name)
            .unwrap_or_else(|| format!("wrapper for command: {}", decl.command()));

        self.scripts.insert(name.clone(), ScriptEntry { contract, doc });
        debug!("operator {} declared", name);
        Ok(())
    }

    /// Register an engine-provided operator name.
    ///
    /// Internal operators carry no contract; they participate in clash
    /// checks and cannot back derived variables.
    pub fn declare_internal(&mut self, name: &str) -> Result<(), Error> {
        self.try_declare_internal(name).inspect_err(|e| error!("{}", e))
    }

    fn try_declare_internal(&mut self, name: &str) -> Result<(), Error> {
        if self.is_reserved(name) || self.scripts.contains_key(name) {
            return Err(Error::NameClash {
                name: name.to_string(),
            });
        }
        if !self.internals.insert(name.to_string()) {
            warn!("redefining internal operator {}", name);
        }
        debug!("internal operator {} declared", name);
        Ok(())
    }

    /* ----- lookups ----- */

    /// Contract of a declared script operator.
    pub fn lookup(&self, name: &str) -> Option<&OperatorContract> {
        self.scripts.get(name).map(|entry| &entry.contract)
    }

    /// Number of distinct input slots of a declared script operator.
    pub fn input_arity(&self, name: &str) -> Option<usize> {
        self.lookup(name).map(|contract| contract.input_arity())
    }

    pub fn is_internal(&self, name: &str) -> bool {
        self.internals.contains(name)
    }

    /// Callable handle for a declared script operator.
    pub fn facade(&self, name: &str) -> Option<OperatorFacade<'_>> {
        self.scripts.get(name).map(|entry| OperatorFacade {
            name: entry.contract.name.as_str(),
            contract: &entry.contract,
            doc: &entry.doc,
        })
    }

    /// Declared script operator names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scripts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /* ----- invocation ----- */

    /// Dispatch one invocation through `driver`.
    pub fn apply(
        &self,
        driver: &mut dyn Driver,
        name: &str,
        args: &[JsonValue],
        params: &Params,
    ) -> anyhow::Result<JsonValue> {
        let facade = self.facade(name).ok_or_else(|| {
            let err = Error::UnknownOperator {
                name: name.to_string(),
            };
            error!("{}", err);
            err
        })?;
        facade.apply(driver, args, params)
    }

    /* ----- derived variables ----- */

    /// Register derived variables computed by applying `operator` to
    /// datasets holding `source_variables`.
    ///
    /// Every entry of a multi-output spec is validated before any entry is
    /// inserted; a failed call never registers a subset.
    pub fn derive(
        &mut self,
        project: &str,
        spec: impl Into<DerivedSpec>,
        operator: &str,
        source_variables: &[&str],
        params: Params,
    ) -> Result<(), Error> {
        self.try_derive(project, spec.into(), operator, source_variables, params)
            .inspect_err(|e| error!("{}", e))
    }

    fn try_derive(
        &mut self,
        project: &str,
        spec: DerivedSpec,
        operator: &str,
        source_variables: &[&str],
        params: Params,
    ) -> Result<(), Error> {
        let contract = match self.scripts.get(operator) {
            Some(entry) => &entry.contract,
            None if self.internals.contains(operator) => {
                return Err(DerivationError::InternalOperator {
                    operator: operator.to_string(),
                }
                .into())
            }
            None => {
                return Err(DerivationError::UnknownOperator {
                    operator: operator.to_string(),
                }
                .into())
            }
        };

        let pairs: Vec<(Option<String>, String)> = match spec {
            DerivedSpec::Primary(variable) => vec![(None, variable)],
            DerivedSpec::Outputs(map) => map
                .into_iter()
                .map(|(label, variable)| {
                    if label == "out" {
                        (None, variable)
                    } else {
                        (Some(label), variable)
                    }
                })
                .collect(),
        };

        for (output, _) in &pairs {
            match output {
                None if !contract.outputs.has_primary() => {
                    return Err(DerivationError::MissingPrimaryOutput {
                        operator: operator.to_string(),
                    }
                    .into())
                }
                Some(label) if contract.outputs.named(label).is_none() => {
                    return Err(DerivationError::UnknownOutput {
                        operator: operator.to_string(),
                        label: label.clone(),
                    }
                    .into())
                }
                _ => {}
            }
        }

        let expected = contract.input_arity();
        if expected != source_variables.len() {
            return Err(DerivationError::ArityMismatch {
                operator: operator.to_string(),
                expected,
                got: source_variables.len(),
            }
            .into());
        }

        let source_variables: Vec<String> =
            source_variables.iter().map(|s| s.to_string()).collect();
        for (output, variable) in pairs {
            let entry = DerivedVariableEntry {
                operator: operator.to_string(),
                output,
                source_variables: source_variables.clone(),
                params: params.clone(),
            };
            debug!(
                "derived variable {} registered for project {}",
                variable, project
            );
            self.derived.insert(project, variable, entry);
        }
        Ok(())
    }

    /// True when `variable` is derived in `project` or the wildcard project.
    pub fn is_derived_variable(&self, variable: &str, project: &str) -> bool {
        let rep = self.derived.contains(variable, project);
        debug!(
            "checking if variable {} is derived for project {}: {}",
            variable, project, rep
        );
        rep
    }

    /// Entry defining a derived variable, project-specific over wildcard.
    pub fn derived_variable(&self, variable: &str, project: &str) -> Option<&DerivedVariableEntry> {
        self.derived.get(variable, project)
    }

    /// The derived-variable registry itself.
    pub fn derived_variables(&self) -> &DerivedVariables {
        &self.derived
    }

    /* ----- reserved names & reset ----- */

    /// Reserve `name` so no operator may take it.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.reserved.insert(name.into());
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// Drop every registration and restore the default reserved names.
    pub fn reset(&mut self) {
        self.scripts.clear();
        self.internals.clear();
        self.derived.clear();
        self.reserved = default_reserved();
    }
}

fn default_reserved() -> HashSet<String> {
    DEFAULT_RESERVED.iter().map(|s| s.to_string()).collect()
}

/* ===================== Builder ===================== */

/// Builds a [`Catalog`] with explicit collaborators.
#[derive(Default)]
pub struct CatalogBuilder {
    probe: Option<Box<dyn ExecProbe>>,
    docs: Option<Box<dyn DocSource>>,
    reserved: Vec<String>,
}

impl CatalogBuilder {
    pub fn probe(mut self, probe: impl ExecProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    pub fn docs(mut self, docs: impl DocSource + 'static) -> Self {
        self.docs = Some(Box::new(docs));
        self
    }

    /// Reserve an additional name on top of the defaults.
    pub fn reserve(mut self, name: impl Into<String>) -> Self {
        self.reserved.push(name.into());
        self
    }

    pub fn build(self) -> Catalog {
        let mut reserved = default_reserved();
        reserved.extend(self.reserved);
        Catalog {
            scripts: HashMap::new(),
            internals: HashSet::new(),
            derived: DerivedVariables::default(),
            reserved,
            probe: self
                .probe
                .unwrap_or_else(|| Box::new(PathProbe::from_env())),
            docs: self.docs.unwrap_or_else(|| Box::new(NoDocs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use maplit::btreemap;
    use serde_json::json;

    use super::*;
    use crate::contract::OutputNameRule;
    use crate::docs::DocDir;
    use crate::driver::RecordingDriver;
    use crate::probe::AcceptAllProbe;

    /// Probe that only knows one tool.
    struct OnlyTool(&'static str);

    impl ExecProbe for OnlyTool {
        fn resolve(&self, command: &str) -> Option<PathBuf> {
            (command == self.0).then(|| PathBuf::from(format!("/usr/bin/{}", command)))
        }
    }

    fn catalog() -> Catalog {
        Catalog::builder().probe(AcceptAllProbe).build()
    }

    fn declare(catalog: &mut Catalog, name: &str, command: &str) {
        catalog
            .declare(ScriptDeclaration::new(name, command))
            .unwrap();
    }

    fn params(pairs: &[(&str, JsonValue)]) -> Params {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    // ============ Declaration ============

    #[test]
    fn test_declares_and_looks_up_an_operator() {
        let mut catalog = catalog();
        declare(&mut catalog, "time_average", "cdo timavg ${in} ${out}");

        let contract = catalog.lookup("time_average").unwrap();
        assert_eq!(contract.name, "time_average");
        assert_eq!(catalog.input_arity("time_average"), Some(1));
        assert_eq!(catalog.names(), vec!["time_average"]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_absent_names_are_not_errors() {
        let catalog = catalog();
        assert!(catalog.lookup("nothing").is_none());
        assert!(catalog.input_arity("nothing").is_none());
        assert!(catalog.facade("nothing").is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_redefinition_replaces_the_contract() {
        let mut catalog = catalog();
        declare(&mut catalog, "minus", "cdo sub ${in_1} ${in_2} ${out}");
        declare(&mut catalog, "minus", "cdo -b F64 sub ${in_1} ${in_2} ${out}");

        let contract = catalog.lookup("minus").unwrap();
        assert_eq!(contract.template.raw, "cdo -b F64 sub ${in_1} ${in_2} ${out}");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_failed_redefinition_keeps_the_previous_contract() {
        let mut catalog = catalog();
        declare(&mut catalog, "minus", "cdo sub ${in_1} ${in_2} ${out}");

        let err = catalog
            .declare(ScriptDeclaration::new("minus", "cdo sub ${out}"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::NoInput { .. })
        ));

        let contract = catalog.lookup("minus").unwrap();
        assert_eq!(contract.template.raw, "cdo sub ${in_1} ${in_2} ${out}");
    }

    #[test]
    fn test_failed_declaration_registers_nothing() {
        let mut catalog = catalog();
        let err = catalog
            .declare(ScriptDeclaration::new("broken", "tool ${out}"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::NoInput { .. })
        ));
        assert!(catalog.lookup("broken").is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_missing_executable_aborts_the_declaration() {
        let mut catalog = Catalog::builder().probe(OnlyTool("cdo")).build();

        let err = catalog
            .declare(ScriptDeclaration::new("plot", "ncl ${in} ${out}"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::ExecutableNotFound { .. })
        ));
        assert!(catalog.lookup("plot").is_none());

        declare(&mut catalog, "minus", "cdo sub ${in_1} ${in_2} ${out}");
        let contract = catalog.lookup("minus").unwrap();
        assert_eq!(contract.executable, PathBuf::from("/usr/bin/cdo"));
    }

    #[test]
    fn test_unparseable_template_aborts_the_declaration() {
        let mut catalog = catalog();
        let err = catalog
            .declare(ScriptDeclaration::new("broken", "cdo timavg ${in"))
            .unwrap_err();
        assert!(matches!(err, Error::Template(_)));
        assert!(catalog.is_empty());
    }

    // ============ Name clashes ============

    #[test]
    fn test_reserved_names_are_rejected() {
        let mut catalog = catalog();
        let err = catalog
            .declare(ScriptDeclaration::new("reset", "tool ${in} ${out}"))
            .unwrap_err();
        assert!(matches!(err, Error::NameClash { .. }));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_extra_reservations_are_honored() {
        let mut catalog = Catalog::builder()
            .probe(AcceptAllProbe)
            .reserve("blessed")
            .build();
        assert!(catalog.is_reserved("blessed"));
        let err = catalog
            .declare(ScriptDeclaration::new("blessed", "tool ${in} ${out}"))
            .unwrap_err();
        assert!(matches!(err, Error::NameClash { .. }));
    }

    #[test]
    fn test_script_and_internal_names_clash_across_kinds() {
        let mut catalog = catalog();
        catalog.declare_internal("ceval").unwrap();
        let err = catalog
            .declare(ScriptDeclaration::new("ceval", "tool ${in} ${out}"))
            .unwrap_err();
        assert!(matches!(err, Error::NameClash { .. }));

        declare(&mut catalog, "minus", "cdo sub ${in_1} ${in_2} ${out}");
        let err = catalog.declare_internal("minus").unwrap_err();
        assert!(matches!(err, Error::NameClash { .. }));
    }

    #[test]
    fn test_internal_redefinition_is_a_warning_not_an_error() {
        let mut catalog = catalog();
        catalog.declare_internal("ceval").unwrap();
        catalog.declare_internal("ceval").unwrap();
        assert!(catalog.is_internal("ceval"));
    }

    // ============ Façades and invocation ============

    #[test]
    fn test_facade_doc_falls_back_to_the_template() {
        let mut catalog = catalog();
        declare(&mut catalog, "minus", "cdo sub ${in_1} ${in_2} ${out}");
        let facade = catalog.facade("minus").unwrap();
        assert_eq!(facade.name(), "minus");
        assert_eq!(
            facade.doc(),
            "wrapper for command: cdo sub ${in_1} ${in_2} ${out}"
        );
    }

    #[test]
    fn test_facade_doc_comes_from_the_doc_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("minus.md"), "subtract two fields").unwrap();

        let mut catalog = Catalog::builder()
            .probe(AcceptAllProbe)
            .docs(DocDir::new(dir.path()))
            .build();
        declare(&mut catalog, "minus", "cdo sub ${in_1} ${in_2} ${out}");
        assert_eq!(catalog.facade("minus").unwrap().doc(), "subtract two fields");
    }

    #[test]
    fn test_apply_dispatches_through_the_driver() {
        let mut catalog = catalog();
        declare(&mut catalog, "minus", "cdo sub ${in_1} ${in_2} ${out}");

        let mut driver = RecordingDriver::default();
        let args = vec![json!("dataset_a"), json!("dataset_b")];
        let result = catalog
            .apply(&mut driver, "minus", &args, &Params::new())
            .unwrap();

        assert_eq!(result, JsonValue::Null);
        assert_eq!(driver.calls.len(), 1);
        assert_eq!(driver.calls[0].operator, "minus");
        assert_eq!(driver.calls[0].args, args);
    }

    #[test]
    fn test_applying_an_unknown_operator_is_an_error() {
        let catalog = catalog();
        let mut driver = RecordingDriver::default();
        let err = catalog
            .apply(&mut driver, "ghost", &[], &Params::new())
            .unwrap_err();
        assert!(err.to_string().contains("unknown operator"));
        assert!(driver.calls.is_empty());
    }

    // ============ Derived variables ============

    #[test]
    fn test_derives_on_the_primary_output() {
        let mut catalog = catalog();
        declare(&mut catalog, "minus", "cdo sub ${in_1} ${in_2} ${out}");
        catalog
            .derive("*", "rscre", "minus", &["rs", "rscs"], Params::new())
            .unwrap();

        assert!(catalog.is_derived_variable("rscre", "cmip6"));
        let entry = catalog.derived_variable("rscre", "cmip6").unwrap();
        assert_eq!(entry.operator, "minus");
        assert_eq!(entry.output, None);
        assert_eq!(entry.source_variables, vec!["rs", "rscs"]);
    }

    #[test]
    fn test_derive_arity_mismatch_inserts_nothing() {
        let mut catalog = catalog();
        declare(&mut catalog, "minus", "cdo sub ${in_1} ${in_2} ${out}");
        let err = catalog
            .derive("*", "rscre", "minus", &["rs"], Params::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Derivation(DerivationError::ArityMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
        assert!(!catalog.is_derived_variable("rscre", "cmip6"));
    }

    #[test]
    fn test_project_entry_shadows_the_wildcard() {
        let mut catalog = catalog();
        declare(&mut catalog, "identity", "cdo copy ${in} ${out}");
        declare(&mut catalog, "rescale", "rescale.sh ${in} ${scale} ${out}");

        catalog
            .derive("*", "ta", "identity", &["t"], Params::new())
            .unwrap();
        catalog
            .derive(
                "erai",
                "ta",
                "rescale",
                &["t"],
                params(&[("scale", json!(1.0))]),
            )
            .unwrap();

        assert_eq!(catalog.derived_variable("ta", "erai").unwrap().operator, "rescale");
        assert_eq!(catalog.derived_variable("ta", "cmip6").unwrap().operator, "identity");
        assert!(catalog.is_derived_variable("ta", "cmip6"));
    }

    #[test]
    fn test_derive_needs_a_declared_operator() {
        let mut catalog = catalog();
        let err = catalog
            .derive("*", "rscre", "ghost", &["rs"], Params::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Derivation(DerivationError::UnknownOperator { .. })
        ));
        assert!(!catalog.is_derived_variable("rscre", "cmip6"));
    }

    #[test]
    fn test_derive_rejects_internal_operators() {
        let mut catalog = catalog();
        catalog.declare_internal("ceval").unwrap();
        let err = catalog
            .derive("*", "x", "ceval", &["t"], Params::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Derivation(DerivationError::InternalOperator { .. })
        ));
    }

    #[test]
    fn test_derive_with_named_outputs() {
        let mut catalog = catalog();
        declare(
            &mut catalog,
            "vertical_interp",
            "vinterp.sh ${in_1} ${in_2} ${out_l500} ${out_l850} method=${opt}",
        );

        catalog
            .derive(
                "*",
                btreemap! {
                    "l500".to_string() => "z500".to_string(),
                    "l850".to_string() => "z850".to_string(),
                },
                "vertical_interp",
                &["zg", "ps"],
                params(&[("opt", json!("log"))]),
            )
            .unwrap();

        let entry = catalog.derived_variable("z500", "cmip6").unwrap();
        assert_eq!(entry.output.as_deref(), Some("l500"));
        assert_eq!(entry.source_variables, vec!["zg", "ps"]);
        assert_eq!(entry.params.get("opt"), Some(&json!("log")));
        assert_eq!(
            catalog.derived_variable("z850", "cmip6").unwrap().output.as_deref(),
            Some("l850")
        );
    }

    #[test]
    fn test_derive_with_an_unknown_output_inserts_nothing() {
        let mut catalog = catalog();
        declare(
            &mut catalog,
            "vertical_interp",
            "vinterp.sh ${in} ${out_l500} ${out_l850}",
        );

        let err = catalog
            .derive(
                "*",
                btreemap! {
                    "l500".to_string() => "z500".to_string(),
                    "whoops".to_string() => "zx".to_string(),
                },
                "vertical_interp",
                &["zg"],
                Params::new(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Derivation(DerivationError::UnknownOutput { .. })
        ));
        assert!(!catalog.is_derived_variable("z500", "cmip6"));
        assert!(!catalog.is_derived_variable("zx", "cmip6"));
    }

    #[test]
    fn test_the_out_label_means_the_primary_output() {
        let mut catalog = catalog();
        declare(&mut catalog, "identity", "cdo copy ${in} ${out}");
        catalog
            .derive(
                "*",
                btreemap! { "out".to_string() => "tas_full".to_string() },
                "identity",
                &["tas"],
                Params::new(),
            )
            .unwrap();
        let entry = catalog.derived_variable("tas_full", "cmip6").unwrap();
        assert_eq!(entry.output, None);
    }

    #[test]
    fn test_deriving_on_a_missing_primary_output_is_rejected() {
        let mut catalog = catalog();
        declare(&mut catalog, "split", "split.sh ${in} ${out_l500}");
        let err = catalog
            .derive("*", "z500", "split", &["zg"], Params::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Derivation(DerivationError::MissingPrimaryOutput { .. })
        ));
    }

    #[test]
    fn test_named_output_rules_survive_to_derivation_consumers() {
        let mut catalog = catalog();
        catalog
            .declare(
                ScriptDeclaration::new(
                    "mean_and_std_dev",
                    "mean_and_std_dev.sh ${in} ${out} ${out_sdev}",
                )
                .output_variable("sdev", "std_dev(%s)"),
            )
            .unwrap();

        let contract = catalog.lookup("mean_and_std_dev").unwrap();
        assert_eq!(
            contract.outputs.named("sdev"),
            Some(&OutputNameRule::Template("std_dev(%s)".to_string()))
        );
    }

    // ============ Reset ============

    #[test]
    fn test_reset_restores_the_initial_state() {
        let mut catalog = catalog();
        declare(&mut catalog, "minus", "cdo sub ${in_1} ${in_2} ${out}");
        catalog.declare_internal("ceval").unwrap();
        catalog
            .derive("*", "rscre", "minus", &["rs", "rscs"], Params::new())
            .unwrap();
        catalog.reserve("extra");

        catalog.reset();

        assert!(catalog.is_empty());
        assert!(catalog.lookup("minus").is_none());
        assert!(!catalog.is_internal("ceval"));
        assert!(!catalog.is_derived_variable("rscre", "cmip6"));
        assert!(!catalog.is_reserved("extra"));
        assert!(catalog.is_reserved("reset"));
    }
}
