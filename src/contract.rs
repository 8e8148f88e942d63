//! Operator contracts: the parsed, validated description of a declared
//! script operator, and the declaration type users hand to the catalog.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DefinitionError;
use crate::parser::{CommandTemplate, PlaceholderKind};

/* ===================== Output format ===================== */

/// File format an operator writes its outputs in.
///
/// `None` marks side-effect-only operators (viewers, dumps): they take
/// inputs but produce no file the framework should track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "nc")]
    NetCdf,
    #[serde(rename = "png")]
    Graphic,
    #[serde(rename = "none")]
    None,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            OutputFormat::NetCdf => "nc",
            OutputFormat::Graphic => "png",
            OutputFormat::None => "none",
        };
        f.pad(text)
    }
}

/* ===================== Capability flags ===================== */

/// What the underlying tool can do by itself.
///
/// The selection flags tell the evaluation engine which preparation steps
/// the tool handles internally and which ones must happen upstream. They
/// are inferred from the template; the opendap and commutation flags are
/// stated by the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilityFlags {
    pub can_opendap: bool,
    pub can_select_var: bool,
    pub can_select_time: bool,
    pub can_select_domain: bool,
    pub can_aggregate_time: bool,
    pub can_alias: bool,
    pub can_missing: bool,
    pub commute_with_time_concatenation: bool,
    pub commute_with_space_concatenation: bool,
}

impl CapabilityFlags {
    /// Infer the selection flags from a parsed template.
    ///
    /// Variable selection counts only for the unranked `${var}`; period and
    /// domain selection count for ranks 0 and 1; time aggregation needs a
    /// plain series input (`${ins}` or `${ins_1}`). The alias and missing
    /// flags each follow their own placeholder.
    fn infer(template: &CommandTemplate, decl: &ScriptDeclaration) -> Self {
        let mut flags = CapabilityFlags {
            can_opendap: decl.can_opendap,
            commute_with_time_concatenation: decl.commute_with_time_concatenation,
            commute_with_space_concatenation: decl.commute_with_space_concatenation,
            ..Default::default()
        };
        for placeholder in &template.placeholders {
            match placeholder.kind {
                PlaceholderKind::Variable { rank: 0 } => flags.can_select_var = true,
                PlaceholderKind::Period { rank: 0 | 1, .. } => flags.can_select_time = true,
                PlaceholderKind::Domain { rank: 0 | 1 } => flags.can_select_domain = true,
                PlaceholderKind::Input {
                    rank: 0 | 1,
                    multiple: false,
                    series: true,
                } => flags.can_aggregate_time = true,
                PlaceholderKind::Alias => flags.can_alias = true,
                PlaceholderKind::Missing => flags.can_missing = true,
                _ => {}
            }
        }
        flags
    }
}

/* ===================== Inputs ===================== */

/// One input slot of an operator, from an input placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSlot {
    /// Explicit `_<n>` suffix, or 0 for the unranked form.
    pub rank: u32,
    /// Keyword as written in the template (`in_2`, `mmins`, ...).
    pub keyword: String,
    /// Slot takes a list of datasets.
    pub multiple: bool,
    /// Slot takes a time-series of files.
    pub series: bool,
}

/// Number of distinct input slots in a template.
///
/// Consecutive input placeholders carrying the same multiplicity and rank
/// collapse into one slot; the series marker does not distinguish slots.
pub fn distinct_input_arity(template: &CommandTemplate) -> usize {
    let mut count = 0;
    let mut last: Option<(bool, u32)> = None;
    for placeholder in &template.placeholders {
        if let PlaceholderKind::Input { rank, multiple, .. } = placeholder.kind {
            let key = (multiple, rank);
            if last != Some(key) {
                count += 1;
            }
            last = Some(key);
        }
    }
    count
}

/* ===================== Outputs ===================== */

/// How an output's variable gets its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum OutputNameRule {
    /// The variable is always called this.
    Literal(String),
    /// Format holding exactly one `%s`, applied to the main variable name.
    Template(String),
}

impl OutputNameRule {
    fn from_rule_text(name: &str, label: &str, rule: &str) -> Result<Self, DefinitionError> {
        match rule.matches("%s").count() {
            0 => Ok(OutputNameRule::Literal(rule.to_string())),
            1 => Ok(OutputNameRule::Template(rule.to_string())),
            _ => Err(DefinitionError::AmbiguousOutputRule {
                name: name.to_string(),
                label: label.to_string(),
                rule: rule.to_string(),
            }),
        }
    }

    /// Variable name for this output, given the invocation's main variable.
    pub fn resolve(&self, main_variable: &str) -> String {
        match self {
            OutputNameRule::Literal(name) => name.clone(),
            OutputNameRule::Template(format) => format.replacen("%s", main_variable, 1),
        }
    }
}

/// Output set of an operator: the unnamed primary plus named secondaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outputs {
    primary: Option<OutputNameRule>,
    named: BTreeMap<String, OutputNameRule>,
}

impl Outputs {
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Naming rule of the primary output, when the template has `${out}`.
    pub fn primary(&self) -> Option<&OutputNameRule> {
        self.primary.as_ref()
    }

    /// Naming rule of the named output `label`.
    pub fn named(&self, label: &str) -> Option<&OutputNameRule> {
        self.named.get(label)
    }

    /// Labels of the named outputs, sorted.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.named.len() + usize::from(self.primary.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.named.is_empty()
    }
}

/* ===================== Declaration ===================== */

/// What a user states when declaring a script operator.
///
/// Everything beyond name and command template is optional. The selection
/// capabilities are never declared here; they are inferred from the
/// template's placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptDeclaration {
    name: String,
    command: String,
    #[serde(default)]
    format: OutputFormat,
    #[serde(default)]
    can_opendap: bool,
    #[serde(default)]
    commute_with_time_concatenation: bool,
    #[serde(default)]
    commute_with_space_concatenation: bool,
    #[serde(default)]
    output_variables: BTreeMap<String, String>,
}

impl ScriptDeclaration {
    /// Declaration of `name` running `command`, with NetCDF output and no
    /// extra attributes.
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            format: OutputFormat::default(),
            can_opendap: false,
            commute_with_time_concatenation: false,
            commute_with_space_concatenation: false,
            output_variables: BTreeMap::new(),
        }
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn can_opendap(mut self, can: bool) -> Self {
        self.can_opendap = can;
        self
    }

    pub fn commute_with_time_concatenation(mut self, can: bool) -> Self {
        self.commute_with_time_concatenation = can;
        self
    }

    pub fn commute_with_space_concatenation(mut self, can: bool) -> Self {
        self.commute_with_space_concatenation = can;
        self
    }

    /// Naming rule for the secondary output `label`: a literal variable
    /// name, or a format holding one `%s` applied to the main variable.
    pub fn output_variable(mut self, label: impl Into<String>, rule: impl Into<String>) -> Self {
        self.output_variables.insert(label.into(), rule.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

/* ===================== Contract ===================== */

/// The parsed, validated description of a declared script operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorContract {
    pub name: String,
    pub template: CommandTemplate,
    /// Input slots in rank order.
    pub inputs: Vec<InputSlot>,
    pub outputs: Outputs,
    pub flags: CapabilityFlags,
    pub output_format: OutputFormat,
    /// Where the probe found the base command.
    pub executable: PathBuf,
}

impl OperatorContract {
    /// Build the contract for `decl` from its parsed template.
    ///
    /// This runs every declaration-time rule:
    /// 1. collect input slots, rejecting duplicate ranks;
    /// 2. require at least one input and a sane rank sequence;
    /// 3. collect outputs and their naming rules;
    /// 4. infer the capability flags;
    /// 5. force the side-effect format when no output placeholder exists.
    pub fn build(
        decl: &ScriptDeclaration,
        template: CommandTemplate,
        executable: PathBuf,
    ) -> Result<Self, DefinitionError> {
        let name = decl.name.as_str();
        let inputs = collect_inputs(name, &template)?;
        let outputs = collect_outputs(name, &template, &decl.output_variables)?;
        let flags = CapabilityFlags::infer(&template, decl);
        let output_format = if outputs.is_empty() {
            OutputFormat::None
        } else {
            decl.format
        };
        Ok(OperatorContract {
            name: decl.name.clone(),
            template,
            inputs,
            outputs,
            flags,
            output_format,
            executable,
        })
    }

    /// Number of distinct input slots (consecutive duplicates collapsed).
    pub fn input_arity(&self) -> usize {
        distinct_input_arity(&self.template)
    }
}

fn collect_inputs(name: &str, template: &CommandTemplate) -> Result<Vec<InputSlot>, DefinitionError> {
    let mut inputs: Vec<InputSlot> = Vec::new();
    for placeholder in &template.placeholders {
        if let PlaceholderKind::Input {
            rank,
            multiple,
            series,
        } = placeholder.kind
        {
            if inputs.iter().any(|slot| slot.rank == rank) {
                return Err(DefinitionError::DuplicateInputRank {
                    name: name.to_string(),
                    rank,
                });
            }
            inputs.push(InputSlot {
                rank,
                keyword: placeholder.keyword.clone(),
                multiple,
                series,
            });
        }
    }
    if inputs.is_empty() {
        return Err(DefinitionError::NoInput {
            name: name.to_string(),
        });
    }
    inputs.sort_by_key(|slot| slot.rank);

    let ranks: Vec<u32> = inputs.iter().map(|slot| slot.rank).collect();
    let contiguous_from_one = ranks.iter().copied().eq(1..=ranks.len() as u32);
    if !(ranks == [0] || contiguous_from_one) {
        return Err(DefinitionError::BrokenInputSequence {
            name: name.to_string(),
            ranks,
        });
    }
    Ok(inputs)
}

fn collect_outputs(
    name: &str,
    template: &CommandTemplate,
    declared_rules: &BTreeMap<String, String>,
) -> Result<Outputs, DefinitionError> {
    let mut primary = None;
    let mut named = BTreeMap::new();
    for placeholder in &template.placeholders {
        let PlaceholderKind::Output { label } = &placeholder.kind else {
            continue;
        };
        match label {
            None => primary = Some(OutputNameRule::Template("%s".to_string())),
            Some(label) if label.is_empty() => {
                return Err(DefinitionError::EmptyOutputLabel {
                    name: name.to_string(),
                })
            }
            Some(label) => {
                let rule = match declared_rules.get(label) {
                    Some(rule) => OutputNameRule::from_rule_text(name, label, rule)?,
                    None => OutputNameRule::Literal(label.clone()),
                };
                named.insert(label.clone(), rule);
            }
        }
    }
    for label in declared_rules.keys() {
        if !named.contains_key(label) {
            warn!(
                "declaring {}: naming rule for {:?} matches no ${{out_{}}} placeholder",
                name, label, label
            );
        }
    }
    Ok(Outputs { primary, named })
}
