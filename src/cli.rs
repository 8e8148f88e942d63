use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::contract::{CapabilityFlags, OperatorContract, OutputFormat};

#[derive(Parser)]
#[command(name = "climop")]
#[command(about = "climop - Declare and inspect climate operator contracts", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a command template and print the resulting contract
    Inspect {
        /// Command template, e.g. 'cdo timavg ${in} ${out}'
        template: String,

        /// Operator name for the contract
        #[arg(long, default_value = "inspected")]
        name: String,

        /// Declared output format: nc, png or none
        #[arg(long, default_value = "nc")]
        format: String,

        /// Naming rule for a named output, as LABEL=RULE
        #[arg(long = "output-var")]
        output_vars: Vec<String>,

        /// Print the contract as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate operator declaration files
    Check {
        /// Declaration files to check (defaults to the configured ones)
        files: Vec<PathBuf>,

        /// Also check the embedded standard set
        #[arg(long)]
        standard: bool,
    },

    /// List operator contracts from declaration files
    List {
        /// Declaration files to load
        #[arg(long = "file")]
        files: Vec<PathBuf>,

        /// Include the embedded standard set
        #[arg(long)]
        standard: bool,

        /// Print contracts as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI by parsing process arguments
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

/// Internal function that handles CLI commands
fn run_cli_with_args(cli: Cli) -> Result<()> {
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::contract::ScriptDeclaration;
    use crate::docs::DocDir;
    use crate::probe::AcceptAllProbe;
    use crate::standard;
    use std::env;

    // Apply CLI overrides to environment before loading configuration
    if let Some(config_path) = &cli.config {
        env::set_var("CLIMOP_CONFIG_PATH", config_path);
    }

    // Eagerly load and validate configuration before executing any command
    let config = Config::load()?;

    match cli.command {
        Commands::Inspect {
            template,
            name,
            format,
            output_vars,
            json,
        } => {
            let format = match format.as_str() {
                "nc" => OutputFormat::NetCdf,
                "png" => OutputFormat::Graphic,
                "none" => OutputFormat::None,
                _ => {
                    eprintln!("Invalid format: {}. Must be one of: nc, png, none", format);
                    std::process::exit(1);
                }
            };

            let mut decl = ScriptDeclaration::new(&name, &template).format(format);
            for spec in &output_vars {
                match spec.split_once('=') {
                    Some((label, rule)) => decl = decl.output_variable(label, rule),
                    None => {
                        eprintln!("Invalid output variable: {}. Expected LABEL=RULE", spec);
                        std::process::exit(1);
                    }
                }
            }

            // The probe accepts anything here: inspect validates templates,
            // not the host installation.
            let mut catalog = Catalog::builder().probe(AcceptAllProbe).build();
            catalog.declare(decl)?;
            let contract = catalog.lookup(&name).expect("operator declared above");

            if json {
                println!("{}", serde_json::to_string_pretty(contract)?);
            } else {
                print_contract(contract);
            }
        }

        Commands::Check { files, standard } => {
            let files = if files.is_empty() {
                config.declaration_files.clone()
            } else {
                files
            };
            if files.is_empty() && !standard {
                eprintln!("No declaration files to check. Pass paths or configure declaration_files");
                std::process::exit(1);
            }

            // check validates against this host: the default probe looks
            // for the executables on PATH.
            let mut builder = Catalog::builder();
            for name in &config.reserved_names {
                builder = builder.reserve(name.clone());
            }
            let mut catalog = builder.build();

            let mut checked = 0;
            let mut failures = 0;
            let mut check = |catalog: &mut Catalog, decl: &ScriptDeclaration| {
                checked += 1;
                match catalog.declare(decl.clone()) {
                    Ok(()) => println!("  ok   {}", decl.name()),
                    Err(err) => {
                        failures += 1;
                        println!("  FAIL {}: {}", decl.name(), err);
                    }
                }
            };

            for path in &files {
                let file = standard::load_declaration_file(path)?;
                println!("{}:", path.display());
                for decl in &file.operators {
                    check(&mut catalog, decl);
                }
            }
            if standard {
                println!("standard operators:");
                for decl in &standard::standard_operators().operators {
                    check(&mut catalog, decl);
                }
            }

            if failures > 0 {
                eprintln!("{} of {} operator declaration(s) failed", failures, checked);
                std::process::exit(1);
            }
            println!("✓ {} operator declaration(s) ok", checked);
        }

        Commands::List {
            files,
            standard,
            json,
        } => {
            let files = if files.is_empty() {
                config.declaration_files.clone()
            } else {
                files
            };

            let mut builder = Catalog::builder().probe(AcceptAllProbe);
            if let Some(dir) = &config.doc_dir {
                builder = builder.docs(DocDir::new(dir));
            }
            for name in &config.reserved_names {
                builder = builder.reserve(name.clone());
            }
            let mut catalog = builder.build();

            if standard {
                standard::declare_all(&mut catalog, standard::standard_operators())?;
            }
            for path in &files {
                let file = standard::load_declaration_file(path)?;
                standard::declare_all(&mut catalog, &file)?;
            }

            if catalog.is_empty() {
                println!("No operators declared");
                return Ok(());
            }

            if json {
                let contracts: Vec<&OperatorContract> = catalog
                    .names()
                    .into_iter()
                    .filter_map(|name| catalog.lookup(name))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&contracts)?);
                return Ok(());
            }

            println!("Found {} operator(s):\n", catalog.len());
            for name in catalog.names() {
                if let Some(facade) = catalog.facade(name) {
                    let contract = facade.contract();
                    println!(
                        "  {} | {} input(s) | {} | {}",
                        name,
                        contract.input_arity(),
                        contract.output_format,
                        outputs_summary(contract)
                    );
                    println!("      flags: {}", flags_summary(&contract.flags));
                    if let Some(line) = facade.doc().lines().next() {
                        println!("      {}", line);
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_contract(contract: &OperatorContract) {
    println!("operator {}", contract.name);
    println!("  command: {}", contract.template.raw);
    println!(
        "  inputs: {} ({})",
        contract.input_arity(),
        inputs_summary(contract)
    );
    println!("  outputs: {}", outputs_summary(contract));
    println!("  format: {}", contract.output_format);
    println!("  flags: {}", flags_summary(&contract.flags));
}

fn inputs_summary(contract: &OperatorContract) -> String {
    contract
        .inputs
        .iter()
        .map(|slot| format!("${{{}}}", slot.keyword))
        .collect::<Vec<_>>()
        .join(", ")
}

fn outputs_summary(contract: &OperatorContract) -> String {
    let mut parts = Vec::new();
    if contract.outputs.has_primary() {
        parts.push("primary");
    }
    parts.extend(contract.outputs.labels());
    if parts.is_empty() {
        "no outputs".to_string()
    } else {
        parts.join(", ")
    }
}

fn flags_summary(flags: &CapabilityFlags) -> String {
    let mut set = Vec::new();
    if flags.can_opendap {
        set.push("can_opendap");
    }
    if flags.can_select_var {
        set.push("can_select_var");
    }
    if flags.can_select_time {
        set.push("can_select_time");
    }
    if flags.can_select_domain {
        set.push("can_select_domain");
    }
    if flags.can_aggregate_time {
        set.push("can_aggregate_time");
    }
    if flags.can_alias {
        set.push("can_alias");
    }
    if flags.can_missing {
        set.push("can_missing");
    }
    if flags.commute_with_time_concatenation {
        set.push("commute_with_time_concatenation");
    }
    if flags.commute_with_space_concatenation {
        set.push("commute_with_space_concatenation");
    }
    if set.is_empty() {
        "(none)".to_string()
    } else {
        set.join(", ")
    }
}
