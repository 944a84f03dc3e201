//! CLI binary for ordering, validating and outlining business-plan goal tables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bizplan_goals::{
    order_goals, render_deck, GoalRegistry, GoalTable, LoadReport, OutlineRenderer, PlanConfig,
    Severity, TextRenderer,
};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bizplan", version, about = "Turns a goal-tracking export into an ordered business-plan deck")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the presentation order of a goal table
    Order {
        /// Path to the goal table JSON export
        table: PathBuf,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Lint a goal table
    Validate {
        /// Path to the goal table JSON export
        table: PathBuf,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show information about a goal table
    Info {
        /// Path to the goal table JSON export
        table: PathBuf,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Order a goal table and write the deck outline as JSON
    Outline {
        /// Path to the goal table JSON export
        table: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "bizplan.json")]
        output: PathBuf,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        layouts: LayoutArgs,
    },
}

/// Slide layout overrides, applied on top of the configuration file.
#[derive(Args, Debug, Default)]
struct LayoutArgs {
    /// Slide master index for Theme slides
    #[arg(long)]
    theme_slide_master: Option<usize>,

    /// Layout index within the Theme slide master
    #[arg(long)]
    theme_slide_master_layout: Option<usize>,

    /// Slide master index for Objective, Outcome and Action slides
    #[arg(long)]
    okr_slide_master: Option<usize>,

    /// Layout index within the OKR slide master
    #[arg(long)]
    okr_slide_master_layout: Option<usize>,
}

impl LayoutArgs {
    fn apply(&self, config: &mut PlanConfig) {
        if let Some(master) = self.theme_slide_master {
            config.layouts.theme.master = master;
        }
        if let Some(layout) = self.theme_slide_master_layout {
            config.layouts.theme.layout = layout;
        }
        if let Some(master) = self.okr_slide_master {
            config.layouts.okr.master = master;
        }
        if let Some(layout) = self.okr_slide_master_layout {
            config.layouts.okr.layout = layout;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Order { table, config } => {
            cmd_order(&table, config.as_deref())?;
        }
        Commands::Validate { table, config } => {
            cmd_validate(&table, config.as_deref())?;
        }
        Commands::Info { table, config } => {
            cmd_info(&table, config.as_deref())?;
        }
        Commands::Outline {
            table,
            output,
            config,
            layouts,
        } => {
            cmd_outline(&table, &output, config.as_deref(), &layouts)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PlanConfig> {
    match path {
        Some(p) => Ok(PlanConfig::load(p)?),
        None => Ok(PlanConfig::default()),
    }
}

fn load_goals(path: &Path, config: &PlanConfig) -> anyhow::Result<LoadReport> {
    let table = GoalTable::load(path)?;
    let report = GoalRegistry::from_table(&table, config)?;
    tracing::info!(
        table = %path.display(),
        goals = report.registry.len(),
        skipped = report.skipped.len(),
        "Goal table loaded"
    );
    Ok(report)
}

fn cmd_order(path: &Path, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let report = load_goals(path, &config)?;
    let ordered = order_goals(&report.registry, &config.theme_tag)?;

    let mut renderer = TextRenderer::new(std::io::stdout().lock());
    render_deck(&ordered, &config, &mut renderer)?;
    Ok(())
}

fn cmd_validate(path: &Path, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let report = load_goals(path, &config)?;
    let diagnostics = bizplan_goals::validate(&report.registry, &config.theme_tag);

    for skipped in &report.skipped {
        println!("[WARN] malformed_row: {}", skipped.reason);
    }

    if diagnostics.is_empty() {
        println!("Goal table is valid");
        return Ok(());
    }

    let mut has_error = false;
    for diag in &diagnostics {
        let severity = match diag.severity {
            Severity::Error => {
                has_error = true;
                "ERROR"
            }
            Severity::Warning => "WARN",
            Severity::Info => "INFO",
        };
        println!("[{}] {}: {}", severity, diag.rule, diag.message);
        if let Some(fix) = &diag.fix {
            println!("        fix: {}", fix);
        }
    }

    if has_error {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_info(path: &Path, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let report = load_goals(path, &config)?;
    let registry = &report.registry;

    println!("Table: {}", path.display());
    println!("Goals: {}", registry.len());
    println!("Skipped rows: {}", report.skipped.len());
    if !registry.duplicate_ids().is_empty() {
        println!("Duplicate ids: {}", registry.duplicate_ids().join(", "));
    }

    let mut per_type: BTreeMap<&str, usize> = BTreeMap::new();
    let mut roots = Vec::new();
    for record in registry.records() {
        if record.is_theme(&config.theme_tag) {
            roots.push(record);
        } else {
            *per_type.entry(record.object_type.as_str()).or_default() += 1;
        }
    }

    println!("\n{}s: {}", config.theme_tag, roots.len());
    for root in &roots {
        println!("  {} [{}]", root.title, root.id());
    }

    println!("\nBy object type:");
    for (object_type, count) in &per_type {
        println!("  {}: {}", object_type, count);
    }

    Ok(())
}

fn cmd_outline(
    path: &Path,
    output: &Path,
    config_path: Option<&Path>,
    layouts: &LayoutArgs,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    layouts.apply(&mut config);

    let report = load_goals(path, &config)?;
    let ordered = order_goals(&report.registry, &config.theme_tag)?;

    let mut renderer = OutlineRenderer::new();
    let count = render_deck(&ordered, &config, &mut renderer)?;
    renderer.into_outline().save(output)?;

    tracing::info!(slides = count, output = %output.display(), "Deck outline written");
    println!("Wrote {} slides to {}", count, output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_flags_override_config() {
        let mut config = PlanConfig::default();
        let args = LayoutArgs {
            theme_slide_master: Some(1),
            okr_slide_master_layout: Some(7),
            ..LayoutArgs::default()
        };
        args.apply(&mut config);

        assert_eq!(config.layouts.theme.master, 1);
        assert_eq!(config.layouts.theme.layout, 3);
        assert_eq!(config.layouts.okr.master, 2);
        assert_eq!(config.layouts.okr.layout, 7);
    }

    #[test]
    fn outline_command_parses_defaults() {
        let cli = Cli::try_parse_from(["bizplan", "outline", "goals.json"]).unwrap();
        match cli.command {
            Commands::Outline { output, config, .. } => {
                assert_eq!(output, PathBuf::from("bizplan.json"));
                assert!(config.is_none());
            }
            _ => panic!("expected outline command"),
        }
    }

    #[test]
    fn verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["bizplan", "order", "goals.json", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
