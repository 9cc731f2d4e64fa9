mod error;
mod logging;
mod output;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use schemagen_core::{CodeType, GeneratorOptions, to_literal};
use schemagen_infer::ModelGenerator;
use schemagen_introspect::SnapshotSource;
use serde::Serialize;

use error::{CliError, CliResult};

#[derive(Parser, Debug)]
#[command(name = "schemagen", version, about = "Semantic model generator for relational schemas")]
struct Cli {
    /// Append JSON log lines to this file instead of logging to stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the semantic model from a metadata snapshot.
    Model(ModelArgs),
    /// Translate a column default into a source-code literal.
    Literal(LiteralArgs),
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// JSON snapshot of the metadata queries.
    #[arg(long, value_name = "PATH")]
    snapshot: PathBuf,
    /// TOML generation settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output path for the emission view (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output path for the inference report.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Only emit objects from this schema.
    #[arg(long)]
    schema: Option<String>,
    /// Table exclusion pattern (repeatable).
    #[arg(long, value_name = "REGEX")]
    exclude: Vec<String>,
    /// Reject every view.
    #[arg(long, default_value_t = false)]
    no_views: bool,
    /// Require views to carry the vw_ prefix.
    #[arg(long, default_value_t = false)]
    require_view_prefix: bool,
    /// Keep rejected tables in the emitted view.
    #[arg(long, default_value_t = false)]
    keep_rejected: bool,
}

#[derive(Args, Debug)]
struct LiteralArgs {
    /// SQL type of the column, e.g. `datetime2` or `nvarchar(50)`.
    #[arg(long = "type", value_name = "SQL_TYPE")]
    sql_type: String,
    /// Raw default expression as stored in the catalog.
    default: String,
}

#[derive(Serialize)]
struct ModelOutput<'a> {
    run_id: &'a str,
    #[serde(flatten)]
    view: schemagen_core::EmissionView<'a>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = logging::init_logging(cli.log_file.as_deref()) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let outcome = match cli.command {
        Command::Model(args) => run_model(args),
        Command::Literal(args) => run_literal(args),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_model(args: ModelArgs) -> CliResult<()> {
    let options = apply_overrides(settings::load_options(args.config.as_deref())?, &args);
    let keep_rejected = options.keep_rejected;
    tracing::info!(
        event = "model_started",
        snapshot = %args.snapshot.display(),
        schema = options.schema.as_deref().unwrap_or("*")
    );

    let source = SnapshotSource::from_path(&args.snapshot)?;
    let generator = ModelGenerator::new(options)?;
    let result = generator.generate(&source)?;

    let view = result.model.emission_view(keep_rejected);
    if view.tables.is_empty() && view.procedures.is_empty() {
        tracing::warn!(event = "empty_model", "nothing left to emit");
    }
    output::write_json(
        args.out.as_deref(),
        &ModelOutput {
            run_id: &result.report.run_id,
            view,
        },
    )?;
    if let Some(report_path) = args.report.as_deref() {
        output::write_json(Some(report_path), &result.report)?;
        tracing::info!(event = "report_written", path = %report_path.display());
    }

    tracing::info!(
        event = "model_finished",
        run_id = %result.report.run_id,
        emitted = result.report.emitted_tables,
        rejected = result.report.rejected_tables,
        duration_ms = result.report.duration_ms
    );
    Ok(())
}

fn apply_overrides(mut options: GeneratorOptions, args: &ModelArgs) -> GeneratorOptions {
    if let Some(schema) = &args.schema {
        options.schema = Some(schema.clone());
    }
    options.exclude_tables.extend(args.exclude.iter().cloned());
    if args.no_views {
        options.include_views = false;
    }
    if args.require_view_prefix {
        options.require_view_prefix = true;
    }
    if args.keep_rejected {
        options.keep_rejected = true;
    }
    options
}

fn run_literal(args: LiteralArgs) -> CliResult<()> {
    let code_type = CodeType::from_sql_type(&args.sql_type);
    let literal = to_literal(&args.default, code_type).ok_or_else(|| {
        CliError::InvalidArgs(format!(
            "`{}` has no {} literal",
            args.default,
            code_type.as_str()
        ))
    })?;
    println!("{literal}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_args(extra: &[&str]) -> ModelArgs {
        let mut argv = vec!["schemagen", "model", "--snapshot", "db.json"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Model(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn flags_override_file_settings() {
        let file = GeneratorOptions {
            schema: Some("sales".to_string()),
            exclude_tables: vec!["^tmp".to_string()],
            ..GeneratorOptions::default()
        };
        let args = model_args(&["--schema", "dbo", "--exclude", "^__", "--no-views"]);
        let options = apply_overrides(file, &args);

        assert_eq!(options.schema.as_deref(), Some("dbo"));
        assert_eq!(options.exclude_tables, vec!["^tmp", "^__"]);
        assert!(!options.include_views);
        assert!(!options.keep_rejected);
    }

    #[test]
    fn absent_flags_leave_settings_alone() {
        let file = GeneratorOptions {
            include_views: false,
            keep_rejected: true,
            ..GeneratorOptions::default()
        };
        let options = apply_overrides(file.clone(), &model_args(&[]));
        assert_eq!(options, file);
    }

    #[test]
    fn literal_requires_a_translatable_default() {
        let args = LiteralArgs {
            sql_type: "int".to_string(),
            default: "abc".to_string(),
        };
        assert!(matches!(run_literal(args), Err(CliError::InvalidArgs(_))));
    }
}
