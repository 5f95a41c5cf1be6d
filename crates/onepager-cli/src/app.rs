//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info};

use onepager_deck::{LanguageClassifier, WhatlangClassifier};
use onepager_validate::adapters::{
    InMemoryOnePagerRepository, InMemoryValidationReporter, LocalFileOnePagerRepository,
    LocalFileValidationReporter, StoredReport,
};
use onepager_validate::config::SETTINGS_FILE;
use onepager_validate::rules::{all_rules, TemplateThemes};
use onepager_validate::{
    DocumentContent, DocumentRepository, OnePagerValidation, OnePagerVersion, Settings,
    ValidationError, ValidationOutcome, ValidationReporter,
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "onepager")]
#[command(version, about = "Compliance checks for employee one-pagers", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./onepager.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single one-pager file
    Check {
        /// Input PPTX file
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate employees from the data directory and store the results
    Validate {
        /// Employee id
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        employee: Option<String>,

        /// Validate every employee folder
        #[arg(long)]
        all: bool,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the stored result of an employee
    Show {
        /// Employee id
        employee: String,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Run the CLI application
///
/// Parses arguments, installs logging and dispatches to the command. Exits
/// with status 1 when findings or failures were encountered.
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(cli.config.as_deref())?;

    let failed = match cli.command {
        Commands::Check { input, format } => {
            !check_command(&input, format, &settings).await?.is_empty()
        }
        Commands::Validate {
            employee,
            all,
            format,
        } => {
            let summaries = validate_command(employee.as_deref(), all, format, &settings).await?;
            summaries.iter().any(|s| s.status.is_failure())
        }
        Commands::Show { employee, format } => {
            show_command(&employee, format, &settings).await?.is_some()
        }
    };

    if failed {
        std::process::exit(1);
    }

    Ok(())
}

/// Build the validation pipeline over the given storage
fn build_validation(
    settings: &Settings,
    repository: Arc<dyn DocumentRepository>,
    reporter: Arc<dyn ValidationReporter>,
) -> OnePagerValidation {
    let classifier: Arc<dyn LanguageClassifier> = Arc::new(WhatlangClassifier);
    let template = Arc::new(TemplateThemes::from_path(&settings.template.path));
    // No photo scoring service is wired into the CLI
    let rules = all_rules(settings, template, None);
    info!(rules = ?rules.rule_names(), template = %settings.template.path.display(), "Rule set ready");

    OnePagerValidation::new(repository, reporter, classifier, Arc::new(rules))
}

/// Execute the check command on a single file
///
/// The file name provides the locale indicator, the modification time is
/// used as the last update.
pub async fn check_command(
    input: &Path,
    format: OutputFormat,
    settings: &Settings,
) -> Result<Vec<ValidationError>> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let modified = tokio::fs::metadata(input)
        .await
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to read file metadata: {}", input.display()))?;
    let version = OnePagerVersion::new(
        name.clone(),
        DateTime::<Utc>::from(modified),
        DocumentContent::File(input.to_path_buf()),
    );

    let validation = build_validation(
        settings,
        Arc::new(InMemoryOnePagerRepository::new()),
        Arc::new(InMemoryValidationReporter::new()),
    );
    let errors = validation
        .evaluate(version, Utc::now())
        .await
        .with_context(|| format!("Failed to evaluate {}", input.display()))?;

    match format {
        OutputFormat::Json => {
            let report = StoredReport {
                document: name,
                errors: errors.clone(),
            };
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize findings")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if errors.is_empty() {
                println!("✓ No issues found in {}", input.display());
            } else {
                println!("{}:", input.display());
                print_errors(&errors);
                println!("Found {} issue(s)", errors.len());
            }
        }
    }

    Ok(errors)
}

/// Status of one employee in a validate run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Valid,
    Invalid,
    NoDocuments,
    Failed,
}

impl EmployeeStatus {
    pub fn is_failure(self) -> bool {
        matches!(self, EmployeeStatus::Invalid | EmployeeStatus::Failed)
    }
}

/// Result line of a validate run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeSummary {
    pub employee: String,
    pub status: EmployeeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EmployeeSummary {
    fn from_outcome(employee: &str, outcome: ValidationOutcome) -> Self {
        let (status, document, errors) = match outcome {
            ValidationOutcome::NoDocuments => (EmployeeStatus::NoDocuments, None, Vec::new()),
            ValidationOutcome::Valid { document } => {
                (EmployeeStatus::Valid, Some(document), Vec::new())
            }
            ValidationOutcome::Invalid { document, errors } => {
                (EmployeeStatus::Invalid, Some(document), errors)
            }
        };
        Self {
            employee: employee.to_string(),
            status,
            document,
            errors,
            message: None,
        }
    }

    fn failed(employee: &str, message: String) -> Self {
        Self {
            employee: employee.to_string(),
            status: EmployeeStatus::Failed,
            document: None,
            errors: Vec::new(),
            message: Some(message),
        }
    }
}

/// Execute the validate command against the local data directory
///
/// A failure for one employee is recorded in its summary and does not stop
/// the others.
pub async fn validate_command(
    employee: Option<&str>,
    all: bool,
    format: OutputFormat,
    settings: &Settings,
) -> Result<Vec<EmployeeSummary>> {
    let data_dir = &settings.storage.data_dir;
    let repository = Arc::new(LocalFileOnePagerRepository::new(data_dir));
    let reporter = Arc::new(LocalFileValidationReporter::new(data_dir));

    let employees = match (employee, all) {
        (_, true) => repository
            .get_all_employee_ids()
            .await
            .with_context(|| format!("Failed to list employees in {}", data_dir.display()))?,
        (Some(id), false) => vec![id.to_string()],
        (None, false) => anyhow::bail!("Either an employee id or --all is required"),
    };
    info!(employees = employees.len(), data_dir = %data_dir.display(), "Validating");

    let validation = build_validation(settings, repository, reporter);

    let mut summaries = Vec::with_capacity(employees.len());
    for id in &employees {
        let summary = match validation.validate_employee(id).await {
            Ok(outcome) => EmployeeSummary::from_outcome(id, outcome),
            Err(e) => {
                error!(employee = %id, error = %e, "Validation failed");
                EmployeeSummary::failed(id, e.to_string())
            }
        };
        summaries.push(summary);
    }

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&summaries).context("Failed to serialize results")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for summary in &summaries {
                print_summary(summary);
            }
            let invalid = summaries
                .iter()
                .filter(|s| s.status == EmployeeStatus::Invalid)
                .count();
            let failed = summaries
                .iter()
                .filter(|s| s.status == EmployeeStatus::Failed)
                .count();
            println!(
                "Validated {} employee(s): {} invalid, {} failed",
                summaries.len(),
                invalid,
                failed
            );
        }
    }

    Ok(summaries)
}

/// Execute the show command
pub async fn show_command(
    employee: &str,
    format: OutputFormat,
    settings: &Settings,
) -> Result<Option<StoredReport>> {
    let reporter = LocalFileValidationReporter::new(&settings.storage.data_dir);
    let report = reporter
        .read_report(employee)
        .await
        .with_context(|| format!("Failed to read result of employee {}", employee))?;

    match format {
        OutputFormat::Json => {
            let errors = report
                .as_ref()
                .map(|r| r.errors.clone())
                .unwrap_or_default();
            let json = serde_json::to_string_pretty(&errors).context("Failed to serialize findings")?;
            println!("{}", json);
        }
        OutputFormat::Text => match &report {
            None => println!("✓ No stored findings for employee {}", employee),
            Some(report) => {
                println!("Employee {} ({}):", employee, report.document);
                print_errors(&report.errors);
            }
        },
    }

    Ok(report)
}

fn print_errors(errors: &[ValidationError]) {
    for error in errors {
        println!("  {:<36} {}", error.code(), error.description());
    }
}

fn print_summary(summary: &EmployeeSummary) {
    match summary.status {
        EmployeeStatus::Valid => println!(
            "✓ {} {}",
            summary.employee,
            summary.document.as_deref().unwrap_or_default()
        ),
        EmployeeStatus::NoDocuments => println!("- {} no one-pager", summary.employee),
        EmployeeStatus::Invalid => {
            println!(
                "✗ {} {}",
                summary.employee,
                summary.document.as_deref().unwrap_or_default()
            );
            print_errors(&summary.errors);
        }
        EmployeeStatus::Failed => println!(
            "! {} {}",
            summary.employee,
            summary.message.as_deref().unwrap_or_default()
        ),
    }
}

/// Load settings from an explicit path or `./onepager.toml`
fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Settings::load(path).with_context(|| format!("Failed to load config: {}", path.display()))
        }
        None => Settings::load(SETTINGS_FILE)
            .with_context(|| format!("Failed to load config: {}", SETTINGS_FILE)),
    }
}
