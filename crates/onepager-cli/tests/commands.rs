//! Integration tests for the onepager CLI commands
//!
//! Run the commands against a temporary data directory.

use std::fs;
use std::path::Path;

use onepager_cli::app::EmployeeStatus;
use onepager_cli::{check_command, show_command, validate_command, OutputFormat};
use onepager_ooxml::test_utils::{theme_xml, PptxBuilder};
use onepager_validate::{Settings, ValidationError};
use tempfile::TempDir;

const PROFILE: [&str; 3] = [
    "Max arbeitet seit vielen Jahren als Softwareentwickler und begleitet Kunden bei der Modernisierung ihrer Anwendungen.",
    "Seine Schwerpunkte liegen in der Architektur verteilter Systeme und in der Einführung automatisierter Tests.",
    "Zuletzt hat er ein Team bei der Migration einer Versicherungsplattform in die Cloud unterstützt.",
];

fn settings(dir: &TempDir) -> Settings {
    let template = dir.path().join("template.pptx");
    fs::write(&template, PptxBuilder::new().slide(&["Vorlage"]).build()).unwrap();

    let mut settings = Settings::default();
    settings.template.path = template;
    settings.storage.data_dir = dir.path().join("data");
    settings
}

fn write_one_pager(dir: &Path, folder: &str, name: &str, builder: PptxBuilder) {
    let folder = dir.join("data").join("onepagers").join(folder);
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join(name), builder.build()).unwrap();
}

#[tokio::test]
async fn test_check_foreign_template() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let input = dir.path().join("Mustermann, Max_DE_240901.pptx");
    fs::write(
        &input,
        PptxBuilder::new()
            .theme(theme_xml("Office Theme"))
            .slide(&PROFILE)
            .build(),
    )
    .unwrap();

    let errors = check_command(&input, OutputFormat::Json, &settings)
        .await
        .unwrap();

    assert!(errors.contains(&ValidationError::UsingUnknownTemplate));
    assert!(!errors.contains(&ValidationError::OlderThanSixMonths));
    assert!(!errors.contains(&ValidationError::MissingPhoto));
}

#[tokio::test]
async fn test_check_missing_file() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let result = check_command(&dir.path().join("missing.pptx"), OutputFormat::Text, &settings).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_validate_and_show() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_one_pager(
        dir.path(),
        "Max_Mustermann_4711",
        "Mustermann, Max_DE_200115.pptx",
        PptxBuilder::new().slide(&PROFILE),
    );

    let summaries = validate_command(Some("4711"), false, OutputFormat::Text, &settings)
        .await
        .unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].status, EmployeeStatus::Invalid);
    assert!(summaries[0]
        .errors
        .contains(&ValidationError::OlderThanSixMonths));

    let report = show_command("4711", OutputFormat::Text, &settings)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.document, "Mustermann, Max_DE_200115.pptx");
    assert_eq!(report.errors, summaries[0].errors);
}

#[tokio::test]
async fn test_validate_all_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_one_pager(
        dir.path(),
        "Max_Mustermann_4711",
        "Mustermann, Max_DE_200115.pptx",
        PptxBuilder::new().slide(&PROFILE),
    );
    let broken = dir.path().join("data/onepagers/Erika_Musterfrau_815");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("Musterfrau, Erika_DE_240101.pptx"), b"not a zip").unwrap();
    fs::create_dir_all(dir.path().join("data/onepagers/Nina_Neu_9")).unwrap();

    let summaries = validate_command(None, true, OutputFormat::Json, &settings)
        .await
        .unwrap();

    let statuses: Vec<(&str, EmployeeStatus)> = summaries
        .iter()
        .map(|s| (s.employee.as_str(), s.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("4711", EmployeeStatus::Invalid),
            ("815", EmployeeStatus::Failed),
            ("9", EmployeeStatus::NoDocuments),
        ]
    );
    assert!(summaries[1].message.is_some());
}

#[tokio::test]
async fn test_show_without_result() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let report = show_command("4711", OutputFormat::Json, &settings)
        .await
        .unwrap();
    assert!(report.is_none());
}
