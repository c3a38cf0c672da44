//! validate_ead - Check an EAD finding aid before publication.
//!
//! Applies the publication rules (identifier format, repository, level,
//! internal-only content, digital object links, relator codes) and, when
//! built with the `validation` feature, XSD validation.
//!
//! # Usage
//!
//! ```bash
//! validate_ead [OPTIONS] <FILENAME>
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Check a finding aid against the default repository list
//! validate_ead mc_100.xml
//!
//! # Accept only a specific repository
//! validate_ead --repository "Fales Library and Special Collections" mc_100.xml
//!
//! # Also validate against the schema (requires the validation feature)
//! validate_ead --schema schema/ead.xsd mc_100.xml
//! ```
//!
//! Each diagnostic is printed on its own line. The exit status is 1 if any
//! check failed.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ead_rs::rules::RuleSet;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check an EAD finding aid before publication.
#[derive(Parser, Debug)]
#[command(name = "validate_ead")]
#[command(version = VERSION)]
#[command(about = "Check an EAD finding aid before publication")]
struct Args {
    /// Input EAD file to check
    filename: PathBuf,

    /// Accepted repository name (may be repeated; replaces the default list)
    #[arg(long = "repository", value_name = "NAME")]
    repositories: Vec<String>,

    /// Validate against this XSD as well
    #[cfg(feature = "validation")]
    #[arg(long, value_name = "XSD")]
    schema: Option<String>,
}

/// Runs the publication rules over a file.
fn check(path: &Path, rules: &RuleSet) -> anyhow::Result<Vec<String>> {
    let xml = std::fs::read(path).with_context(|| format!("Unable to read {}", path.display()))?;
    Ok(rules.check_bytes(&xml))
}

#[cfg(feature = "validation")]
fn schema_diagnostics(args: &Args) -> anyhow::Result<Vec<String>> {
    match args.schema.as_deref() {
        Some(schema) => Ok(ead_rs::validation::validate_file(&args.filename, Some(schema))?),
        None => Ok(Vec::new()),
    }
}

#[cfg(not(feature = "validation"))]
fn schema_diagnostics(_args: &Args) -> anyhow::Result<Vec<String>> {
    Ok(Vec::new())
}

fn rule_set(repositories: &[String]) -> RuleSet {
    if repositories.is_empty() {
        RuleSet::default()
    } else {
        RuleSet::default().with_repositories(repositories.iter().cloned())
    }
}

fn init_tracing() {
    let filter = EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "ead_rs=info".into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let args = Args::parse();

    let mut diagnostics = schema_diagnostics(&args)?;
    if diagnostics.is_empty() {
        diagnostics = check(&args.filename, &rule_set(&args.repositories))?;
    }

    for line in &diagnostics {
        println!("{}", line);
    }
    info!(
        file = %args.filename.display(),
        violations = diagnostics.len(),
        "checked finding aid"
    );

    Ok(if diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::{check, rule_set};
    use std::io::Write;

    const TEST_EAD: &str = r#"<ead xmlns="urn:isbn:1-931666-22-9">
  <eadheader><eadid>mc_100</eadid></eadheader>
  <archdesc level="collection">
    <did><repository><corpname>Fales Library and Special Collections</corpname></repository></did>
  </archdesc>
</ead>"#;

    #[test]
    fn test_check_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TEST_EAD.as_bytes()).unwrap();

        let diagnostics = check(file.path(), &rule_set(&[])).unwrap();
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn test_check_with_repository_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TEST_EAD.as_bytes()).unwrap();

        let rules = rule_set(&["New York University Archives".to_string()]);
        let diagnostics = check(file.path(), &rules).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("Fales Library and Special Collections"));
    }
}
