//! prepare_export - Rewrite an EAD finding aid for export.
//!
//! Flattens container hierarchies so every subcontainer points at the root
//! container of its hierarchy, relabels `Creator` originations and drops the
//! internal collection identifier.
//!
//! # Usage
//!
//! ```bash
//! prepare_export [OPTIONS] <FILENAME>
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Print the rewritten document
//! prepare_export mc_100.xml > mc_100.export.xml
//!
//! # Write it to a file
//! prepare_export -o mc_100.export.xml mc_100.xml
//! ```
//!
//! On failure each diagnostic is printed to stderr on its own line and the
//! exit status is 1.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ead_rs::export::prepare_xml_for_export;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rewrite an EAD finding aid for export.
#[derive(Parser, Debug)]
#[command(name = "prepare_export")]
#[command(version = VERSION)]
#[command(about = "Rewrite an EAD finding aid for export")]
struct Args {
    /// Input EAD file to process
    filename: PathBuf,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// Reads and rewrites a file, returning the document or its diagnostics.
fn prepare(path: &Path) -> anyhow::Result<Result<String, Vec<String>>> {
    let xml = std::fs::read(path).with_context(|| format!("Unable to read {}", path.display()))?;
    Ok(prepare_xml_for_export(&xml))
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

    let output = match prepare(&args.filename)? {
        Ok(output) => output,
        Err(diagnostics) => {
            error!(file = %args.filename.display(), "export preparation failed");
            for line in &diagnostics {
                eprintln!("{}", line);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    match args.output {
        Some(path) => std::fs::write(&path, output)
            .with_context(|| format!("Unable to write {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            out.write_all(output.as_bytes())?;
            out.flush()?;
        }
    }

    info!(file = %args.filename.display(), "prepared for export");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::prepare;
    use std::io::Write;

    #[test]
    fn test_prepare_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"<ead><archdesc><did><origination label="Creator"/><container id="A">1</container><container id="B" parent="A">2</container></did></archdesc></ead>"#,
        )
        .unwrap();

        let output = prepare(file.path()).unwrap().unwrap();
        assert_eq!(
            output,
            r#"<ead><archdesc><did><origination label="creator"/><container id="A">1</container><container parent="A">2</container></did></archdesc></ead>"#
        );
    }

    #[test]
    fn test_prepare_reports_diagnostics() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<ead><archdesc></ead>").unwrap();

        let diagnostics = prepare(file.path()).unwrap().unwrap_err();
        assert_eq!(diagnostics[0], "Unable to parse XML file");
    }
}
