//! ead_to_json - Convert an EAD finding aid to a JSON publication record.
//!
//! Reads an EAD file, flattens its rich text, optionally wraps runs of
//! item-level components in presentation containers, and writes the
//! resulting record as JSON.
//!
//! # Usage
//!
//! ```bash
//! ead_to_json [OPTIONS] <FILENAME>
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Convert a finding aid, printing JSON to stdout
//! ead_to_json mc_100.xml > mc_100.json
//!
//! # Group item-level components and record a theme and donors
//! ead_to_json --group --theme-id cdf80c84 --donor "Jane Doe" mc_100.xml
//!
//! # Compact output to a file, with debug logging
//! RUST_LOG=ead_rs=debug ead_to_json --compact -o mc_100.json mc_100.xml
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ead_rs::objects::{Ead, RunInfo};
use ead_rs::output::{JsonWriter, OutputConfig};
use ead_rs::reader::parse_file;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convert an EAD finding aid to a JSON publication record.
#[derive(Parser, Debug)]
#[command(name = "ead_to_json")]
#[command(version = VERSION)]
#[command(about = "Convert an EAD finding aid to a JSON publication record")]
struct Args {
    /// Input EAD file to process
    filename: PathBuf,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Wrap runs of item-level components in presentation containers
    #[arg(long)]
    group: bool,

    /// Output compact JSON (no indentation)
    #[arg(long)]
    compact: bool,

    /// Presentation theme identifier to record
    #[arg(long)]
    theme_id: Option<String>,

    /// Donor name to record (may be repeated)
    #[arg(long = "donor", value_name = "NAME")]
    donors: Vec<String>,
}

/// Reads the finding aid and attaches run and publication data.
fn load(path: &Path, theme_id: Option<&str>, donors: &[String]) -> anyhow::Result<Ead> {
    let mut ead =
        parse_file(path).with_context(|| format!("Unable to read {}", path.display()))?;

    ead.set_run_info(RunInfo::now(path.display().to_string()));
    if let Some(theme_id) = theme_id {
        ead.set_pub_info(theme_id);
    }
    ead.donors.extend(donors.iter().cloned());
    Ok(ead)
}

fn init_tracing() {
    let filter = EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "ead_rs=info".into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let ead = load(&args.filename, args.theme_id.as_deref(), &args.donors)?;
    info!(
        eadid = ead.eadid().unwrap_or_default(),
        components = ead.component_count(),
        "read finding aid"
    );

    let config = if args.compact {
        OutputConfig::compact()
    } else {
        OutputConfig::default()
    }
    .with_grouping(args.group);
    let writer = JsonWriter::with_config(config);

    match args.output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Unable to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            writer.write(&ead, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writer.write(&ead, &mut out)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::load;
    use std::io::Write;

    const TEST_EAD: &str = r#"<ead xmlns="urn:isbn:1-931666-22-9">
  <eadheader><eadid>mc_100</eadid></eadheader>
  <archdesc level="collection">
    <did><unittitle>Mos Omega Papers</unittitle></did>
    <dsc><c01 id="s1" level="series"/></dsc>
  </archdesc>
</ead>"#;

    #[test]
    fn test_load_attaches_run_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TEST_EAD.as_bytes()).unwrap();

        let donors = vec!["Jane Doe".to_string()];
        let ead = load(file.path(), Some("cdf80c84"), &donors).unwrap();

        assert_eq!(ead.eadid(), Some("mc_100"));
        assert_eq!(ead.component_count(), 1);
        assert_eq!(ead.donors, donors);
        assert_eq!(ead.pub_info.unwrap().theme_id, "cdf80c84");

        let run_info = ead.run_info.unwrap();
        assert_eq!(run_info.lib_version, ead_rs::VERSION);
        assert_eq!(run_info.source_file, file.path().display().to_string());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("missing.xml"), None, &[]);
        assert!(result.is_err());
    }
}
