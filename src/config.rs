/// Run configuration loader - parses run.toml
///
/// Separates run parameters from code, making it easy to reprocess a
/// different year range, switch search filters, or redirect input/output
/// directories without recompiling.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::filter::{DataFormat, SearchFilter};
use crate::model::PipelineError;

/// Physical outputs to write into the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSelection {
    /// events.csv + episodes.csv
    Csv,
    /// data.json bundle
    Json,
    /// Both of the above.
    Both,
}

impl OutputSelection {
    pub fn includes_csv(&self) -> bool {
        matches!(self, OutputSelection::Csv | OutputSelection::Both)
    }

    pub fn includes_json(&self) -> bool {
        matches!(self, OutputSelection::Json | OutputSelection::Both)
    }
}

/// One run's immutable parameters, loaded once at startup and passed into
/// the pipeline by value.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Years to process, in order: explicit years ("1996") and inclusive
    /// ranges ("1998-2004").
    pub years: Vec<String>,

    /// Directory holding the yearly source files.
    pub input_dir: String,

    /// Directory under which the output package directory is created.
    pub output_dir: String,

    /// Source file-name template; every occurrence of "YYYY"
    /// (case-insensitive) is replaced by the year.
    pub source_name_format: String,

    /// Search filter short code (A, EO, DO, E, PE, HW, HWD, TW, TWD, HTWD).
    pub search_filter: String,

    /// Target output shape for the usability filter (Region, Markers, Any).
    #[serde(default = "default_data_format")]
    pub data_format: String,

    /// Physical outputs: "csv", "json", or "both".
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_data_format() -> String {
    "Any".to_string()
}

fn default_output() -> String {
    "json".to_string()
}

impl RunConfig {
    /// Expands the year list: explicit entries in place, "A-B" ranges
    /// inclusive, overall order preserved.
    ///
    /// # Errors
    /// `InvalidConfig` on an unparseable entry, a descending range, or an
    /// expansion that yields no years at all.
    pub fn expanded_years(&self) -> Result<Vec<i32>, PipelineError> {
        let mut years = Vec::new();
        for entry in &self.years {
            let entry = entry.trim();
            match entry.split_once('-') {
                Some((start, end)) => {
                    let start: i32 = parse_year(start)?;
                    let end: i32 = parse_year(end)?;
                    if start > end {
                        return Err(PipelineError::InvalidConfig(format!(
                            "descending year range {:?}",
                            entry
                        )));
                    }
                    years.extend(start..=end);
                }
                None => years.push(parse_year(entry)?),
            }
        }
        if years.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "the year list contains no valid years".to_string(),
            ));
        }
        Ok(years)
    }

    pub fn parsed_filter(&self) -> Result<SearchFilter, PipelineError> {
        self.search_filter
            .parse()
            .map_err(PipelineError::InvalidConfig)
    }

    pub fn parsed_data_format(&self) -> Result<DataFormat, PipelineError> {
        self.data_format
            .parse()
            .map_err(PipelineError::InvalidConfig)
    }

    pub fn parsed_output(&self) -> Result<OutputSelection, PipelineError> {
        match self.output.as_str() {
            "csv" => Ok(OutputSelection::Csv),
            "json" => Ok(OutputSelection::Json),
            "both" => Ok(OutputSelection::Both),
            other => Err(PipelineError::InvalidConfig(format!(
                "unknown output selection {:?} (expected csv, json, or both)",
                other
            ))),
        }
    }

    /// Directory the whole output package is written into. Named after the
    /// year list and filter so distinct runs land in distinct packages.
    pub fn package_path(&self) -> PathBuf {
        let package_name = format!("dust_{}_{}", self.years.join("_"), self.search_filter);
        Path::new(&self.output_dir).join(package_name)
    }
}

fn parse_year(text: &str) -> Result<i32, PipelineError> {
    text.trim()
        .parse()
        .map_err(|_| PipelineError::InvalidConfig(format!("invalid year {:?}", text)))
}

/// Loads the run configuration from a TOML file.
pub fn load_config(path: &str) -> Result<RunConfig, PipelineError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| PipelineError::InvalidConfig(format!("failed to read {}: {}", path, e)))?;
    toml::from_str(&contents)
        .map_err(|e| PipelineError::InvalidConfig(format!("failed to parse {}: {}", path, e)))
}
