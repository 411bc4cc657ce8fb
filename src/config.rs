//! Configuration handling for recalqc

use std::path::PathBuf;

/// Output format for the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for a summary run
#[derive(Debug, Clone)]
pub struct Config {
    /// Report files or directories to scan
    pub inputs: Vec<PathBuf>,
    /// Output format
    pub output_format: OutputFormat,
    /// Fail on the first unparsable report instead of skipping it
    pub strict: bool,
    /// Show summary columns that are hidden by default
    pub show_hidden: bool,
    /// Carry the full parsed tables into the output
    pub include_tables: bool,
    /// File extensions accepted when scanning directories
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_format: OutputFormat::default(),
            strict: false,
            show_hidden: false,
            include_tables: false,
            extensions: default_extensions(),
        }
    }
}

impl Config {
    /// Create a new Config with input paths
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            ..Default::default()
        }
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Enable strict parsing
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Show hidden summary columns
    pub fn with_show_hidden(mut self, show: bool) -> Self {
        self.show_hidden = show;
        self
    }

    /// Include the full parsed tables in the output
    pub fn with_include_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Set accepted file extensions for directory scans
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }
}

/// Extensions scanned by default: Sentieon and GATK recalibration tables
pub fn default_extensions() -> Vec<String> {
    vec!["table".to_string(), "txt".to_string(), "qcal".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(
            "terminal".parse::<OutputFormat>().unwrap(),
            OutputFormat::Terminal
        );
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_config_builders() {
        let config = Config::new(vec![PathBuf::from("reports")])
            .with_strict(true)
            .with_show_hidden(true)
            .with_extensions(vec!["table".to_string()]);

        assert_eq!(config.inputs, [PathBuf::from("reports")]);
        assert!(config.strict);
        assert!(config.show_hidden);
        assert_eq!(config.extensions, ["table"]);
        assert_eq!(config.output_format, OutputFormat::Terminal);
    }
}
