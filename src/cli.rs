use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snomed-mapper")]
#[command(about = "Map tariff names to SNOMED codes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Service base URL (defaults to the configured one)
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the matching service
    Serve {
        /// Reference map (.json or spreadsheet)
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port
        #[arg(short, long)]
        port: Option<u16>,

        /// Web front end directory (index.html + assets)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Where generated workbooks are stored
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Match tariff names against the service
    Match {
        /// Tariff names (one per argument)
        names: Vec<String>,

        /// Text file with one tariff name per line
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a spreadsheet for bulk matching
    Upload {
        /// Excel file (.xlsx / .xls)
        file: Option<PathBuf>,

        /// Save the generated workbook here
        #[arg(short, long)]
        download: Option<PathBuf>,
    },

    /// Check that the service is up
    Status,

    /// Show or edit settings
    Config {
        /// Default service base URL
        #[arg(long)]
        set_server: Option<String>,

        /// Default reference map
        #[arg(long)]
        set_reference: Option<PathBuf>,

        /// Show settings
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match_with_names() {
        let cli = Cli::parse_from(["snomed-mapper", "match", "Paracetamol 500mg", "Ibuprofen"]);
        match cli.command {
            Commands::Match { names, input, json } => {
                assert_eq!(names, vec!["Paracetamol 500mg", "Ibuprofen"]);
                assert!(input.is_none());
                assert!(!json);
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn test_global_server_flag() {
        let cli = Cli::parse_from(["snomed-mapper", "status", "--server", "http://example:9000"]);
        assert_eq!(cli.server.as_deref(), Some("http://example:9000"));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_upload_without_file_parses() {
        let cli = Cli::parse_from(["snomed-mapper", "upload"]);
        assert!(matches!(cli.command, Commands::Upload { file: None, .. }));
    }
}
