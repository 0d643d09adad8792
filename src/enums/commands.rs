use std::path::PathBuf;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample configuration file
    Init,
    /// Check the configuration and the external tools it points at
    Validate,
    /// Start the HTTP analysis service
    Serve {
        #[clap(long)]
        host: Option<String>,
        #[clap(short, long)]
        port: Option<u16>,
    },
    /// Decompile a single binary
    Decompile {
        binary: PathBuf,
        #[clap(short, long)]
        architecture: Option<String>,
    },
    /// Compare two versions of firmware source code
    CompareCode {
        old: PathBuf,
        new: PathBuf,
        #[clap(short, long)]
        firmware_type: Option<String>,
    },
    /// Compare two versions of a specification document
    CompareSpecs {
        old: PathBuf,
        new: PathBuf,
    },
    /// Correlate a code analysis with a specification analysis
    ValidateCompliance {
        code_analysis: PathBuf,
        spec_analysis: PathBuf,
    },
    /// Run the full pipeline over old/new code (source or binary) and old/new specs
    Analyze {
        #[clap(long, conflicts_with = "old_binary", required_unless_present = "old_binary")]
        old_code: Option<PathBuf>,
        #[clap(long)]
        old_binary: Option<PathBuf>,
        #[clap(long, conflicts_with = "new_binary", required_unless_present = "new_binary")]
        new_code: Option<PathBuf>,
        #[clap(long)]
        new_binary: Option<PathBuf>,
        #[clap(long)]
        old_spec: PathBuf,
        #[clap(long)]
        new_spec: PathBuf,
        #[clap(short, long)]
        firmware_type: Option<String>,
    },
}
