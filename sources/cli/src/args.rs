use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The class files to execute
    pub classes: Vec<String>,

    /// Name this VM reports in diagnostics
    #[arg(long, default_value = "arabica")]
    pub vm_name: String,

    /// Log verbosity: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
