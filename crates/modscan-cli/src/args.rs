use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "modscan",
    version,
    about = "List the modules linked into a Go executable"
)]
pub struct Args {
    /// Path to the executable
    pub executable: PathBuf,

    /// Output results in JSON
    #[arg(long)]
    pub json: bool,

    /// Output results based on the specified template string
    #[arg(long, value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Output results based on the specified template file (wins over --template)
    #[arg(long, value_name = "PATH")]
    pub template_file: Option<PathBuf>,

    /// Should a replaced module overwrite the original? If false, the
    /// replacement is kept as a nested "replace" entry in JSON and templates
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub replace_overwrites: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
