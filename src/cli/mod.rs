use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "seqrun")]
#[command(version, about = "Runs command scripts against a power-of-two growable sequence", long_about = None)]
pub struct Cli {
    /// The .seq script file to run
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Inline command to run after FILE; may be repeated
    #[arg(short, long = "expr", value_name = "COMMAND")]
    pub exprs: Vec<String>,

    /// Print length and capacity after every command
    #[arg(long)]
    pub trace_capacity: bool,

    /// Set verbose level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
