use anyhow::{Context, Result, anyhow};
use seqvec_runner::cli::Cli;
use seqvec_runner::logging::init_logging;
use seqvec_runner::script::Session;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    if cli.file.is_none() && cli.exprs.is_empty() {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    let stdout = io::stdout().lock();
    let mut session = Session::new(stdout).with_trace_capacity(cli.trace_capacity);

    if let Some(file_path) = &cli.file {
        run_script(&mut session, file_path)
            .with_context(|| format!("Failed to run script: {:?}", file_path))?;
    }

    if !cli.exprs.is_empty() {
        let inline = cli.exprs.join("\n");
        session.run(&inline).context("Inline commands failed")?;
    }

    session.into_output().flush()?;
    Ok(())
}

fn run_script<W: Write>(session: &mut Session<W>, path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow!("File not found: {:?}", path));
    }
    if path.extension().and_then(|s| s.to_str()) != Some("seq") {
        return Err(anyhow!("File must have .seq extension: {:?}", path));
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;

    session.run(&source)
}
