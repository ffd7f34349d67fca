use std::path::{Path, PathBuf};

use clap::Args;
use codergen_gen::{RunError, Settings};
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    config::{Config, DEFAULT_CONFIG},
    ops::{self, Plan},
    reports::{FailureReport, GenerateReport, Report, TerminalOutput},
};

/// Options shared by `generate` and `check`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Source patterns; `dir/...` recurses (defaults to ./...)
    pub paths: Vec<String>,

    /// Path to coder.toml (defaults to ./coder.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip native Rust coders
    #[arg(long)]
    pub no_rust: bool,

    /// Root for Rust output (defaults to next to each source file)
    #[arg(long, value_name = "DIR")]
    pub rust_out: Option<PathBuf>,

    /// Root for Java output
    #[arg(long, value_name = "DIR")]
    pub java: Option<PathBuf>,

    /// Root for C++ output
    #[arg(long, value_name = "DIR")]
    pub cpp: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// Write a signature manifest here after a clean run
    #[arg(long, value_name = "FILE")]
    pub signatures: Option<PathBuf>,

    /// Copyright line placed in every generated header
    #[arg(long)]
    pub copyright: Option<String>,
}

impl GenerateArgs {
    fn load_config(&self) -> Config {
        let config = match &self.config {
            Some(path) => Config::open(path, true),
            None => Config::open(Path::new(DEFAULT_CONFIG), false),
        };
        config.unwrap_or_exit()
    }

    pub fn plan(&self, settings: Settings) -> Plan {
        self.merge(self.load_config(), settings)
    }

    /// Merge flags over `config`; a flag always wins.
    fn merge(&self, config: Config, settings: Settings) -> Plan {
        let generate = config.generate;
        Plan {
            rust: !self.no_rust && generate.rust.unwrap_or(true),
            rust_out: self.rust_out.clone().or(generate.rust_out),
            java_out: self.java.clone().or(config.java.out),
            cpp_out: self.cpp.clone().or(config.cpp.out),
            workers: self.workers.map(usize::from).or(generate.workers),
            signatures: self.signatures.clone().or(generate.signatures),
            copyright: self.copyright.clone().or(generate.copyright),
            settings,
        }
    }

    /// Scan and generate, rendering failures before returning them.
    pub fn execute(&self, settings: Settings) -> Result<GenerateReport> {
        let plan = self.plan(settings);
        let modules = ops::scan(&self.paths).unwrap_or_exit();

        match ops::generate(&plan, &modules) {
            Ok(report) => Ok(report),
            Err(RunError::Generation { errors }) => {
                FailureReport { errors: &errors }.render(&mut TerminalOutput::new());
                Err(RunError::Generation { errors }.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub args: GenerateArgs,

    /// Report what would change without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let settings = if self.dry_run {
            Settings::dry_run()
        } else {
            Settings::default()
        };
        let report = self.args.execute(settings)?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
