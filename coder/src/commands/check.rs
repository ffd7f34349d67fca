use clap::Args;
use codergen_gen::Settings;
use eyre::Result;

use super::generate::GenerateArgs;
use crate::reports::{Report, TerminalOutput};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub args: GenerateArgs,
}

impl CheckCommand {
    /// Dry-run generation; exits 1 when any output is stale.
    pub fn run(&self) -> Result<()> {
        let report = self.args.execute(Settings::dry_run())?;
        report.render(&mut TerminalOutput::new());

        if report.has_drift() {
            eprintln!("error: generated files are out of date; run `coder generate`");
            std::process::exit(1);
        }
        Ok(())
    }
}
