use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ListCommand {
    /// Source patterns; `dir/...` recurses (defaults to ./...)
    pub paths: Vec<String>,
}

impl ListCommand {
    pub fn run(&self) -> Result<()> {
        let modules = ops::scan(&self.paths).unwrap_or_exit();
        ops::list(&modules).render(&mut TerminalOutput::new());
        Ok(())
    }
}
