//! Interactive strategy prompts on the terminal.

use std::io;

use dialoguer::{Confirm, Select};

use themesync_core::errors::PromptError;
use themesync_core::strategy::{PromptAnswer, Strategy, StrategyPrompter};
use themesync_core::Document;

use crate::style;

/// [`StrategyPrompter`] that asks on the terminal with `dialoguer`.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl StrategyPrompter for DialoguerPrompter {
    fn ask_strategy(
        &mut self,
        document: &Document,
        exists_remotely: bool,
        remaining: usize,
    ) -> Result<PromptAnswer, PromptError> {
        println!();
        println!("{}", style::warn(&format!("{} changed locally", document)));
        if !exists_remotely {
            println!("  {}", style::dim("the remote store has no copy of this file"));
        }

        let labels: Vec<&str> = Strategy::ALL
            .iter()
            .map(|s| s.describe(exists_remotely))
            .collect();

        let choice = Select::new()
            .with_prompt(format!("How should {} be synced?", document))
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?
            .ok_or(PromptError::Aborted)?;
        let strategy = Strategy::ALL[choice];

        let apply_to_all = if remaining > 1 {
            Confirm::new()
                .with_prompt(format!(
                    "Apply '{}' to all {} remaining files?",
                    strategy,
                    remaining - 1
                ))
                .default(false)
                .interact_opt()
                .map_err(prompt_error)?
                .ok_or(PromptError::Aborted)?
        } else {
            false
        };

        Ok(PromptAnswer {
            strategy,
            apply_to_all,
        })
    }
}

fn prompt_error(err: dialoguer::Error) -> PromptError {
    match err {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => PromptError::Aborted,
        dialoguer::Error::IO(e) => PromptError::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupted_maps_to_aborted() {
        let err = dialoguer::Error::IO(io::Error::new(io::ErrorKind::Interrupted, "ctrl-c"));
        assert!(matches!(prompt_error(err), PromptError::Aborted));
    }

    #[test]
    fn test_io_error_preserved() {
        let err = dialoguer::Error::IO(io::Error::new(io::ErrorKind::NotConnected, "no tty"));
        assert!(matches!(prompt_error(err), PromptError::Io(_)));
    }
}
