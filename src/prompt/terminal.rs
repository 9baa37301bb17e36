//! [`Prompter`] rendered on the terminal with dialoguer.

use crate::error::{PromptError, Result};
use crate::prompt::{Prompter, Validator};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};

/// Prompts on stdin/stderr; blocks until answered
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    /// Create a prompter with the colorful theme
    pub fn new() -> Self {
        Self::default()
    }
}

fn interaction(prompt: &str, e: dialoguer::Error) -> PromptError {
    PromptError::Interaction {
        prompt: prompt.to_string(),
        reason: e.to_string(),
    }
}

impl Prompter for TerminalPrompter {
    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .map_err(|e| interaction(prompt, e))?)
    }

    fn input(&self, prompt: &str, validate: Validator<'_>) -> Result<String> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .validate_with(|value: &String| validate(value))
            .interact_text()
            .map_err(|e| interaction(prompt, e))?)
    }

    fn password(&self, prompt: &str) -> Result<String> {
        Ok(Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact()
            .map_err(|e| interaction(prompt, e))?)
    }
}
