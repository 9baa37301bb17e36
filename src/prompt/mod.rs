//! Interactive decisions.
//!
//! Everything the workflow needs a human for goes through [`Prompter`], so the
//! orchestration code can be driven by scripted answers in tests.

mod terminal;

pub use terminal::TerminalPrompter;

use crate::error::{PromptError, Result};

/// Validator for free-text input: `Err` carries the message shown before re-asking
pub type Validator<'a> = &'a dyn Fn(&str) -> std::result::Result<(), String>;

/// Capability interface for human input
pub trait Prompter {
    /// Choose one of `items`, returning its index
    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<usize>;

    /// Free-text input; the implementation re-asks until `validate` accepts
    fn input(&self, prompt: &str, validate: Validator<'_>) -> Result<String>;

    /// Masked secret input
    fn password(&self, prompt: &str) -> Result<String>;
}

/// Choose one of `choices` by label, returning the associated value
pub fn select_value<P, T>(prompter: &P, prompt: &str, choices: &[(String, T)], default: usize) -> Result<T>
where
    P: Prompter + ?Sized,
    T: Clone,
{
    if choices.is_empty() {
        return Err(PromptError::NoChoices {
            prompt: prompt.to_string(),
        }
        .into());
    }
    let labels: Vec<String> = choices.iter().map(|(label, _)| label.clone()).collect();
    let index = prompter.select(prompt, &labels, default.min(choices.len() - 1))?;
    choices
        .get(index)
        .map(|(_, value)| value.clone())
        .ok_or_else(|| {
            PromptError::Interaction {
                prompt: prompt.to_string(),
                reason: format!("selection {index} out of range"),
            }
            .into()
        })
}

/// Rejects empty or whitespace-only answers
pub fn non_blank(value: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        Err("a value is required".to_string())
    } else {
        Ok(())
    }
}
