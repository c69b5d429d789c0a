//! Interactive prompts for the update and search commands.
//!
//! Uses dialoguer for terminal UI prompts.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use skillbox_core::installed::InstalledSnapshot;

/// Confirmation flow shown before a bulk update.
pub struct UpdateFlow<W: Write = io::Stdout> {
    /// Skip the confirmation prompt
    yes: bool,
    /// Output writer (for testing)
    writer: W,
    theme: ColorfulTheme,
}

impl UpdateFlow<io::Stdout> {
    pub fn new(yes: bool) -> Self {
        Self {
            yes,
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl<W: Write> UpdateFlow<W> {
    #[cfg(test)]
    pub fn with_writer(yes: bool, writer: W) -> Self {
        Self {
            yes,
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Summarize pending updates and ask whether to proceed.
    ///
    /// Returns `false` without prompting when the update check succeeded
    /// and found nothing to update.
    pub fn confirm(&mut self, snapshot: &InstalledSnapshot) -> Result<bool> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Skill Updates").bold().cyan())?;
        writeln!(self.writer, "  ───────────────────────────")?;

        if let Some(err) = &snapshot.update_check_error {
            writeln!(
                self.writer,
                "  {} could not check for updates: {}",
                style("⚠").yellow(),
                err
            )?;
        } else if snapshot.updatable_count() == 0 {
            writeln!(self.writer, "  All skills are up to date.")?;
            writeln!(self.writer)?;
            return Ok(false);
        }

        for skill in snapshot.skills.iter().filter(|s| s.has_update) {
            writeln!(self.writer, "  • {}", style(skill.name()).green())?;
        }
        writeln!(
            self.writer,
            "  {} of {} installed skills have updates",
            snapshot.updatable_count(),
            snapshot.skills.len()
        )?;
        writeln!(self.writer)?;

        if self.yes {
            return Ok(true);
        }

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Update all skills?")
            .default(true)
            .interact()?;

        Ok(confirmed)
    }
}

/// Read the next search query. An empty answer ends the session.
pub fn prompt_query(theme: &ColorfulTheme, previous: &str) -> Result<String> {
    let query: String = Input::with_theme(theme)
        .with_prompt("Search skills (empty to quit)")
        .with_initial_text(previous)
        .allow_empty(true)
        .interact_text()?;
    Ok(query)
}
