use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::commands;
use crate::cli::errors::{CliError, CommandError};
use crate::cli::output;
use crate::cli::registry::CommandRegistry;
use crate::cli::render;
use crate::config::{Config, ConfigManager};
use crate::core::{LedgerManager, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Session state shared by every command handler.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) manager: LedgerManager<SystemClock>,
    pub(crate) config: Config,
    pub(crate) config_manager: ConfigManager,
    pub(crate) running: bool,
    theme: ColorfulTheme,
}

pub(crate) fn clock_for(config: &Config) -> SystemClock {
    match config.utc_offset_minutes {
        Some(minutes) => SystemClock::with_offset_minutes(minutes),
        None => SystemClock::new(),
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        let manager = LedgerManager::new(clock_for(&config));
        tracing::debug!(config = %config_manager.path().display(), "shell context ready");

        Ok(Self {
            mode,
            registry,
            manager,
            config,
            config_manager,
            running: true,
            theme: ColorfulTheme::default(),
        })
    }

    pub(crate) fn prompt(&self) -> String {
        let totals = self.manager.totals();
        format!("ledger [{}]> ", self.config.format_money(totals.in_hand))
    }

    /// Name and usage line of every command, aliases included.
    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .names()
            .filter_map(|name| self.registry.get(name).map(|entry| (name, entry.usage)))
            .collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }

    /// Asks before a destructive action. Script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell? Entries are not saved.")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    /// Redraws every summary view, the way the ledger is shown after a change.
    pub(crate) fn refresh_views(&self) {
        if !self.config.show_snapshot_after_mutation {
            return;
        }
        let snapshot = self.manager.snapshot();
        for (title, lines) in render::snapshot_sections(&self.config, &snapshot) {
            output::section(title);
            for line in lines {
                output::line(line);
            }
        }
    }

    /// Applies a changed config to the running session and stores it.
    pub(crate) fn store_config(&mut self, config: Config) -> Result<(), CommandError> {
        self.config_manager.save(&config)?;
        if config.utc_offset_minutes != self.config.utc_offset_minutes {
            self.manager.replace_clock(clock_for(&config));
        }
        self.config = config;
        Ok(())
    }
}
