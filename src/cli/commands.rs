//! Shell commands that feed entries to the ledger and draw its summaries.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::render;
use crate::cli::shell_context::ShellContext;
use crate::config::Config;
use crate::core::services::{entry_service::parse_amount, EditOutcome};
use crate::errors::LedgerError;
use crate::ledger::{period::ParsePeriodError, EntryId, Period};

const JSON_FLAG: &str = "--json";

pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "income",
        "Record income received now",
        "income <amount>",
        cmd_income,
    ));
    registry.register(CommandEntry::new(
        "expense",
        "Record an expense made now",
        "expense <amount> <category> [description...]",
        cmd_expense,
    ));
    registry.register(CommandEntry::new(
        "edit",
        "Change the amount and category of an expense",
        "edit <id> <amount> <category>",
        cmd_edit,
    ));
    registry.register(CommandEntry::new(
        "remove",
        "Delete an expense",
        "remove <id>",
        cmd_remove,
    ));
    registry.register(CommandEntry::new(
        "totals",
        "Show total income, spending and money in hand",
        "totals",
        cmd_totals,
    ));
    registry.register(CommandEntry::new(
        "summary",
        "Show income, spending and breakdown for a period",
        "summary <today|week|month> [--json]",
        cmd_summary,
    ));
    registry.register(CommandEntry::new(
        "snapshot",
        "Show totals and every period summary",
        "snapshot [--json]",
        cmd_snapshot,
    ));
    registry.register(CommandEntry::new(
        "details",
        "List today's expenses",
        "details",
        cmd_details,
    ));
    registry.register(CommandEntry::new(
        "list",
        "List every entry recorded this session",
        "list",
        cmd_list,
    ));
    registry.register(CommandEntry::new(
        "config",
        "Show or change display settings",
        "config [show | set <key> <value>]",
        cmd_config,
    ));
    registry.register(CommandEntry::new(
        "help",
        "Show available commands",
        "help [command]",
        cmd_help,
    ));
    registry.register(CommandEntry::new(
        "exit",
        "Leave the shell",
        "exit",
        cmd_exit,
    ));
    registry.alias("quit", "exit");
}

fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("Usage: {usage}"))
}

fn parse_entry_id(text: &str) -> Result<EntryId, CommandError> {
    text.trim()
        .trim_start_matches('#')
        .parse::<u64>()
        .map(EntryId)
        .map_err(|_| CommandError::InvalidArguments(format!("`{text}` is not an entry id")))
}

/// Splits a trailing `--json` flag from positional arguments.
fn split_json_flag<'a>(args: &[&'a str]) -> (Vec<&'a str>, bool) {
    let json = args.iter().any(|arg| *arg == JSON_FLAG);
    let rest = args.iter().copied().filter(|arg| *arg != JSON_FLAG).collect();
    (rest, json)
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        output::line(line);
    }
}

fn cmd_income(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [amount] = args else {
        return Err(usage_error("income <amount>"));
    };
    let amount = parse_amount(amount)?;
    let id = ctx.manager.record_income(amount)?;
    output::success(format!(
        "Income {id} recorded: {}",
        ctx.config.format_money(amount)
    ));
    ctx.refresh_views();
    Ok(())
}

fn cmd_expense(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [amount, category, description @ ..] = args else {
        return Err(usage_error("expense <amount> <category> [description...]"));
    };
    let amount = parse_amount(amount)?;
    let description = description.join(" ");
    let description = (!description.trim().is_empty()).then_some(description.as_str());
    let id = ctx.manager.record_expense(amount, category, description)?;
    output::success(format!(
        "Expense {id} recorded: {} {}",
        category.trim(),
        ctx.config.format_money(amount)
    ));
    ctx.refresh_views();
    Ok(())
}

fn cmd_edit(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id, amount, category] = args else {
        return Err(usage_error("edit <id> <amount> <category>"));
    };
    let id = parse_entry_id(id)?;
    // Unparsable text is just another invalid amount: the edit is cancelled.
    let amount = Decimal::from_str(amount.trim()).unwrap_or(Decimal::ZERO);
    match ctx.manager.edit_expense(id, amount, category)? {
        EditOutcome::Applied => {
            output::success(format!("Expense {id} updated."));
            ctx.refresh_views();
        }
        EditOutcome::Cancelled => {
            output::warning(format!("Edit of {id} cancelled; entry unchanged."));
        }
    }
    Ok(())
}

fn cmd_remove(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage_error("remove <id>"));
    };
    let id = parse_entry_id(id)?;
    let Some(entry) = ctx.manager.ledger().expense(id) else {
        return Err(LedgerError::EntryNotFound(id).into());
    };
    let prompt = format!(
        "Remove {} {} {}?",
        id,
        entry.category,
        ctx.config.format_money(entry.amount)
    );
    if !ctx.confirm(&prompt)? {
        output::info("Removal cancelled.");
        return Ok(());
    }
    let removed = ctx.manager.remove_expense(id)?;
    output::success(format!(
        "Expense {id} removed: {} {}",
        removed.category,
        ctx.config.format_money(removed.amount)
    ));
    ctx.refresh_views();
    Ok(())
}

fn cmd_totals(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Totals");
    print_lines(render::totals_lines(&ctx.config, &ctx.manager.totals()));
    Ok(())
}

fn cmd_summary(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "summary <today|week|month> [--json]";
    let (rest, json) = split_json_flag(args);
    let [period] = rest.as_slice() else {
        return Err(usage_error(usage));
    };
    let period: Period = period
        .parse()
        .map_err(|err: ParsePeriodError| CommandError::InvalidArguments(err.to_string()))?;
    let summary = ctx.manager.summary(period);
    if json {
        output::line(serde_json::to_string_pretty(&summary)?);
    } else {
        output::section(period.label());
        print_lines(render::summary_lines(&ctx.config, &summary));
    }
    Ok(())
}

fn cmd_snapshot(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (rest, json) = split_json_flag(args);
    if !rest.is_empty() {
        return Err(usage_error("snapshot [--json]"));
    }
    let snapshot = ctx.manager.snapshot();
    if json {
        output::line(serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }
    for (title, lines) in render::snapshot_sections(&ctx.config, &snapshot) {
        output::section(title);
        print_lines(lines);
    }
    Ok(())
}

fn cmd_details(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Today's expenses");
    print_lines(render::detail_lines(&ctx.config, &ctx.manager.detail_list()));
    Ok(())
}

fn cmd_list(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = ctx.manager.ledger();
    if ledger.entry_count() == 0 {
        output::info("No entries recorded yet.");
        return Ok(());
    }
    output::section("Entries");
    print_lines(render::entry_lines(
        &ctx.config,
        ledger.incomes(),
        ledger.expenses(),
    ));
    Ok(())
}

fn cmd_config(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output::section("Settings");
            for (key, value) in ctx.config.entries() {
                output::line(format!("{key} = {value}"));
            }
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            let mut updated: Config = ctx.config.clone();
            updated.set(key, &value.join(" "))?;
            ctx.store_config(updated)?;
            output::success(format!("Setting `{key}` updated."));
            Ok(())
        }
        _ => Err(usage_error("config [show | set <key> <value>]")),
    }
}

fn cmd_help(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let [name] = args {
        let Some(entry) = ctx.registry.get(&name.to_ascii_lowercase()) else {
            ctx.suggest_command(name);
            return Ok(());
        };
        output::line(format!("{} - {}", entry.name, entry.description));
        output::line(format!("Usage: {}", entry.usage));
        if entry.name == "config" {
            output::line(format!("Keys: {}", Config::KEYS.join(", ")));
        }
        return Ok(());
    }
    output::section("Commands");
    for entry in ctx.registry.list() {
        output::line(format!("  {:<10} {}", entry.name, entry.description));
    }
    Ok(())
}

fn cmd_exit(_ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
