use std::{
    borrow::Cow,
    collections::HashMap,
    io::{self, BufRead, Lines},
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::errors::{CliError, CommandError};
use crate::cli::output;
use crate::cli::shell_context::{CliMode, LoopControl, ShellContext};
use crate::config::Config;
use crate::ledger::Period;

/// Setting this variable switches the shell to reading commands from stdin.
pub const SCRIPT_ENV: &str = "POCKET_LEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    tracing::info!(?mode, "shell started");

    match mode {
        CliMode::Interactive => {
            let mut source = ReadlineSource::new(&context)?;
            output::info("Type `help` to see available commands.");
            drive(&mut context, &mut source)
        }
        CliMode::Script => drive(&mut context, &mut ScriptSource::new(io::stdin().lock())),
    }
}

enum Input {
    Line(String),
    Interrupted,
    Closed,
}

/// Where the shell reads its next command from.
trait LineSource {
    fn next_line(&mut self, prompt: &str) -> Result<Input, CliError>;
}

struct ReadlineSource {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl ReadlineSource {
    fn new(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper::new(context.command_usages())));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineSource for ReadlineSource {
    fn next_line(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.trim()).ok();
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                Ok(Input::Closed)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Reads commands line by line from a script, usually stdin.
struct ScriptSource<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> ScriptSource<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> LineSource for ScriptSource<R> {
    fn next_line(&mut self, _prompt: &str) -> Result<Input, CliError> {
        loop {
            self.line_no += 1;
            match self.lines.next() {
                Some(Ok(line)) => return Ok(Input::Line(line)),
                // A line that is not UTF-8 is dropped; the rest of the script still runs.
                Some(Err(err)) if err.kind() == io::ErrorKind::InvalidData => {
                    tracing::debug!(line = self.line_no, error = %err, "undecodable script line");
                    output::warning(format!(
                        "Skipping unreadable input line {}: not valid UTF-8.",
                        self.line_no
                    ));
                }
                Some(Err(err)) => return Err(err.into()),
                None => return Ok(Input::Closed),
            }
        }
    }
}

fn drive(context: &mut ShellContext, source: &mut impl LineSource) -> Result<(), CliError> {
    while context.running {
        let prompt = context.prompt();
        match source.next_line(&prompt)? {
            Input::Line(line) => match handle_line(context, &line) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => context.report_error(err)?,
            },
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Input::Closed => break,
        }
    }
    Ok(())
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(err);
            return Ok(LoopControl::Continue);
        }
    };

    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    match context.dispatch(&raw.to_lowercase(), raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    shell_words::split(input)
}

/// Completes command names and the fixed words some commands take, and
/// hints the usage of a command once its name is typed.
struct CommandHelper {
    usages: HashMap<&'static str, &'static str>,
    names: Vec<&'static str>,
}

impl CommandHelper {
    fn new(usages: Vec<(&'static str, &'static str)>) -> Self {
        let mut names: Vec<&'static str> = usages.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        Self {
            usages: usages.into_iter().collect(),
            names,
        }
    }

    fn words_after(&self, typed: &[&str]) -> Vec<&'static str> {
        match typed {
            [] => self.names.clone(),
            ["summary"] => Period::ALL.iter().map(Period::keyword).collect(),
            ["config"] => vec!["show", "set"],
            ["config", "set"] => Config::KEYS.to_vec(),
            ["help"] => self.names.clone(),
            _ => Vec::new(),
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let typed: Vec<String> = prefix[..start]
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();
        let typed: Vec<&str> = typed.iter().map(String::as_str).collect();
        let partial = prefix[start..].to_ascii_lowercase();

        let candidates = self
            .words_after(&typed)
            .into_iter()
            .filter(|word| word.starts_with(&partial))
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() || !line.ends_with(' ') {
            return None;
        }
        let mut words = line.split_whitespace();
        let (Some(name), None) = (words.next(), words.next()) else {
            return None;
        };
        let usage = self.usages.get(name.to_ascii_lowercase().as_str())?;
        let (_, arguments) = usage.split_once(' ')?;
        Some(arguments.to_string())
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {}
