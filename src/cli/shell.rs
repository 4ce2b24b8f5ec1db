//! Interactive shell mode for the Scribe CLI
//!
//! Provides a REPL with command history and tab completion.

use anyhow::Result;
use clap::Parser;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};

use super::{Cli, Commands, dispatch};
use crate::api::ApiClient;
use crate::config::Config;

/// Command completer for the shell
struct ShellCompleter {
    commands: Vec<(&'static str, Vec<&'static str>)>,
}

impl ShellCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                ("agent", vec!["write", "review", "design"]),
                ("workflow", vec![]),
                ("book", vec!["generate"]),
                ("config", vec!["show", "get"]),
                ("diag", vec!["ping", "endpoints"]),
                ("help", vec![]),
                ("exit", vec![]),
                ("quit", vec![]),
            ],
        }
    }

    fn pairs<'a>(names: impl Iterator<Item = &'a &'static str>) -> Vec<Pair> {
        names
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect()
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let words: Vec<&str> = line.split_whitespace().collect();
        let start = line.rfind(' ').map(|i| i + 1).unwrap_or(0);

        let candidates = match (words.as_slice(), line.ends_with(' ')) {
            ([], _) => Self::pairs(self.commands.iter().map(|(cmd, _)| cmd)),
            ([cmd], true) => match self.commands.iter().find(|(c, _)| c == cmd) {
                Some((_, subs)) => Self::pairs(subs.iter()),
                None => Vec::new(),
            },
            ([prefix], false) => Self::pairs(
                self.commands
                    .iter()
                    .map(|(cmd, _)| cmd)
                    .filter(|cmd| cmd.starts_with(prefix)),
            ),
            ([cmd, prefix], false) => match self.commands.iter().find(|(c, _)| c == cmd) {
                Some((_, subs)) => Self::pairs(subs.iter().filter(|s| s.starts_with(prefix))),
                None => Vec::new(),
            },
            _ => Vec::new(),
        };

        Ok((start, candidates))
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellCompleter {}
impl Validator for ShellCompleter {}
impl Helper for ShellCompleter {}

/// Split a command line into arguments, honoring single and double quotes
fn parse_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_arg = false;

    for c in line.chars() {
        match (quote, c) {
            (None, '"' | '\'') => {
                quote = Some(c);
                in_arg = true;
            }
            (Some(q), c) if c == q => quote = None,
            (None, c) if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            (_, c) => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if in_arg {
        args.push(current);
    }

    args
}

/// Run a single command in the shell.
/// Returns Ok(true) to continue, Ok(false) to exit.
async fn run_command(args: Vec<String>, config: &Config, client: &ApiClient) -> Result<bool> {
    let Some(first) = args.first() else {
        return Ok(true);
    };

    match first.as_str() {
        "help" => {
            print_help();
            return Ok(true);
        }
        "exit" | "quit" => return Ok(false),
        _ => {}
    }

    let argv = std::iter::once("scribe".to_string()).chain(args);
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) => {
            println!("{}", e);
            return Ok(true);
        }
    };

    let command = match cli.command {
        None => {
            println!("Type a command, or 'help' for a list.");
            return Ok(true);
        }
        Some(Commands::Shell) => {
            println!("Already in shell mode.");
            return Ok(true);
        }
        Some(command) => command,
    };

    let format = cli.output.format();
    let quiet = cli.output.quiet;

    // A per-line --api-url targets a different backend for this command only
    match cli.api_url {
        Some(url) => {
            let config = Config::load(Some(&url))?;
            let client = ApiClient::new(&config.backend)?;
            dispatch(command, &config, &client, format, quiet).await?;
        }
        None => dispatch(command, config, client, format, quiet).await?,
    }

    Ok(true)
}

fn print_help() {
    println!(
        r#"Scribe Interactive Shell

Commands:
  agent write <prompt>                  Run the writer agent
  agent review <text>                   Run the reviewer agent
  agent design <context>                Run the designer agent
  workflow <prompt>                     Run the full book workflow

  book generate --title T --topic P     Generate a book
       [--download DIR]                 ...and save the DOCX/PDF

  config show                           Show the active configuration
  config get <key>                      Get a specific setting

  diag ping                             Check the backend is reachable
  diag endpoints                        List operation endpoints

  help                                  Show this help
  exit, quit                            Exit the shell

Quote multi-word input: agent write "Chapter 1 outline"

Flags (can be added to any command):
  --json                                Output in JSON format
  --quiet, -q                           Suppress non-essential output
  --api-url URL                         Use another backend for this command
"#
    );
}

/// Get the history file path
fn history_path() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("com", "scribe", "Scribe")
        .map(|dirs| dirs.data_dir().join("shell_history"))
}

/// Run the interactive shell
pub async fn run(config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.backend)?;

    println!("Scribe Interactive Shell v{}", env!("CARGO_PKG_VERSION"));
    println!("Backend: {}", client.base_url());
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let rl_config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let mut rl = Editor::with_config(rl_config)?;
    rl.set_helper(Some(ShellCompleter::new()));

    if let Some(path) = history_path() {
        let _ = rl.load_history(&path);
    }

    loop {
        match rl.readline("scribe> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                match run_command(parse_args(line), config, &client).await {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(e) => eprintln!("Error: {:#}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(path) = history_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(&path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_quotes() {
        assert_eq!(
            parse_args(r#"agent write "Chapter 1 outline" --json"#),
            vec!["agent", "write", "Chapter 1 outline", "--json"]
        );
        assert_eq!(
            parse_args("book generate --title 'My Book' --topic rust"),
            vec!["book", "generate", "--title", "My Book", "--topic", "rust"]
        );
    }

    #[test]
    fn test_parse_args_keeps_empty_quoted_arg() {
        assert_eq!(parse_args(r#"agent review """#), vec!["agent", "review", ""]);
    }

    #[test]
    fn test_parse_args_collapses_whitespace() {
        assert_eq!(parse_args("  diag   ping  "), vec!["diag", "ping"]);
    }

    #[tokio::test]
    async fn test_exit_and_help_are_builtins() {
        let config = Config::default();
        let client = ApiClient::new(&config.backend).unwrap();

        assert!(!run_command(vec!["exit".into()], &config, &client).await.unwrap());
        assert!(run_command(vec!["help".into()], &config, &client).await.unwrap());
        assert!(run_command(Vec::new(), &config, &client).await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_review_fails_before_dispatch() {
        let config = Config::default();
        let client = ApiClient::new(&config.backend).unwrap();

        let err = run_command(
            vec!["agent".into(), "review".into(), "".into()],
            &config,
            &client,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("enter some text"));
    }
}
