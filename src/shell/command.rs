use crate::shell::session::InputMode;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// One line typed at the shell prompt.
#[derive(Debug, Parser)]
#[command(name = "docgen", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    /// Switch between spreadsheet upload and manual entry
    Mode {
        #[arg(value_enum)]
        mode: InputMode,
    },

    /// Turn PDF export on or off
    Pdf {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Turn Word export on or off
    Word {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Show the current mode, formats and selections
    Status,

    /// Select spreadsheet files to generate from (upload mode)
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Add an employee entry; prompts for each field when no flags are given (manual mode)
    Add(EntryArgs),

    /// Show the current entries (manual mode)
    List,

    /// Remove all entries (manual mode)
    Clear,

    /// Generate documents for the current mode's input
    Generate,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct EntryArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub position: Option<String>,

    /// Joining date as YYYY-MM-DD; today when omitted
    #[arg(long)]
    pub date: Option<String>,
}

impl EntryArgs {
    pub fn is_empty(&self) -> bool {
        self == &EntryArgs::default()
    }
}

/// Splits a command line on whitespace, keeping quoted sections together.
pub fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("Unterminated {} quote", q));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
