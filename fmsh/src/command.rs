//! Command-line parsing: one input line becomes one [`Command`].

use fmsh_core::{FmError, FmResult};
use regex::Regex;
use std::sync::LazyLock;

/// A run of non-space, non-quote characters or a double-quoted run; adjacent runs glue.
static ARG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:[^\s"]+|"[^"]*")+"#).expect("argument pattern is valid"));

/// Flag of the `os` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFlag {
    Eol,
    HomeDir,
    Username,
    Cpus,
    Architecture,
    Help,
}

impl OsFlag {
    /// `--NAME`, case-insensitive. Anything unrecognized asks for help.
    pub fn parse(raw: &str) -> Self {
        let Some(name) = raw.trim().strip_prefix("--") else {
            return Self::Help;
        };
        match name.to_ascii_lowercase().as_str() {
            "eol" => Self::Eol,
            "homedir" => Self::HomeDir,
            "username" => Self::Username,
            "cpus" => Self::Cpus,
            "architecture" => Self::Architecture,
            _ => Self::Help,
        }
    }
}

/// The two path arguments of `rn`, `cp`, `mv`, `compress` and `decompress`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
    pub first: String,
    pub second: String,
}

impl PathPair {
    /// Exactly two non-empty tokens, otherwise `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut tokens = split_args(raw).into_iter();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(first), Some(second), None) if !first.is_empty() && !second.is_empty() => {
                Some(Self { first, second })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Os(OsFlag),
    Ls,
    Up,
    Cd(String),
    Cat(String),
    Add(String),
    Rm(String),
    Rn(PathPair),
    Cp(PathPair),
    Mv(PathPair),
    Hash(String),
    Compress(PathPair),
    Decompress(PathPair),
    Exit,
}

impl Command {
    /// Splits off the verb at the first space. Single-path verbs take the
    /// rest of the line verbatim, so `cd My Documents` targets `My Documents`.
    pub fn parse(line: &str) -> FmResult<Self> {
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));

        let pair = |raw: &str| {
            PathPair::parse(raw)
                .ok_or_else(|| FmError::invalid_input(format!("{verb} expects two paths")))
        };

        let command = match verb {
            "os" => Self::Os(OsFlag::parse(rest)),
            "ls" => Self::Ls,
            "up" => Self::Up,
            "cd" => Self::Cd(rest.to_string()),
            "cat" => Self::Cat(rest.to_string()),
            "add" => Self::Add(rest.to_string()),
            "rm" => Self::Rm(rest.to_string()),
            "rn" => Self::Rn(pair(rest)?),
            "cp" => Self::Cp(pair(rest)?),
            "mv" => Self::Mv(pair(rest)?),
            "hash" => Self::Hash(rest.to_string()),
            "compress" => Self::Compress(pair(rest)?),
            "decompress" => Self::Decompress(pair(rest)?),
            "exit" => Self::Exit,
            _ => return Err(FmError::invalid_input(format!("unknown command: {verb}"))),
        };
        Ok(command)
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Os(_) => "os",
            Self::Ls => "ls",
            Self::Up => "up",
            Self::Cd(_) => "cd",
            Self::Cat(_) => "cat",
            Self::Add(_) => "add",
            Self::Rm(_) => "rm",
            Self::Rn(_) => "rn",
            Self::Cp(_) => "cp",
            Self::Mv(_) => "mv",
            Self::Hash(_) => "hash",
            Self::Compress(_) => "compress",
            Self::Decompress(_) => "decompress",
            Self::Exit => "exit",
        }
    }
}

/// Quote-aware argument splitting.
///
/// Each token has its quotes removed. A quote without a partner is never part
/// of a token, so it acts as a separator.
pub fn split_args(raw: &str) -> Vec<String> {
    ARG_TOKEN
        .find_iter(raw)
        .map(|token| token.as_str().replace('"', ""))
        .collect()
}
