use fmsh::messages::COMMANDS;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub struct FmshHelper {
    /// Snapshot of the session's current directory, refreshed before each prompt.
    pub cwd: Arc<RwLock<PathBuf>>,
}

impl FmshHelper {
    pub fn new(cwd: Arc<RwLock<PathBuf>>) -> Self {
        Self { cwd }
    }
}

impl Completer for FmshHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_cursor = &line[..pos];
        let (start, word) = find_word_start(line_to_cursor);
        let is_first_word = !line_to_cursor[..start].contains(|c: char| !c.is_whitespace());

        if is_first_word {
            let completions = COMMANDS
                .iter()
                .filter(|command| command.name.starts_with(word))
                .map(|command| Pair {
                    display: command.name.to_string(),
                    replacement: command.name.to_string(),
                })
                .collect();
            return Ok((start, completions));
        }

        let cwd = match self.cwd.read() {
            Ok(guard) => guard.clone(),
            Err(_) => return Ok((pos, vec![])),
        };

        let (dir_part, partial) = match word.rfind('/') {
            Some(last_slash) => (&word[..=last_slash], &word[last_slash + 1..]),
            None => ("", word),
        };
        let dir = cwd.join(dir_part);

        let completions = complete_path(&dir, partial)
            .into_iter()
            .map(|name| Pair {
                replacement: format!("{dir_part}{name}"),
                display: name,
            })
            .collect();

        Ok((start, completions))
    }
}

fn complete_path(dir: &Path, partial: &str) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return vec![];
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with(partial) {
                return None;
            }
            let is_dir = entry.file_type().is_ok_and(|ft| ft.is_dir());
            Some(if is_dir { format!("{name}/") } else { name })
        })
        .collect();
    names.sort();
    names
}

fn usage_hint(line: &str) -> Option<String> {
    let command = COMMANDS.iter().find(|command| command.name == line)?;
    let rest = &command.usage[command.name.len()..];
    (!rest.is_empty()).then(|| rest.to_string())
}

fn find_word_start(line: &str) -> (usize, &str) {
    let mut start = line.len();
    for (i, c) in line.char_indices().rev() {
        if c.is_whitespace() || c == '"' {
            break;
        }
        start = i;
    }
    (start, &line[start..])
}

impl Hinter for FmshHelper {
    type Hint = String;

    /// Shows the argument shape once a full verb has been typed.
    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        usage_hint(line)
    }
}

impl Highlighter for FmshHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Borrowed(hint)
    }
}

impl Validator for FmshHelper {}

impl Helper for FmshHelper {}
