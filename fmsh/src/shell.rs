//! Shell state and command dispatch

use crate::command::{Command, OsFlag, PathPair};
use crate::error::{ShellError, ShellResult};
use crate::messages;
use crate::output::Output;
use fmsh_core::{FileEngine, OsSnapshot};
use tracing::{debug, warn};

/// Username shown when none was given at startup.
pub const DEFAULT_USERNAME: &str = "undefined";

pub struct Shell {
    pub engine: FileEngine,
    pub username: String,
    pub stdout: Output,
}

impl Shell {
    pub fn new(engine: FileEngine, username: impl Into<String>) -> Self {
        Self {
            engine,
            username: username.into(),
            stdout: Output::Stdout,
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: Output) -> Self {
        self.stdout = output;
        self
    }

    pub fn cwd(&self) -> String {
        self.engine.current_dir().display().to_string()
    }

    pub fn greet(&mut self) -> ShellResult<()> {
        self.stdout.writeln(&messages::greeting(&self.username))?;
        self.print_location()
    }

    pub fn farewell(&mut self) -> ShellResult<()> {
        self.stdout.writeln(&messages::goodbye(&self.username))?;
        Ok(())
    }

    /// Runs one input line.
    ///
    /// Command failures are reported on the output and never returned; the
    /// only error the caller sees besides output failures is
    /// [`ShellError::Exit`]. Every line except `exit` ends with the location.
    pub async fn execute(&mut self, line: &str) -> ShellResult<()> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(err) => {
                debug!(line, error = %err, "rejected input");
                self.stdout.writeln(messages::INVALID_INPUT)?;
                return self.print_location();
            }
        };

        match self.run(&command).await {
            Ok(()) => {}
            Err(ShellError::Exit(code)) => return Err(ShellError::Exit(code)),
            Err(err) => {
                warn!(command = command.verb(), error = %err, "operation failed");
                self.stdout.writeln(messages::OPERATION_FAILED)?;
            }
        }

        self.print_location()
    }

    async fn run(&mut self, command: &Command) -> ShellResult<()> {
        match command {
            Command::Os(flag) => self.cmd_os(*flag),
            Command::Ls => self.cmd_ls().await,
            Command::Up => Ok(self.engine.up().await?),
            Command::Cd(path) => Ok(self.engine.change_dir(path).await?),
            Command::Cat(path) => self.cmd_cat(path).await,
            Command::Add(path) => {
                self.engine.create_file(path, b"").await?;
                Ok(())
            }
            Command::Rm(path) => Ok(self.engine.remove_file(path).await?),
            Command::Rn(PathPair { first, second }) => {
                Ok(self.engine.rename_file(first, second).await?)
            }
            Command::Cp(PathPair { first, second }) => {
                self.engine.copy_file(first, second).await?;
                Ok(())
            }
            Command::Mv(PathPair { first, second }) => {
                self.engine.move_file(first, second).await?;
                Ok(())
            }
            Command::Hash(path) => {
                let digest = self.engine.compute_hash(path).await?;
                self.stdout.writeln(&digest)?;
                Ok(())
            }
            Command::Compress(PathPair { first, second }) => {
                self.engine.compress(first, second).await?;
                Ok(())
            }
            Command::Decompress(PathPair { first, second }) => {
                self.engine.decompress(first, second).await?;
                Ok(())
            }
            Command::Exit => {
                self.farewell()?;
                Err(ShellError::Exit(0))
            }
        }
    }

    fn cmd_os(&mut self, flag: OsFlag) -> ShellResult<()> {
        let text = match flag {
            OsFlag::Help => messages::OS_HELP.to_string(),
            OsFlag::Eol => OsSnapshot::capture().eol,
            OsFlag::HomeDir => OsSnapshot::capture().home_dir,
            OsFlag::Username => OsSnapshot::capture().username,
            OsFlag::Cpus => OsSnapshot::capture().cpus_text(),
            OsFlag::Architecture => OsSnapshot::capture().arch,
        };
        self.stdout.writeln(&text)?;
        Ok(())
    }

    async fn cmd_ls(&mut self) -> ShellResult<()> {
        let entries = self.engine.list_dir().await?;
        self.stdout.write_table(&entries)?;
        Ok(())
    }

    async fn cmd_cat(&mut self, path: &str) -> ShellResult<()> {
        let file = self.engine.open_read_stream(path).await?;
        let bytes = self.stdout.write_stream(file).await?;
        self.stdout.writeln("")?;
        debug!(path, bytes, "cat");
        Ok(())
    }

    fn print_location(&mut self) -> ShellResult<()> {
        let location = messages::location(&self.cwd());
        self.stdout.writeln(&location)?;
        Ok(())
    }
}
