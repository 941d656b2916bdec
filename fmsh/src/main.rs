use clap::Parser;
use fmsh::{Shell, ShellError, ShellResult, DEFAULT_USERNAME};
use fmsh_config::{expand_home, CompressionLevel, FmshConfig};
use fmsh_core::{EngineOptions, FileEngine, Level};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

mod completer;

/// fmsh - Interactive file manager shell
#[derive(Parser, Debug)]
#[command(name = "fmsh", version, about)]
struct Args {
    /// Name used in the greeting and farewell
    #[arg(long, env = "FMSH_USERNAME", default_value = DEFAULT_USERNAME)]
    username: String,

    /// Configuration file
    #[arg(long)]
    config: Option<String>,

    /// Execute command and exit
    #[arg(short = 'c')]
    command: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => fmsh_config::load_from_file(path).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {e}, using defaults");
            FmshConfig::default()
        }),
        None => fmsh_config::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {e}, using defaults");
            FmshConfig::default()
        }),
    };

    let log_level = if args.debug {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let start_dir = match &config.shell.start_dir {
        Some(dir) => expand_home(dir),
        None => dirs::home_dir().ok_or("cannot determine the home directory")?,
    };
    let engine = FileEngine::new(&start_dir)
        .await?
        .with_options(engine_options(&config));
    let mut shell = Shell::new(engine, args.username);

    if let Some(command) = args.command {
        match shell.execute(&command).await {
            Ok(()) | Err(ShellError::Exit(0)) => std::process::exit(0),
            Err(ShellError::Exit(code)) => std::process::exit(code),
            Err(e) => {
                eprintln!("fmsh: {e}");
                std::process::exit(1);
            }
        }
    }

    run_repl(&mut shell, &config).await?;
    Ok(())
}

fn engine_options(config: &FmshConfig) -> EngineOptions {
    EngineOptions {
        buffer_size: config.engine.buffer_size,
        compression: match config.engine.compression {
            CompressionLevel::Fastest => Level::Fastest,
            CompressionLevel::Default => Level::Default,
            CompressionLevel::Best => Level::Best,
        },
        archive_suffix: config.engine.archive_suffix.clone(),
    }
}

async fn run_repl(shell: &mut Shell, config: &FmshConfig) -> ShellResult<()> {
    use completer::FmshHelper;
    use rustyline::error::ReadlineError;
    use rustyline::{CompletionType, Config, Editor};

    let history = &config.shell.history;
    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .max_history_size(history.max_entries)?
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .build();

    let cwd = Arc::new(RwLock::new(PathBuf::from(shell.engine.current_dir())));
    let helper = FmshHelper::new(cwd.clone());

    let mut rl = Editor::with_config(rl_config)?;
    rl.set_helper(Some(helper));

    let history_path = expand_home(&history.file);
    if history.enabled {
        let _ = rl.load_history(&history_path);
    }

    shell.greet()?;

    loop {
        if let Ok(mut guard) = cwd.write() {
            *guard = shell.engine.current_dir().to_path_buf();
        }

        let prompt = config
            .shell
            .prompt
            .replace("{cwd}", &shell.cwd())
            .replace("{user}", &shell.username);

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if history.enabled && !line.is_empty() {
                    let _ = rl.add_history_entry(line);
                }

                match shell.execute(line).await {
                    Ok(()) => {}
                    Err(ShellError::Exit(code)) => {
                        save_history(&mut rl, history.enabled, &history_path);
                        std::process::exit(code);
                    }
                    Err(e) => eprintln!("fmsh: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                shell.farewell()?;
                break;
            }
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }

    save_history(&mut rl, history.enabled, &history_path);
    Ok(())
}

fn save_history<H: rustyline::Helper>(
    rl: &mut rustyline::Editor<H, rustyline::history::DefaultHistory>,
    enabled: bool,
    path: &std::path::Path,
) {
    if enabled {
        let _ = rl.save_history(path);
    }
}
