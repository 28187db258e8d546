use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use thiserror::Error;
use time::macros::format_description;
use tokio::task::JoinError;
use tracing::{error, info, Level};
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::LocalTime;

use sha1stream::util::io::{digest_async_reader, digest_file_async};
use sha1stream::{Digest, HashError, Sha1, DEFAULT_CHUNK_SIZE};

const STDIN: &str = "-";
const LOG_FILE: &str = "sha1sum.log";

#[derive(Parser, Debug)]
#[command(name="sha1sum", version, about="Print SHA-1 (160-bit) checksums")]
struct Args {
    #[arg(long, default_value_t=DEFAULT_CHUNK_SIZE, value_parser=parse_chunk_size, help="Bytes read per chunk")]
    chunk_size: usize,

    #[arg(short, long, help="Show a progress bar for each file")]
    progress: bool,

    #[arg(long, default_value="logs", help="Directory the log file is written to")]
    log_dir: PathBuf,

    #[arg(short, long, help="Log at debug level")]
    verbose: bool,

    #[arg(help="Files to hash; none or '-' reads standard input")]
    files: Vec<PathBuf>,
}

#[derive(Debug)]
enum Input {
    Stdin,
    // stdin was already read to its end by an earlier '-'
    DrainedStdin,
    File(PathBuf),
}

#[derive(Debug, Error)]
enum InputError {
    #[error("{0}")]
    Io(io::Error),
    #[error("hashing task failed: {0}")]
    Join(#[from] JoinError),
}

impl From<HashError> for InputError {
    fn from(e: HashError) -> Self {
        match e {
            HashError::Io { source, .. } => InputError::Io(source),
        }
    }
}

fn parse_chunk_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("chunk size must be greater than zero".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn init_logging(log_dir: &Path, verbose: bool) -> Result<WorkerGuard, InitError> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(log_dir)?;
    let (non_blocking, guard) = non_blocking(file_appender);
    let timer = LocalTime::new(
        format_description!("[month]/[day]/[year] [hour repr:24]:[minute]:[second].[subsecond digits:4]"));
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_timer(timer)
        .with_max_level(level)
        .init();
    Ok(guard)
}

fn progress_bar(multi: &MultiProgress, path: &Path) -> ProgressBar {
    let len = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let bar = multi.add(ProgressBar::new(len));
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {bytes}/{total_bytes}") {
        bar.set_style(style);
    }
    bar.set_message(path.display().to_string());
    bar
}

async fn hash_input(input: Input, chunk_size: usize, bar: ProgressBar) -> Result<Digest, InputError> {
    match input {
        Input::Stdin => {
            let (digest, bytes) = digest_async_reader(tokio::io::stdin(), chunk_size, |_| {})
                .await
                .map_err(InputError::Io)?;
            info!(bytes, %digest, "hashed standard input");
            Ok(digest)
        }
        Input::DrainedStdin => Ok(Sha1::new().finalize()),
        Input::File(path) => {
            let result = digest_file_async(&path, chunk_size, |n| bar.inc(n as u64)).await;
            bar.finish_and_clear();
            let (digest, bytes) = result?;
            info!(path = %path.display(), bytes, %digest, "hashed file");
            Ok(digest)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _guard = match init_logging(&args.log_dir, args.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("sha1sum: {}: {e}", args.log_dir.display());
            return ExitCode::FAILURE;
        }
    };

    let files = if args.files.is_empty() { vec![PathBuf::from(STDIN)] } else { args.files };
    let multi = MultiProgress::new();

    // one task and one context per input; results are reported in input order
    let mut stdin_taken = false;
    let mut tasks = Vec::with_capacity(files.len());
    for path in &files {
        let mut bar = ProgressBar::hidden();
        let input = if path.as_os_str() == STDIN {
            if stdin_taken { Input::DrainedStdin } else { stdin_taken = true; Input::Stdin }
        } else {
            if args.progress {
                bar = progress_bar(&multi, path);
            }
            Input::File(path.clone())
        };
        tasks.push(tokio::spawn(hash_input(input, args.chunk_size, bar)));
    }

    let mut failed = false;
    for (path, task) in files.iter().zip(tasks) {
        let result = task.await.map_err(InputError::from).and_then(|r| r);
        match result {
            Ok(digest) => println!("{}  {}", digest, path.display()),
            Err(e) => {
                error!(path = %path.display(), error = %e, "unable to hash input");
                eprintln!("sha1sum: {}: {e}", path.display());
                failed = true;
            }
        }
    }

    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
