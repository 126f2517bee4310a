mod output;

use anyhow::{Context, Result};
use blobq_core::{DEFAULT_GIT_DIR, ObjectId, ObjectKind, Repository, Store};
use clap::{ArgGroup, Parser, Subcommand};
use output::{HashObjectOutput, InitOutput, ObjectInfoOutput, OutputWriter};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Blobq - a git-compatible content-addressed object store
#[derive(Parser)]
#[command(name = "blobq")]
#[command(about = "Store and read git-style loose objects", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository directory (defaults to BLOBQ_DIR env var or ./.git)
    #[arg(long, global = true)]
    git_dir: Option<PathBuf>,

    /// Emit informational output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log debug events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new repository
    Init,

    /// Compute the object id of a file, optionally writing it
    HashObject {
        /// Write the object into the object store
        #[arg(short = 'w')]
        write: bool,

        /// Read the payload from stdin instead of a file
        #[arg(long, conflicts_with = "file")]
        stdin: bool,

        /// File to hash
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,
    },

    /// Show the content, kind or size of an object
    #[command(group(ArgGroup::new("mode").required(true).args(["pretty", "kind", "size"])))]
    CatFile {
        /// Print the payload verbatim
        #[arg(short = 'p')]
        pretty: bool,

        /// Print the object kind
        #[arg(short = 't')]
        kind: bool,

        /// Print the payload size
        #[arg(short = 's')]
        size: bool,

        /// Object id (40 hex characters)
        object: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Determine repository: CLI arg > BLOBQ_DIR env var > ./.git default
    let git_dir = cli
        .git_dir
        .or_else(|| std::env::var("BLOBQ_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_GIT_DIR));

    let output = OutputWriter::new(cli.json);

    let result = match cli.command {
        Commands::Init => cmd_init(&git_dir, &output),
        Commands::HashObject { write, stdin, file } => {
            cmd_hash_object(&git_dir, &output, write, stdin, file.as_deref())
        }
        Commands::CatFile {
            pretty,
            kind,
            size,
            object,
        } => {
            let mode = if pretty {
                CatMode::Pretty
            } else if kind {
                CatMode::Kind
            } else {
                debug_assert!(size);
                CatMode::Size
            };
            cmd_cat_file(&git_dir, &output, mode, &object)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.write_error(&error_message(&err), 1);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries object payloads; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

/// Render an error for the user.
///
/// Unknown ids get git's terse message; everything else shows the context chain.
fn error_message(err: &anyhow::Error) -> String {
    for cause in err.chain() {
        if let Some(blobq_core::Error::ObjectNotFound { id }) =
            cause.downcast_ref::<blobq_core::Error>()
        {
            return format!("fatal: Not a valid object name {}", id);
        }
    }
    format!("Error: {:#}", err)
}

fn open_repository(git_dir: &Path) -> Result<Repository> {
    Repository::open(git_dir)
        .with_context(|| format!("Failed to open repository at {}", git_dir.display()))
}

fn cmd_init(git_dir: &Path, output: &OutputWriter) -> Result<()> {
    Repository::init(git_dir)
        .with_context(|| format!("Failed to initialize repository at {}", git_dir.display()))?;

    let data = InitOutput {
        success: true,
        result_code: 0,
        git_dir: git_dir.display().to_string(),
    };
    output.write(&data, || "Initialized git directory\n".to_string())
}

fn cmd_hash_object(
    git_dir: &Path,
    output: &OutputWriter,
    write: bool,
    stdin: bool,
    file: Option<&Path>,
) -> Result<()> {
    let payload = match file {
        Some(path) if !stdin => std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?,
        _ => read_stdin()?,
    };

    let kind = ObjectKind::Blob.as_str();
    let id = if write {
        let repo = open_repository(git_dir)?;
        repo.objects()
            .store(kind, &payload)
            .context("Failed to write object")?
    } else {
        // Hashing alone never touches the repository
        Store::new(git_dir.join("objects")).hash_object(kind, &payload)?
    };
    debug!(%id, size = payload.len(), written = write, "hashed object");

    let data = HashObjectOutput {
        success: true,
        result_code: 0,
        id,
        path: file.map(|p| p.display().to_string()),
        written: write,
    };
    output.write(&data, || format!("{}\n", id))
}

fn read_stdin() -> Result<Vec<u8>> {
    if atty::is(atty::Stream::Stdin) {
        anyhow::bail!("Refusing to read object content from a terminal; pipe data to --stdin");
    }

    let mut payload = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut payload)
        .context("Failed to read stdin")?;
    Ok(payload)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatMode {
    Pretty,
    Kind,
    Size,
}

fn cmd_cat_file(git_dir: &Path, output: &OutputWriter, mode: CatMode, object: &str) -> Result<()> {
    let id = ObjectId::from_hex(object)?;
    let repo = open_repository(git_dir)?;

    if mode == CatMode::Pretty {
        // Raw payload, no trailing newline, in every output mode
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        return repo
            .objects()
            .cat_object(&id, &mut handle)
            .map_err(anyhow::Error::from);
    }

    let loaded = repo.objects().read(&id)?;
    let data = ObjectInfoOutput {
        success: true,
        result_code: 0,
        id,
        kind: loaded.kind.clone(),
        size: loaded.size,
    };
    output.write(&data, || match mode {
        CatMode::Kind => format!("{}\n", loaded.kind),
        _ => format!("{}\n", loaded.size),
    })
}
