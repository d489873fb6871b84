use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for the `escape-room` binary.
#[derive(Debug, Parser)]
#[command(name = "escape-room", version, about = "Debug escape room server and terminal client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Address the HTTP server binds to
    #[arg(long, global = true, env = "ESCAPE_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port the HTTP server listens on
    #[arg(long, global = true, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory holding one `<language>.json` level file per track
    #[arg(long, global = true, env = "ESCAPE_LEVELS_DIR", default_value = "levels")]
    pub levels_dir: PathBuf,

    /// Progress backend: `file:<path>`, `sqlite:<url>` or `memory`
    #[arg(
        long,
        global = true,
        env = "ESCAPE_PROGRESS_URL",
        default_value = "file:escape-progress.json"
    )]
    pub progress: ProgressBackend,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the loaded level counts and serve the HTTP API (default)
    Serve,
    /// Print the number of levels per track and exit
    Levels,
    /// Play in the terminal
    Play {
        /// Base URL of a running server; levels are read locally when omitted
        #[arg(long, env = "ESCAPE_SERVER_URL")]
        server: Option<String>,
    },
}

/// Where learner progress is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressBackend {
    File(PathBuf),
    Sqlite(String),
    Memory,
}

impl FromStr for ProgressBackend {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw == "memory" {
            return Ok(Self::Memory);
        }
        if let Some(path) = raw.strip_prefix("file:") {
            if path.is_empty() {
                return Err("file: backend needs a path".to_string());
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if raw.starts_with("sqlite:") {
            return Ok(Self::Sqlite(raw.to_string()));
        }
        Err(format!(
            "unsupported progress backend `{raw}` (expected file:<path>, sqlite:<url> or memory)"
        ))
    }
}

impl fmt::Display for ProgressBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Sqlite(url) => f.write_str(url),
            Self::Memory => f.write_str("memory"),
        }
    }
}
