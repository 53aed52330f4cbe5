use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line arguments for rpcl
#[derive(Parser, Debug)]
#[command(author, version, about = "Call RPC methods with request fields given as key=value arguments")]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Config profile to load
    #[arg(short, long, global = true, default_value = "default")]
    pub profile: String,

    /// Path to the descriptor file
    #[arg(short, long, global = true)]
    pub descriptor: Option<String>,

    /// The connection target
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Metadata to attach to the request, as "Key: value"
    #[arg(short, long, global = true, value_parser = parse_metadata)]
    pub metadata: Vec<(String, String)>,

    /// Output compact JSON
    #[arg(long, global = true, default_value_t = false)]
    pub raw: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,

    /// Enable verbose debug output
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute an rpc call
    Rpc {
        /// Service full name, e.g. test.Api
        service: String,

        /// Method name
        method: String,

        /// Request fields as field.sub.field=value
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List services, methods, or the arguments of one method
    Describe {
        service: Option<String>,
        method: Option<String>,
    },

    /// Print completion suggestions for the last word, one per line
    #[command(hide = true)]
    Complete {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
}

/// Parse a `Key: value` metadata flag. Keys are lowercased.
pub fn parse_metadata(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("metadata must look like \"Key: value\", got {raw:?}"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("metadata key is empty in {raw:?}"));
    }

    Ok((key.to_lowercase(), value.trim().to_string()))
}
