//! DocsKit CLI - documentation lookup from the command line or as an MCP server

mod mcp;

use clap::{Args, Parser, Subcommand};
use docskit::{DocsRequest, FetchMode, LibraryRegistry, Tool, DEFAULT_MAX_CHARS, TOOL_LLMTXT};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// DocsKit - search library documentation for LLM agents
#[derive(Parser, Debug)]
#[command(name = "docskit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,

    #[command(flatten)]
    config: Config,
}

/// Settings shared by all subcommands
#[derive(Args, Debug)]
struct Config {
    /// Serper search API key
    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// JSON file mapping library identifiers to documentation domains
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Custom User-Agent
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Fetch result pages one after another
    #[arg(long, global = true)]
    sequential: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp,
    /// Search a library's documentation and print the excerpt
    Get {
        /// The query to search for
        query: String,

        /// The library to search in
        #[arg(long, short)]
        library: String,

        /// Maximum characters to print
        #[arg(long, short, default_value_t = DEFAULT_MAX_CHARS, allow_negative_numbers = true)]
        max_chars: i64,
    },
    /// List the supported libraries and their documentation domains
    Libraries,
}

#[tokio::main]
async fn main() {
    // A missing .env file is not an error
    dotenv::dotenv().ok();

    // Logs go to stderr; stdout carries tool output and MCP messages
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    match cli.command {
        Some(Commands::Mcp) => {
            let tool = build_tool(&cli.config).unwrap_or_else(|e| exit_with_error(&e));
            if let Err(e) = mcp::run_server(tool).await {
                exit_with_error(&format!("MCP server stopped: {}", e));
            }
        }
        Some(Commands::Get {
            query,
            library,
            max_chars,
        }) => {
            let tool = build_tool(&cli.config).unwrap_or_else(|e| exit_with_error(&e));
            let request = DocsRequest::new(query, library).max_chars(max_chars);
            match tool.execute(request).await {
                Ok(text) => writeln_safe(&text),
                Err(e) => exit_with_error(&e.to_string()),
            }
        }
        Some(Commands::Libraries) => {
            let registry = load_registry(cli.config.registry.as_deref())
                .unwrap_or_else(|e| exit_with_error(&e));
            writeln_safe(&format_libraries(&registry));
        }
        None => {
            eprintln!("Usage: docskit get <QUERY> --library <LIBRARY>");
            eprintln!("   or: docskit mcp");
            eprintln!("   or: docskit --help");
            std::process::exit(1);
        }
    }
}

/// Build the tool from CLI configuration
fn build_tool(config: &Config) -> Result<Tool, String> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or("SERPER_API_KEY is not set (use --api-key or the environment)")?;

    let mut builder = Tool::builder()
        .api_key(api_key)
        .registry(load_registry(config.registry.as_deref())?);

    if let Some(ref ua) = config.user_agent {
        builder = builder.user_agent(ua);
    }
    if config.sequential {
        builder = builder.fetch_mode(FetchMode::Sequential);
    }

    Ok(builder.build())
}

/// Load the registry file, or the built-in table when none is given
fn load_registry(path: Option<&Path>) -> Result<LibraryRegistry, String> {
    let Some(path) = path else {
        return Ok(LibraryRegistry::with_defaults());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    LibraryRegistry::from_json(&json).map_err(|e| e.to_string())
}

/// One `library<TAB>domain` line per registered library
fn format_libraries(registry: &LibraryRegistry) -> String {
    registry
        .entries()
        .map(|(library, domain)| format!("{}\t{}", library, domain))
        .collect::<Vec<_>>()
        .join("\n")
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
