use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tower_lsp::{LspService, Server};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use docs_companion_lsp::backend::DocsBackend;
use docs_companion_lsp::config::Config;
use docs_companion_lsp::docs::DocResult;
use docs_companion_lsp::file_types::language_id_for_path;
use docs_companion_lsp::manifest::DependencyManifest;
use docs_companion_lsp::registries::http_client::create_shared_client;
use docs_companion_lsp::registries::npm::NpmRegistry;
use docs_companion_lsp::render::render_doc_html;
use docs_companion_lsp::resolver::DocsResolver;

#[derive(Parser)]
#[command(name = "docs-companion-lsp")]
#[command(about = "Language server showing documentation for symbols and imports", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
    Html,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the LSP server (default behavior)
    Lsp,
    /// Resolve documentation for a symbol and print it
    Lookup {
        /// Symbol to look up (package name or builtin)
        #[arg(short, long)]
        symbol: String,

        /// Language identifier used for builtin lookups
        #[arg(short, long, default_value = "javascript")]
        language: String,

        /// Project root containing the manifest
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        output: OutputFormat,
    },
    /// Resolve documentation for the first import of a source file
    Context {
        /// Source file to scan for imports
        #[arg(short, long)]
        file: PathBuf,

        /// Language identifier (detected from the file extension by default)
        #[arg(short, long)]
        language: Option<String>,

        /// Project root containing the manifest
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        output: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Some(Commands::Lookup {
            symbol,
            language,
            root,
            output,
        }) => run_lookup(symbol, language, root, output).await,
        Some(Commands::Context {
            file,
            language,
            root,
            output,
        }) => run_context(file, language, root, output).await,
        Some(Commands::Lsp) | None => {
            run_lsp().await;
            ExitCode::SUCCESS
        }
    }
}

async fn run_lsp() {
    tracing::info!("Starting Docs Companion LSP server");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(DocsBackend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}

async fn build_resolver(root: &Path) -> Option<DocsResolver> {
    let config = Config::load_user();

    let client = match create_shared_client(config.registry.timeout()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating HTTP client: {e}");
            return None;
        }
    };

    let manifest = DependencyManifest::load_from_root(root, &config.manifest.file_name).await;
    if manifest.is_none() {
        eprintln!(
            "No usable {} in {}; only builtins will resolve",
            config.manifest.file_name,
            root.display()
        );
    }

    let registry = NpmRegistry::with_client_and_config(client, &config.registry);
    Some(
        DocsResolver::new(manifest, registry).with_readme_max_chars(config.docs.readme_max_chars),
    )
}

async fn run_lookup(
    symbol: String,
    language: String,
    root: PathBuf,
    output: OutputFormat,
) -> ExitCode {
    let Some(resolver) = build_resolver(&root).await else {
        return ExitCode::FAILURE;
    };

    let doc = resolver.resolve(&symbol, &language).await;
    print_doc(&doc, output)
}

async fn run_context(
    file: PathBuf,
    language: Option<String>,
    root: PathBuf,
    output: OutputFormat,
) -> ExitCode {
    let content = match tokio::fs::read_to_string(&file).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading {}: {e}", file.display());
            return ExitCode::FAILURE;
        }
    };

    let language = language
        .or_else(|| language_id_for_path(&file).map(str::to_string))
        .unwrap_or_default();

    let Some(resolver) = build_resolver(&root).await else {
        return ExitCode::FAILURE;
    };

    let doc = resolver.resolve_contextual(&content, &language).await;
    print_doc(&doc, output)
}

fn print_doc(doc: &DocResult, output: OutputFormat) -> ExitCode {
    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(doc) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize result: {e}");
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Markdown => println!("{}", doc.to_markdown()),
        OutputFormat::Html => print!("{}", render_doc_html(doc)),
    }

    ExitCode::SUCCESS
}
