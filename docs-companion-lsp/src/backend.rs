use std::path::PathBuf;
use std::sync::{Arc, OnceLock, RwLock};

use dashmap::DashMap;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::config::Config;
use crate::docs::{DocKind, DocResult};
use crate::document::DocumentState;
use crate::file_types::language_id_for_path;
use crate::manifest::DependencyManifest;
use crate::registries::http_client::create_shared_client;
use crate::registries::npm::NpmRegistry;
use crate::resolver::DocsResolver;
use crate::sink::{UpdateDoc, UpdateDocParams};

/// Show documentation for the symbol at `{ uri, position }`
pub const SHOW_DOCS_COMMAND: &str = "docsCompanion.showDocs";
/// Show documentation for the first import of `{ uri }`
pub const SHOW_CONTEXT_DOCS_COMMAND: &str = "docsCompanion.showContextDocs";
/// Open `{ url }` in the user's browser
pub const OPEN_LINK_COMMAND: &str = "docsCompanion.openLink";

const NO_ACTIVE_EDITOR_MESSAGE: &str = "No active editor";
const NO_SYMBOL_MESSAGE: &str = "No symbol under cursor";
const NOT_READY_MESSAGE: &str = "Docs Companion is still starting";

#[derive(Debug, Deserialize)]
struct SymbolArgs {
    uri: Url,
    position: Position,
}

#[derive(Debug, Deserialize)]
struct ContextArgs {
    uri: Url,
}

#[derive(Debug, Deserialize)]
struct OpenLinkArgs {
    url: Url,
}

/// Decode the first command argument
fn command_args<T: DeserializeOwned>(arguments: Vec<serde_json::Value>) -> Option<T> {
    let first = arguments.into_iter().next()?;
    match serde_json::from_value(first) {
        Ok(args) => Some(args),
        Err(e) => {
            tracing::warn!("Invalid command arguments: {e}");
            None
        }
    }
}

/// Workspace root: the first workspace folder, else the root URI
#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri)
        .or(params.root_uri.as_ref())
        .and_then(|uri| uri.to_file_path().ok())
}

pub struct DocsBackend {
    client: Client,
    /// Configuration
    config: RwLock<Config>,
    /// Open documents
    documents: DashMap<Url, DocumentState>,
    /// HTTP client injected for tests; built from config otherwise
    http_client: Option<Arc<HttpClient>>,
    /// Set once during `initialize`, after the manifest is loaded
    resolver: OnceLock<DocsResolver>,
}

impl DocsBackend {
    pub fn new(client: Client) -> Self {
        Self::with_http_client(client, None)
    }

    pub fn with_http_client(client: Client, http_client: Option<Arc<HttpClient>>) -> Self {
        Self {
            client,
            config: RwLock::new(Config::default()),
            documents: DashMap::new(),
            http_client,
            resolver: OnceLock::new(),
        }
    }

    fn resolver(&self) -> Option<&DocsResolver> {
        let resolver = self.resolver.get();
        if resolver.is_none() {
            tracing::warn!("Request received before initialization");
        }
        resolver
    }

    fn auto_update(&self) -> bool {
        self.config
            .read()
            .map(|c| c.docs.auto_update)
            .unwrap_or(true)
    }

    async fn build_resolver(
        &self,
        config: &Config,
        root: Option<PathBuf>,
    ) -> Option<DocsResolver> {
        let http_client = match &self.http_client {
            Some(client) => Arc::clone(client),
            None => match create_shared_client(config.registry.timeout()) {
                Ok(client) => client,
                Err(e) => {
                    tracing::error!("Failed to create HTTP client: {e}");
                    return None;
                }
            },
        };

        let manifest = match root {
            Some(root) => {
                DependencyManifest::load_from_root(&root, &config.manifest.file_name).await
            }
            None => {
                tracing::info!("No workspace root; manifest lookups disabled");
                None
            }
        };

        let registry = NpmRegistry::with_client_and_config(http_client, &config.registry);
        Some(
            DocsResolver::new(manifest, registry)
                .with_readme_max_chars(config.docs.readme_max_chars),
        )
    }

    /// Push an update to the panel
    async fn publish(&self, update: UpdateDocParams) {
        tracing::debug!(
            "Publishing {} ({}), silent={}",
            update.doc.title,
            update.doc.kind.as_str(),
            update.silent
        );
        self.client.send_notification::<UpdateDoc>(update).await;
    }

    /// Symbol and language at the command position, or the message to show
    /// instead
    fn symbol_at(
        &self,
        args: Option<SymbolArgs>,
    ) -> std::result::Result<(String, String), &'static str> {
        let args = args.ok_or(NO_ACTIVE_EDITOR_MESSAGE)?;
        let doc = self.documents.get(&args.uri).ok_or(NO_ACTIVE_EDITOR_MESSAGE)?;
        let symbol = doc.word_at(args.position).ok_or(NO_SYMBOL_MESSAGE)?;
        Ok((symbol.to_string(), doc.language_id.clone()))
    }

    /// Panel update for an explicit symbol lookup, never silent
    async fn symbol_update(
        &self,
        args: Option<SymbolArgs>,
    ) -> std::result::Result<UpdateDocParams, &'static str> {
        let (symbol, language_id) = self.symbol_at(args)?;
        let resolver = self.resolver().ok_or(NOT_READY_MESSAGE)?;
        let doc = resolver.resolve(&symbol, &language_id).await;
        Ok(UpdateDocParams::new(doc, false))
    }

    async fn contextual_docs(&self, uri: &Url) -> Option<DocResult> {
        let (text, language_id) = self
            .documents
            .get(uri)
            .map(|doc| (doc.text.clone(), doc.language_id.clone()))?;

        Some(self.resolver()?.resolve_contextual(&text, &language_id).await)
    }

    /// Panel update for an explicit contextual lookup, never silent
    async fn context_update(&self, args: Option<ContextArgs>) -> Option<UpdateDocParams> {
        let doc = self.contextual_docs(&args?.uri).await?;
        Some(UpdateDocParams::new(doc, false))
    }

    /// Silent panel update after an edit, or `None` when auto-update is off
    async fn change_update(&self, uri: &Url) -> Option<UpdateDocParams> {
        if !self.auto_update() {
            return None;
        }
        let doc = self.contextual_docs(uri).await?;
        Some(UpdateDocParams::new(doc, true))
    }

    async fn show_docs(&self, args: Option<SymbolArgs>) -> Option<DocResult> {
        match self.symbol_update(args).await {
            Ok(update) => {
                let doc = update.doc.clone();
                self.publish(update).await;
                Some(doc)
            }
            Err(message) => {
                self.client.show_message(MessageType::INFO, message).await;
                None
            }
        }
    }

    async fn show_context_docs(&self, args: Option<ContextArgs>) -> Option<DocResult> {
        let update = self.context_update(args).await?;
        let doc = update.doc.clone();
        self.publish(update).await;
        Some(doc)
    }

    async fn open_link(&self, args: Option<OpenLinkArgs>) {
        let Some(args) = args else {
            return;
        };

        let params = ShowDocumentParams {
            uri: args.url,
            external: Some(true),
            take_focus: None,
            selection: None,
        };
        if let Err(e) = self
            .client
            .send_request::<request::ShowDocument>(params)
            .await
        {
            tracing::warn!("Client could not open link: {e}");
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for DocsBackend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Parse configuration from initialization options
        let config = Config::from_init_options(params.initialization_options.clone());
        tracing::info!("Configuration: {:?}", config);

        let root = workspace_root(&params);
        if let Some(resolver) = self.build_resolver(&config, root).await {
            match resolver.manifest() {
                Some(manifest) => tracing::info!(
                    "Resolving against {} declared dependencies",
                    manifest.len()
                ),
                None => tracing::info!("No manifest loaded; only builtins will resolve"),
            }
            if self.resolver.set(resolver).is_err() {
                tracing::warn!("Server already initialized; keeping the first manifest");
            }
        }

        // Store the configuration
        if let Ok(mut cfg) = self.config.write() {
            *cfg = config;
        }

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "docs-companion-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![
                        SHOW_DOCS_COMMAND.to_string(),
                        SHOW_CONTEXT_DOCS_COMMAND.to_string(),
                        OPEN_LINK_COMMAND.to_string(),
                    ],
                    ..Default::default()
                }),
                ..Default::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Docs Companion LSP initialized")
            .await;

        tracing::info!("Docs Companion LSP initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("Docs Companion LSP shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let item = params.text_document;
        tracing::debug!("Document opened: {}", item.uri);

        let language_id = if item.language_id.is_empty() {
            item.uri
                .to_file_path()
                .ok()
                .and_then(|path| language_id_for_path(&path))
                .unwrap_or_default()
                .to_string()
        } else {
            item.language_id
        };

        self.documents.insert(
            item.uri,
            DocumentState {
                text: item.text,
                language_id,
            },
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        // With FULL sync, we get the entire document content
        let Some(change) = params.content_changes.into_iter().next() else {
            return;
        };
        tracing::debug!("Document changed: {}", uri);

        match self.documents.get_mut(&uri) {
            Some(mut doc) => doc.text = change.text,
            None => {
                tracing::debug!("Change for unopened document {}", uri);
                return;
            }
        }

        // Every change triggers its own lookup; rapid edits are not coalesced
        if let Some(update) = self.change_update(&uri).await {
            self.publish(update).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!("Document closed: {}", uri);
        self.documents.remove(&uri);
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some((symbol, language_id)) = self.documents.get(uri).and_then(|doc| {
            doc.word_at(position)
                .map(|word| (word.to_string(), doc.language_id.clone()))
        }) else {
            return Ok(None);
        };

        let Some(resolver) = self.resolver() else {
            return Ok(None);
        };

        let doc = resolver.resolve(&symbol, &language_id).await;
        if doc.kind == DocKind::Unknown {
            return Ok(None);
        }

        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: doc.to_markdown(),
            }),
            range: None,
        }))
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        let doc = match params.command.as_str() {
            SHOW_DOCS_COMMAND => self.show_docs(command_args(params.arguments)).await,
            SHOW_CONTEXT_DOCS_COMMAND => {
                self.show_context_docs(command_args(params.arguments)).await
            }
            OPEN_LINK_COMMAND => {
                self.open_link(command_args(params.arguments)).await;
                None
            }
            _ => {
                tracing::warn!("Unknown command: {}", params.command);
                None
            }
        };

        Ok(doc.and_then(|doc| serde_json::to_value(doc).ok()))
    }
}
