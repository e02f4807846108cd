//! The LSP main loop.
//!
//! Messages are handled one at a time on the calling thread. `lsp-server`'s
//! reader and writer threads only move bytes, so the [`Session`] needs no
//! locking.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use crossbeam_channel::Sender;
use html_id_config::{find_config, load_config, HtmlIdConfig};
use html_id_dom::CompletionDatabase;
use lsp_server::{Connection, ErrorCode, ExtractError, Message, Notification, Request, Response};
use lsp_types::notification::{
    DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument,
    Notification as _, PublishDiagnostics,
};
use lsp_types::request::{Completion, GotoDefinition, HoverRequest, Request as _};
use lsp_types::{
    CompletionOptions, CompletionParams, CompletionResponse, GotoDefinitionParams,
    GotoDefinitionResponse, Hover, HoverParams, HoverProviderCapability, InitializeParams,
    InitializeResult, OneOf, PublishDiagnosticsParams, ServerCapabilities, ServerInfo,
    TextDocumentSyncCapability, TextDocumentSyncKind, TextDocumentSyncOptions, Uri,
};

use crate::conversions::{IntoIde, IntoLsp};
use crate::lsp_ext::DidChangeActiveDocument;
use crate::session::{DiagnosticsUpdate, Session};

pub const SERVER_NAME: &str = "html-id-lsp";

/// Startup options that don't come from the client.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Config file to use instead of searching the workspace root
    pub config_path: Option<PathBuf>,
}

/// Run the initialize handshake and then the main loop until `shutdown`.
///
/// Fails when the completion database can't be loaded; the client gets an
/// error response to `initialize` in that case.
pub fn serve(connection: &Connection, options: &ServerOptions) -> anyhow::Result<()> {
    let (id, params) = connection.initialize_start()?;
    let params: InitializeParams =
        serde_json::from_value(params).context("Invalid initialize params")?;

    let config = resolve_config(&params, options);
    let database = match load_database(&config) {
        Ok(database) => database,
        Err(err) => {
            tracing::error!(error = ?err, "Failed to load completion database");
            let response = Response::new_err(id, ErrorCode::InternalError as i32, format!("{err:#}"));
            connection.sender.send(response.into())?;
            return Err(err);
        }
    };

    let result = InitializeResult {
        capabilities: server_capabilities(),
        server_info: Some(ServerInfo {
            name: SERVER_NAME.to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    };
    connection.initialize_finish(id, serde_json::to_value(result)?)?;

    let mut session = Session::new(Arc::new(database), config.duplicate_id_severity());
    if let Some(update) = session.activate(None) {
        publish_diagnostics(&connection.sender, update)?;
    }

    main_loop(connection, &mut session)
}

fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                ..Default::default()
            },
        )),
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(vec![".".to_string()]),
            ..Default::default()
        }),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        definition_provider: Some(OneOf::Left(true)),
        ..Default::default()
    }
}

/// File config (explicit path, else discovered from the workspace root)
/// overlaid with `initializationOptions`. Errors fall back to defaults.
fn resolve_config(params: &InitializeParams, options: &ServerOptions) -> HtmlIdConfig {
    let config_path = match &options.config_path {
        Some(path) => Some(path.clone()),
        None => workspace_root(params).and_then(|root| {
            find_config(&root).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Config discovery failed");
                None
            })
        }),
    };

    let file_config = config_path.map_or_else(HtmlIdConfig::default, |path| {
        load_config(&path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "Failed to load config, using defaults");
            HtmlIdConfig::default()
        })
    });

    let client_config = params
        .initialization_options
        .as_ref()
        .map_or_else(
            || Ok(HtmlIdConfig::default()),
            HtmlIdConfig::from_initialization_options,
        )
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Ignoring initialization options");
            HtmlIdConfig::default()
        });

    file_config.merge(client_config)
}

fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    #[allow(deprecated)]
    let root = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri)
        .or(params.root_uri.as_ref())?;
    uri_to_path(root)
}

fn uri_to_path(uri: &Uri) -> Option<PathBuf> {
    url::Url::parse(&uri.to_string()).ok()?.to_file_path().ok()
}

fn load_database(config: &HtmlIdConfig) -> anyhow::Result<CompletionDatabase> {
    match &config.completion_database {
        Some(path) => CompletionDatabase::load(path)
            .with_context(|| format!("Failed to load completion database {}", path.display())),
        None => CompletionDatabase::bundled().context("Bundled completion database is invalid"),
    }
}

fn main_loop(connection: &Connection, session: &mut Session) -> anyhow::Result<()> {
    tracing::info!("Server initialized");

    for msg in &connection.receiver {
        match msg {
            Message::Request(req) => {
                if connection.handle_shutdown(&req)? {
                    tracing::info!("Shutdown requested");
                    return Ok(());
                }
                let response = handle_request(session, req);
                connection.sender.send(response.into())?;
            }
            Message::Notification(notification) => {
                if let Some(update) = handle_notification(session, notification) {
                    publish_diagnostics(&connection.sender, update)?;
                }
            }
            Message::Response(response) => {
                tracing::debug!(id = ?response.id, "Ignoring response from client");
            }
        }
    }

    Ok(())
}

fn handle_request(session: &Session, req: Request) -> Response {
    match req.method.as_str() {
        Completion::METHOD => dispatch::<Completion>(req, |params| completion(session, params)),
        HoverRequest::METHOD => dispatch::<HoverRequest>(req, |params| hover(session, params)),
        GotoDefinition::METHOD => {
            dispatch::<GotoDefinition>(req, |params| goto_definition(session, params))
        }
        _ => {
            tracing::debug!(method = %req.method, "Unhandled request");
            let message = format!("Unhandled method: {}", req.method);
            Response::new_err(req.id, ErrorCode::MethodNotFound as i32, message)
        }
    }
}

/// Decode the params of `R`, run `handler` and wrap its result.
fn dispatch<R>(req: Request, handler: impl FnOnce(R::Params) -> R::Result) -> Response
where
    R: lsp_types::request::Request,
{
    let id = req.id.clone();
    match req.extract::<R::Params>(R::METHOD) {
        Ok((id, params)) => Response::new_ok(id, handler(params)),
        Err(ExtractError::JsonError { method, error }) => {
            tracing::warn!(method = %method, error = %error, "Malformed request params");
            Response::new_err(id, ErrorCode::InvalidParams as i32, error.to_string())
        }
        Err(ExtractError::MethodMismatch(req)) => {
            let message = format!("Unhandled method: {}", req.method);
            Response::new_err(req.id, ErrorCode::MethodNotFound as i32, message)
        }
    }
}

fn handle_notification(
    session: &mut Session,
    notification: Notification,
) -> Option<DiagnosticsUpdate> {
    match notification.method.as_str() {
        DidOpenTextDocument::METHOD => {
            let document = extract::<DidOpenTextDocument>(notification)?.text_document;
            session.did_open(
                document.uri.into_ide(),
                &document.language_id,
                document.version,
                document.text,
            )
        }
        DidChangeTextDocument::METHOD => {
            let params = extract::<DidChangeTextDocument>(notification)?;
            // Full sync: the last change holds the whole text
            let text = params.content_changes.into_iter().last()?.text;
            session.did_change(
                &params.text_document.uri.into_ide(),
                params.text_document.version,
                text,
            )
        }
        DidCloseTextDocument::METHOD => {
            let params = extract::<DidCloseTextDocument>(notification)?;
            session.did_close(&params.text_document.uri.into_ide());
            None
        }
        DidChangeActiveDocument::METHOD => {
            let params = extract::<DidChangeActiveDocument>(notification)?;
            session.did_focus(&params.text_document.uri.into_ide())
        }
        _ => {
            tracing::trace!(method = %notification.method, "Ignoring notification");
            None
        }
    }
}

fn extract<N>(notification: Notification) -> Option<N::Params>
where
    N: lsp_types::notification::Notification,
{
    match notification.extract::<N::Params>(N::METHOD) {
        Ok(params) => Some(params),
        Err(err) => {
            tracing::warn!(method = N::METHOD, error = ?err, "Malformed notification params");
            None
        }
    }
}

fn publish_diagnostics(sender: &Sender<Message>, update: DiagnosticsUpdate) -> anyhow::Result<()> {
    for (file, diagnostics) in update {
        let Some(uri) = (&file).into_lsp() else {
            tracing::warn!(%file, "Not publishing diagnostics for invalid URI");
            continue;
        };

        tracing::debug!(%file, count = diagnostics.len(), "Publishing diagnostics");
        let params = PublishDiagnosticsParams {
            uri,
            diagnostics: diagnostics.into_iter().map(IntoLsp::into_lsp).collect(),
            version: None,
        };
        sender.send(Notification::new(PublishDiagnostics::METHOD.to_string(), params).into())?;
    }
    Ok(())
}

fn completion(session: &Session, params: CompletionParams) -> Option<CompletionResponse> {
    let position = params.text_document_position;
    let items = session.completions(
        &position.text_document.uri.into_ide(),
        position.position.into_ide(),
    )?;
    Some(CompletionResponse::Array(
        items.into_iter().map(IntoLsp::into_lsp).collect(),
    ))
}

fn hover(session: &Session, params: HoverParams) -> Option<Hover> {
    let position = params.text_document_position_params;
    session
        .hover(
            &position.text_document.uri.into_ide(),
            position.position.into_ide(),
        )
        .map(IntoLsp::into_lsp)
}

fn goto_definition(
    session: &Session,
    params: GotoDefinitionParams,
) -> Option<GotoDefinitionResponse> {
    let position = params.text_document_position_params;
    let locations: Vec<_> = session
        .goto_definition(
            &position.text_document.uri.into_ide(),
            position.position.into_ide(),
        )?
        .iter()
        .filter_map(IntoLsp::into_lsp)
        .collect();

    (!locations.is_empty()).then_some(GotoDefinitionResponse::Array(locations))
}
