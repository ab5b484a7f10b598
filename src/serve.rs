//! HTTP server for interactive viewing
//!
//! `glance serve` → starts server, opens browser, renders pages on request
//!
//! - `GET /?file=<id>`       highlighted listing with the heat overlay
//! - `GET /glance?file=<id>` the raw payload, same shape the scorer serves

use crate::report;
use crate::source::{LineScoreSource, SourceError};
use serde::Deserialize;
use std::io::Read;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{info, warn};

#[derive(Deserialize, Debug, Default)]
struct FileQuery {
    #[serde(default)]
    file: Option<String>,
}

/// A response before it's handed to tiny_http.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn html(body: String) -> Self {
        Self { status: 200, content_type: "text/html; charset=utf-8", body }
    }

    fn json(body: String) -> Self {
        Self { status: 200, content_type: "application/json", body }
    }

    fn text(status: u16, body: impl Into<String>) -> Self {
        Self { status, content_type: "text/plain; charset=utf-8", body: body.into() }
    }

    fn from_source_error(err: &SourceError) -> Self {
        let status = match err {
            SourceError::NotFound(_) => 404,
            SourceError::InvalidIdentifier(_) => 400,
            SourceError::Network(_) | SourceError::Decode(_) => 502,
            SourceError::Io(_) => 500,
        };
        Self::text(status, err.to_string())
    }
}

/// Start server, open browser, serve pages until the process is killed.
pub fn start(port: u16, source: &dyn LineScoreSource, open_browser: bool) -> crate::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| crate::GlanceError::Server(e.to_string()))?;

    let url = format!("http://localhost:{}", port);
    info!(%url, "glance server listening");
    eprintln!("\n\x1b[1;35mglance\x1b[0m  {}/?file=<file>\n", url);

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!("could not open browser: {}", e);
        }
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, source) {
            warn!("failed to respond: {}", e);
        }
    }

    Ok(())
}

fn handle_request(request: Request, source: &dyn LineScoreSource) -> std::io::Result<()> {
    let reply = route(request.method(), request.url(), source);
    info!(method = %request.method(), url = request.url(), status = reply.status, "request");

    let response = Response::from_string(reply.body).with_status_code(reply.status);
    request.respond(with_content_type(response, reply.content_type))
}

fn with_content_type<R: Read>(response: Response<R>, value: &str) -> Response<R> {
    match Header::from_bytes(&b"Content-Type"[..], value.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

/// Map a request line to a reply.
pub fn route(method: &Method, url: &str, source: &dyn LineScoreSource) -> Reply {
    let mut parts = url.splitn(2, '?');
    let path = parts.next().unwrap_or("/");
    let query = parts.next().unwrap_or("");

    match (method, path) {
        (&Method::Get, "/") => match requested_file(query) {
            None => Reply::text(400, "Missing file parameter"),
            Some(file) => match source.fetch_line_scores(&file) {
                Ok(payload) => Reply::html(report::render_page(&file, &payload).to_html()),
                Err(e) => Reply::from_source_error(&e),
            },
        },

        (&Method::Get, "/glance") => match requested_file(query) {
            None => Reply::text(400, "Missing file parameter"),
            Some(file) => match source.fetch_line_scores(&file) {
                Ok(payload) => match serde_json::to_string(&payload) {
                    Ok(json) => Reply::json(json),
                    Err(e) => Reply::text(500, e.to_string()),
                },
                Err(e) => Reply::from_source_error(&e),
            },
        },

        _ => Reply::text(404, "Not found"),
    }
}

fn requested_file(query: &str) -> Option<String> {
    serde_urlencoded::from_str::<FileQuery>(query)
        .ok()
        .and_then(|q| q.file)
        .filter(|f| !f.is_empty())
}
