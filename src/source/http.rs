use super::{LineScoreSource, SourceError};
use crate::payload::RenderPayload;
use tracing::debug;

/// A remote `/glance` endpoint, queried with `GET <endpoint>?file=<file>`.
pub struct HttpSource {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full request URL for `file`, with the identifier form-encoded.
    pub fn request_url(&self, file: &str) -> Result<String, SourceError> {
        let query = serde_urlencoded::to_string([("file", file)])
            .map_err(|e| SourceError::InvalidIdentifier(format!("{}: {}", file, e)))?;
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}", self.endpoint, separator, query))
    }
}

impl LineScoreSource for HttpSource {
    fn fetch_line_scores(&self, file: &str) -> Result<RenderPayload, SourceError> {
        let url = self.request_url(file)?;
        debug!(%url, "requesting line scores");

        let response = self.agent.get(&url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => {
                SourceError::Network(format!("{} returned HTTP {}", url, code))
            }
            ureq::Error::Transport(transport) => {
                SourceError::Network(format!("{}: {}", url, transport))
            }
        })?;

        // Streamed, so the listing can be any size
        serde_json::from_reader(response.into_reader()).map_err(|e| {
            if e.is_io() {
                SourceError::Network(format!("{}: {}", url, e))
            } else {
                SourceError::Decode(e.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tiny_http::{Response, Server};

    /// Serve exactly one request with `body`, returning the endpoint URL and
    /// a handle yielding the requested URL.
    fn serve_once(status: u16, body: impl Into<String>) -> (String, thread::JoinHandle<String>) {
        let body = body.into();
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = thread::spawn(move || {
            let request = server.recv().unwrap();
            let url = request.url().to_string();
            request
                .respond(Response::from_string(body).with_status_code(status))
                .unwrap();
            url
        });
        (format!("http://{}/glance", addr), handle)
    }

    #[test]
    fn test_request_url_encodes_file() {
        let source = HttpSource::new("http://localhost:5000/glance");
        assert_eq!(source.endpoint(), "http://localhost:5000/glance");
        assert_eq!(
            source.request_url("src/a b.rs").unwrap(),
            "http://localhost:5000/glance?file=src%2Fa+b.rs"
        );
    }

    #[test]
    fn test_request_url_appends_to_existing_query() {
        let source = HttpSource::new("http://localhost:5000/glance?model=e5");
        assert_eq!(
            source.request_url("x.rs").unwrap(),
            "http://localhost:5000/glance?model=e5&file=x.rs"
        );
    }

    #[test]
    fn test_fetch_decodes_payload() {
        let (endpoint, handle) = serve_once(
            200,
            r#"{"highlightedContent": "<tr></tr>", "lineWindows": [{"startLine": 0, "endLine": 3, "score": 0.5}]}"#,
        );
        let payload = HttpSource::new(endpoint).fetch_line_scores("lib.rs").unwrap();

        assert_eq!(payload.line_windows.len(), 1);
        assert_eq!(handle.join().unwrap(), "/glance?file=lib.rs");
    }

    #[test]
    fn test_fetch_non_json_is_decode_error() {
        let (endpoint, handle) = serve_once(200, "<html>oops</html>");
        let err = HttpSource::new(endpoint).fetch_line_scores("lib.rs").unwrap_err();

        assert!(matches!(err, SourceError::Decode(_)), "got {:?}", err);
        handle.join().unwrap();
    }

    #[test]
    fn test_fetch_large_listing() {
        let listing = "x".repeat(11 * 1024 * 1024);
        let body = format!(
            r#"{{"highlightedContent": "{}", "lineWindows": [{{"startLine": 0, "endLine": 1, "score": 1.0}}]}}"#,
            listing
        );
        let (endpoint, handle) = serve_once(200, body);
        let payload = HttpSource::new(endpoint).fetch_line_scores("big.rs").unwrap();

        assert_eq!(payload.highlighted_content.len(), listing.len());
        assert_eq!(payload.line_windows.len(), 1);
        handle.join().unwrap();
    }

    #[test]
    fn test_fetch_error_status_is_network_error() {
        let (endpoint, handle) = serve_once(400, "Missing file parameter");
        let err = HttpSource::new(endpoint).fetch_line_scores("").unwrap_err();

        match err {
            SourceError::Network(msg) => assert!(msg.contains("400"), "{}", msg),
            other => panic!("expected network error, got {:?}", other),
        }
        handle.join().unwrap();
    }

    #[test]
    fn test_fetch_unreachable_is_network_error() {
        // Bind then drop to get a port nobody listens on
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let source = HttpSource::new(format!("http://{}/glance", addr));

        assert!(matches!(
            source.fetch_line_scores("lib.rs"),
            Err(SourceError::Network(_))
        ));
    }
}
