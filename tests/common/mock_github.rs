//! Local HTTP server standing in for the GitHub REST API

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// A canned response
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl MockResponse {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            headers: Vec::new(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// What the server saw for one request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path and query, e.g. `/repos/o/r/git/trees/main?recursive=1`
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Running mock server; stops when dropped
pub struct MockGitHub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    stop_tx: mpsc::Sender<()>,
}

impl MockGitHub {
    /// Start a server answering every request with `route(url)`
    pub fn start<F>(route: F) -> Self
    where
        F: Fn(&str) -> MockResponse + Send + 'static,
    {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to start test server");
        let port = server.server_addr().to_ip().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        thread::spawn(move || loop {
            if stop_rx.try_recv().is_ok() {
                break;
            }

            match server.recv_timeout(Duration::from_millis(100)) {
                Ok(Some(request)) => {
                    let url = request.url().to_string();
                    let headers = request
                        .headers()
                        .iter()
                        .map(|h| (h.field.to_string(), h.value.to_string()))
                        .collect();
                    recorded.lock().unwrap().push(RecordedRequest {
                        url: url.clone(),
                        headers,
                    });

                    let canned = route(&url);
                    let mut response = tiny_http::Response::from_string(canned.body)
                        .with_status_code(canned.status)
                        .with_header(
                            tiny_http::Header::from_bytes(
                                &b"Content-Type"[..],
                                &b"application/json"[..],
                            )
                            .unwrap(),
                        );
                    for (name, value) in &canned.headers {
                        response = response.with_header(
                            tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes())
                                .unwrap(),
                        );
                    }
                    let _ = request.respond(response);
                }
                Ok(None) => {}
                Err(_) => break,
            }
        });

        Self {
            base_url,
            requests,
            stop_tx,
        }
    }

    /// Serve one repository: details at `/repos/{full_name}` and its tree
    pub fn serve_repo(full_name: &str, branch: &str, tree_json: &str) -> Self {
        let details = repo_details_json(full_name, branch);
        let details_path = format!("/repos/{}", full_name);
        let tree_path = format!("/repos/{}/git/trees/{}", full_name, branch);
        let tree_json = tree_json.to_string();

        Self::start(move |url| {
            let path = url.split('?').next().unwrap_or(url);
            if path == details_path {
                MockResponse::json(&details)
            } else if path == tree_path {
                MockResponse::json(&tree_json)
            } else {
                MockResponse::status(404, r#"{"message": "Not Found"}"#)
            }
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockGitHub {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

/// Repository details the way the API returns them (with extra fields)
pub fn repo_details_json(full_name: &str, branch: &str) -> String {
    let owner = full_name.split('/').next().unwrap_or_default();
    format!(
        r#"{{
            "id": 1,
            "full_name": "{full_name}",
            "description": "A test repository",
            "html_url": "https://github.com/{full_name}",
            "default_branch": "{branch}",
            "stargazers_count": 3,
            "owner": {{ "login": "{owner}", "id": 7 }}
        }}"#
    )
}

/// Tree listing JSON from `(path, type)` pairs
pub fn tree_json(entries: &[(&str, &str)], truncated: bool) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(path, kind)| {
            format!(
                r#"{{"path": "{path}", "mode": "100644", "type": "{kind}", "sha": "abc", "url": "x"}}"#
            )
        })
        .collect();
    format!(
        r#"{{"sha": "root", "tree": [{}], "truncated": {}}}"#,
        items.join(","),
        truncated
    )
}
