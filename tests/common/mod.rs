#![allow(dead_code)]

use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use portal_export::{Session, Settings};
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

/// A wiremock portal driven from synchronous tests. The mock server answers
/// from its own thread, so blocking clients can call it from the test thread.
pub struct MockPortal {
    pub server: MockServer,
    rt: Runtime,
}

impl MockPortal {
    pub fn start() -> Self {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        MockPortal { server, rt }
    }

    pub fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    pub fn requests_to(&self, path: &str) -> Vec<Request> {
        self.rt
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }
}

/// No settle delay, no retries, short timeouts.
pub fn fast_settings() -> Settings {
    Settings {
        request_timeout_secs: 5,
        extract_timeout_secs: 1,
        settle_delay_ms: 0,
        max_retries: 0,
        retry_backoff_ms: 10,
        ..Default::default()
    }
}

pub fn session() -> Session {
    Session::new(fast_settings()).unwrap()
}

/// URL on a local port nothing listens on.
pub fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/login")
}

pub fn body_text(req: &Request) -> String {
    String::from_utf8_lossy(&req.body).into_owned()
}

/// Text of each paragraph in a .docx, line breaks rendered as `\n`.
pub fn docx_paragraphs(path: &Path) -> Vec<String> {
    let bytes = std::fs::read(path).unwrap();
    let docx = docx_rs::read_docx(&bytes).unwrap();
    let mut out = Vec::new();
    for child in &docx.document.children {
        let DocumentChild::Paragraph(p) = child else {
            continue;
        };
        let mut text = String::new();
        for pc in &p.children {
            if let ParagraphChild::Run(run) = pc {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
        }
        out.push(text);
    }
    out
}
