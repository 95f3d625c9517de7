use std::thread;

use scraper::{Html, Node};
use tracing::{error, info};

use crate::session::Session;

const SKIPPED_TAGS: &[&str] = &["script", "style"];

/// Flatten markup to text: one line per text run, `script`/`style` dropped,
/// surrounding whitespace trimmed and blank runs skipped.
pub fn html_to_text(html: &str) -> String {
    let mut lines = Vec::new();
    push_runs(&Html::parse_document(html), &mut lines);
    lines.join("\n")
}

fn push_runs(doc: &Html, lines: &mut Vec<String>) {
    for node in doc.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let mut skipped = false;
        let mut in_noscript = false;
        for el in node.ancestors().filter_map(|a| a.value().as_element()) {
            match el.name() {
                name if SKIPPED_TAGS.contains(&name) => skipped = true,
                "noscript" => in_noscript = true,
                _ => {}
            }
        }
        if skipped {
            continue;
        }
        // html5ever keeps <noscript> content as raw markup
        if in_noscript {
            push_runs(&Html::parse_fragment(text), lines);
            continue;
        }
        let run = text.trim();
        if !run.is_empty() {
            lines.push(run.to_string());
        }
    }
}

/// Fetch `url` with the authenticated session and return its text.
///
/// Waits `settle_delay` first so the portal can apply a just-selected sector.
/// Transport errors and non-2xx responses yield `None`.
pub fn fetch_text(session: &Session, url: &str) -> Option<String> {
    let settings = session.settings();
    thread::sleep(settings.settle_delay());

    match session.get_text(url, settings.extract_timeout()) {
        Ok(html) => {
            let text = html_to_text(&html);
            info!("Extracted {} chars from {}", text.len(), url);
            Some(text)
        }
        Err(e) => {
            error!("Text extraction failed for {}: {}", url, e);
            None
        }
    }
}
