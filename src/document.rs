use std::fs::File;
use std::path::Path;

use docx_rs::{BreakType, Docx, Paragraph, Run};
use tracing::{error, info, warn};

use crate::error::{PortalError, Result};

/// Characters allowed in XML 1.0 text. Rust strings cannot hold surrogates,
/// so only the C0 controls and U+FFFE/U+FFFF need checking.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// A single paragraph holding `text`; each line after the first starts after
/// a line break. Characters XML cannot carry are dropped.
pub fn build(text: &str) -> Docx {
    let clean: String = text.chars().filter(|c| is_xml_char(*c)).collect();
    let mut run = Run::new();
    for (i, line) in clean.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    Docx::new().add_paragraph(Paragraph::new().add_run(run))
}

fn write(text: &str, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    build(text)
        .build()
        .pack(file)
        .map_err(|e| PortalError::Document(e.to_string()))
}

/// Write `text` to a .docx at `path`, replacing any existing file.
///
/// Missing or empty text only logs a warning and leaves the filesystem alone.
/// Returns whether a document was written.
pub fn save(text: Option<&str>, path: &Path) -> bool {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        warn!("No text to save to {}", path.display());
        return false;
    };
    match write(text, path) {
        Ok(()) => {
            info!("Document saved to {}", path.display());
            true
        }
        Err(e) => {
            error!("Could not save document {}: {}", path.display(), e);
            false
        }
    }
}
