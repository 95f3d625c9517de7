use std::path::PathBuf;

use crate::sectors::SectorCatalog;
use crate::session::Session;
use crate::{auth, document, extract, login::LoginConfig};

/// Page to export and where the document goes.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub target_url: String,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(PathBuf),
    AuthenticationFailed,
    ExtractionFailed,
    WriteFailed,
}

/// Resolve a typed sector name to its id. Surrounding whitespace is ignored.
pub fn resolve_sector(catalog: &SectorCatalog, choice: &str) -> Option<String> {
    catalog.get(choice.trim()).map(str::to_string)
}

/// authenticate -> extract -> write, stopping at the first failure.
pub fn export(session: &Session, login: &LoginConfig, job: &ExportJob) -> ExportOutcome {
    if !auth::authenticate(session, login) {
        return ExportOutcome::AuthenticationFailed;
    }
    export_page(session, job)
}

/// extract -> write on a session that is already logged in.
pub fn export_page(session: &Session, job: &ExportJob) -> ExportOutcome {
    let Some(text) = extract::fetch_text(session, &job.target_url).filter(|t| !t.is_empty()) else {
        return ExportOutcome::ExtractionFailed;
    };

    if document::save(Some(&text), &job.output) {
        ExportOutcome::Written(job.output.clone())
    } else {
        ExportOutcome::WriteFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_trimmed_choice() {
        let catalog: SectorCatalog = [("Sales", "1"), ("Support", "2")].into_iter().collect();
        assert_eq!(resolve_sector(&catalog, " Support\n"), Some("2".to_string()));
        assert_eq!(resolve_sector(&catalog, "sales"), None);
        assert_eq!(resolve_sector(&catalog, ""), None);
    }
}
