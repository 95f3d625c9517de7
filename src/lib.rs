//! Export the text of an authenticated portal page to a .docx file.
//!
//! Stages run in order on one [`session::Session`]: optional sector
//! discovery, login (plus sector selection), text extraction, document write.
//! Each stage absorbs its own failures and reports `bool`/`Option`.

pub mod auth;
pub mod document;
pub mod error;
pub mod extract;
pub mod login;
pub mod pipeline;
pub mod sectors;
pub mod session;
pub mod settings;

pub use error::PortalError;
pub use login::{AuthMethod, LoginConfig};
pub use pipeline::{export, ExportJob, ExportOutcome};
pub use sectors::SectorCatalog;
pub use session::Session;
pub use settings::Settings;
