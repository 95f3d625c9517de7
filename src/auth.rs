use reqwest::Method;
use tracing::{debug, error, info, warn};

use crate::error::{PortalError, Result};
use crate::login::{AuthMethod, LoginConfig};
use crate::session::Session;

/// Endpoint that switches the active sector: `<login_url>/<sector_path>`.
pub fn sector_url(login_url: &str, sector_path: &str) -> String {
    format!(
        "{}/{}",
        login_url.trim_end_matches('/'),
        sector_path.trim_start_matches('/')
    )
}

/// Log in, then select the configured sector if there is one.
///
/// Returns `false` on a transport error or an HTTP status of 400 and above,
/// for either request. Without a login URL there is nothing to do and the
/// session is considered ready.
pub fn authenticate(session: &Session, login: &LoginConfig) -> bool {
    let Some(login_url) = login.login_url.as_deref().filter(|u| !u.trim().is_empty()) else {
        warn!("No login URL configured, skipping authentication");
        return true;
    };

    match login_request(session, login_url, login) {
        Ok(()) => info!("Logged in at {} ({})", login_url, login.method),
        Err(e) => {
            error!("Login failed at {}: {}", login_url, e);
            return false;
        }
    }

    match login.sector_id() {
        Some(sector) => select_sector(session, login_url, sector),
        None => true,
    }
}

fn login_request(session: &Session, login_url: &str, login: &LoginConfig) -> Result<()> {
    let fields = login.fields();
    let req = match login.method {
        AuthMethod::PostForm => session.request(Method::POST, login_url).form(&fields),
        AuthMethod::PostJson => {
            let body: serde_json::Map<String, serde_json::Value> = fields
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            session.request(Method::POST, login_url).json(&body)
        }
        AuthMethod::GetQuery => session.request(Method::GET, login_url).query(&fields),
    };

    let resp = req.send()?;
    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    debug!("Login status: {}", status.as_u16());
    debug!("Login response: {}...", truncate(&body, 500));

    if status.is_client_error() || status.is_server_error() {
        return Err(PortalError::Status {
            url: login_url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}

/// POST the sector id to the sector endpoint derived from `login_url`.
pub fn select_sector(session: &Session, login_url: &str, sector_id: &str) -> bool {
    let settings = session.settings();
    let url = sector_url(login_url, &settings.sector_path);
    let form = [(settings.sector_field.as_str(), sector_id)];

    let result = session
        .request(Method::POST, &url)
        .form(&form)
        .send()
        .map_err(PortalError::from)
        .and_then(|resp| {
            let status = resp.status();
            if status.is_client_error() || status.is_server_error() {
                Err(PortalError::Status {
                    url: url.clone(),
                    status: status.as_u16(),
                })
            } else {
                Ok(())
            }
        });

    match result {
        Ok(()) => {
            info!("Sector selected: {}", sector_id);
            true
        }
        Err(e) => {
            error!("Sector selection failed for {}: {}", sector_id, e);
            false
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
