use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How credentials are sent to the login endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    #[default]
    #[serde(alias = "post")]
    PostForm,
    #[serde(alias = "json")]
    PostJson,
    #[serde(alias = "get")]
    GetQuery,
}

impl FromStr for AuthMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post-form" | "post" => Ok(AuthMethod::PostForm),
            "post-json" | "json" => Ok(AuthMethod::PostJson),
            "get-query" | "get" => Ok(AuthMethod::GetQuery),
            other => Err(format!("unknown auth method: {other}")),
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthMethod::PostForm => "post-form",
            AuthMethod::PostJson => "post-json",
            AuthMethod::GetQuery => "get-query",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginConfig {
    /// No URL means there is nothing to log into.
    pub login_url: Option<String>,
    pub username: String,
    pub password: String,
    pub sector: Option<String>,
    pub method: AuthMethod,
    /// Sent verbatim instead of username/password/sector when non-empty.
    pub login_fields: BTreeMap<String, String>,
}

impl LoginConfig {
    pub fn new(login_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        LoginConfig {
            login_url: Some(login_url.into()),
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: AuthMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_login_fields(mut self, fields: BTreeMap<String, String>) -> Self {
        self.login_fields = fields;
        self
    }

    /// Sector identifier, ignoring a blank value.
    pub fn sector_id(&self) -> Option<&str> {
        self.sector.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Fields submitted with the login request, in a stable order.
    pub fn fields(&self) -> Vec<(String, String)> {
        if !self.login_fields.is_empty() {
            return self
                .login_fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
        }
        let mut fields = vec![
            ("username".to_string(), self.username.clone()),
            ("password".to_string(), self.password.clone()),
        ];
        if let Some(sector) = self.sector_id() {
            fields.push(("setor".to_string(), sector.to_string()));
        }
        fields
    }
}
