use crate::cache::NotesKey;
use crate::models::{CreateNoteRequest, Note, NotePage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const DEFAULT_API_URL: &str = "https://notehub-public.goit.study/api";
pub(crate) const DEFAULT_PER_PAGE: u32 = 12;

/// Failure of a remote call.
///
/// The UI surfaces every variant the same way; the split only matters for logs.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("network error: {0}")]
    Network(String),

    #[error("{context} ({status}): {body}")]
    Http {
        status: u16,
        body: String,
        context: &'static str,
    },

    #[error("invalid response: {0}")]
    Parse(String),

    /// The in-flight request this caller joined went away before settling.
    #[error("request dropped before completion")]
    Dropped,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self::Parse(e.to_string())
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub per_page: u32,
    pub log_level: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let mut cfg = Self::defaults();

        // We support BOTH upper-case keys (documented) and lower-case keys
        // on `window.ENV`.
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(v) = read_window_env(&["API_URL", "api_url"]) {
                cfg.api_url = v;
            }
            if let Some(v) = read_window_env(&["API_TOKEN", "api_token"]) {
                cfg.token = Some(v).filter(|t| !t.trim().is_empty());
            }
            if let Some(v) = read_window_env(&["PER_PAGE", "per_page"]) {
                match v.trim().parse::<u32>() {
                    Ok(n) if n > 0 => cfg.per_page = n,
                    _ => tracing::warn!(value = %v, "ignoring invalid PER_PAGE"),
                }
            }
            if let Some(v) = read_window_env(&["LOG_LEVEL", "log_level"]) {
                cfg.log_level = v;
            }
        }

        cfg.api_url = cfg.api_url.trim_end_matches('/').to_string();
        cfg
    }

    pub fn defaults() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            per_page: DEFAULT_PER_PAGE,
            log_level: "info".to_string(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// First non-empty string found under `window.ENV[key]` for any of `keys`.
#[cfg(target_arch = "wasm32")]
fn read_window_env(keys: &[&str]) -> Option<String> {
    let window = web_sys::window()?;
    let env = window.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }

    keys.iter().find_map(|k| {
        js_sys::Reflect::get(&env, &(*k).into())
            .ok()
            .and_then(|v| v.as_string())
            .filter(|s| !s.trim().is_empty())
    })
}

/// The backend reports failures as `{"message": ..}`; fall back to the raw body.
fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// The remote notes backend as the rest of the app sees it.
pub(crate) trait NotesService {
    async fn list_notes(&self, key: &NotesKey) -> ApiResult<NotePage>;
    async fn create_note(&self, req: &CreateNoteRequest) -> ApiResult<Note>;
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
    pub(crate) per_page: u32,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn from_config(cfg: &EnvConfig) -> Self {
        let mut client = Self::new(cfg.api_url.clone());
        client.per_page = cfg.per_page.max(1);
        if let Some(token) = &cfg.token {
            client.set_token(token.clone());
        }
        client
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub(crate) fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Query string for the list endpoint. Empty search and "no tag" are
    /// omitted rather than sent blank.
    pub(crate) fn list_query(&self, key: &NotesKey) -> Vec<(&'static str, String)> {
        let mut q = vec![
            ("page", key.page.max(1).to_string()),
            ("perPage", self.per_page.to_string()),
        ];
        if !key.search.is_empty() {
            q.push(("search", key.search.clone()));
        }
        if let Some(tag) = key.tag {
            q.push(("tag", tag.to_string()));
        }
        q
    }

    fn with_auth_headers(
        mut req: reqwest::RequestBuilder,
        auth: Option<String>,
    ) -> reqwest::RequestBuilder {
        if let Some(auth) = auth {
            req = req.header("Authorization", auth);
        }
        req
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        context: &'static str,
    ) -> ApiResult<T> {
        let req = Self::with_auth_headers(req, self.get_auth_header());
        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::Unauthorized)
        } else {
            let status = res.status().as_u16();
            let body = server_message(&res.text().await.unwrap_or_default());
            Err(ApiError::Http {
                status,
                body,
                context,
            })
        }
    }
}

impl NotesService for ApiClient {
    async fn list_notes(&self, key: &NotesKey) -> ApiResult<NotePage> {
        let url = format!("{}/notes", self.base_url);
        let req = reqwest::Client::new().get(url).query(&self.list_query(key));

        tracing::debug!(page = key.page, search = %key.search, tag = ?key.tag, "listing notes");
        let page: NotePage = self.send_json(req, "List notes failed").await?;
        tracing::debug!(
            count = page.notes.len(),
            total_pages = page.total_pages,
            "notes listed"
        );
        Ok(page)
    }

    async fn create_note(&self, body: &CreateNoteRequest) -> ApiResult<Note> {
        let url = format!("{}/notes", self.base_url);
        let req = reqwest::Client::new().post(url).json(body);

        let note: Note = self.send_json(req, "Create note failed").await?;
        tracing::info!(note_id = %note.id, tag = %note.tag, "note created");
        Ok(note)
    }
}
