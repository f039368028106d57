//! Cookie-backed server-side sessions.
//!
//! The session middleware reads the `ermvc.sid` cookie, loads the data from
//! a [`SessionStore`] and hands the request a [`Session`] handle. After the
//! handler ran, a modified session is saved and the cookie (re)issued; an
//! untouched new session leaves no trace.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::MvcConfig;
use crate::error::HttpError;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "ermvc.sid";

/// Default session lifetime: 24 hours.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24);

pub type SessionData = HashMap<String, serde_json::Value>;

/// Storage backend for session data.
pub trait SessionStore: Send + Sync + 'static {
    /// Data for `id`, or `None` when unknown or expired.
    fn load(&self, id: &str) -> Option<SessionData>;

    fn save(&self, id: &str, data: SessionData, ttl: Duration);

    fn destroy(&self, id: &str);
}

/// Saves between two sweeps of expired sessions in [`MemorySessionStore`].
pub const PURGE_INTERVAL: usize = 64;

/// In-process store. Sessions are lost on restart.
///
/// Expired entries are dropped when loaded and swept every
/// [`PURGE_INTERVAL`] saves, so abandoned sessions do not pile up.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, (SessionData, Instant)>,
    saves: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every expired session.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.sessions.retain(|_, (_, expires)| *expires > now);
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, id: &str) -> Option<SessionData> {
        {
            let entry = self.sessions.get(id)?;
            if entry.1 > Instant::now() {
                return Some(entry.0.clone());
            }
        }
        // expired; the read guard is released above
        self.sessions.remove(id);
        None
    }

    fn save(&self, id: &str, data: SessionData, ttl: Duration) {
        if (self.saves.fetch_add(1, Ordering::Relaxed) + 1) % PURGE_INTERVAL == 0 {
            self.purge_expired();
        }
        self.sessions
            .insert(id.to_string(), (data, Instant::now() + ttl));
    }

    fn destroy(&self, id: &str) {
        self.sessions.remove(id);
    }
}

/// Cookie attributes for the session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    pub ttl: Duration,
    pub secure: bool,
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            name: SESSION_COOKIE.to_string(),
            ttl: DEFAULT_SESSION_TTL,
            secure: false,
        }
    }
}

impl SessionCookie {
    /// `Secure` is set when running the production profile.
    pub fn from_config(config: &MvcConfig) -> Self {
        let ttl = config
            .get::<u64>("session.max_age")
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SESSION_TTL);
        Self {
            secure: config.is_production(),
            ttl,
            ..Self::default()
        }
    }

    fn header_value(&self, id: &str, max_age: u64) -> Option<HeaderValue> {
        let mut cookie = format!(
            "{}={id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
            self.name
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).ok()
    }
}

/// Shared state of the session middleware.
#[derive(Clone)]
pub struct SessionLayer {
    store: Arc<dyn SessionStore>,
    cookie: SessionCookie,
}

impl SessionLayer {
    pub fn new(store: Arc<dyn SessionStore>, cookie: SessionCookie) -> Self {
        Self { store, cookie }
    }

    /// Memory store with cookie settings from `config`.
    ///
    /// A configured `redis.url` is not supported by the built-in stores; a
    /// warning is logged and sessions stay in memory.
    pub fn from_config(config: &MvcConfig) -> Self {
        if let Some(url) = config.get_str("redis.url") {
            tracing::warn!(
                redis_url = %url,
                "Redis session store is not available, using memory sessions"
            );
        }
        Self::new(Arc::new(MemorySessionStore::new()), SessionCookie::from_config(config))
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn cookie(&self) -> &SessionCookie {
        &self.cookie
    }
}

#[derive(Debug)]
struct SessionState {
    id: String,
    data: SessionData,
    is_new: bool,
    modified: bool,
    destroyed: bool,
}

/// Per-request session handle.
///
/// Cheap to clone; every clone sees the same data.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    fn new(id: String, data: SessionData, is_new: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                id,
                data,
                is_new,
                modified: false,
                destroyed: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn id(&self) -> String {
        self.lock().id.clone()
    }

    /// Typed value for `key`; `None` when absent or of another shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.lock().data.get(key).cloned()?;
        serde_json::from_value(value).ok()
    }

    pub fn insert<T: Serialize>(&self, key: &str, value: T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        let mut state = self.lock();
        state.data.insert(key.to_string(), value);
        state.modified = true;
        state.destroyed = false;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Option<serde_json::Value> {
        let mut state = self.lock();
        let removed = state.data.remove(key);
        if removed.is_some() {
            state.modified = true;
        }
        removed
    }

    /// Drop all data and expire the cookie.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.data.clear();
        state.destroyed = true;
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| HttpError::Internal("Session middleware is not installed".to_string()))
    }
}

/// Session id from the request's `Cookie` headers.
fn session_id_from_headers(parts_headers: &axum::http::HeaderMap, cookie_name: &str) -> Option<String> {
    parts_headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Middleware function; install with
/// `axum::middleware::from_fn_with_state(layer, session_middleware)`.
pub async fn session_middleware(
    State(layer): State<SessionLayer>,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = session_id_from_headers(req.headers(), &layer.cookie.name)
        .and_then(|id| layer.store.load(&id).map(|data| (id, data)));

    let session = match existing {
        Some((id, data)) => Session::new(id, data, false),
        None => Session::new(uuid::Uuid::new_v4().simple().to_string(), SessionData::new(), true),
    };

    req.extensions_mut().insert(session.clone());
    let mut response = next.run(req).await;

    let state = session.lock();
    if state.destroyed {
        layer.store.destroy(&state.id);
        if !state.is_new {
            if let Some(cookie) = layer.cookie.header_value("", 0) {
                response.headers_mut().append(SET_COOKIE, cookie);
            }
        }
    } else if state.modified {
        layer
            .store
            .save(&state.id, state.data.clone(), layer.cookie.ttl);
        if let Some(cookie) = layer.cookie.header_value(&state.id, layer.cookie.ttl.as_secs()) {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
    }
    drop(state);

    response
}
