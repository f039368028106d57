//! Security response headers, with the same defaults as Express' `helmet`.
//!
//! | Header                              | Default                               |
//! |-------------------------------------|---------------------------------------|
//! | `X-Content-Type-Options`            | `nosniff`                             |
//! | `X-Frame-Options`                   | `SAMEORIGIN`                          |
//! | `Strict-Transport-Security`         | `max-age=15552000; includeSubDomains` |
//! | `Referrer-Policy`                   | `no-referrer`                         |
//! | `X-DNS-Prefetch-Control`            | `off`                                 |
//! | `X-Download-Options`                | `noopen`                              |
//! | `X-Permitted-Cross-Domain-Policies` | `none`                                |
//! | `Cross-Origin-Opener-Policy`        | `same-origin`                         |
//! | `Cross-Origin-Resource-Policy`      | `same-origin`                         |
//! | `X-XSS-Protection`                  | `0`                                   |
//!
//! `Content-Security-Policy` is only sent when configured. Headers already
//! set by a handler are left alone.
//!
//! ```ignore
//! let headers = SecureHeaders::builder()
//!     .frame_options("DENY")
//!     .content_security_policy("default-src 'self'")
//!     .build();
//! ```

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::Router;

const HSTS_DEFAULT_MAX_AGE: u64 = 15_552_000;

/// A fixed set of headers added to every response.
#[derive(Debug, Clone)]
pub struct SecureHeaders {
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl SecureHeaders {
    pub fn builder() -> SecureHeadersBuilder {
        SecureHeadersBuilder::default()
    }

    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    /// Add the configured headers that `target` does not already carry.
    pub fn apply(&self, target: &mut HeaderMap) {
        for (name, value) in self.headers.iter() {
            if !target.contains_key(name) {
                target.insert(name.clone(), value.clone());
            }
        }
    }

    /// Wrap `router` with a middleware applying these headers.
    pub fn layer_onto<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(axum::middleware::from_fn(move |req: Request, next: Next| {
            let headers = self.clone();
            async move {
                let mut response = next.run(req).await;
                headers.apply(response.headers_mut());
                response
            }
        }))
    }
}

impl Default for SecureHeaders {
    fn default() -> Self {
        SecureHeadersBuilder::default().build()
    }
}

/// Builder for [`SecureHeaders`].
#[derive(Debug, Clone)]
pub struct SecureHeadersBuilder {
    frame_options: Option<String>,
    hsts_max_age: Option<u64>,
    hsts_include_subdomains: bool,
    referrer_policy: Option<String>,
    content_security_policy: Option<String>,
    cross_origin: bool,
    extra: Vec<(String, String)>,
}

impl Default for SecureHeadersBuilder {
    fn default() -> Self {
        Self {
            frame_options: Some("SAMEORIGIN".to_string()),
            hsts_max_age: Some(HSTS_DEFAULT_MAX_AGE),
            hsts_include_subdomains: true,
            referrer_policy: Some("no-referrer".to_string()),
            content_security_policy: None,
            cross_origin: true,
            extra: Vec::new(),
        }
    }
}

impl SecureHeadersBuilder {
    /// `X-Frame-Options` value (`DENY`, `SAMEORIGIN`).
    pub fn frame_options(mut self, value: impl Into<String>) -> Self {
        self.frame_options = Some(value.into());
        self
    }

    pub fn no_frame_options(mut self) -> Self {
        self.frame_options = None;
        self
    }

    /// HSTS `max-age` in seconds.
    pub fn hsts_max_age(mut self, seconds: u64) -> Self {
        self.hsts_max_age = Some(seconds);
        self
    }

    pub fn hsts_include_subdomains(mut self, include: bool) -> Self {
        self.hsts_include_subdomains = include;
        self
    }

    pub fn no_hsts(mut self) -> Self {
        self.hsts_max_age = None;
        self
    }

    pub fn referrer_policy(mut self, value: impl Into<String>) -> Self {
        self.referrer_policy = Some(value.into());
        self
    }

    pub fn content_security_policy(mut self, value: impl Into<String>) -> Self {
        self.content_security_policy = Some(value.into());
        self
    }

    /// Toggle `Cross-Origin-Opener-Policy` and `Cross-Origin-Resource-Policy`.
    pub fn cross_origin_policies(mut self, enabled: bool) -> Self {
        self.cross_origin = enabled;
        self
    }

    /// Any other header. Invalid names or values are dropped at build time.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> SecureHeaders {
        let mut pairs: Vec<(String, String)> = vec![
            ("x-content-type-options".into(), "nosniff".into()),
            ("x-dns-prefetch-control".into(), "off".into()),
            ("x-download-options".into(), "noopen".into()),
            ("x-permitted-cross-domain-policies".into(), "none".into()),
            ("x-xss-protection".into(), "0".into()),
        ];

        if let Some(value) = self.frame_options {
            pairs.push(("x-frame-options".into(), value));
        }
        if let Some(max_age) = self.hsts_max_age {
            let value = if self.hsts_include_subdomains {
                format!("max-age={max_age}; includeSubDomains")
            } else {
                format!("max-age={max_age}")
            };
            pairs.push(("strict-transport-security".into(), value));
        }
        if let Some(value) = self.referrer_policy {
            pairs.push(("referrer-policy".into(), value));
        }
        if let Some(value) = self.content_security_policy {
            pairs.push(("content-security-policy".into(), value));
        }
        if self.cross_origin {
            pairs.push(("cross-origin-opener-policy".into(), "same-origin".into()));
            pairs.push(("cross-origin-resource-policy".into(), "same-origin".into()));
        }
        pairs.extend(self.extra);

        let headers = pairs
            .into_iter()
            .filter_map(|(name, value)| {
                let name = HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes()).ok()?;
                let value = HeaderValue::from_str(&value).ok()?;
                Some((name, value))
            })
            .collect();

        SecureHeaders {
            headers: Arc::new(headers),
        }
    }
}
