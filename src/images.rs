//! Vendor image lookup: scrapes a set's cover image from the LEGO
//! building-instructions page, plus the fixed per-piece CDN template.
//!
//! The HTML extraction is a pure function over the fetched body so it can be
//! unit tested without network. Every failure mode (network, layout change,
//! unknown code) collapses into one [`LookupError`]; none is retryable here.

use anyhow::Context;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::util::env::{env_opt, env_parse};

pub const DEFAULT_SET_PAGE_BASE: &str =
    "https://www.lego.com/es-ar/service/building-instructions/";

const PIECE_IMAGE_BASE: &str =
    "https://www.lego.com/cdn/product-assets/element.img.lod5photo.192x192/";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("image page request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("set image not found in vendor page")]
    NotFound,
}

/// Immutable, cloneable provider: one reqwest client plus the vendor base URL.
#[derive(Clone)]
pub struct ImageProvider {
    client: Client,
    base_url: String,
}

impl ImageProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("brickstash/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("building reqwest client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let base_url =
            env_opt("LEGO_IMAGE_BASE_URL").unwrap_or_else(|| DEFAULT_SET_PAGE_BASE.to_string());
        let timeout_secs: u64 = env_parse("LEGO_HTTP_TIMEOUT_SECS", 10u64);
        Self::new(base_url, Duration::from_secs(timeout_secs))
    }

    /// Fetch the vendor page for a set and extract its cover image URL.
    /// An empty identifier resolves to the empty image with no network call.
    pub async fn set_image(&self, set: &str) -> Result<String, LookupError> {
        let set = set.trim();
        if set.is_empty() {
            return Ok(String::new());
        }
        let url = format!("{}{}", self.base_url, urlencoding::encode(set));
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        extract_set_image(&body)
            .map(|src| normalize_image_url(&src))
            .ok_or(LookupError::NotFound)
    }
}

/// URL of the piece photo for an element code; empty code yields the empty URL.
pub fn piece_image_url(code: &str) -> String {
    let code = code.trim();
    if code.is_empty() {
        return String::new();
    }
    format!("{PIECE_IMAGE_BASE}{}.jpg", urlencoding::encode(code))
}

fn picture_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<picture[^>]*data-test="set-image"[^>]*>(.*?)</picture>"#)
            .expect("static regex")
    })
}

fn source_srcset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<source[^>]*\bsrcset="([^"]*)""#).expect("static regex")
    })
}

/// Pull the cover image URL out of the set page HTML: inside the
/// `data-test="set-image"` picture block, the srcset of the source element
/// immediately preceding the img, first srcset entry.
pub fn extract_set_image(html: &str) -> Option<String> {
    let block = picture_block_re().captures(html)?.get(1)?.as_str();
    let before_img = match block.find("<img") {
        Some(pos) => &block[..pos],
        None => block,
    };
    let srcset = source_srcset_re()
        .captures_iter(before_img)
        .last()?
        .get(1)?
        .as_str();
    let first = srcset.split(',').next()?.trim();
    let url = first.split_whitespace().next()?;
    (!url.is_empty()).then(|| url.to_string())
}

/// The vendor emits protocol-relative and bare URLs; force https.
pub fn normalize_image_url(src: &str) -> String {
    if src.starts_with("http") {
        src.to_string()
    } else {
        format!("https:{src}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <picture data-test="set-image" class="Picturestyles__Wrapper">
          <source media="(min-width: 601px)" srcset="//cdn.lego.test/sets/41092_large.webp 1x, //cdn.lego.test/sets/41092_large@2x.webp 2x" />
          <source media="(max-width: 600px)" srcset="//cdn.lego.test/sets/41092_small.webp 1x" />
          <img src="//cdn.lego.test/sets/41092_fallback.png" alt="41092" />
        </picture>
        </body></html>
    "#;

    #[test]
    fn extracts_srcset_of_source_preceding_img() {
        let src = extract_set_image(PAGE).unwrap();
        assert_eq!(src, "//cdn.lego.test/sets/41092_small.webp");
    }

    #[test]
    fn missing_picture_block_is_none() {
        assert!(extract_set_image("<html><img src=\"x.png\"/></html>").is_none());
        assert!(extract_set_image("").is_none());
    }

    #[test]
    fn empty_srcset_is_none() {
        let html = r#"<picture data-test="set-image"><source srcset="" /><img /></picture>"#;
        assert!(extract_set_image(html).is_none());
    }

    #[test]
    fn normalize_prefixes_protocol_relative_urls() {
        assert_eq!(
            normalize_image_url("//cdn.lego.test/a.webp"),
            "https://cdn.lego.test/a.webp"
        );
        assert_eq!(
            normalize_image_url("https://cdn.lego.test/a.webp"),
            "https://cdn.lego.test/a.webp"
        );
    }

    #[test]
    fn piece_image_url_handles_empty_code() {
        assert_eq!(piece_image_url(""), "");
        assert_eq!(piece_image_url("   "), "");
        assert_eq!(
            piece_image_url("6093053"),
            "https://www.lego.com/cdn/product-assets/element.img.lod5photo.192x192/6093053.jpg"
        );
    }

    #[tokio::test]
    async fn empty_set_identifier_skips_the_network() {
        // Unroutable base URL: a network call would error, empty input must not.
        let provider =
            ImageProvider::new("http://127.0.0.1:1/", Duration::from_millis(50)).unwrap();
        assert_eq!(provider.set_image("").await.unwrap(), "");
        assert_eq!(provider.set_image("   ").await.unwrap(), "");
    }
}
