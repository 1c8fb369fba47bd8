//! Gifscout: an embeddable GIF search engine core.
//!
//! Gifscout drives a "type to search, scroll for more" GIF picker over the
//! Giphy API without owning any UI:
//! - Debounced query input, so only settled text triggers a request
//! - Trending results when the query is empty, search results otherwise
//! - Infinite-scroll pagination with id-based deduplication
//! - Epoch tagging so late responses for an abandoned query never land
//! - Masonry (shortest-column) layout with viewport breakpoints

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host shell (main.rs demo, or an embedding UI)      │  ← Input, scroll, render
//! └─────────────────────────────────────────────────────┘
//!                        │ SessionHandle / watch snapshots
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← tokio tasks
//! │  - QueryDebouncer                                   │
//! │  - Session event loop, fetch spawning, hooks        │
//! └─────────────────────────────────────────────────────┘
//!                        │ Events ↓   ↑ Actions
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, epoch guard, pagination          │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Fetch (fetch/)│   │ Layout        │   │ UI (ui/)      │
//! │ - reqwest     │   │ (layout/)     │   │ - View models │
//! │ - Envelope    │   │ - Masonry     │   │               │
//! │ - Epoch tags  │   │ - Breakpoints │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/) + Observability (observability/)  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Search session state machine with event/action model
//! - [`domain`]: Media items, pages and error types
//! - [`fetch`]: `ResultFetcher` trait, Giphy client, envelope decoding
//! - [`layout`]: Masonry packing and breakpoints
//! - [`runtime`]: Debouncer and async session runtime
//! - [`ui`]: Renderable view models
//! - [`observability`]: Tracing subscriber and span export
//!
//! # Configuration
//!
//! ```toml
//! api_key = "your-giphy-key"
//! rating = "pg-13"
//! library = "gifs"
//! page_size = 25
//! debounce_wait_ms = 500
//!
//! [[masonry]]
//! columns = 2
//! image_width = 110
//! gutter = 5
//!
//! [[masonry]]
//! min_width = 700
//! columns = 3
//! image_width = 120
//! gutter = 5
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gifscout::{handle_event, Config, Event, SearchState};
//!
//! let config = Config::from_toml_str(r#"api_key = "k""#)?;
//! let mut state = SearchState::new(Arc::new(config));
//!
//! let (changed, actions) = handle_event(&mut state, &Event::Mount);
//! assert!(changed);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), gifscout::GifscoutError>(())
//! ```

pub mod app;
pub mod domain;
pub mod fetch;
pub mod layout;
pub mod observability;
pub mod runtime;
pub mod ui;

pub use app::{handle_event, Action, Event, SearchMode, SearchState, SearchStatus};
pub use domain::{FetchError, GifscoutError, MediaItem, Page, Result};
pub use fetch::{GiphyFetcher, ResultFetcher};
pub use layout::{Breakpoint, MasonryConfig};
pub use runtime::{spawn_session, SearchSnapshot, SessionHandle, SessionHooks};
pub use ui::GridViewModel;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Content rating filter sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "g")]
    G,
    #[serde(rename = "pg")]
    Pg,
    #[default]
    #[serde(rename = "pg-13")]
    Pg13,
    #[serde(rename = "r")]
    R,
}

impl Rating {
    /// Query parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::G => "g",
            Self::Pg => "pg",
            Self::Pg13 => "pg-13",
            Self::R => "r",
        }
    }
}

impl FromStr for Rating {
    type Err = GifscoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" => Ok(Self::G),
            "pg" => Ok(Self::Pg),
            "pg-13" => Ok(Self::Pg13),
            "r" => Ok(Self::R),
            other => Err(GifscoutError::Config(format!("unknown rating '{other}'"))),
        }
    }
}

/// Which Giphy catalogue to browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Library {
    #[default]
    Gifs,
    Stickers,
}

impl Library {
    /// Path segment used in endpoint URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gifs => "gifs",
            Self::Stickers => "stickers",
        }
    }
}

impl FromStr for Library {
    type Err = GifscoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gifs" => Ok(Self::Gifs),
            "stickers" => Ok(Self::Stickers),
            other => Err(GifscoutError::Config(format!("unknown library '{other}'"))),
        }
    }
}

/// Status texts shown by the view model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub loading: String,
    pub no_matches: String,
    pub error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            loading: "Loading...".to_string(),
            no_matches: "No matches found.".to_string(),
            error: "Oops! Something went wrong. Please, try again.".to_string(),
        }
    }
}

/// Session configuration. Built once and shared read-only.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
/// `api_key` is the one field [`Config::validate`] insists on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Giphy API key.
    pub api_key: String,

    /// Content rating filter. Default: `pg-13`.
    pub rating: Rating,

    /// `gifs` or `stickers`. Default: `gifs`.
    pub library: Library,

    /// Language hint for search requests (two-letter code), if any.
    pub lang: Option<String>,

    /// Items requested per page. Must be non-zero. Default: 25.
    pub page_size: u32,

    /// Column breakpoints for the masonry layout.
    pub masonry: MasonryConfig,

    /// Quiet period before typed text becomes a query. Default: 500 ms.
    pub debounce_wait_ms: u64,

    /// Upper bound on one page request. Default: 10 000 ms.
    pub request_timeout_ms: u64,

    /// API origin. Default: `https://api.giphy.com`.
    pub api_base_url: String,

    /// Status texts.
    pub messages: Messages,

    /// Whether hosts should show the "Powered by GIPHY" attribution.
    pub powered_by: bool,

    /// Search field placeholder.
    pub placeholder: String,

    /// Query loaded on mount. Empty means trending.
    pub initial_query: String,

    /// Tracing filter directive, e.g. `"debug"` or `"gifscout=trace"`.
    pub trace_level: Option<String>,

    /// JSON-lines span export target. Export is off when unset.
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            rating: Rating::default(),
            library: Library::default(),
            lang: None,
            page_size: 25,
            masonry: MasonryConfig::default(),
            debounce_wait_ms: 500,
            request_timeout_ms: 10_000,
            api_base_url: "https://api.giphy.com".to_string(),
            messages: Messages::default(),
            powered_by: true,
            placeholder: "Search for GIFs".to_string(),
            initial_query: String::new(),
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GifscoutError::Toml`] on malformed TOML or mistyped values,
    /// and [`GifscoutError::Config`] if validation fails.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GifscoutError::Io`] if the file cannot be read, otherwise
    /// the errors of [`Config::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Builds a configuration from flat string properties.
    ///
    /// Hosts that pass widget attributes as key/value strings use this
    /// instead of TOML. Unknown keys are ignored; unparsable numbers fall back
    /// to the default. The `gif_per_page` key is accepted as an alias of
    /// `page_size`.
    ///
    /// # Errors
    ///
    /// Returns [`GifscoutError::Config`] for an unknown `rating` or `library`
    /// and for any [`Config::validate`] failure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use gifscout::Config;
    ///
    /// let mut props = BTreeMap::new();
    /// props.insert("api_key".to_string(), "k".to_string());
    /// props.insert("gif_per_page".to_string(), "10".to_string());
    /// props.insert("rating".to_string(), "g".to_string());
    ///
    /// let config = Config::from_props(&props)?;
    /// assert_eq!(config.page_size, 10);
    /// assert_eq!(config.rating.as_str(), "g");
    /// # Ok::<(), gifscout::GifscoutError>(())
    /// ```
    pub fn from_props(props: &BTreeMap<String, String>) -> Result<Self> {
        let defaults = Self::default();
        let number = |key: &str| props.get(key).and_then(|s| s.trim().parse::<u64>().ok());
        let text = |key: &str| {
            props
                .get(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let config = Self {
            api_key: text("api_key").unwrap_or_default(),
            rating: text("rating").map_or(Ok(defaults.rating), |s| s.parse())?,
            library: text("library").map_or(Ok(defaults.library), |s| s.parse())?,
            lang: text("lang"),
            page_size: number("page_size")
                .or_else(|| number("gif_per_page"))
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.page_size),
            debounce_wait_ms: number("debounce_wait_ms").unwrap_or(defaults.debounce_wait_ms),
            request_timeout_ms: number("request_timeout_ms").unwrap_or(defaults.request_timeout_ms),
            api_base_url: text("api_base_url").unwrap_or(defaults.api_base_url),
            powered_by: props
                .get("powered_by")
                .map_or(defaults.powered_by, |s| s.trim() != "false"),
            placeholder: text("placeholder").unwrap_or(defaults.placeholder),
            initial_query: text("initial_query").unwrap_or_default(),
            trace_level: text("trace_level"),
            trace_file: text("trace_file").map(PathBuf::from),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`GifscoutError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(GifscoutError::Config("api_key must be set".to_string()));
        }
        if self.page_size == 0 {
            return Err(GifscoutError::Config("page_size must be greater than 0".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(GifscoutError::Config(
                "request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(GifscoutError::Config(format!(
                "api_base_url '{}' is not an http(s) URL",
                self.api_base_url
            )));
        }
        if let Some(lang) = &self.lang {
            if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(GifscoutError::Config(format!(
                    "lang '{lang}' is not a two-letter language code"
                )));
            }
        }
        self.masonry
            .validate()
            .map_err(|reason| GifscoutError::Config(format!("masonry: {reason}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_defaults() {
        let config = Config::default();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.debounce_wait_ms, 500);
        assert_eq!(config.rating, Rating::Pg13);
        assert_eq!(config.library, Library::Gifs);
        assert!(config.powered_by);
        assert_eq!(config.messages.loading, "Loading...");
    }

    #[test]
    fn validate_requires_api_key() {
        assert!(matches!(Config::default().validate(), Err(GifscoutError::Config(_))));
    }

    #[test]
    fn props_reject_unknown_rating() {
        let mut props = BTreeMap::new();
        props.insert("api_key".to_string(), "k".to_string());
        props.insert("rating".to_string(), "nc-17".to_string());
        assert!(Config::from_props(&props).is_err());
    }

    #[test]
    fn props_fall_back_on_bad_numbers() {
        let mut props = BTreeMap::new();
        props.insert("api_key".to_string(), "k".to_string());
        props.insert("page_size".to_string(), "lots".to_string());
        props.insert("powered_by".to_string(), "false".to_string());
        let config = Config::from_props(&props).unwrap();
        assert_eq!(config.page_size, 25);
        assert!(!config.powered_by);
    }

    #[test]
    fn rejects_zero_page_size_and_bad_lang() {
        let config = Config {
            api_key: "k".into(),
            page_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            api_key: "k".into(),
            lang: Some("english".into()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
