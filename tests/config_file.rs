use std::io::Write;

use gifscout::{Config, GifscoutError, Library, Rating};

#[test]
fn loads_full_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
api_key = "abc123"
rating = "pg"
library = "stickers"
lang = "fr"
page_size = 10
debounce_wait_ms = 250
placeholder = "Chercher"
powered_by = false
trace_level = "gifscout=debug"

[messages]
no_matches = "Rien."

[[masonry]]
columns = 2
image_width = 110
gutter = 5

[[masonry]]
min_width = 700
columns = 4
image_width = 140
gutter = 8
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.api_key, "abc123");
    assert_eq!(config.rating, Rating::Pg);
    assert_eq!(config.library, Library::Stickers);
    assert_eq!(config.lang.as_deref(), Some("fr"));
    assert_eq!(config.page_size, 10);
    assert_eq!(config.debounce_wait_ms, 250);
    assert!(!config.powered_by);
    assert_eq!(config.messages.no_matches, "Rien.");
    assert_eq!(config.messages.loading, "Loading...");
    assert_eq!(config.request_timeout_ms, 10_000);

    assert_eq!(config.masonry.for_viewport(500).columns, 2);
    assert_eq!(config.masonry.for_viewport(1024).columns, 4);
}

#[test]
fn minimal_config_uses_defaults() {
    let config = Config::from_toml_str(r#"api_key = "k""#).unwrap();
    assert_eq!(config.page_size, 25);
    assert_eq!(config.api_base_url, "https://api.giphy.com");
    assert_eq!(config.masonry.for_viewport(320).columns, 2);
}

#[test]
fn rejects_invalid_values() {
    assert!(matches!(
        Config::from_toml_str(r#"api_key = "k"
page_size = 0"#),
        Err(GifscoutError::Config(_))
    ));
    assert!(matches!(
        Config::from_toml_str(r#"api_key = "k"
rating = "nc-17""#),
        Err(GifscoutError::Toml(_))
    ));
    assert!(matches!(
        Config::from_toml_str("page_size = 5"),
        Err(GifscoutError::Config(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, GifscoutError::Io(_)));
}
