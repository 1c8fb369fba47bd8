//! Line-oriented demo shell for the gifscout engine.
//!
//! Stands in for a real picker UI: every stdin line is treated as the full
//! content of the search field, and the laid-out grid is printed whenever the
//! session publishes a new snapshot.
//!
//! # Usage
//!
//! ```text
//! gifscout path/to/gifscout.toml
//! gifscout api_key=... rating=g gif_per_page=10
//! GIPHY_API_KEY=... gifscout
//! ```
//!
//! # Commands
//!
//! - any text: replaces the search field content (empty line → trending)
//! - `:more`: scroll near the bottom, loading the next page
//! - `:select <id>`: activate an item
//! - `:width <px>`: change the simulated viewport width
//! - `:quit`: unmount and exit

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use gifscout::{spawn_session, Config, GiphyFetcher, GridViewModel, SessionHooks};

const DEFAULT_VIEWPORT: u32 = 480;

fn load_config() -> gifscout::Result<Config> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let [path] = args.as_slice() {
        if path.ends_with(".toml") {
            return Config::load(path);
        }
    }

    let mut props: BTreeMap<String, String> = args
        .iter()
        .filter_map(|arg| arg.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    if !props.contains_key("api_key") {
        if let Ok(key) = std::env::var("GIPHY_API_KEY") {
            props.insert("api_key".to_string(), key);
        }
    }

    Config::from_props(&props)
}

fn print_grid(vm: &GridViewModel) {
    println!("── {:?} │ query: {:?} │ {} shown", vm.status, vm.query, vm.displayed_count);
    if let Some(message) = &vm.message {
        println!("   {message}");
    }
    for (i, column) in vm.columns.iter().enumerate() {
        let tiles: Vec<String> = column
            .tiles
            .iter()
            .map(|t| format!("{}({:.0}px)", t.id, t.height))
            .collect();
        println!("   col {i} [{:.0}px]: {}", column.height, tiles.join(" "));
    }
    if vm.is_loading_more {
        println!("   loading more...");
    } else if vm.has_more && vm.displayed_count > 0 {
        println!("   (:more for next page)");
    }
    if vm.powered_by {
        println!("   Powered by GIPHY");
    }
}

#[tokio::main]
async fn main() -> gifscout::Result<()> {
    let config = load_config()?;
    gifscout::observability::init_tracing(&config);

    tracing::info!(
        library = config.library.as_str(),
        rating = config.rating.as_str(),
        page_size = config.page_size,
        "starting demo shell"
    );

    let fetcher = Arc::new(GiphyFetcher::new(&config)?);
    let hooks = SessionHooks::new()
        .on_search(|term| println!("» on_search({term:?})"))
        .on_select(|item| println!("» on_select({}) {}", item.id, item.full_url));

    println!("{}", config.placeholder);
    let session = spawn_session(config, fetcher, hooks);

    let viewport = Arc::new(AtomicU32::new(DEFAULT_VIEWPORT));
    let mut updates = session.subscribe();
    let printer_viewport = Arc::clone(&viewport);
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let vm = updates
                .borrow_and_update()
                .viewmodel(printer_viewport.load(Ordering::Relaxed));
            print_grid(&vm);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end();
        match line.split_once(' ').unwrap_or((line, "")) {
            (":quit", _) => break,
            (":more", _) => session.scroll_near_bottom()?,
            (":select", id) => session.select(id.trim())?,
            (":width", px) => match px.trim().parse::<u32>() {
                Ok(px) => {
                    viewport.store(px, Ordering::Relaxed);
                    print_grid(&session.snapshot().viewmodel(px));
                }
                Err(_) => eprintln!("usage: :width <px>"),
            },
            _ => session.input(line)?,
        }
    }

    session.unmount().await;
    printer.abort();
    Ok(())
}
