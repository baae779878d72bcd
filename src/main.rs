mod app;
mod events;
mod ui;

use anyhow::Result;
use app::App;
use citizen_portal::catalog::Catalog;
use citizen_portal::config::Config;
use citizen_portal::logger::{CustomLogger, LogBuffer};
use citizen_portal::session::FileSessionStore;
use clap::{App as ClapApp, Arg};
use log::*;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = ClapApp::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.yml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("session-dir")
                .short("s")
                .long("session-dir")
                .value_name("DIR")
                .help("Directory holding the stored session")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("catalog")
                .long("catalog")
                .value_name("FILE")
                .help("YAML catalog replacing the built-in one")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Show debug entries in the log panel"),
        )
        .get_matches();

    let level = if matches.is_present("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_buffer = LogBuffer::new();
    CustomLogger::init(level, log_buffer.clone())?;

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;

    let catalog_path = matches
        .value_of("catalog")
        .map(PathBuf::from)
        .or_else(|| config.catalog_path.clone());
    let catalog = match catalog_path {
        Some(path) => Catalog::from_yaml_file(&path)?,
        None => Catalog::default(),
    };

    let store = FileSessionStore::open(matches.value_of("session-dir").map(Path::new))?;
    info!("Session stored at {}", store.file_path().display());

    App::start(config, catalog, Box::new(store), log_buffer).await
}
