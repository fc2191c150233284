//! `stormwave [config.json]`
//!
//! Opens the viewer. An optional JSON config path overrides the defaults;
//! a file that fails to load is logged and the defaults are used.

use stormwave::{EngineConfig, Viewer};

fn main() {
    env_logger::init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => EngineConfig::load_or_default(path),
        None => EngineConfig::default(),
    };

    if let Err(err) = Viewer::new().with_config(config).run() {
        log::error!("{err}");
        eprintln!("stormwave: {err}");
        std::process::exit(1);
    }
}
