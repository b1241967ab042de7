mod analytics;
mod config;
mod db;
mod export;
mod forms;
mod logging;
mod models;
mod run;
mod store;
mod ui;

use anyhow::Result;

use config::Config;
use store::Store;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_env();
    let data_dir = config.ensure_data_dir();
    logging::init(&config);

    let data_dir = match data_dir {
        Ok(dir) => {
            tracing::info!(data_dir = %dir.display(), "starting dompet");
            Some(dir)
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "no data directory, changes will not be saved");
            eprintln!("Warning: {e:#}. Changes will not be saved.");
            None
        }
    };

    let mut store = Store::load(db::open_storage(data_dir));

    match args.len() {
        1 => run::as_tui(&mut store, config.export_dir.clone()),
        2.. => run::as_cli(&args, &mut store, &config),
        _ => {
            eprintln!("Usage: dompet [command]");
            Ok(())
        }
    }
}
