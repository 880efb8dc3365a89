mod commands;
mod data_struct;
mod error;
mod logging;

use clap::{Arg, ArgAction, Command};
use log::{error, info};
use std::path::Path;
use std::process;

use commands::archive::{default_staging_dir, Archiver};
use commands::download::FanboxDownloader;
use commands::notify::{HttpTransport, Notifier};
use commands::run::Pipeline;
use commands::{config, global};

fn main() {
    let matches = Command::new(env!("CARGO_PKG_NAME"))
        .about("Fetch new Fanbox images for every configured creator and announce them on a webhook")
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .help("Force download all files")
                .action(ArgAction::SetTrue),
        )
        .get_matches();
    let force_all = matches.get_flag("force");

    logging::init(Path::new(logging::LOG_FILE));

    // Config problems abort before any creator is touched
    let (config, creators) = match config::load_all(Path::new(".")) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let images_dir = match global::resolve_images_dir(config.images_dir.as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to resolve images directory: {}", e);
            process::exit(1);
        }
    };

    let transport = match HttpTransport::new(&config.webhook_url, config.webhook_timeout()) {
        Ok(transport) => transport,
        Err(e) => {
            error!("Failed to set up webhook client: {}", e);
            process::exit(1);
        }
    };

    let notifier = Notifier::new(&transport, &config);
    let downloader = FanboxDownloader::new(&config.downloader_path, config.download_timeout());
    let staging_dir = config
        .archive_staging_path
        .clone()
        .unwrap_or_else(|| default_staging_dir(&config.archive_base_path));
    let archiver = Archiver::new(
        &config.archive_base_path,
        staging_dir,
        config.archive_base_url.as_str(),
    );
    let pipeline = Pipeline::new(images_dir, &downloader, &archiver, &notifier, force_all);

    let summary = pipeline.run_batch(&creators);
    info!(
        "Run finished: {} notified, {} undelivered ({} new files), {} without new images, {} failed",
        summary.notified,
        summary.undelivered,
        summary.new_files,
        summary.no_new_files,
        summary.failed
    );
}
