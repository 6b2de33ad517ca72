mod ccd;
mod ui;

use std::path::PathBuf;

use ccd::ConfigDir;
use clap::Parser;

#[derive(Debug, Parser)]
struct Config {
    #[clap(long, short, env = "CCD_DIR", value_parser, default_value = "./ccd")]
    ccd_dir: PathBuf,

    #[clap(flatten)]
    api: ui::web::Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    pretty_env_logger::init();

    let config = Config::parse();

    ui::web::start(config.api, ConfigDir::new(config.ccd_dir)).await
}
