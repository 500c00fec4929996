mod cli;
mod clock;
mod config;
mod format;
mod history;
mod host;
mod logging;
mod model;
mod panel;
mod party;
mod paths;
mod session;
mod storage;
mod tracker;
mod tui;

use std::process;

use clap::Parser;

use cli::Cli;
use config::Config;

fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(cli, &config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
