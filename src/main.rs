use std::process::exit;

use env_logger::Env;
use rusty_agenda::prelude::run_app;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(e) = run_app() {
        eprintln!("Error: {}", e);
        exit(1);
    }
}
