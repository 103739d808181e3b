use clap::Parser;
use log::error;
use pmi_cosine::{Args, Pipeline};
use std::process::ExitCode;

// prints the ranked pairs to stdout, one per line:
// cosine, word, context, count(word), count(context), count(word, context), pmi
// logs go to stderr, RUST_LOG controls how much.

fn main() -> ExitCode {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match Pipeline::run(&args) {
        Ok(records) => {
            for record in &records {
                println!("{}", record);
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
