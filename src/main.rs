use KiLaw::cli::cli_main::{run_batch, run_interactive_menu};
use log::{LevelFilter, error};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};
use std::env;
use std::fs::File;

fn init_logging() {
    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    match File::create("kilaw.log") {
        Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Info, Config::default(), file)),
        Err(e) => eprintln!("cannot create kilaw.log: {}", e),
    }
    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("logger already initialised: {}", e);
    }
}

pub fn main() {
    init_logging();
    // kilaw <model.json> runs without the menu
    match env::args().nth(1) {
        Some(model_path) => {
            if let Err(e) = run_batch(&model_path) {
                error!("{}", e);
                std::process::exit(1);
            }
        }
        None => run_interactive_menu(),
    }
}
