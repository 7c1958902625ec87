/// Interactive numbered menus of the command line application
pub mod cli_examples;
pub mod cli_main;
pub mod cli_settings;
/// help text shown from the main menu
pub mod law_help;
