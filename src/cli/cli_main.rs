use super::cli_examples::examples_menu;
use super::cli_settings::settings_menu;
use super::law_help::LAW_ENG_HELPER;
use crate::Kinetics::kinetic_error::KineticError;
use crate::Kinetics::law_generator::{GenerationReport, KineticLawGenerator};
use crate::Kinetics::model::Model;
use crate::settings::SettingsManager;
use log::{error, info};
use std::io::{self, Write};
use std::path::Path;

/// State of one interactive session.
struct Session {
    settings: SettingsManager,
    model: Option<Model>,
    report: Option<GenerationReport>,
}

impl Session {
    fn new() -> Self {
        Self {
            settings: SettingsManager::new(),
            model: None,
            report: None,
        }
    }

    fn load_model(&mut self) {
        let path = get_user_input("Enter model file path: ");
        match Model::from_json_file(path.trim()) {
            Ok(model) => {
                println!(
                    "Model {} loaded: {} species, {} reactions",
                    model.id,
                    model.species.len(),
                    model.reactions.len()
                );
                self.model = Some(model);
                self.report = None;
            }
            Err(e) => println!("\x1b[31m{}\x1b[0m", e),
        }
    }

    fn generate(&mut self) {
        let Some(model) = self.model.as_mut() else {
            println!("Load a model first.");
            return;
        };
        let mut generator = KineticLawGenerator::new(self.settings.options().clone());
        match generator.generate(model) {
            Ok(report) => {
                report.pretty_print_laws();
                self.report = Some(report);
            }
            Err(e) => println!("\x1b[31m{}\x1b[0m", e),
        }
    }

    fn with_report(&self, action: impl FnOnce(&GenerationReport)) {
        match &self.report {
            Some(report) => action(report),
            None => println!("Generate the kinetic laws first."),
        }
    }

    fn export_report(&self) {
        self.with_report(|report| {
            let path = get_user_input("Enter report file path: ");
            match report.save_json_file(path.trim()) {
                Ok(()) => println!("Report saved to {}", path.trim()),
                Err(e) => println!("\x1b[31m{}\x1b[0m", e),
            }
        });
    }

    fn save_model(&self) {
        let Some(model) = &self.model else {
            println!("Load a model first.");
            return;
        };
        let path = get_user_input("Enter file path for the model with kinetic laws: ");
        match model.save_json_file(path.trim()) {
            Ok(()) => println!("Model saved to {}", path.trim()),
            Err(e) => println!("\x1b[31m{}\x1b[0m", e),
        }
    }
}

pub fn run_interactive_menu() {
    let mut session = Session::new();
    loop {
        show_main_menu();
        let choice = get_user_input("Enter your choice: ");
        match choice.trim() {
            "1" => session.load_model(),
            "2" => settings_menu(&mut session.settings),
            "3" => session.generate(),
            "4" => session.with_report(|r| r.pretty_print_laws()),
            "5" => session.with_report(|r| r.pretty_print_odes()),
            "6" => session.export_report(),
            "7" => session.save_model(),
            "8" => examples_menu(),
            "9" => {
                println!("{}", LAW_ENG_HELPER);
                let _ = get_user_input("Press Enter to return to menu...");
            }
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

/// Non-interactive run: reads the model, generates the laws with the settings found in the
/// working directory, prints the tables and writes `<model>_kinetics.json` next to the model.
pub fn run_batch(model_path: &str) -> Result<(), KineticError> {
    let settings = SettingsManager::new();
    let mut model = Model::from_json_file(model_path)?;
    let mut generator = KineticLawGenerator::new(settings.options().clone());
    let report = generator.generate(&mut model)?;
    report.pretty_print_laws();
    report.pretty_print_odes();

    let path = Path::new(model_path);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "model".to_string());
    let output = path.with_file_name(format!("{}_kinetics.json", stem));
    model.save_json_file(&output)?;
    info!("model with kinetic laws written to {}", output.display());
    if !report.failures.is_empty() {
        error!("{} reactions without kinetic law", report.failures.len());
    }
    Ok(())
}

/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - prompts

Red (\x1b[31m) - errors

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to KiLaw: kinetic laws and ODEs for reaction networks \n \x1b[0m"
    );
    println!("\x1b[33m1. Load model (JSON)\x1b[0m");
    println!("\x1b[33m2. Settings\x1b[0m");
    println!("\x1b[33m3. Generate kinetic laws\x1b[0m");
    println!("\x1b[33m4. Show kinetic laws\x1b[0m");
    println!("\x1b[33m5. Show ODEs\x1b[0m");
    println!("\x1b[33m6. Export report (JSON)\x1b[0m");
    println!("\x1b[33m7. Save model with kinetic laws (JSON)\x1b[0m");
    println!("\x1b[33m8. Examples\x1b[0m");
    println!("\x1b[33m9. Help\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
}

/// Prints the prompt and reads one line; a failed read gives an empty line.
pub(crate) fn get_user_input(prompt: &str) -> String {
    print!("\x1b[36m{}\x1b[0m", prompt);
    let _ = io::stdout().flush();
    let mut input = String::new();
    if let Err(e) = io::stdin().read_line(&mut input) {
        error!("failed to read input: {}", e);
    }
    input
}
