use crate::cli::cli_main::get_user_input;
use crate::settings::SettingsManager;
use prettytable::{Cell, Row, Table};

fn print_settings(manager: &SettingsManager) {
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("key"), Cell::new("value")]));
    for (key, value) in manager.options().entries() {
        table.add_row(Row::new(vec![Cell::new(key), Cell::new(&value)]));
    }
    table.printstd();
    println!("settings file: {}", manager.settings_file());
}

pub fn settings_menu(manager: &mut SettingsManager) {
    loop {
        println!("\n=== Settings ===");
        println!("\x1b[33m1. Show settings\x1b[0m");
        println!("\x1b[33m2. Change a setting\x1b[0m");
        println!("\x1b[33m3. Save settings\x1b[0m");
        println!("\x1b[33m4. Reload settings from file\x1b[0m");
        println!("\x1b[33m5. Reset to defaults\x1b[0m");
        println!("\x1b[33m6. Export settings to JSON\x1b[0m");
        println!("\x1b[33m7. Import settings from JSON\x1b[0m");
        println!("\x1b[33m0. Back to main menu\x1b[0m");
        let choice = get_user_input("Enter your choice: ");
        match choice.trim() {
            "1" => print_settings(manager),
            "2" => {
                let key = get_user_input("Enter key: ");
                let value = get_user_input("Enter value: ");
                if manager.options_mut().apply_entry(key.trim(), value.trim()) {
                    println!("{} set to {}", key.trim(), value.trim());
                } else {
                    println!("\x1b[31mUnknown key or bad value\x1b[0m");
                }
            }
            "3" => match manager.save() {
                Ok(()) => println!("Settings saved to {}", manager.settings_file()),
                Err(e) => println!("\x1b[31m{}\x1b[0m", e),
            },
            "4" => match manager.load() {
                Ok(()) => print_settings(manager),
                Err(e) => println!("\x1b[31m{}\x1b[0m", e),
            },
            "5" => {
                manager.reset_to_defaults();
                print_settings(manager);
            }
            "6" => {
                let path = get_user_input("Enter file path: ");
                match manager.export_json(path.trim()) {
                    Ok(()) => println!("Settings exported to {}", path.trim()),
                    Err(e) => println!("\x1b[31m{}\x1b[0m", e),
                }
            }
            "7" => {
                let path = get_user_input("Enter file path: ");
                match manager.import_json(path.trim()) {
                    Ok(()) => print_settings(manager),
                    Err(e) => println!("\x1b[31m{}\x1b[0m", e),
                }
            }
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
