use crate::Examples::law_examples::law_examples;
use crate::cli::cli_main::get_user_input;

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("\x1b[33m1. Mass action for a network without enzymes\x1b[0m");
        println!("\x1b[33m2. Enzyme kinetics (Michaelis-Menten, random order)\x1b[0m");
        println!("\x1b[33m3. Gene regulation (Hill equation)\x1b[0m");
        println!("\x1b[33m4. Stoichiometric rank and convenience kinetics\x1b[0m");
        println!("\x1b[33m5. Choosing a mechanism for one reaction\x1b[0m");
        println!("\x1b[33m0. Back to main menu\x1b[0m");
        let choice = get_user_input("Enter your choice: ");
        match choice.trim() {
            "1" => law_examples(0),
            "2" => law_examples(1),
            "3" => law_examples(2),
            "4" => law_examples(3),
            "5" => law_examples(4),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
