//! Console output helpers.

use colored::Colorize;

/// Print an error with its cause chain.
pub fn print_error(error: &anyhow::Error) {
    eprintln!("{} {error}", "Error!".red().bold());
    for cause in error.chain().skip(1) {
        eprintln!("  {} {cause}", "Caused by:".yellow());
    }
}

/// Print a bare error line.
pub fn print_error_line(message: &str) {
    eprintln!("{} {message}", "Error!".red().bold());
}

/// Print controller names three per row, the way the desktop tool does.
pub fn print_controllers(controllers: &[String]) {
    if controllers.is_empty() {
        println!("{}", "No controller connected.".yellow());
        return;
    }
    for (i, name) in controllers.iter().enumerate() {
        print!(" {name}");
        if (i + 1) % 3 == 0 {
            println!();
        } else {
            print!(" \t");
        }
    }
    if controllers.len() % 3 != 0 {
        println!();
    }
}
