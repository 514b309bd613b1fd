use console::style;
use promptforge_core::prompts::{AppCategory, Verbosity};

/// Handle the categories command
pub fn handle_categories_command() {
    println!("{}", style("Application categories").blue().bold());
    for category in AppCategory::ALL {
        println!("  {:<24} {}", style(category.slug()).bold(), category.label());
    }

    println!();
    println!("{}", style("Verbosity levels").blue().bold());
    for verbosity in Verbosity::ALL {
        let marker = if verbosity == Verbosity::default() {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {:<24} {}{marker}",
            style(verbosity.slug()).bold(),
            verbosity.clause()
        );
    }
}
