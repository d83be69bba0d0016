//! CLI entry point.

fn main() {
    if let Err(e) = pseudocod::cli::run_cli() {
        eprintln!("Eroare: {e}");
        std::process::exit(1);
    }
}
