use std::process;

fn main() {
    if let Err(e) = cfg_analyzer::cli::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
