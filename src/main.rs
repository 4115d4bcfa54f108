fn main() {
    if let Err(e) = governance_power::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
