//! dalias binary entry point.

fn main() {
    if let Err(err) = domain_alias::cli::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
