//! confgate entry point
//!
//! A minimal entrypoint: parse arguments and run the server via cli::run,
//! printing errors to stderr and exiting non-zero on failure.

#[tokio::main]
async fn main() {
    if let Err(e) = confgate::cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
