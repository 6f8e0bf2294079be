//! Binary entrypoint for the Cinedrop CLI.

#[tokio::main]
async fn main() {
    std::process::exit(cinedrop_cli::run().await);
}
