mod cli;

use clap::Parser;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::execute(cli::Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
