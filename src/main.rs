use clap::Parser;
use sedori::cli::command::Cli;
use sedori::cli::output;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = sedori::cli::run(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
