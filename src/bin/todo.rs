use clap::Parser;
use todo_list::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let verbose = cli.verbose;
    todo_list::telemetry::init(verbose);

    if let Err(e) = todo_list::cli::run(cli).await {
        if verbose {
            eprintln!("Error: {e:?}");
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    Ok(())
}
