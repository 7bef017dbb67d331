// src/bin/cli.rs
use outage_watch::cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let params = cli::parse_args(std::env::args().skip(1))?;
    if params.help {
        eprintln!("{}", cli::HELP);
        return Ok(());
    }
    cli::run(params).await
}
