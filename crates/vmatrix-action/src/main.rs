//! Binary entrypoint for the version matrix action.
use clap::Parser;
use std::process::ExitCode;
use vmatrix_action::{run, Cli, GithubOutput};
use vmatrix_core::OutputSink;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    vmatrix_action::init_tracing(cli.verbose);

    let mut sink = GithubOutput::new(cli.output.clone());
    match run(&cli, &mut sink).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{:#}", error);
            sink.fail(&format!("{:#}", error));
            ExitCode::FAILURE
        }
    }
}
