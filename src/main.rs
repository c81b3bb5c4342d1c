use clap::Parser;
use delayer::infra::{Config, MainProgram};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let mut program = MainProgram::new(config)?;
    program.run().await
}
