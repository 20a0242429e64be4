// src/main.rs

use pipegate::gate::Verdict;
use pipegate::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(Verdict::Pass) => {}
        Ok(Verdict::Fail) => std::process::exit(1),
        Err(err) => {
            eprintln!("pipegate error: {err:?}");
            std::process::exit(2);
        }
    }
}

async fn run_main() -> anyhow::Result<Verdict> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
