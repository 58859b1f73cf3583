#![deny(rust_2018_idioms, unsafe_code)]

use cud_engine::{cli::CliCommand, context::EngineContext, error::EngineError, logger::Logger, opt::EngineOpt};
use std::{error::Error, process};
use structopt::StructOpt;

type AnyError = Box<dyn Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    return main().await.map_err(|err| {
        tracing::info!("Encountered error during initialization:");

        if let Err(render_err) = err.render_as_json() {
            eprintln!("{render_err}");
        }

        process::exit(1)
    });

    async fn main() -> Result<(), EngineError> {
        let opts = EngineOpt::from_args();

        let mut logger = Logger::new("cud-engine");
        logger.log_format(opts.log_format);
        logger.log_level(opts.log_level.clone());

        if let Err(err) = logger.install() {
            eprintln!("Could not install the logger: {err}");
        }

        user_facing_errors::set_panic_hook("cud-engine");

        let cx = EngineContext::load(&opts)?;
        let output = CliCommand::from_opt(&opts)?.execute(&cx).await?;

        println!("{output}");

        Ok(())
    }
}
