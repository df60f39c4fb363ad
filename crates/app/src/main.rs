// CLI modules
mod args;
mod logging;
mod op;
mod ops;
mod session;
mod state;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Bucket, Folders, Get, Init, Put, Tree, Version};

command_enum! {
    (Bucket, Bucket),
    (Folders, Folders),
    (Get, Get),
    (Init, Init),
    (Put, Put),
    (Tree, Tree),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let ctx = op::OpContext::new(args.config_path.clone());

    // explicit flag > config file > warn
    let log_level = args
        .log_level
        .clone()
        .or_else(|| ctx.state().ok().map(|state| state.config.log_level))
        .unwrap_or_else(|| "warn".to_string());
    let guard = logging::init_logging(&log_level);

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            tracing::debug!("command failed: {:?}", e);
            eprintln!("Error: {}", e);
            drop(guard);
            std::process::exit(1);
        }
    }
}
