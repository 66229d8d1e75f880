use {
    anyhow::Result,
    clap::Parser,
    coin_watch::{Cli, app},
    std::panic,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let args = Cli::parse();

    // Notices go through the log, so our own target stays at Info in release too
    let (global_level, my_code_level) = if args.verbose {
        (log::LevelFilter::Warn, log::LevelFilter::Debug)
    } else if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Info)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("coin_watch"), my_code_level)
        .format_target(false)
        .init();

    let services = app::Services::connect(&args).await?;
    app::run(args.command, services).await
}
