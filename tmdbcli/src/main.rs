use anyhow::Result;
use clap::Parser;
use std::io;
use tmdb_core::{MovieSession, TmdbClient};
use tmdbcli::{Args, TmdbCliApp};

fn main() -> Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let args = Args::parse();

    let (config, settings) = args.load()?;
    let client = TmdbClient::new(args.api_key(&settings))?;

    let session = MovieSession::new(client, config, settings)?;
    let mut app = TmdbCliApp::new(session);

    if app.start(args.query.as_deref(), args.once, &mut io::stdout())? {
        app.run()?;
    }

    Ok(())
}
