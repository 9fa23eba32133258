use art_auction::config::Config;
use art_auction::web::app::run_app;
use env_logger::Env;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("art_auction=info,actix_web=info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    run_app(config).await
}
