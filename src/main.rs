use goodguide::config::Config;
use goodguide::db::PgPool;
use goodguide::engine::Engine;
use goodguide::error::Error;
use goodguide::external::backend;
use goodguide::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::load()?;

    let PgPool(pool) = PgPool::new(&config.database_url, config.database_max_connections).await?;
    let backend = backend::Client::new(&config.backend_url, config.backend_timeout)?;

    let engine = Engine::new(pool, backend).await?;

    serve(engine, config.listen_addr).await
}
