//! Process entrypoint: wires config, persistence, and the actix-web/actix-ws routes
//! together and serves them, keyed on a `table:<id>` snapshot model.
mod bridge;
mod routes;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use table_persistence::{MemorySnapshots, NoopHistory, PostgresSnapshots};
use table_session::{Lobby, TableConfig};

/// CLI overrides for the two things an operator actually needs to flip per
/// deployment; everything else (blinds, timeouts, seat count) goes through
/// `TableConfig::from_env`.
#[derive(Parser, Debug)]
#[command(name = "table-server")]
struct Cli {
    /// Overrides BIND_ADDR, e.g. 0.0.0.0:8080.
    #[arg(long)]
    bind: Option<String>,
    /// Overrides DATABASE_URL. Without one, the server runs with in-memory
    /// snapshots and no hand-history recording -- fine for local play, not for a
    /// deployment that needs restart recovery: I/O failure is never fatal, but
    /// an operator should still know durability isn't wired up.
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    table_core::log();
    table_core::kys();
    table_core::brb();

    let cli = Cli::parse();
    let bind_addr = cli.bind.or_else(|| std::env::var("BIND_ADDR").ok()).unwrap_or_else(|| "0.0.0.0:8080".to_string());
    let database_url = cli.database_url.or_else(|| std::env::var("DATABASE_URL").ok());
    let config = TableConfig::from_env();

    match database_url {
        Some(url) => {
            log::info!("connecting to postgres for snapshot and history persistence");
            let (client, connection) = tokio_postgres::connect(&url, tokio_postgres::NoTls).await?;
            tokio::spawn(connection);
            let client = Arc::new(client);
            for migration in table_persistence::MIGRATIONS {
                client.batch_execute(migration).await?;
            }
            let snapshots = PostgresSnapshots::new(client.clone());
            let lobby = Arc::new(Lobby::new(config, snapshots, client));
            serve(lobby, bind_addr).await
        }
        None => {
            log::warn!("DATABASE_URL not set: running with in-memory snapshots, no restart recovery");
            let lobby = Arc::new(Lobby::new(config, MemorySnapshots::new(), NoopHistory));
            serve(lobby, bind_addr).await
        }
    }
}

async fn serve<S, H>(lobby: Arc<Lobby<S, H>>, bind_addr: String) -> anyhow::Result<()>
where
    S: table_persistence::SnapshotStore + Clone + Send + Sync + 'static,
    H: table_persistence::HistoryRepository + Clone + Send + Sync + 'static,
{
    log::info!("table-server listening on {bind_addr}");
    let data = web::Data::new(lobby);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .app_data(data.clone())
            .route("/tables", web::post().to(routes::create_table::<S, H>))
            .route("/tables/{id}/enter", web::get().to(routes::enter_table::<S, H>))
    })
    .workers(4)
    .bind(bind_addr)?
    .run()
    .await?;
    Ok(())
}
