//! HTTP route handlers: `POST /tables` creates a table, `GET /tables/{id}/enter`
//! upgrades to the websocket the rest of the session plays out over.
use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use table_persistence::{HistoryRepository, SnapshotStore, TableKey};
use table_session::Lobby;

use crate::bridge::bridge;

pub async fn create_table<S, H>(lobby: web::Data<Arc<Lobby<S, H>>>) -> impl Responder
where
    S: SnapshotStore + Clone + Send + Sync + 'static,
    H: HistoryRepository + Clone + Send + Sync + 'static,
{
    match lobby.start().await {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({ "table_id": id.to_string() })),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

pub async fn enter_table<S, H>(
    lobby: web::Data<Arc<Lobby<S, H>>>,
    path: web::Path<TableKey>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder
where
    S: SnapshotStore + Clone + Send + Sync + 'static,
    H: HistoryRepository + Clone + Send + Sync + 'static,
{
    let id = path.into_inner();
    let Some(handle) = lobby.handle(id).await else {
        return HttpResponse::NotFound().body("no such table").map_into_right_body();
    };
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            actix_web::rt::spawn(bridge(id, handle, session, stream));
            response.map_into_left_body()
        }
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()).map_into_right_body(),
    }
}
