use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use clap::Parser;
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use tokio::task::JoinError;
use tower::make::Shared;
use tracing::{debug, error, info};

use super::{cors::Cors, response::*};
use crate::ccd::{CcdError, ConfigDir};

const FULL_LISTING: &str = "_full";

pub type App = Cors<Router>;

async fn index() -> String {
    format!("{} ({})", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

async fn ping() -> &'static str {
    "true"
}

async fn users(Extension(ccd): Extension<Arc<ConfigDir>>) -> Response {
    let res = tokio::task::spawn_blocking(move || ccd.list_files()).await;
    reply(res, DIRECTORY_NOT_FOUND)
}

async fn user(Path(user): Path<String>, Extension(ccd): Extension<Arc<ConfigDir>>) -> Response {
    if user == FULL_LISTING {
        let res = tokio::task::spawn_blocking(move || ccd.list_files_with_records()).await;
        return reply(res, DIRECTORY_NOT_FOUND);
    }

    let res = tokio::task::spawn_blocking(move || ccd.get_record(&user)).await;
    reply(res, USER_RETRIEVE_ERROR)
}

fn reply<T: Serialize>(
    res: Result<Result<T, CcdError>, JoinError>,
    not_found: &'static str,
) -> Response {
    match res {
        Ok(Ok(body)) => PrettyJson(body).into_response(),
        Ok(Err(e)) => {
            debug!("request failed: {e}");
            (
                StatusCode::NOT_FOUND,
                PrettyJson(ErrorResponse { error: not_found }),
            )
                .into_response()
        }
        Err(e) => {
            error!("blocking task failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[derive(Debug, Parser)]
pub struct Config {
    #[clap(
        long,
        short,
        env = "LISTEN_ADDR",
        value_parser,
        default_value = "0.0.0.0:3000"
    )]
    listen_addr: SocketAddr,
}

/// All routes, wrapped so that every response (unmatched paths included) carries the CORS headers.
pub fn router(ccd: ConfigDir) -> App {
    // "/users/_full" is dispatched inside `user` so it can't clash with the :user capture
    let routes = Router::new()
        .route("/", get(index))
        .route("/_ping", get(ping))
        .route("/users", get(users))
        .route("/users/:user", get(user))
        .layer(Extension(Arc::new(ccd)));

    Cors::new(routes)
}

pub async fn start(
    config: Config,
    ccd: ConfigDir,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!(
        "serving {dir:?} on {addr}",
        dir = ccd.path(),
        addr = config.listen_addr
    );

    axum::Server::bind(&config.listen_addr)
        .serve(Shared::new(router(ccd)))
        .await?;
    Ok(())
}
