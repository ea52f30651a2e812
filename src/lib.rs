//! # Scanlings Ladder Backend
//!
//! Backend for the Scanlings mobile game. The substantive subsystem is the
//! deterministic turn-based battle resolver: given two rosters and a seed it
//! simulates a full multi-round fight and returns a winner plus a complete,
//! replayable turn log.
//!
//! ## Architecture
//!
//! The API is built on the Rocket web framework with OpenAPI documentation.
//! The archetype kit catalog is immutable, built once at startup and shared
//! behind an `Arc`; each battle resolution owns its own state and random
//! generator, so requests run concurrently without locking.

#[macro_use]
extern crate rocket;

use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};
use rocket_okapi::{openapi, openapi_get_routes, JsonSchema};
use std::sync::Arc;

pub mod battle;
pub mod catalog;
pub mod stats;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub ok: bool,
}

/// Liveness probe.
#[openapi]
#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Initializes and configures the Rocket web server with all routes and
/// OpenAPI documentation.
///
/// # Example
///
/// ```no_run
/// use scanlings_backend::rocket_initialize;
///
/// #[rocket::main]
/// async fn main() {
///     rocket_initialize().launch().await.expect("Failed to launch rocket");
/// }
/// ```
pub fn rocket_initialize() -> rocket::Rocket<rocket::Build> {
    use crate::battle::endpoints::ladder_battle;
    use crate::battle::endpoints::okapi_add_operation_for_ladder_battle_;
    use crate::catalog::list_kits;
    use crate::catalog::okapi_add_operation_for_list_kits_;
    use crate::okapi_add_operation_for_health_;

    let _ = env_logger::try_init();

    let catalog = Arc::new(catalog::Catalog::new());

    rocket::build()
        .mount("/", openapi_get_routes![health, list_kits, ladder_battle])
        .mount("/swagger", make_swagger_ui(&get_docs()))
        .manage(catalog)
        .manage(battle::Tuning::default())
}

fn get_docs() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/openapi.json".to_string(),
        ..Default::default()
    }
}
