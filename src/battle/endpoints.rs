//! HTTP surface for ladder battles.

use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};
use std::sync::Arc;

use crate::catalog::Catalog;

use super::resolve::resolve_battle;
use super::tuning::Tuning;
use super::types::{validate_teams, BattleRequest, BattleResult};

/// Stable machine-readable error body for rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub error: String,
}

/// Resolve a ladder battle between two rosters.
///
/// Rosters are validated here; the resolver itself never rejects input.
/// Without an explicit `seed` the server rolls a random one, which is
/// echoed back in the result for replay.
#[openapi]
#[post("/v1/ladder/battle", format = "json", data = "<request>")]
pub async fn ladder_battle(
    request: Json<BattleRequest>,
    catalog: &State<Arc<Catalog>>,
    tuning: &State<Tuning>,
) -> Result<Json<BattleResult>, BadRequest<Json<ErrorBody>>> {
    let request = request.into_inner();

    if let Err(code) = validate_teams(&request.my_team, &request.opponent_team) {
        log::warn!("rejected ladder battle request: {code}");
        return Err(BadRequest(Json(ErrorBody { error: code })));
    }

    let seed = request.seed.unwrap_or_else(rand::random::<u32>);
    let result = resolve_battle(
        catalog,
        tuning,
        &request.my_team,
        &request.opponent_team,
        seed,
    );
    log::info!(
        "ladder battle {} resolved: winner={} reason={:?} end_turn={} seed={}",
        result.battle_id,
        result.winner.prefix(),
        result.winner_reason,
        result.end_turn,
        seed,
    );
    Ok(Json(result))
}
