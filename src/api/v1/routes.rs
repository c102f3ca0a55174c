/*
 * Responsibility
 * - v1 URL structure
 * - Bind each protected operation to its required permission at
 *   registration time via the authorization gate
 */
use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    routing::{delete, get, patch, post},
};

use crate::api::v1::handlers::{drinks, health::health};
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/drinks", get(drinks::list_drinks))
        .route(
            "/drinks",
            post(drinks::create_drink).route_layer(middleware::from_fn_with_state(
                state.clone(),
                |state: State<AppState>, req: Request, next: Next| {
                    access::authorize(state, "post:drinks", req, next)
                },
            )),
        )
        .route(
            "/drinks-detail",
            get(drinks::list_drinks_detail).route_layer(middleware::from_fn_with_state(
                state.clone(),
                |state: State<AppState>, req: Request, next: Next| {
                    access::authorize(state, "get:drinks-detail", req, next)
                },
            )),
        )
        .route(
            "/drinks/{id}",
            patch(drinks::update_drink).route_layer(middleware::from_fn_with_state(
                state.clone(),
                |state: State<AppState>, req: Request, next: Next| {
                    access::authorize(state, "patch:drinks", req, next)
                },
            )),
        )
        .route(
            "/drinks/{id}",
            delete(drinks::delete_drink).route_layer(middleware::from_fn_with_state(
                state,
                |state: State<AppState>, req: Request, next: Next| {
                    access::authorize(state, "delete:drinks", req, next)
                },
            )),
        )
}
