//! API routes
//!
//! Public routes mint tokens; everything else sits behind the session
//! middleware, with a non-empty required-capability set declared per
//! protected route.

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{auth, flavors, ingredients, stores, users, webhooks};
use crate::middleware::{capability_guard, session_auth, RequiredCapabilities};
use crate::state::AppState;

const USER_READ: &[&str] = &["user:read", "self:read"];
const USER_WRITE: &[&str] = &["user:write", "self:write"];
const USER_ADMIN: &[&str] = &["user:write"];
const STORE_READ: &[&str] = &["store:read"];
const STORE_WRITE: &[&str] = &["store:write"];
const FLAVOR_READ: &[&str] = &["flavor:read"];
const FLAVOR_WRITE: &[&str] = &["flavor:write"];
const INGREDIENT_READ: &[&str] = &["ingredient:read"];

fn guarded(routes: Router<AppState>, required: &'static [&'static str]) -> Router<AppState> {
    routes.route_layer(from_fn_with_state(
        RequiredCapabilities(required),
        capability_guard,
    ))
}

/// Create the complete application router
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/v1/auth", post(auth::create_auth))
        .route("/auth/:token", get(auth::auth_by_token))
        .route("/webhooks/v1/sms/auth", post(webhooks::sms_auth_request));

    let user_reads = guarded(
        Router::new()
            .route("/api/v1/user", get(users::list_users))
            .route("/api/v1/user/:uuid", get(users::get_user)),
        USER_READ,
    );
    let user_writes = guarded(
        Router::new()
            .route("/api/v1/user", post(users::create_user))
            .route(
                "/api/v1/user/:uuid",
                patch(users::partial_update_user).delete(users::delete_user),
            ),
        USER_WRITE,
    );
    let user_admin = guarded(
        Router::new()
            .route("/api/v1/user/:uuid/permission", post(users::add_user_permission))
            .route(
                "/api/v1/user/:uuid/permission/:id",
                delete(users::remove_user_permission),
            ),
        USER_ADMIN,
    );

    let store_reads = guarded(
        Router::new()
            .route("/api/v1/store", get(stores::list_stores))
            .route("/api/v1/store/:id", get(stores::get_store)),
        STORE_READ,
    );
    let store_writes = guarded(
        Router::new()
            .route("/api/v1/store", post(stores::create_store))
            .route(
                "/api/v1/store/:id",
                put(stores::update_store).patch(stores::update_store),
            ),
        STORE_WRITE,
    );

    let flavor_reads = guarded(
        Router::new()
            .route("/api/v1/flavor", get(flavors::list_flavors))
            .route("/api/v1/flavor/:id", get(flavors::get_flavor)),
        FLAVOR_READ,
    );
    let flavor_writes = guarded(
        Router::new().route("/api/v1/flavor", post(flavors::create_flavor)),
        FLAVOR_WRITE,
    );

    let ingredient_reads = guarded(
        Router::new().route("/api/v1/ingredient", get(ingredients::list_ingredients)),
        INGREDIENT_READ,
    );

    let protected = user_reads
        .merge(user_writes)
        .merge(user_admin)
        .merge(store_reads)
        .merge(store_writes)
        .merge(flavor_reads)
        .merge(flavor_writes)
        .merge(ingredient_reads)
        .layer(from_fn_with_state(state.clone(), session_auth));

    Router::new().merge(public).merge(protected).with_state(state)
}
