//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::common::auth::{
    AdminAllowList, Gate, GateDeps, IdentityResolver, JwtIdentityResolver, Predicate::*,
};
use crate::common::fiscal_year::FiscalYear;
use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::{BaseMemberDirectory, PgMemberDirectory, TimedDirectory};
use crate::server::middleware::{guard, identity_middleware};
use crate::server::routes::{groups, health_handler, officers, payments, users};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub gate_deps: GateDeps,
}

impl AppState {
    pub fn new(db_pool: PgPool, gate_deps: GateDeps) -> Self {
        Self { db_pool, gate_deps }
    }

    /// Start of the current fiscal year (payments and "current" members)
    pub fn cycle_start(&self) -> DateTime<Utc> {
        self.gate_deps.fiscal_year.start_for(Utc::now())
    }
}

/// Gate collaborators backed by Postgres, each read bounded by the
/// configured timeout
pub fn gate_deps_from_config(pool: PgPool, config: &Config) -> Result<GateDeps> {
    let directory: Arc<dyn BaseMemberDirectory> = Arc::new(TimedDirectory::new(
        Arc::new(PgMemberDirectory::new(pool)),
        config.directory_read_timeout,
    ));

    let allow_list = AdminAllowList::from_csv(&config.init_admins);
    if allow_list.is_empty() {
        warn!("INIT_ADMINS is empty; only officer grants confer admin rights");
    } else {
        info!(count = allow_list.len(), "Loaded initial admin allow-list");
    }

    let fiscal_year = FiscalYear::new(config.fiscal_year_utc_offset_hours)
        .context("Invalid FISCAL_YEAR_UTC_OFFSET_HOURS")?;

    Ok(GateDeps::new(directory, allow_list, fiscal_year))
}

/// Build the API router (no rate limiting)
pub fn build_router(
    state: AppState,
    identity_resolver: Arc<dyn IdentityResolver>,
    allowed_origins: &[String],
) -> Router {
    let deps = state.gate_deps.clone();

    let user_routes = Router::new()
        .route("/api/user/admin", get(users::is_admin))
        .route(
            "/api/user",
            guard(post(users::create_member), Gate::new([Authenticated, IsNotRegistered]), &deps)
                .merge(guard(get(users::get_me), Gate::new([IsApproved]), &deps)),
        )
        .route(
            "/api/user/state",
            guard(get(users::my_state), Gate::new([Authenticated]), &deps),
        )
        .route(
            "/api/users",
            guard(get(users::list_members), Gate::new([IsApproved]), &deps),
        )
        .route(
            "/api/users/detail",
            guard(get(users::list_roster), Gate::new([IsAdmin]), &deps),
        )
        .route("/api/users/payee", get(users::list_payees))
        .route(
            "/api/user/:id",
            guard(get(users::get_member), Gate::new([IsApproved]), &deps)
                .merge(guard(put(users::update_member), Gate::new([IsSelfOrAdmin]), &deps))
                .merge(guard(delete(users::delete_member), Gate::new([IsAdmin]), &deps)),
        )
        .route(
            "/api/user/:id/detail",
            guard(
                get(users::get_member_detail),
                Gate::new([IsApproved, IsSelfOrAdmin]),
                &deps,
            ),
        )
        .route(
            "/api/user/:id/state",
            guard(get(users::member_state), Gate::new([IsSelfOrAdmin]), &deps),
        )
        .route(
            "/api/user/:id/approve",
            guard(post(users::approve_member), Gate::new([IsAdmin]), &deps),
        )
        .route(
            "/api/user/:id/continue",
            guard(
                post(users::continue_member),
                Gate::new([IsSelfOrAdmin, IsDeactivated]),
                &deps,
            ),
        );

    let officer_routes = Router::new().route(
        "/api/user/:id/officer",
        guard(post(officers::grant_officer), Gate::new([IsAdmin]), &deps)
            .merge(guard(delete(officers::revoke_officer), Gate::new([IsAdmin]), &deps)),
    );

    let payment_routes = Router::new()
        .route(
            "/api/user/:id/payment",
            guard(
                post(payments::record_payment),
                Gate::new([IsAdmin, UserNotPaid]),
                &deps,
            ),
        )
        .route(
            "/api/user/:id/payment/confirm",
            guard(
                post(payments::confirm_payment),
                Gate::new([IsAdmin, UserPaidAndNotConfirmed]),
                &deps,
            )
            .merge(guard(
                delete(payments::cancel_confirmation),
                Gate::new([IsAdmin]),
                &deps,
            )),
        );

    let group_routes = Router::new()
        .route(
            "/api/groups",
            guard(get(groups::list_groups), Gate::new([IsAdmin]), &deps)
                .merge(guard(post(groups::create_group), Gate::new([IsAdmin]), &deps)),
        )
        .route(
            "/api/group/:id",
            guard(delete(groups::delete_group), Gate::new([IsAdmin]), &deps),
        )
        .route(
            "/api/group/:id/members",
            guard(post(groups::add_group_members), Gate::new([IsAdmin]), &deps)
                .merge(guard(delete(groups::remove_group_members), Gate::new([IsAdmin]), &deps)),
        );

    Router::new()
        .route("/health", get(health_handler))
        .merge(user_routes)
        .merge(officer_routes)
        .merge(payment_routes)
        .merge(group_routes)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            identity_middleware(identity_resolver.clone(), req, next)
        }))
        .layer(Extension(state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Build the production application: router plus per-IP rate limiting
pub fn build_app(pool: PgPool, config: &Config) -> Result<Router> {
    let gate_deps = gate_deps_from_config(pool.clone(), config)?;
    let state = AppState::new(pool, gate_deps);

    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_issuer.clone());
    let identity_resolver: Arc<dyn IdentityResolver> =
        Arc::new(JwtIdentityResolver::new(jwt_service));

    // 10 requests per second per IP with bursts up to 20
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers()
            .finish()
            .context("Invalid rate limiter configuration")?,
    );

    let router = build_router(state, identity_resolver, &config.allowed_origins);

    Ok(router.layer(GovernorLayer {
        config: rate_limit_config,
    }))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}
