use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
    RequestExt,
};
use chrono::Utc;
use tracing::warn;

use crate::common::auth::{Gate, GateContext, GateDeps, GateMemo, Identity};

/// Gate middleware
///
/// Evaluates `gate` before the handler. On failure the error envelope is
/// returned and the handler never runs. The memo is carried in the request
/// extensions so a second gate layer on the same request reuses its facts.
pub async fn gate_middleware(
    gate: Arc<Gate>,
    deps: GateDeps,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = request.extensions().get::<Identity>().cloned();
    let params = request
        .extract_parts::<Path<HashMap<String, String>>>()
        .await
        .map(|Path(params)| params)
        .unwrap_or_default();
    let mut memo = request
        .extensions_mut()
        .remove::<GateMemo>()
        .unwrap_or_default();

    let result = {
        let mut ctx = GateContext::new(identity.as_ref(), &params, &deps, Utc::now(), &mut memo);
        gate.evaluate(&mut ctx).await
    };

    if let Err(kind) = result {
        warn!(
            path = %request.uri().path(),
            code = kind.report().code,
            "Request rejected by gate"
        );
        return kind.into_response();
    }

    request.extensions_mut().insert(memo);
    next.run(request).await
}

/// Attach a gate to one route
pub fn guard<S>(route: MethodRouter<S>, gate: Gate, deps: &GateDeps) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let gate = Arc::new(gate);
    let deps = deps.clone();
    route.route_layer(middleware::from_fn(move |request: Request, next: Next| {
        gate_middleware(gate.clone(), deps.clone(), request, next)
    }))
}
