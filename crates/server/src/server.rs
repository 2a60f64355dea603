use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
    typed_header::TypedHeaderRejection,
};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use std::{path::PathBuf, sync::Arc};

use crate::{ServerError, accounts, categories, dashboard, export, financials, subcategories};
use engine::{Engine, EngineError, PageRequest};

/// HTTP-level settings handed over by the binary.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the binary binds the listener to, e.g. `127.0.0.1:3000`.
    pub addr: String,
    /// Zone used to decide which calendar day "today" is for the dashboard.
    pub timezone: Tz,
    /// Directory `/export` writes into, one `export-{user_id}.csv` per tenant.
    pub export_dir: PathBuf,
    /// `limit` used when a listing request omits it.
    pub default_page_size: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
            timezone: Tz::UTC,
            export_dir: PathBuf::from("."),
            default_page_size: 20,
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub config: Arc<ServerConfig>,
}

impl ServerState {
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.config.timezone).date_naive()
    }

    pub fn page(&self, page: Option<u64>, limit: Option<u64>) -> PageRequest {
        PageRequest {
            page: page.unwrap_or(0),
            limit: limit.unwrap_or(self.config.default_page_size),
        }
    }
}

/// The authenticated user every handler acts for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tenant {
    pub id: i64,
}

/// Reject ids that can never match a row before touching the store.
pub(crate) fn positive_id(name: &str, id: i64) -> Result<i64, ServerError> {
    if id <= 0 {
        return Err(ServerError::Generic(format!("{name} must be positive")));
    }
    Ok(id)
}

async fn auth(
    auth_header: Result<TypedHeader<Authorization<Basic>>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Ok(TypedHeader(credentials)) = auth_header else {
        return Err(EngineError::Unauthorized.into());
    };
    if credentials.username().is_empty() || credentials.password().is_empty() {
        return Err(EngineError::Unauthorized.into());
    }

    let user = match state
        .engine
        .authenticate(credentials.username(), credentials.password())
        .await
    {
        Ok(user) => user,
        Err(EngineError::Unauthorized) => {
            tracing::warn!(username = credentials.username(), "rejected credentials");
            return Err(EngineError::Unauthorized.into());
        }
        Err(err) => return Err(err.into()),
    };

    request.extensions_mut().insert(Tenant { id: user.id });
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/accounts",
            get(accounts::list)
                .post(accounts::create)
                .delete(accounts::delete),
        )
        .route("/dashboard", get(dashboard::get))
        .route(
            "/financials",
            get(financials::list)
                .post(financials::create)
                .delete(financials::delete),
        )
        .route(
            "/categories",
            get(categories::list)
                .post(categories::create)
                .delete(categories::delete),
        )
        .route(
            "/subcategories",
            get(subcategories::list)
                .post(subcategories::create)
                .delete(subcategories::delete),
        )
        .route("/export", get(export::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        config: Arc::new(config),
    };

    axum::serve(listener, router(state)).await
}
