use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{delete, get, post, put},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use std::sync::Arc;

use crate::{budgets, categories, goals, settings, statistics, transactions, users};
use engine::Engine;

static NGROK_SKIP_WARNING: HeaderName = HeaderName::from_static("ngrok-skip-browser-warning");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// An empty origin list allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("ignoring invalid CORS origin {origin:?}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            NGROK_SKIP_WARNING.clone(),
        ])
}

async fn index() -> &'static str {
    "CashWise API is running"
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/update-user", put(users::update))
        .route("/delete-user/{user_id}", delete(users::delete))
        .route("/getUserByID/{user_id}", get(users::by_id))
        .route("/userByEmail", get(users::by_email))
        .route("/getUserAndSettings", get(users::with_settings))
        .route(
            "/settings/toggle-dark-theme",
            post(settings::toggle_dark_theme),
        )
        .route(
            "/settings/toggle-terms-condition",
            post(settings::toggle_terms_condition),
        )
        .route("/settings/notification", post(settings::toggle_notification))
        .route("/create-category", post(categories::create))
        .route("/edit-category/{category_id}", put(categories::update))
        .route("/delete-category/{category_id}", delete(categories::delete))
        .route("/categories", get(categories::list))
        .route("/category", get(categories::by_name))
        .route("/get/category", get(categories::get))
        .route("/transaction", post(transactions::add))
        .route(
            "/transaction/{transaction_id}",
            put(transactions::edit).delete(transactions::delete),
        )
        .route("/transaction/getTotalIncome", get(statistics::total_income))
        .route("/transaction/getTotalExpense", get(statistics::total_expense))
        .route("/transaction/details", get(transactions::detail))
        .route("/transactions", get(transactions::list))
        .route("/transactions/balance", get(statistics::balance))
        .route("/transactions/filter", get(transactions::in_period))
        .route("/transactions-goal", get(transactions::by_kind))
        .route("/transactionsIcon", get(transactions::with_icons))
        .route("/budgets", post(budgets::create).get(budgets::list))
        .route(
            "/budgets/{budget_id}",
            get(budgets::get)
                .put(budgets::update)
                .delete(budgets::delete),
        )
        .route("/budgets/{budget_id}/check-limit", get(budgets::check_limit))
        .route("/goals", post(goals::create).get(goals::list))
        .route(
            "/goals/{goal_id}",
            put(goals::update).delete(goals::delete),
        )
        .route("/goals/{goal_id}/reminder", post(goals::send_reminder))
        .route("/goal-reminder", get(goals::reminder_due))
        .with_state(state)
}

/// The full application router, CORS included.
pub fn app(engine: Engine, allowed_origins: &[String]) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };
    router(state).layer(cors_layer(allowed_origins))
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
    allowed_origins: Vec<String>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, &allowed_origins)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
    allowed_origins: Vec<String>,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener, allowed_origins).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
