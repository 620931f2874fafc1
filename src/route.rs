//! Route definitions for the travel booking API
//!
//! Paths keep the browser client's contract: auth and catalog routes at the
//! root, bookings and profiles under `/api`, admin data under `/admin`.

use axum::http::Method;
use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::database::AppState;
use crate::handler::{
    activities, admin, bookings, content, destinations, favorites, health, insights, travels,
    users,
};
use crate::middleware::admin_guard;

/// Creates and configures the application router
///
/// # Route Definitions
///
/// - `POST /signup`, `POST /login`, `POST /admin/login`
/// - `PUT /api/users/{id}`
/// - `GET|POST /api/bookings`
/// - `GET /api/bookings/{id}` (id = user id), `PUT|DELETE /api/bookings/{id}` (id = booking id)
/// - `GET /api/booking/{id}`
/// - `GET /api/insights/{user_id}`
/// - `GET|POST /destinations`, `GET|PUT|DELETE /destinations/{id}`
/// - `POST /favorites`, `GET /favorites/{id}` (id = user id), `DELETE /favorites/{id}`
/// - `POST /activities`, `GET /activities/{user_id}`
/// - `GET|POST /images`, `GET|POST /pages`, `GET /pages/{slug}`
/// - `GET|POST /travels`
/// - `GET /admin/users|bookings|destinations`, `DELETE /admin/bookings/{id}` (guarded)
/// - `GET /health`
///
/// ```no_run
/// # use travelaura::config::Config;
/// # use travelaura::database::{init_db, AppState};
/// # use travelaura::route::create_app;
/// # let db = init_db("travelaura.db").unwrap();
/// let app = create_app(AppState::new(db, Config::default()));
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/users/{id}", put(users::update_profile))
        .route(
            "/bookings",
            get(bookings::list_all_bookings).post(bookings::create_booking),
        )
        .route(
            "/bookings/{id}",
            get(bookings::list_user_bookings)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/booking/{id}", get(bookings::get_booking))
        .route("/insights/{user_id}", get(insights::get_insights));

    let admin_data = Router::new()
        .route("/users", get(admin::list_users))
        .route("/bookings", get(admin::list_bookings))
        .route("/bookings/{id}", delete(admin::delete_booking))
        .route("/destinations", get(admin::list_destinations))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_guard));

    let admin_routes = Router::new()
        .route("/login", post(users::admin_login))
        .merge(admin_data);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .route(
            "/destinations",
            get(destinations::list_destinations).post(destinations::create_destination),
        )
        .route(
            "/destinations/{id}",
            get(destinations::get_destination)
                .put(destinations::update_destination)
                .delete(destinations::delete_destination),
        )
        .route("/favorites", post(favorites::add_favorite))
        .route(
            "/favorites/{id}",
            get(favorites::list_favorites).delete(favorites::remove_favorite),
        )
        .route("/activities", post(activities::log_activity))
        .route("/activities/{user_id}", get(activities::list_activities))
        .route(
            "/images",
            get(content::list_images).post(content::create_image),
        )
        .route("/pages", get(content::list_pages).post(content::create_page))
        .route("/pages/{slug}", get(content::get_page))
        .route(
            "/travels",
            get(travels::list_travels).post(travels::create_travel),
        )
        .nest("/api", api_routes)
        .nest("/admin", admin_routes)
        .layer(cors)
        .with_state(state)
}
