use axum::Router;
use axum::extract::Extension;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use taskpro_core::AppError;
use taskpro_domain::{Permission, Role};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{self, AccessRule};
use crate::state::AppState;

mod cors;


use cors::build_cors_layer;

const REPORT_PERMISSIONS: &[Permission] = &[Permission::ReportsView, Permission::ReportsExport];
const SETTINGS_ROLES: &[Role] = &[Role::Admin];

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let user_directory_routes = guarded(
        &app_state,
        AccessRule::Permission(Permission::UsersRead),
        Router::new().route("/api/users", get(handlers::users::list_users_handler)),
    );

    let role_routes = guarded(
        &app_state,
        AccessRule::Permission(Permission::UsersManageRoles),
        Router::new().route(
            "/api/users/{user_id}/role",
            put(handlers::users::change_role_handler),
        ),
    );

    let task_read_routes = guarded(
        &app_state,
        AccessRule::Permission(Permission::TasksRead),
        Router::new()
            .route("/api/tasks", get(handlers::tasks::list_tasks_handler))
            .route("/api/tasks/stats", get(handlers::tasks::task_stats_handler))
            .route("/api/tasks/{task_id}", get(handlers::tasks::get_task_handler)),
    );

    let task_create_routes = guarded(
        &app_state,
        AccessRule::Permission(Permission::TasksCreate),
        Router::new().route("/api/tasks", post(handlers::tasks::create_task_handler)),
    );

    let task_update_routes = guarded(
        &app_state,
        AccessRule::Permission(Permission::TasksUpdate),
        Router::new().route(
            "/api/tasks/{task_id}",
            put(handlers::tasks::update_task_handler),
        ),
    );

    let task_delete_routes = guarded(
        &app_state,
        AccessRule::Permission(Permission::TasksDelete),
        Router::new().route(
            "/api/tasks/{task_id}",
            delete(handlers::tasks::delete_task_handler),
        ),
    );

    let report_routes = guarded(
        &app_state,
        AccessRule::AnyPermission(REPORT_PERMISSIONS),
        Router::new().route(
            "/api/reports/summary",
            get(handlers::reports::report_summary_handler),
        ),
    );

    let admin_routes = guarded(
        &app_state,
        AccessRule::Roles(SETTINGS_ROLES),
        Router::new().route(
            "/api/admin/settings",
            get(handlers::admin::system_settings_handler),
        ),
    );

    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me_handler))
        .route(
            "/api/users/profile",
            get(handlers::users::profile_handler).put(handlers::users::update_profile_handler),
        )
        .route(
            "/api/users/password",
            put(handlers::users::change_password_handler),
        )
        .merge(user_directory_routes)
        .merge(role_routes)
        .merge(task_read_routes)
        .merge(task_create_routes)
        .merge(task_update_routes)
        .merge(task_delete_routes)
        .merge(report_routes)
        .merge(admin_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let cors_layer = build_cors_layer(frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/auth/register", post(handlers::auth::register_handler))
        .route("/api/auth/login", post(handlers::auth::login_handler))
        .route(
            "/api/auth/permissions",
            get(handlers::auth::permissions_handler),
        )
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}

/// Puts `routes` behind [`middleware::require_access`] with the given rule.
fn guarded(
    app_state: &AppState,
    rule: AccessRule,
    routes: Router<AppState>,
) -> Router<AppState> {
    routes
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_access,
        ))
        .layer(Extension(rule))
}
