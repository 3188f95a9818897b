// API route configuration

use actix_web::web;

use crate::api::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(handlers::health_check))
        .route("/", web::get().to(handlers::health_check))
        .service(
            web::scope("/lego")
                .route("", web::get().to(handlers::list_inventory))
                .route("", web::post().to(handlers::create_row))
                // Must register before the `{code}` catch-all.
                .route("/options", web::get().to(handlers::distinct_options))
                .route("/{code}", web::get().to(handlers::search_by_code))
                .route("/{id}", web::put().to(handlers::update_row))
                .route("/{id}", web::delete().to(handlers::delete_row)),
        );
}
