//! HTTP handlers and route configuration.

mod health;
mod posts;
mod user;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/like", web::post().to(posts::like))
                    .route("/{id}/dislike", web::post().to(posts::dislike))
                    .route("/{id}/comments", web::post().to(posts::add_comment))
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::put().to(posts::edit_comment),
                    )
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::delete().to(posts::delete_comment),
                    ),
            )
            .service(web::scope("/user").route("/context", web::post().to(user::context))),
    );
}
