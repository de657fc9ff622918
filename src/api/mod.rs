//! HTTP surface.

pub mod codes;
pub mod stores;
pub mod users;

use actix_web::web;

use crate::auth::handlers::{login, register};
use crate::health_check;

/// Registers every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/auth/token", web::post().to(login))
        .service(
            web::scope("/users")
                .route("", web::post().to(register))
                .route("/{id}/favorites", web::get().to(users::favorites))
                .route("/{id}/is_store_owner", web::get().to(users::is_store_owner))
                .route("/{id}/is_vaccinated", web::get().to(users::is_vaccinated)),
        )
        .service(
            web::scope("/stores")
                .service(
                    web::resource("")
                        .route(web::get().to(stores::list))
                        .route(web::post().to(stores::create)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(stores::retrieve))
                        .route(web::put().to(stores::update))
                        .route(web::delete().to(stores::destroy)),
                )
                .service(
                    web::resource("/{id}/retrieve_code")
                        .route(web::get().to(stores::retrieve_code))
                        .route(web::post().to(stores::retrieve_code)),
                )
                .route("/{id}/favorite", web::post().to(stores::favorite))
                .route("/{id}/get_store_patreons", web::get().to(stores::get_store_patreons)),
        )
        .service(
            web::scope("/codes")
                .route("", web::get().to(codes::list))
                .route("/{token}/enter", web::post().to(codes::enter))
                .route("/{token}/qr.png", web::get().to(codes::qr_png)),
        );
}
