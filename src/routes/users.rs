use actix_web::web;

use crate::handlers::users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(users::create_user))
            .route("", web::get().to(users::get_all_users))
            .route("/filter", web::get().to(users::filter_users))
            .route(
                "/filter/by-manager/{id}",
                web::get().to(users::get_users_by_manager),
            )
            .route("/managers", web::get().to(users::get_managers))
            .route("/{id}", web::get().to(users::get_user))
            .route("/{id}", web::put().to(users::update_user))
            .route("/{id}", web::delete().to(users::delete_user)),
    );
}
