use actix_web::web;

use crate::handlers::leaves;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leaves")
            .route("", web::post().to(leaves::create_leave))
            .route("", web::get().to(leaves::get_my_leaves))
            .route("/filter/all", web::get().to(leaves::get_all_leaves))
            .route(
                "/filter/team/{manager_id}",
                web::get().to(leaves::get_team_leaves),
            )
            .route("/{id}", web::get().to(leaves::get_leave))
            .route("/{id}", web::put().to(leaves::update_leave))
            .route("/{id}/approve", web::put().to(leaves::approve_leave))
            .route("/{id}/decline", web::put().to(leaves::decline_leave))
            .route("/{id}", web::delete().to(leaves::delete_leave)),
    );
}
