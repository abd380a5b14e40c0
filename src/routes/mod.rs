use actix_web::web;

use crate::handlers::leaves as leave_handlers;

pub mod auth;
pub mod leave_history;
pub mod leaves;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route(
                "/attachments",
                web::post().to(leave_handlers::upload_attachment),
            )
            .configure(auth::configure)
            .configure(leaves::configure)
            .configure(leave_history::configure)
            .configure(users::configure),
    );
}
