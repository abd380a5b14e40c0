use actix_web::web;

use crate::handlers::leave_history;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leave-history")
            .route("/{id}", web::get().to(leave_history::get_leave_history)),
    );
}
