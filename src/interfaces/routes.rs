use actix_web::web;

use crate::handlers::{contact, home, system};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(home::home)
            .service(system::health_check)
            .service(web::resource("/csrf-token").route(web::get().to(contact::issue_csrf_token)))
            .service(
                web::resource("/contact")
                    .route(web::post().to(contact::submit_contact))
                    // Anything but POST on the resource is answered with a
                    // JSON 405 instead of actix's bare default.
                    .route(web::route().to(contact::method_not_allowed)),
            ),
    );
}
