use actix_web::{HttpResponse, Responder, get};

#[get("")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Flowbit marketing site API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "website": "https://flowbit.pl",
        "endpoints": {
            "contact": "/api/contact",
            "csrf_token": "/api/csrf-token",
            "health": "/api/health"
        }
    }))
}
