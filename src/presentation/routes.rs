use crate::presentation::handlers::{create_user, health_check, list_users, render_page};
use actix_files::Files;
use actix_web::web;
use std::path::Path;

pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .route("/users", web::get().to(list_users))
            .route("/users", web::post().to(create_user)),
    );
}

/// API first, then the public directory at the site root, then the
/// rendered page for every other GET path.
pub fn configure(cfg: &mut web::ServiceConfig, public_dir: Option<&Path>) {
    api_routes(cfg);
    match public_dir {
        // Files win, misses fall through to the page renderer. "/" itself
        // is the public dir, so it is routed explicitly.
        Some(dir) => {
            cfg.route("/", web::get().to(render_page));
            cfg.service(Files::new("/", dir).default_handler(web::to(render_page)));
        }
        None => {
            cfg.route("/{tail:.*}", web::get().to(render_page));
        }
    }
}
