use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use draftdeck::providers::{ImageProvider, TextProvider};
use draftdeck::themes::ThemeStore;
use draftdeck::{auth, db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Ensure data directory exists
    std::fs::create_dir_all("data").expect("Failed to create data directory");

    // Initialize database
    let pool = db::init_pool("data/app.db");
    db::run_migrations(&pool);

    // Provider stacks and theme catalog are shared across workers.
    let texts = web::Data::new(TextProvider::from_env());
    let images = web::Data::new(ImageProvider::from_env());
    let themes =
        web::Data::new(ThemeStore::open("data").expect("Failed to create theme directories"));

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(texts.clone())
            .app_data(images.clone())
            .app_data(themes.clone())
            // Public routes
            .route("/auth/register", web::post().to(handlers::auth_handlers::register))
            .route("/auth/login", web::post().to(handlers::auth_handlers::login))
            .route("/", web::get().to(|| async {
                actix_web::HttpResponse::Ok()
                    .json(serde_json::json!({ "message": "Document authoring API" }))
            }))
            // Theme upload takes a raw template body, so it sits outside
            // the JSON content-type guard (still behind auth).
            .service(
                web::scope("/themes")
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    .route("/upload", web::post().to(handlers::theme_handlers::upload))
                    .route("/{id}", web::delete().to(handlers::theme_handlers::delete))
                    .route("", web::get().to(handlers::theme_handlers::list)),
            )
            // Protected JSON routes
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(
                        auth::middleware::require_json_content_type,
                    ))
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    .route("/auth/logout", web::post().to(handlers::auth_handlers::logout))
                    .route("/auth/me", web::get().to(handlers::auth_handlers::me))
                    .route("/projects", web::get().to(handlers::project_handlers::list))
                    .route("/projects", web::post().to(handlers::project_handlers::create))
                    .route("/projects/{id}", web::get().to(handlers::project_handlers::read))
                    .route("/projects/{id}", web::delete().to(handlers::project_handlers::delete))
                    .route(
                        "/projects/{id}/generate",
                        web::post().to(handlers::section_handlers::generate),
                    )
                    .route(
                        "/projects/{id}/refine",
                        web::post().to(handlers::section_handlers::refine),
                    )
                    .route(
                        "/projects/{id}/feedback",
                        web::post().to(handlers::section_handlers::submit_feedback),
                    )
                    .route(
                        "/projects/{id}/export",
                        web::get().to(handlers::export_handlers::export),
                    )
                    .route(
                        "/ai/generate-template",
                        web::post().to(handlers::section_handlers::generate_template),
                    )
                    .route("/stats", web::get().to(handlers::project_handlers::stats)),
            )
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({ "error": "Not found" }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
