use actix_cors::Cors;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;
use std::sync::Arc;

use leavehub::database::init_database;
use leavehub::database::repositories::{
    HistoryStore, LeaveHistoryRepository, LeaveRepository, LeaveStore, UserRepository, UserStore,
};
use leavehub::routes;
use leavehub::services::notify::{HttpMailer, Notifier};
use leavehub::services::storage::{AttachmentStore, CloudMediaStore};
use leavehub::{AuthService, Config, LeaveHistoryLedger, LeaveQueryService, LeaveWorkflow};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("LeaveHub API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting LeaveHub API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    // Initialize repositories, external-service clients and services
    let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(pool.clone()));
    let leaves: Arc<dyn LeaveStore> = Arc::new(LeaveRepository::new(pool.clone()));
    let history: Arc<dyn HistoryStore> = Arc::new(LeaveHistoryRepository::new(pool.clone()));
    let notifier: Arc<dyn Notifier> = Arc::new(HttpMailer::new(config.mail.clone()));
    let attachments: Arc<dyn AttachmentStore> =
        Arc::new(CloudMediaStore::new(config.media_storage.clone()));

    let ledger = LeaveHistoryLedger::new(history);
    let workflow = LeaveWorkflow::new(
        leaves.clone(),
        users.clone(),
        ledger.clone(),
        attachments.clone(),
        notifier,
    );
    let queries = LeaveQueryService::new(leaves, users.clone());
    let auth_service = AuthService::new(config.clone(), users.clone());

    let users_data = web::Data::new(users);
    let attachments_data = web::Data::new(attachments);
    let ledger_data = web::Data::new(ledger);
    let workflow_data = web::Data::new(workflow);
    let queries_data = web::Data::new(queries);
    let auth_service_data = web::Data::new(auth_service);
    let config_data = web::Data::new(config.clone());
    let client_base_url = config.client_base_url.clone();

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(users_data.clone())
            .app_data(attachments_data.clone())
            .app_data(ledger_data.clone())
            .app_data(workflow_data.clone())
            .app_data(queries_data.clone())
            .app_data(auth_service_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
                    .max_age(3600),
            )
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
