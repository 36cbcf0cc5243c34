use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use tripsmith_api::db;
use tripsmith_api::middleware::auth::AuthMiddleware;
use tripsmith_api::routes;
use tripsmith_api::services::generation_service::{GroqClient, TripGeneration};
use tripsmith_api::services::trip_service::TripStore;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;

    let generator: Arc<dyn TripGeneration> =
        Arc::new(GroqClient::new().expect("GROQ_API_KEY must be set"));
    let trip_store = TripStore::new(client.clone());

    println!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::from(generator.clone()))
            .app_data(web::Data::new(trip_store.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::resource("/generate-trip")
                            .route(web::post().to(routes::trip::generate))
                            .default_service(web::route().to(routes::trip::method_not_allowed)),
                    )
                    .service(
                        web::scope("/trips")
                            .wrap(AuthMiddleware)
                            .route("", web::post().to(routes::trip::save_trip))
                            .route("", web::get().to(routes::trip::get_user_trips))
                            .route("/{id}", web::get().to(routes::trip::get_trip_by_id))
                            .route("/{id}", web::delete().to(routes::trip::delete_trip)),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
