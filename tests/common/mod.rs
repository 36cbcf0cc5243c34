use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::{web, App};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use tripsmith_api::middleware::auth::{AuthMiddleware, Claims};
use tripsmith_api::routes;
use tripsmith_api::services::generation_service::{GenerationError, TripGeneration};
use tripsmith_api::services::trip_service::TripStore;

/// Generation double: counts invocations and returns either a canned
/// completion or a canned provider failure.
pub struct StubGenerator {
    response: Option<String>,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn returning(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Some(response.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TripGeneration for StubGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => Err(GenerationError::ApiError(
                "stubbed provider failure".to_string(),
            )),
        }
    }
}

pub struct TestApp {
    pub store: TripStore,
}

impl TestApp {
    pub async fn new() -> Self {
        // The driver connects lazily, so building the store does not need
        // a running MongoDB; only tests that issue queries would.
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("parseable MongoDB URI");

        Self {
            store: TripStore::new(Arc::new(client)),
        }
    }

    pub fn create_app(
        &self,
        generator: Arc<StubGenerator>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let generator: Arc<dyn TripGeneration> = generator;

        App::new()
            .app_data(web::Data::from(generator))
            .app_data(web::Data::new(self.store.clone()))
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
    }
}

/// Sign a bearer token the way the identity provider would. Reads
/// JWT_SECRET with the same fallback as the middleware, so both sides
/// always agree on the key.
pub fn auth_token(user_id: &str, email: &str) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: email.to_string(),
        exp: (now + Duration::hours(1)).timestamp() as usize,
        iat: now.timestamp() as usize,
        user_id: user_id.to_string(),
    };

    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "default_secret".to_string());
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token encodes")
}
