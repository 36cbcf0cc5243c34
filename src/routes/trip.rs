use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::middleware::auth::Claims;
use crate::models::trip::{GenerateTripInput, SaveTripInput, SavedTripResponse};
use crate::services::generation_service::TripGeneration;
use crate::services::normalizer;
use crate::services::prompt_service;
use crate::services::trip_service::{TripStore, TripStoreError};

/*
    POST /api/generate-trip
*/
pub async fn generate(
    generator: web::Data<dyn TripGeneration>,
    input: web::Json<GenerateTripInput>,
) -> impl Responder {
    // Reject incomplete requests before spending a model call.
    let request = match input.into_inner().into_request() {
        Some(request) => request,
        None => {
            return HttpResponse::BadRequest().json(json!({ "error": "Missing required fields" }))
        }
    };

    let prompt = prompt_service::build_prompt(&request);

    let raw = match generator.complete(&prompt).await {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("Error generating trip: {}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to generate trip" }));
        }
    };

    // A parse failure is a sampling artifact, not an outage; the distinct
    // status lets the frontend suggest an immediate retry.
    match normalizer::normalize_plan(&raw) {
        Ok(trip_data) => HttpResponse::Ok().json(json!({ "success": true, "tripData": trip_data })),
        Err(err) => {
            eprintln!("Error parsing model output: {}", err);
            HttpResponse::BadGateway()
                .json(json!({ "error": "AI returned invalid JSON. Please try again." }))
        }
    }
}

pub async fn method_not_allowed() -> impl Responder {
    HttpResponse::MethodNotAllowed().json(json!({ "error": "Method not allowed" }))
}

/*
    POST /api/trips
*/
pub async fn save_trip(
    claims: web::ReqData<Claims>,
    store: web::Data<TripStore>,
    input: web::Json<SaveTripInput>,
) -> impl Responder {
    let input = input.into_inner();

    match store
        .create(
            input.trip_data,
            input.user_selection,
            &claims.user_id,
            &claims.sub,
        )
        .await
    {
        Ok(id) => HttpResponse::Ok().json(SavedTripResponse { id }),
        Err(err) => {
            eprintln!("Failed to save trip: {}", err);
            HttpResponse::InternalServerError().body("Failed to save trip")
        }
    }
}

/*
    GET /api/trips
*/
pub async fn get_user_trips(
    claims: web::ReqData<Claims>,
    store: web::Data<TripStore>,
) -> impl Responder {
    match store.list_by_owner(&claims.user_id).await {
        Ok(trips) => HttpResponse::Ok().json(trips),
        Err(err) => {
            eprintln!("Failed to list trips: {}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve trips")
        }
    }
}

/*
    GET /api/trips/{id}
*/
pub async fn get_trip_by_id(
    path: web::Path<String>,
    store: web::Data<TripStore>,
) -> impl Responder {
    match store.get_by_id(&path.into_inner()).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(TripStoreError::InvalidId(_)) => HttpResponse::BadRequest().body("Invalid trip ID"),
        Err(TripStoreError::NotFound) => HttpResponse::NotFound().body("Trip not found"),
        Err(err) => {
            eprintln!("Failed to retrieve trip: {}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve trip")
        }
    }
}

/*
    DELETE /api/trips/{id}
*/
pub async fn delete_trip(path: web::Path<String>, store: web::Data<TripStore>) -> impl Responder {
    // Deleting an id that is already gone falls through to Ok; removal is
    // idempotent from the caller's point of view.
    match store.delete_by_id(&path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().body("Trip deleted"),
        Err(TripStoreError::InvalidId(_)) => HttpResponse::BadRequest().body("Invalid trip ID"),
        Err(err) => {
            eprintln!("Failed to delete trip: {}", err);
            HttpResponse::InternalServerError().body("Failed to delete trip")
        }
    }
}
