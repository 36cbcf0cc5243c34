mod common;

use actix_web::{http::StatusCode, test};
use serde_json::json;
use serial_test::serial;

use common::{StubGenerator, TestApp};

const PLAN: &str = r#"{
  "tripDetails": {
    "location": "Paris",
    "duration": "3 days",
    "travelers": "Couple",
    "budget": "Moderate"
  },
  "hotelOptions": [
    {
      "name": "Hotel Le Meurice",
      "address": "228 Rue de Rivoli, 75001 Paris, France",
      "price": "$450-$700 per night",
      "rating": "4.7 stars",
      "description": "Palace hotel facing the Tuileries Garden"
    }
  ],
  "itinerary": [
    {
      "day": 1,
      "schedule": [
        {
          "time": "9:00 AM - 12:00 PM",
          "placeName": "Louvre Museum, Paris",
          "details": "World's largest art museum",
          "ticketPricing": "$20 per person",
          "travelTime": "10 minutes from hotel"
        }
      ]
    },
    { "day": 2, "schedule": [] }
  ],
  "budgetTips": [
    "Buy a Navigo weekly pass for the metro",
    "Book museum tickets online to skip queues"
  ]
}"#;

fn paris_request() -> serde_json::Value {
    json!({
        "location": "Paris",
        "noOfDays": "3",
        "traveler": "Couple",
        "budget": "Moderate"
    })
}

#[actix_rt::test]
#[serial]
async fn generate_returns_parsed_plan() {
    let generator = StubGenerator::returning(PLAN);
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app(generator.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/generate-trip")
        .set_json(&paris_request())
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["tripData"]["tripDetails"]["location"], "Paris");

    let itinerary = body["tripData"]["itinerary"].as_array().unwrap();
    assert!(!itinerary.is_empty());
    for day in itinerary {
        assert!(day["schedule"].is_array());
    }

    assert_eq!(generator.calls(), 1);
}

#[actix_rt::test]
#[serial]
async fn generate_accepts_numeric_day_count() {
    let generator = StubGenerator::returning(PLAN);
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app(generator.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/generate-trip")
        .set_json(&json!({
            "location": "Paris",
            "noOfDays": 3,
            "traveler": "Couple",
            "budget": "Moderate"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(generator.calls(), 1);
}

#[actix_rt::test]
#[serial]
async fn generate_unwraps_fenced_model_output() {
    let fenced = format!("```json\n{}\n```", PLAN);
    let generator = StubGenerator::returning(&fenced);
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app(generator.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/generate-trip")
        .set_json(&paris_request())
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["tripData"]["tripDetails"]["location"], "Paris");
}

#[actix_rt::test]
#[serial]
async fn missing_field_is_rejected_before_any_model_call() {
    let generator = StubGenerator::returning(PLAN);
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app(generator.clone())).await;

    // No budget.
    let req = test::TestRequest::post()
        .uri("/api/generate-trip")
        .set_json(&json!({
            "location": "Paris",
            "noOfDays": "3",
            "traveler": "Couple"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(!body["error"].as_str().unwrap().is_empty());

    assert_eq!(generator.calls(), 0);
}

#[actix_rt::test]
#[serial]
async fn unparseable_model_output_maps_to_bad_gateway() {
    let generator = StubGenerator::returning("Here is your trip plan! Day 1: ...");
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app(generator.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/generate-trip")
        .set_json(&paris_request())
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "AI returned invalid JSON. Please try again.");
}

#[actix_rt::test]
#[serial]
async fn provider_failure_maps_to_internal_error() {
    let generator = StubGenerator::failing();
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app(generator.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/generate-trip")
        .set_json(&paris_request())
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to generate trip");
    assert_eq!(generator.calls(), 1);
}

#[actix_rt::test]
#[serial]
async fn non_post_method_is_not_allowed() {
    let generator = StubGenerator::returning(PLAN);
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app(generator.clone())).await;

    let req = test::TestRequest::get().uri("/api/generate-trip").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Method not allowed");
    assert_eq!(generator.calls(), 0);
}
