use bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// The AI-generated trip plan, kept as a transparent JSON document.
///
/// The pipeline validates parseability only; the expected shape
/// (`tripDetails`, `hotelOptions`, `itinerary`, `budgetTips`) is enforced
/// by the prompt, not re-checked field by field.
pub type TripPlan = serde_json::Value;

/// Validated generation parameters. Persisted verbatim inside a
/// `TripRecord` as the original user selection.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TripRequest {
    pub location: String,
    #[serde(rename = "noOfDays")]
    pub no_of_days: String,
    pub traveler: String,
    pub budget: String,
}

/// Raw body of the generation endpoint. Every field is optional here so
/// missing-field handling stays in one place (`into_request`) instead of
/// in the deserializer.
#[derive(Debug, Deserialize)]
pub struct GenerateTripInput {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "noOfDays")]
    pub no_of_days: Option<DayCount>,
    #[serde(default)]
    pub traveler: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
}

/// Clients send the day count as either a JSON string or a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DayCount {
    Text(String),
    Number(i64),
}

impl DayCount {
    pub fn into_text(self) -> String {
        match self {
            DayCount::Text(text) => text,
            DayCount::Number(days) => days.to_string(),
        }
    }
}

impl GenerateTripInput {
    /// All four fields must be present and non-blank before generation is
    /// attempted. Returns `None` otherwise; the caller rejects the request
    /// without touching the model.
    pub fn into_request(self) -> Option<TripRequest> {
        let location = non_blank(self.location)?;
        let no_of_days = non_blank(self.no_of_days.map(DayCount::into_text))?;
        let traveler = non_blank(self.traveler)?;
        let budget = non_blank(self.budget)?;

        Some(TripRequest {
            location,
            no_of_days,
            traveler,
            budget,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A persisted trip: the generated plan, the selection that produced it,
/// and the owner it belongs to. Immutable once created.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TripRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "tripPlan")]
    pub trip_plan: TripPlan,
    #[serde(rename = "userSelection")]
    pub user_selection: TripRequest,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    #[serde(rename = "ownerEmail")]
    pub owner_email: String,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

#[derive(Debug, Deserialize)]
pub struct SaveTripInput {
    #[serde(rename = "tripData")]
    pub trip_data: TripPlan,
    #[serde(rename = "userSelection")]
    pub user_selection: TripRequest,
}

#[derive(Debug, Serialize)]
pub struct SavedTripResponse {
    pub id: String,
}
