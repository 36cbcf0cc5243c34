use std::error::Error;
use std::fmt;
use std::sync::Arc;

use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::bson::DateTime;
use mongodb::{Client, Collection};

use crate::models::trip::{TripPlan, TripRecord, TripRequest};

const TRIPS_DATABASE: &str = "Trips";
const TRIPS_COLLECTION: &str = "Generated";

#[derive(Debug)]
pub enum TripStoreError {
    DatabaseError(mongodb::error::Error),
    InvalidId(String),
    NotFound,
}

impl fmt::Display for TripStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripStoreError::DatabaseError(err) => write!(f, "Database error: {}", err),
            TripStoreError::InvalidId(id) => write!(f, "Invalid trip id: {}", id),
            TripStoreError::NotFound => write!(f, "Trip not found"),
        }
    }
}

impl Error for TripStoreError {}

impl From<mongodb::error::Error> for TripStoreError {
    fn from(err: mongodb::error::Error) -> Self {
        TripStoreError::DatabaseError(err)
    }
}

/// Persistence for generated trips. Plans are immutable once created;
/// the only operations are create, read (by id or owner) and delete.
#[derive(Clone)]
pub struct TripStore {
    client: Arc<Client>,
}

impl TripStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    fn collection(&self) -> Collection<TripRecord> {
        self.client.database(TRIPS_DATABASE).collection(TRIPS_COLLECTION)
    }

    /// Insert a new record and return its id as a hex string. The id and
    /// creation timestamp are assigned here, never by the caller.
    pub async fn create(
        &self,
        trip_plan: TripPlan,
        user_selection: TripRequest,
        owner_id: &str,
        owner_email: &str,
    ) -> Result<String, TripStoreError> {
        let id = ObjectId::new();
        let record = TripRecord {
            id: Some(id),
            trip_plan,
            user_selection,
            owner_id: owner_id.to_string(),
            owner_email: owner_email.to_string(),
            created_at: Some(DateTime::now()),
        };

        self.collection().insert_one(&record).await?;
        Ok(id.to_hex())
    }

    /// All of an owner's trips, newest first. BSON descending order puts
    /// records without a usable `createdAt` after every timestamped one.
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<TripRecord>, TripStoreError> {
        if owner_id.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .collection()
            .find(doc! { "ownerId": owner_id })
            .sort(doc! { "createdAt": -1 })
            .await?;

        let trips: Vec<TripRecord> = cursor.try_collect().await?;
        Ok(trips)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<TripRecord, TripStoreError> {
        let object_id =
            ObjectId::parse_str(id).map_err(|_| TripStoreError::InvalidId(id.to_string()))?;

        match self.collection().find_one(doc! { "_id": object_id }).await? {
            Some(record) => Ok(record),
            None => Err(TripStoreError::NotFound),
        }
    }

    /// Idempotent by absence: deleting an id that no longer exists is not
    /// an error.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), TripStoreError> {
        let object_id =
            ObjectId::parse_str(id).map_err(|_| TripStoreError::InvalidId(id.to_string()))?;

        self.collection().delete_one(doc! { "_id": object_id }).await?;
        Ok(())
    }
}
