use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::job::{DeliveryDetails, JobType, NewJob};
use crate::utils::geo::GeoPoint;
use crate::utils::validation::{validate_coordinates, validate_not_empty, validate_region};

// Request para crear un job
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_job_coordinates"))]
pub struct CreateJobRequest {
    pub job_type: JobType,
    #[validate(custom = "validate_not_empty")]
    pub customer_id: String,
    #[validate(custom = "validate_region")]
    pub region: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_details: Option<DeliveryDetails>,
}

fn validate_job_coordinates(request: &CreateJobRequest) -> Result<(), ValidationError> {
    validate_coordinates(request.pickup_lat, request.pickup_lng)?;
    validate_coordinates(request.destination_lat, request.destination_lng)
}

impl From<CreateJobRequest> for NewJob {
    fn from(request: CreateJobRequest) -> Self {
        let delivery_details = match request.job_type {
            JobType::Delivery => Some(request.delivery_details.unwrap_or_default()),
            JobType::Ride => None,
        };
        NewJob {
            job_type: request.job_type,
            customer_id: request.customer_id,
            region: request.region,
            pickup: GeoPoint::new(request.pickup_lat, request.pickup_lng),
            destination: GeoPoint::new(request.destination_lat, request.destination_lng),
            delivery_details,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveJobCountResponse {
    pub active_jobs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPendingResponse {
    pub pending: usize,
    pub assigned: usize,
}
