//! Custom print request models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use printforge_core::{Email, PrintRequestId, PrintRequestStatus};

/// A custom print quote request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomPrintRequest {
    pub id: PrintRequestId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    /// Requested print material (e.g. "PLA", "Resin").
    pub material: Option<String>,
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
    pub project_description: String,
    /// Original name of the uploaded design file.
    pub file_name: Option<String>,
    /// Public URL of the stored design file.
    pub file_url: Option<String>,
    pub status: PrintRequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a print request. The storage backend assigns the id,
/// timestamp, and initial `Pending` status.
#[derive(Debug, Clone)]
pub struct NewPrintRequest {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub material: Option<String>,
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
    pub project_description: String,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
}

impl NewPrintRequest {
    /// Materialize a print request with the given id and creation time.
    #[must_use]
    pub fn into_request(self, id: PrintRequestId, created_at: DateTime<Utc>) -> CustomPrintRequest {
        CustomPrintRequest {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            material: self.material,
            quantity: self.quantity,
            size: self.size,
            color: self.color,
            project_description: self.project_description,
            file_name: self.file_name,
            file_url: self.file_url,
            status: PrintRequestStatus::Pending,
            created_at,
        }
    }
}
