//! Meal services (breakfast, lunch, ...) attendance is tracked against.

use serde::{Deserialize, Serialize};

use super::ServiceId;

/// A named meal service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealService {
    /// Row in `servicios`.
    pub id: ServiceId,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
}

impl MealService {
    /// Stand-in shown when the service cannot be loaded.
    ///
    /// Keeps the registration sheet usable instead of failing the request.
    pub fn placeholder(id: ServiceId) -> Self {
        Self {
            id,
            name: format!("Servicio {id}"),
            description: None,
        }
    }
}
