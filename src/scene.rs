//! Optional illustrative scene for a report.
//!
//! The generator only ever sees a location name, a description and a
//! temperature. Its failures are logged and never affect the report.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::WeatherReport;

/// Everything a scene generator is allowed to know
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SceneRequest {
    pub location_display_name: String,
    pub current_description: String,
    pub current_temperature: i32,
}

impl SceneRequest {
    #[must_use]
    pub fn from_report(report: &WeatherReport) -> Self {
        Self {
            location_display_name: report.current.location_name.clone(),
            current_description: report.current.description.clone(),
            current_temperature: report.current.temperature,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Scene {
    /// Image URL or data URI
    pub image: String,
    pub alt_text: String,
}

#[async_trait]
pub trait SceneGenerator: Send + Sync {
    async fn generate(&self, request: &SceneRequest) -> anyhow::Result<Scene>;
}

/// Ask the generator for a scene, swallowing any failure.
///
/// A generator that has not answered within `timeout` is abandoned.
pub async fn decorate_with_scene(
    generator: Option<&dyn SceneGenerator>,
    report: &WeatherReport,
    timeout: Duration,
) -> Option<Scene> {
    let generator = generator?;
    let request = SceneRequest::from_report(report);
    match tokio::time::timeout(timeout, generator.generate(&request)).await {
        Ok(Ok(scene)) => Some(scene),
        Ok(Err(e)) => {
            warn!(
                "Scene generation failed for {}: {:#}",
                request.location_display_name, e
            );
            None
        }
        Err(_) => {
            warn!(
                "Scene generation timed out after {:?} for {}",
                timeout, request.location_display_name
            );
            None
        }
    }
}
