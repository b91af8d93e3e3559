use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use crate::error::{AppError, Result};

/// The sensor sits on the campus LAN and answers slowly when wedged; keep
/// requests short so enrollment endpoints stay responsive.
const SENSOR_TIMEOUT: Duration = Duration::from_secs(2);

/// Progress report from the enrollment device. `status` is "success",
/// "failed" or an in-progress marker; `step` names the scan step the device
/// is on.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SensorEnrollmentStatus {
    pub status: String,
    pub step: String,
    #[serde(default)]
    pub message: String,
}

/// HTTP client for the fingerprint scanner device.
#[derive(Clone)]
pub struct SensorClient {
    http: reqwest::Client,
    base_url: String,
}

impl SensorClient {
    pub fn new(base_url: String) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(SENSOR_TIMEOUT)
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Ask the device to begin an enrollment session.
    pub async fn trigger_enrollment(&self) -> Result<()> {
        self.http
            .post(format!("{}/enroll", self.base_url))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Sensor enroll request failed: {:?}", e);
                AppError::ServiceUnavailable("Cannot connect to fingerprint sensor".to_string())
            })?;

        Ok(())
    }

    /// Fetch the device's current enrollment progress.
    pub async fn enrollment_status(&self) -> Result<SensorEnrollmentStatus> {
        let response = self
            .http
            .get(format!("{}/status", self.base_url))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Sensor status request failed: {:?}", e);
                AppError::ServiceUnavailable("Cannot connect to fingerprint sensor".to_string())
            })?;

        let status = response.json::<SensorEnrollmentStatus>().await.map_err(|e| {
            tracing::error!("Sensor returned an unreadable status: {:?}", e);
            AppError::ServiceUnavailable("Cannot connect to fingerprint sensor".to_string())
        })?;

        Ok(status)
    }
}
