use serde::Serialize;

use itinera_core::JobId;

/// Body of the 202 acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedResponse {
    pub job_id: JobId,
}
