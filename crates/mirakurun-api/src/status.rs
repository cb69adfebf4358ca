// Status endpoint

use crate::client::{ApiResponse, Client};
use crate::error::Error;
use crate::models::Status;

impl Client {
    /// Process, EPG and stream counters.
    ///
    /// `GET /api/status`
    pub async fn get_status(&self) -> Result<ApiResponse<Status>, Error> {
        self.get("status").await
    }
}
