// Restart endpoint

use tracing::debug;

use crate::client::{ApiResponse, Client};
use crate::error::Error;
use crate::models::RestartResponse;

impl Client {
    /// Restart the server process. Answered with 202 and the pid of the
    /// restart command.
    ///
    /// `PUT /api/restart`
    pub async fn restart(&self) -> Result<ApiResponse<RestartResponse>, Error> {
        debug!("requesting server restart");
        self.put::<_, ()>("restart", None).await
    }
}
