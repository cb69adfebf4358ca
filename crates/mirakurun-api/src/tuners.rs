// Tuner endpoints

use tracing::debug;

use crate::client::{ApiResponse, Client};
use crate::error::Error;
use crate::models::{TunerDevice, TunerProcess};

impl Client {
    /// `GET /api/tuners`
    pub async fn get_tuners(&self) -> Result<ApiResponse<Vec<TunerDevice>>, Error> {
        self.get("tuners").await
    }

    /// `GET /api/tuners/{index}`
    pub async fn get_tuner(&self, index: u32) -> Result<ApiResponse<TunerDevice>, Error> {
        self.get(&format!("tuners/{index}")).await
    }

    /// The tuner command process currently running on a device.
    ///
    /// `GET /api/tuners/{index}/process`
    pub async fn get_tuner_process(&self, index: u32) -> Result<ApiResponse<TunerProcess>, Error> {
        self.get(&format!("tuners/{index}/process")).await
    }

    /// Kill the tuner command process, releasing the device.
    ///
    /// `DELETE /api/tuners/{index}/process`
    pub async fn kill_tuner_process(&self, index: u32) -> Result<ApiResponse<TunerProcess>, Error> {
        debug!(index, "killing tuner process");
        self.delete(&format!("tuners/{index}/process")).await
    }
}
