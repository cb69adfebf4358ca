// Program (EPG) endpoints

use tracing::debug;

use crate::client::{ApiResponse, Client};
use crate::error::Error;
use crate::models::{Program, ProgramsListOptions};
use crate::query::with_query;
use crate::stream::ByteStream;

impl Client {
    /// List EPG entries, optionally filtered.
    ///
    /// `GET /api/programs`
    pub async fn get_programs(
        &self,
        opts: Option<&ProgramsListOptions>,
    ) -> Result<ApiResponse<Vec<Program>>, Error> {
        debug!(?opts, "listing programs");
        let path = with_query("programs", opts)?;
        self.get(&path).await
    }

    /// `GET /api/programs/{id}`
    pub async fn get_program(&self, id: u64) -> Result<ApiResponse<Program>, Error> {
        self.get(&format!("programs/{id}")).await
    }

    /// Open the transport stream of one program. The server holds the
    /// request until the program starts and closes it when it ends.
    ///
    /// `GET /api/programs/{id}/stream`
    pub async fn get_program_stream(
        &self,
        id: u64,
        decode: bool,
    ) -> Result<ApiResponse<ByteStream>, Error> {
        debug!(id, decode, "opening program stream");
        self.get_ts(&format!("programs/{id}/stream"), decode).await
    }
}
