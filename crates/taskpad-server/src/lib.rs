mod routes;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use taskpad_db::Database;
use taskpad_service::LocalService;
use tokio::net::TcpListener;

pub async fn serve(listener: TcpListener, db: Arc<dyn Database>) -> Result<()> {
    let service = LocalService::new(db);
    let app = routes::build_router(service);
    axum::serve(listener, app).await?;
    Ok(())
}
