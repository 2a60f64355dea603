use std::path::{Path, PathBuf};

use api_types::export::ExportResponse;
use axum::{Extension, Json, extract::State};
use engine::EngineError;

use crate::{
    ServerError,
    server::{ServerState, Tenant},
};

/// Write the tenant's financials to its own CSV file in the export directory.
pub async fn get(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
) -> Result<Json<ExportResponse>, ServerError> {
    let csv = state.engine.export_financials_csv(tenant.id).await?;
    let dir = &state.config.export_dir;
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|err| EngineError::Export(format!("{}: {err}", dir.display())))?;
    let path = export_file(dir, tenant.id);
    tokio::fs::write(&path, csv)
        .await
        .map_err(|err| EngineError::Export(format!("{}: {err}", path.display())))?;
    tracing::info!(user_id = tenant.id, "exported financials to {}", path.display());

    Ok(Json(ExportResponse {
        message: "CSV export completed".to_string(),
    }))
}

fn export_file(dir: &Path, user_id: i64) -> PathBuf {
    dir.join(format!("export-{user_id}.csv"))
}
