use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use kitprice_core::{
    LineItemId, RowEdit, StoreError, Worksheet, WorksheetError, WorksheetStore, allocate,
    worksheet_edit,
};
use kitprice_platform::{
    AllocateRequest, AllocationResponse, KitPriceRequest, RowAddedResponse, RowEditRequest,
    ServiceConfig, WorksheetResponse,
};
use tracing::{debug, error, info};
use uuid::Uuid;

type ApiResult<T> = std::result::Result<T, (StatusCode, String)>;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn WorksheetStore>,
    default_rows: usize,
    max_rows: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn WorksheetStore>, config: &ServiceConfig) -> Self {
        Self {
            store,
            default_rows: config.default_rows,
            max_rows: config.max_rows,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/allocations", post(create_allocation))
        .route("/worksheets", post(create_worksheet))
        .route(
            "/worksheets/{worksheet_id}",
            get(get_worksheet).delete(delete_worksheet),
        )
        .route("/worksheets/{worksheet_id}/kit-price", put(set_kit_price))
        .route("/worksheets/{worksheet_id}/rows", post(add_row))
        .route(
            "/worksheets/{worksheet_id}/rows/{row_id}",
            patch(edit_row).delete(remove_row),
        )
        .route("/worksheets/{worksheet_id}/reset", post(reset_worksheet))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_allocation(
    State(state): State<AppState>,
    Json(request): Json<AllocateRequest>,
) -> ApiResult<Json<AllocationResponse>> {
    if request.items.len() > state.max_rows {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("at most {} line items are accepted", state.max_rows),
        ));
    }

    let (items, kit_price) = request.normalize();
    let report = allocate(&items, kit_price);
    debug!(
        items = items.len(),
        balanced = report.summary.balanced,
        "stateless allocation computed"
    );

    Ok(Json(AllocationResponse::new(items, report)))
}

async fn create_worksheet(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<WorksheetResponse>)> {
    let worksheet = Worksheet::new(state.default_rows, state.max_rows);
    let worksheet = state.store.insert(worksheet).await.map_err(store_error)?;

    info!("worksheet {} created", worksheet.id);
    Ok((
        StatusCode::CREATED,
        Json(WorksheetResponse::from(&worksheet)),
    ))
}

async fn get_worksheet(
    State(state): State<AppState>,
    Path(worksheet_id): Path<Uuid>,
) -> ApiResult<Json<WorksheetResponse>> {
    let worksheet = state
        .store
        .load(worksheet_id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| store_error(StoreError::NotFound(worksheet_id)))?;
    Ok(Json(WorksheetResponse::from(&worksheet)))
}

async fn delete_worksheet(
    State(state): State<AppState>,
    Path(worksheet_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = state
        .store
        .remove(worksheet_id)
        .await
        .map_err(store_error)?;
    if !removed {
        return Err(store_error(StoreError::NotFound(worksheet_id)));
    }

    info!("worksheet {} deleted", worksheet_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn set_kit_price(
    State(state): State<AppState>,
    Path(worksheet_id): Path<Uuid>,
    Json(request): Json<KitPriceRequest>,
) -> ApiResult<Json<WorksheetResponse>> {
    let raw = request.raw();
    let worksheet = update_worksheet(&state, worksheet_id, move |worksheet| {
        worksheet.set_kit_price(&raw);
        Ok(())
    })
    .await?;

    Ok(Json(WorksheetResponse::from(&worksheet)))
}

async fn add_row(
    State(state): State<AppState>,
    Path(worksheet_id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<RowAddedResponse>)> {
    let mut row_id = None;
    let worksheet = update_worksheet(&state, worksheet_id, |worksheet| {
        row_id = Some(worksheet.add_row()?);
        Ok(())
    })
    .await?;
    let row_id = row_id.ok_or_else(|| internal_error("row was not added"))?;

    Ok((
        StatusCode::CREATED,
        Json(RowAddedResponse {
            row_id,
            worksheet: WorksheetResponse::from(&worksheet),
        }),
    ))
}

async fn edit_row(
    State(state): State<AppState>,
    Path((worksheet_id, row_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<RowEditRequest>,
) -> ApiResult<Json<WorksheetResponse>> {
    let edit = RowEdit::from(request);
    let worksheet = update_worksheet(&state, worksheet_id, move |worksheet| {
        worksheet.edit_row(LineItemId::from(row_id), edit)?;
        Ok(())
    })
    .await?;

    Ok(Json(WorksheetResponse::from(&worksheet)))
}

async fn remove_row(
    State(state): State<AppState>,
    Path((worksheet_id, row_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<WorksheetResponse>> {
    let worksheet = update_worksheet(&state, worksheet_id, move |worksheet| {
        worksheet.remove_row(LineItemId::from(row_id))?;
        Ok(())
    })
    .await?;

    Ok(Json(WorksheetResponse::from(&worksheet)))
}

async fn reset_worksheet(
    State(state): State<AppState>,
    Path(worksheet_id): Path<Uuid>,
) -> ApiResult<Json<WorksheetResponse>> {
    let worksheet = update_worksheet(&state, worksheet_id, |worksheet| {
        worksheet.reset();
        Ok(())
    })
    .await?;

    info!("worksheet {} reset", worksheet_id);
    Ok(Json(WorksheetResponse::from(&worksheet)))
}

async fn update_worksheet<'a, F>(
    state: &AppState,
    worksheet_id: Uuid,
    edit: F,
) -> ApiResult<Worksheet>
where
    F: FnOnce(&mut Worksheet) -> Result<(), WorksheetError> + Send + 'a,
{
    state
        .store
        .update(worksheet_id, worksheet_edit(edit))
        .await
        .map_err(store_error)
}

fn store_error(err: StoreError) -> (StatusCode, String) {
    let status = match &err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::CapacityReached(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Worksheet(WorksheetError::RowNotFound(_)) => StatusCode::NOT_FOUND,
        StoreError::Worksheet(WorksheetError::RowLimitReached(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        StoreError::Backend(_) => return internal_error(&err),
    };
    (status, err.to_string())
}

fn internal_error<E: std::fmt::Display>(err: E) -> (StatusCode, String) {
    error!("request failed: {err}");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
