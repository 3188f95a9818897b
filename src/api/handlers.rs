// HTTP request handlers for API endpoints

use actix_web::{web, HttpResponse};

use crate::api::error::ApiError;
use crate::api::listing;
use crate::api::models::*;
use crate::images::ImageProvider;
use crate::store::{inventory, Column, Db};

/// Health check endpoint
pub async fn health_check(db: web::Data<Db>) -> HttpResponse {
    // Quick database connectivity check
    let db_status = match sqlx::query_scalar::<_, bool>("SELECT true")
        .fetch_one(&db.pool)
        .await
    {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    let response = ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        database: db_status.to_string(),
    });

    HttpResponse::Ok().json(response)
}

/// List or filter rows, grouped by set name with image annotations.
pub async fn list_inventory(
    query: web::Query<ListQuery>,
    db: web::Data<Db>,
    images: web::Data<ImageProvider>,
) -> Result<HttpResponse, ApiError> {
    let rows = match (query.search_by.as_deref(), query.search_value.as_deref()) {
        (None, None) => inventory::fetch_all(&db).await?,
        (Some(by), Some(value)) => {
            let column = Column::parse(by)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown column: {by}")))?;
            let rows = inventory::fetch_filtered(&db, column, value).await?;
            if rows.is_empty() {
                return Err(ApiError::NotFound("no rows match the given filter".into()));
            }
            rows
        }
        _ => {
            return Err(ApiError::BadRequest(
                "searchBy and searchValue must be provided together".into(),
            ))
        }
    };

    let payload = listing::annotate(&images, rows).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(payload)))
}

/// Distinct non-empty values of one column, for filter UIs.
pub async fn distinct_options(
    query: web::Query<OptionsQuery>,
    db: web::Data<Db>,
) -> Result<HttpResponse, ApiError> {
    let raw = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("category query parameter is required".into()))?;
    let column = Column::parse(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown column: {raw}")))?;

    let values = inventory::distinct_options(&db, column).await?;
    if values.is_empty() {
        return Err(ApiError::NotFound(format!("no values found for {column}")));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(values)))
}

/// Rows whose code contains the given fragment, unannotated.
pub async fn search_by_code(
    path: web::Path<String>,
    db: web::Data<Db>,
) -> Result<HttpResponse, ApiError> {
    let fragment = path.into_inner();
    let rows = inventory::search_by_code(&db, &fragment).await?;
    if rows.is_empty() {
        return Err(ApiError::NotFound("code not found".into()));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(rows)))
}

pub async fn create_row(
    payload: web::Json<LegoPayload>,
    db: web::Data<Db>,
) -> Result<HttpResponse, ApiError> {
    let fields = payload.into_inner().into_fields();
    let row = inventory::insert(&db, &fields).await?;
    tracing::info!(id = row.id, "inventory row created");
    Ok(HttpResponse::Created().json(ApiResponse::success(row)))
}

/// Full replace of a row's tracked fields. A set-level edit resolves the
/// set image first; that lookup failing fails the update before any write.
pub async fn update_row(
    path: web::Path<i32>,
    payload: web::Json<LegoPayload>,
    db: web::Data<Db>,
    images: web::Data<ImageProvider>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let payload = payload.into_inner();

    let image_set = if payload.is_edit_set {
        match payload.lego.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(images.set_image(name).await?),
            _ => None,
        }
    } else {
        None
    };

    let fields = payload.into_fields();
    let row = inventory::update(&db, id, &fields)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no row with id {id}")))?;
    tracing::info!(id, "inventory row updated");
    Ok(HttpResponse::Ok().json(ApiResponse::success(UpdatedRow { row, image_set })))
}

pub async fn delete_row(
    path: web::Path<i32>,
    db: web::Data<Db>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let removed = inventory::delete(&db, id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound(format!("no row with id {id}")));
    }
    tracing::info!(id, "inventory row deleted");
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "deleted": id }))))
}
