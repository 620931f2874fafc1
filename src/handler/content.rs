//! Images and static pages

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use redb::ReadableTable;
use serde_json::json;

use crate::database::{
    get_record, load_all, new_id, to_json, AppState, TABLE_IMAGES, TABLE_PAGES,
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::model::{Image, ImageQuery, ImageRequest, Page, PageRequest};

pub async fn create_image(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ImageRequest>,
) -> AppResult<impl IntoResponse> {
    if payload.url.trim().is_empty() || payload.category.trim().is_empty() {
        return Err(AppError::bad_request("url and category are required"));
    }

    let image = Image {
        id: new_id(),
        title: payload.title.unwrap_or_default(),
        url: payload.url,
        category: payload.category,
        created_at: Utc::now(),
    };

    let write_txn = state.db.begin_write()?;
    {
        let mut table = write_txn.open_table(TABLE_IMAGES)?;
        table.insert(image.id.as_str(), to_json(&image)?.as_str())?;
    }
    write_txn.commit()?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Image uploaded!", "image": image })),
    ))
}

/// Lists images, optionally only those of one category
///
/// `GET /images?category=beach`
pub async fn list_images(
    State(state): State<AppState>,
    Query(params): Query<ImageQuery>,
) -> AppResult<impl IntoResponse> {
    let images: Vec<Image> = load_all(&state.db, TABLE_IMAGES)?;
    let images: Vec<Image> = match params.category {
        Some(category) => images
            .into_iter()
            .filter(|image| image.category == category)
            .collect(),
        None => images,
    };
    Ok(Json(images))
}

/// Creates a page; slugs are unique
pub async fn create_page(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PageRequest>,
) -> AppResult<impl IntoResponse> {
    let slug = payload.slug.trim().to_string();
    if slug.is_empty() || payload.title.trim().is_empty() {
        return Err(AppError::bad_request("slug and title are required"));
    }

    let page = Page {
        id: new_id(),
        slug,
        title: payload.title,
        content: payload.content,
        created_at: Utc::now(),
    };

    let write_txn = state.db.begin_write()?;
    {
        let mut table = write_txn.open_table(TABLE_PAGES)?;
        if table.get(page.slug.as_str())?.is_some() {
            return Err(AppError::conflict("Page already exists"));
        }
        table.insert(page.slug.as_str(), to_json(&page)?.as_str())?;
    }
    write_txn.commit()?;

    Ok((StatusCode::CREATED, Json(page)))
}

pub async fn list_pages(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pages: Vec<Page> = load_all(&state.db, TABLE_PAGES)?;
    Ok(Json(pages))
}

pub async fn get_page(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let page: Page = get_record(&state.db, TABLE_PAGES, &slug)?
        .ok_or_else(|| AppError::not_found("Page not found"))?;
    Ok(Json(page))
}
