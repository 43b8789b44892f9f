//! Route handlers.

use std::collections::BTreeMap;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use super::error::{ApiError, PAYLOAD_TOO_LARGE};
use super::params::{self, RequestArgs};
use super::AppState;
use crate::catalog::CatalogStats;
use crate::error::Error;
use crate::images::{sanitize_file_name, split_extension, ImageExtension};
use crate::model::{Planet, Satellite};

/// Route that receives upload forms.
pub const UPLOAD_ACTION: &str = "/planete/upload_image";

type ApiResult<T> = Result<T, ApiError>;

/// A planet with its moons and image.
#[derive(Debug, Serialize)]
pub struct PlanetView<'a> {
    planet: Planet,
    satellites: Vec<&'a Satellite>,
    image_url: Option<String>,
    request_args: BTreeMap<String, String>,
}

/// A planet together with the description of its upload form.
#[derive(Debug, Serialize)]
pub struct EditView {
    planet: Planet,
    upload: UploadForm,
}

/// Fields a client must send to upload a planet image.
#[derive(Debug, Serialize)]
pub struct UploadForm {
    action: &'static str,
    method: &'static str,
    id_field: &'static str,
    file_field: &'static str,
    allowed_extensions: [ImageExtension; 4],
    max_bytes: usize,
}

/// A satellite and the planet it orbits, if that planet is loaded.
#[derive(Debug, Serialize)]
pub struct SatelliteView<'a> {
    satellite: &'a Satellite,
    planet: Option<Planet>,
}

/// Liveness report.
#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    #[serde(flatten)]
    catalog: CatalogStats,
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Json<Vec<Planet>> {
    Json(state.catalog.planets())
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        catalog: state.catalog.stats(),
    })
}

/// `GET /planete?id=N`
pub async fn show_planet(
    State(state): State<AppState>,
    RequestArgs(args): RequestArgs,
) -> ApiResult<Json<serde_json::Value>> {
    let id = params::required_id(&args)?;
    let planet = state
        .catalog
        .find_planet(id)
        .ok_or_else(|| Error::planet_not_found(id))?;

    let view = PlanetView {
        planet,
        satellites: state.catalog.satellites_of_planet(id),
        image_url: state.images.image_url(id),
        request_args: args,
    };
    Ok(Json(serde_json::to_value(view).map_err(Error::from)?))
}

/// `GET /planete/edit?id=N`
pub async fn edit_planet(
    State(state): State<AppState>,
    RequestArgs(args): RequestArgs,
) -> ApiResult<Json<EditView>> {
    let id = params::required_id(&args)?;
    let planet = state
        .catalog
        .find_planet(id)
        .ok_or_else(|| Error::planet_not_found(id))?;

    Ok(Json(EditView {
        planet,
        upload: UploadForm {
            action: UPLOAD_ACTION,
            method: "POST",
            id_field: "id",
            file_field: "image",
            allowed_extensions: ImageExtension::ALL,
            max_bytes: state.max_upload_bytes,
        },
    }))
}

/// `POST /planete/upload_image`
///
/// Expects a multipart form with an `id` field and an `image` file. Redirects
/// to the planet view once the image is stored.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Redirect> {
    let mut multipart = multipart?;
    let mut raw_id = None;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().map(str::to_owned).as_deref() {
            Some("id") => raw_id = Some(field.text().await?),
            Some("image") => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await?;
                upload = Some((file_name, bytes));
            }
            other => debug!("Ignoring form field {:?}", other),
        }
    }

    let raw_id = raw_id.ok_or(Error::MissingParameter { name: "id" })?;
    let planet_id = params::parse_id("id", &raw_id)?;
    let (file_name, bytes) = upload
        .filter(|(name, _)| !name.is_empty())
        .ok_or(Error::MissingParameter { name: "image" })?;

    if bytes.len() > state.max_upload_bytes {
        return Err(ApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            PAYLOAD_TOO_LARGE,
            format!(
                "image is {} bytes, the limit is {}",
                bytes.len(),
                state.max_upload_bytes
            ),
        ));
    }

    let safe_name = sanitize_file_name(&file_name);
    let extension = split_extension(&safe_name)
        .map(|(_, ext)| ext.to_owned())
        .unwrap_or_default();

    let worker = state.clone();
    let stored = tokio::task::spawn_blocking(move || {
        worker
            .images
            .record_upload(&worker.catalog, planet_id, &safe_name, &extension, &bytes)
    })
    .await
    .map_err(|err| Error::internal(format!("upload task failed: {err}")))??;

    Ok(Redirect::to(&format!("/planete?id={}", stored.planet_id)))
}

/// `GET /satellite?id=N`
pub async fn show_satellite(
    State(state): State<AppState>,
    RequestArgs(args): RequestArgs,
) -> ApiResult<Json<serde_json::Value>> {
    let id = params::required_id(&args)?;
    let satellite = state
        .catalog
        .find_satellite(id)
        .ok_or_else(|| Error::satellite_not_found(id))?;

    let view = SatelliteView {
        satellite,
        planet: state.catalog.find_planet(satellite.planet_id),
    };
    Ok(Json(serde_json::to_value(view).map_err(Error::from)?))
}
