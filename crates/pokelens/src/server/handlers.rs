use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Query, State};
use axum::Json;
use pokelens_core::{ImageSubmission, SpeciesRecord, DEFAULT_LANG};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct IdentifyQuery {
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

#[derive(Serialize)]
pub struct Health {
    ok: bool,
    service: &'static str,
    version: &'static str,
}

pub async fn healthz() -> Json<Health> {
    Json(Health {
        ok: true,
        service: "pokelens",
        version: pokelens_core::VERSION,
    })
}

/// `POST /identify_pokemon?lang=xx` with a multipart `file` field.
pub async fn identify_pokemon(
    State(state): State<AppState>,
    query: Result<Query<IdentifyQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SpeciesRecord>, ApiError> {
    let Query(query) = query?;
    let mut multipart = multipart?;
    let image = read_upload(&mut multipart).await?;
    tracing::debug!(
        file = image.display_name(),
        media_type = %image.media_type,
        bytes = image.bytes.len(),
        lang = %query.lang,
        "Upload received"
    );

    state
        .pokedex
        .identify_pokemon(image, &query.lang)
        .await
        .map(Json)
        .map_err(|not_found| ApiError::not_found(not_found.detail))
}

/// Pull the `file` field out of the form, ignoring any others.
async fn read_upload(multipart: &mut Multipart) -> Result<ImageSubmission, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(String::from);
        let media_type = field
            .content_type()
            .map(String::from)
            .unwrap_or_else(|| guess_media_type(file_name.as_deref()));
        let bytes = field.bytes().await?;

        let image = ImageSubmission::new(bytes.to_vec(), media_type);
        return Ok(match file_name {
            Some(name) => image.with_file_name(name),
            None => image,
        });
    }

    Err(ApiError::missing_field(FILE_FIELD))
}

fn guess_media_type(file_name: Option<&str>) -> String {
    let ext = file_name
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or("");
    ImageSubmission::media_type_for_extension(ext).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type(Some("snorlax.PNG")), "image/png");
        assert_eq!(guess_media_type(Some("noext")), "image/jpeg");
        assert_eq!(guess_media_type(None), "image/jpeg");
    }
}
