use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::error::ComicError;

/// CORS for the configured origins, with credentials.
///
/// Methods and headers are mirrored from the preflight, since a literal `*`
/// is not allowed together with credentials.
pub(crate) fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, ComicError> {
    let origins = allowed_origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if origin == "*" {
                return Err(ComicError::Config(
                    "CORS origin \"*\" cannot be combined with credentials".to_string(),
                ));
            }
            HeaderValue::from_str(origin).map_err(|err| {
                ComicError::Config(format!("Invalid CORS origin {origin:?}: {err}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
