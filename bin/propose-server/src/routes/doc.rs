use utoipa::OpenApi;

use crate::routes::{health, models, quote};

#[derive(OpenApi)]
#[openapi(info(
    title = "propose-server",
    description = "Sales-call to proposal generation API",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(models::ModelsApi::openapi());
    root.merge(quote::QuoteApi::openapi());
    root
}
