//! OpenAPI document for the book schemas.

use crate::model::Book;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Book API", description = "CRUD over book records"),
    components(schemas(Book))
)]
pub struct ApiDoc;
