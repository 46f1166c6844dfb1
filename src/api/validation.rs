//! Document validation endpoints

use axum::Json;
use serde::Deserialize;

use crate::api::middleware::RequireApiKey;
use crate::api::types::Query;
use crate::domain::document::{classify, validate_cnpj, validate_cpf, ValidationResult};
use crate::infrastructure::observability::record_validation;

/// `?number=` carried by every validation route
#[derive(Debug, Deserialize)]
pub struct NumberQuery {
    pub number: String,
}

/// `GET /validate/cpf`
pub async fn validate_cpf_handler(
    Query(query): Query<NumberQuery>,
    RequireApiKey(_admitted): RequireApiKey,
) -> Json<ValidationResult> {
    Json(recorded(validate_cpf(&query.number)))
}

/// `GET /validate/cnpj`
pub async fn validate_cnpj_handler(
    Query(query): Query<NumberQuery>,
    RequireApiKey(_admitted): RequireApiKey,
) -> Json<ValidationResult> {
    Json(recorded(validate_cnpj(&query.number)))
}

/// `GET /validate/document` - CPF or CNPJ picked by digit count
pub async fn validate_document_handler(
    Query(query): Query<NumberQuery>,
    RequireApiKey(_admitted): RequireApiKey,
) -> Json<ValidationResult> {
    Json(recorded(classify(&query.number)))
}

fn recorded(result: ValidationResult) -> ValidationResult {
    record_validation(result.document_type.as_str(), result.valid);
    result
}
