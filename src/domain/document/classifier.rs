//! Document classification and validation results

use serde::{Deserialize, Serialize};

use super::cnpj::{format_cnpj, is_valid_cnpj, CNPJ_LENGTH};
use super::cpf::{format_cpf, is_valid_cpf, CPF_LENGTH};
use super::normalize::only_digits;

/// Kind of taxpayer document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    Cpf,
    Cnpj,
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpf => "CPF",
            Self::Cnpj => "CNPJ",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Outcome message shown to API consumers
    pub fn message(&self, valid: bool) -> &'static str {
        match (self, valid) {
            (Self::Cpf, true) => "CPF válido",
            (Self::Cpf, false) => "CPF inválido",
            (Self::Cnpj, true) => "CNPJ válido",
            (Self::Cnpj, false) => "CNPJ inválido",
            (Self::Unknown, _) => "Documento deve ter 11 (CPF) ou 14 (CNPJ) dígitos",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of validating a single document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub input: String,
    pub formatted: String,
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    fn new(document_type: DocumentType, input: &str, formatted: String, valid: bool) -> Self {
        Self {
            document_type,
            input: input.to_string(),
            formatted,
            valid,
            message: document_type.message(valid).to_string(),
        }
    }
}

/// Validate `raw` as a CPF regardless of its length
pub fn validate_cpf(raw: &str) -> ValidationResult {
    ValidationResult::new(DocumentType::Cpf, raw, format_cpf(raw), is_valid_cpf(raw))
}

/// Validate `raw` as a CNPJ regardless of its length
pub fn validate_cnpj(raw: &str) -> ValidationResult {
    ValidationResult::new(DocumentType::Cnpj, raw, format_cnpj(raw), is_valid_cnpj(raw))
}

/// Pick CPF or CNPJ by digit count and validate accordingly.
///
/// Inputs that are neither 11 nor 14 digits come back as `UNKNOWN` with
/// `formatted` set to the raw input, untouched.
pub fn classify(raw: &str) -> ValidationResult {
    match only_digits(raw).len() {
        CPF_LENGTH => validate_cpf(raw),
        CNPJ_LENGTH => validate_cnpj(raw),
        _ => ValidationResult::new(DocumentType::Unknown, raw, raw.to_string(), false),
    }
}
