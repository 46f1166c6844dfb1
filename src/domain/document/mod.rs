//! Brazilian taxpayer documents
//!
//! Normalization, check digit validation and formatting for CPF and CNPJ,
//! plus the classifier that routes a raw input to one of them.

mod classifier;
mod cnpj;
mod cpf;
mod normalize;

pub use classifier::{classify, validate_cnpj, validate_cpf, DocumentType, ValidationResult};
pub use cnpj::{format_cnpj, is_valid_cnpj, CNPJ_LENGTH};
pub use cpf::{format_cpf, is_valid_cpf, CPF_LENGTH};
pub use normalize::only_digits;
