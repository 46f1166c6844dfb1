//! CLI module for the CPF/CNPJ API
//!
//! - `serve`: run the HTTP server
//! - `migrate`: apply PostgreSQL migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// CPF/CNPJ validation API with per-key daily quotas
#[derive(Parser)]
#[command(name = "cpf-cnpj-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply PostgreSQL migrations and exit
    Migrate,
}
