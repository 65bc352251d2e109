//! Tipos de erro para o crate nfhub-spednfse

use thiserror::Error;

/// Erros do cliente SpedNfse
#[derive(Debug, Error)]
pub enum SpedNfseError {
    /// Erro de requisição HTTP
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Erro da API do NFHub (status fora de 2xx).
    ///
    /// O `Display` é apenas a mensagem extraída do corpo da resposta,
    /// sem prefixo de status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Erro de parsing JSON
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, SpedNfseError>;
