//! Cliente da API SpedNfse do NFHub
//!
//! Este crate fornece uma interface tipo-segura para emissão, consulta,
//! impressão e cancelamento de NFSe (notas fiscais de serviço eletrônicas
//! municipais) através do serviço SpedNfse do NFHub.
//!
//! Duas camadas:
//!
//! - [`NfHubClient`]: conexão, autenticação e execução das requisições.
//!   O modo de decodificação do corpo (JSON ou bytes crus) é um parâmetro
//!   explícito de cada chamada, então o cliente pode ser compartilhado
//!   entre tasks sem estado mutável.
//! - [`InvoiceServices`]: as operações de NFSe, sempre escopadas a uma
//!   empresa pelo header `company-cnpj`.
//!
//! # Exemplo Básico
//!
//! ```rust,ignore
//! use nfhub_spednfse::{InvoiceServices, NfHubClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> nfhub_spednfse::Result<()> {
//!     // IMPORTANTE: Ler de variáveis de ambiente (NUNCA hardcode!)
//!     let client = NfHubClient::from_env()?;
//!     let services = InvoiceServices::new(client);
//!
//!     let totals = services
//!         .calculate("11222333000181", &json!({"items": []}), &[])
//!         .await?;
//!     println!("{:?}", totals.body.as_json());
//!
//!     Ok(())
//! }
//! ```

// Módulos públicos
pub mod client;
pub mod error;
pub mod invoices;
pub mod types;

// Re-exports principais
pub use client::NfHubClient;
pub use error::{Result, SpedNfseError};
pub use invoices::InvoiceServices;
pub use types::{Decode, ErrorBody, ResponseBody, ResponseEnvelope};
