// ============================================================================
// Invoice Services - Operações de NFSe da API SpedNfse
// ============================================================================
//
// Este módulo encapsula as operações de nota fiscal de serviço eletrônica:
//
// 1. **Ciclo de vida:**
//    - Cálculo dos totais (calculate)
//    - Transmissão (transmit)
//    - Consulta (fetch_by_id)
//    - Cancelamento (cancel)
//
// 2. **Documentos:**
//    - DANFSe em PDF (print_document, print_cancel_document)
//    - XML autorizado (fetch_xml)
//    - RPS em PDF enquanto a nota processa (print_receipt)
//
// 3. **Municípios:**
//    - Homologação da cidade (check_city_availability)
//
// # Multi-tenant
//
// Toda operação recebe o CNPJ da empresa emissora e o envia no header
// `company-cnpj`, que escopa a requisição a uma única empresa da conta.

use crate::client::NfHubClient;
use crate::error::Result;
use crate::types::{Decode, ResponseEnvelope};
use serde_json::Value;

/// Header de tenant: CNPJ da empresa emissora
const COMPANY_CNPJ_HEADER: &str = "company-cnpj";

/// Operações de NFSe do NFHub
///
/// # Campos
///
/// - `client`: Cliente HTTP ([`NfHubClient`]) com autenticação configurada
///
/// # Thread-Safety
///
/// Este struct implementa `Clone` e pode ser compartilhado entre tasks;
/// o modo de decodificação é decidido por chamada, não há estado mutável.
#[derive(Debug, Clone)]
pub struct InvoiceServices {
    client: NfHubClient,
}

impl InvoiceServices {
    /// Cria uma nova instância de InvoiceServices
    pub fn new(client: NfHubClient) -> Self {
        Self { client }
    }

    /// Cria um InvoiceServices a partir de um token (conveniência)
    pub fn from_token(api_token: impl Into<String>) -> Result<Self> {
        let client = NfHubClient::new(api_token)?;
        Ok(Self::new(client))
    }

    /// Calcula os totais de uma NFSe
    ///
    /// # Endpoint da API
    ///
    /// `POST /invoice-services/calculate`
    ///
    /// # Argumentos
    ///
    /// - `company_cnpj`: CNPJ da empresa emissora (header `company-cnpj`)
    /// - `data`: Dados da nota (tomador, serviços, valores)
    /// - `params`: Parâmetros de query opcionais
    ///
    /// # Retorno
    ///
    /// - `Ok(ResponseEnvelope)`: Totais calculados, corpo JSON
    /// - `Err(SpedNfseError)`: Falha no cálculo, com a mensagem da API
    pub async fn calculate(
        &self,
        company_cnpj: &str,
        data: &Value,
        params: &[(&str, &str)],
    ) -> Result<ResponseEnvelope> {
        let headers = [(COMPANY_CNPJ_HEADER, company_cnpj)];

        self.client
            .post("/invoice-services/calculate", data, params, &headers, Decode::Json)
            .await
    }

    /// Transmite uma NFSe
    ///
    /// # Endpoint da API
    ///
    /// `POST /invoice-services`
    ///
    /// # Argumentos
    ///
    /// - `company_cnpj`: CNPJ da empresa emissora
    /// - `data`: Dados completos da nota a emitir
    /// - `params`: Parâmetros de query opcionais
    ///
    /// # Retorno
    ///
    /// - `Ok(ResponseEnvelope)`: Nota aceita para processamento; o corpo
    ///   traz o id para consulta posterior
    /// - `Err(SpedNfseError)`: Rejeição da prefeitura ou validação da API
    pub async fn transmit(
        &self,
        company_cnpj: &str,
        data: &Value,
        params: &[(&str, &str)],
    ) -> Result<ResponseEnvelope> {
        tracing::debug!("Transmitindo NFSe para a empresa {}", company_cnpj);

        let headers = [(COMPANY_CNPJ_HEADER, company_cnpj)];

        self.client
            .post("/invoice-services", data, params, &headers, Decode::Json)
            .await
    }

    /// Consulta uma NFSe pelo id
    ///
    /// # Endpoint da API
    ///
    /// `GET /invoice-services/{id}`
    pub async fn fetch_by_id(
        &self,
        company_cnpj: &str,
        id: u64,
        params: &[(&str, &str)],
    ) -> Result<ResponseEnvelope> {
        let headers = [(COMPANY_CNPJ_HEADER, company_cnpj)];
        let endpoint = format!("/invoice-services/{}", id);

        self.client
            .get(&endpoint, params, &headers, Decode::Json)
            .await
    }

    /// Busca a DANFSe de uma NFSe
    ///
    /// # Endpoint da API
    ///
    /// `GET /invoice-services/{id}/danfse`
    ///
    /// # Retorno
    ///
    /// O corpo do envelope são os bytes do PDF, sem decodificação.
    pub async fn print_document(
        &self,
        company_cnpj: &str,
        id: u64,
        params: &[(&str, &str)],
    ) -> Result<ResponseEnvelope> {
        let headers = [(COMPANY_CNPJ_HEADER, company_cnpj)];
        let endpoint = format!("/invoice-services/{}/danfse", id);

        self.client
            .get(&endpoint, params, &headers, Decode::Raw)
            .await
    }

    /// Busca o XML autorizado de uma NFSe
    ///
    /// # Endpoint da API
    ///
    /// `GET /invoice-services/{id}/xml`
    ///
    /// # Retorno
    ///
    /// O corpo do envelope são os bytes do XML, sem decodificação.
    pub async fn fetch_xml(
        &self,
        company_cnpj: &str,
        id: u64,
        params: &[(&str, &str)],
    ) -> Result<ResponseEnvelope> {
        let headers = [(COMPANY_CNPJ_HEADER, company_cnpj)];
        let endpoint = format!("/invoice-services/{}/xml", id);

        self.client
            .get(&endpoint, params, &headers, Decode::Raw)
            .await
    }

    /// Realiza o cancelamento de uma NFSe
    ///
    /// # Endpoint da API
    ///
    /// `POST /invoice-services/{id}/cancel`
    ///
    /// # Argumentos
    ///
    /// - `company_cnpj`: CNPJ da empresa emissora
    /// - `id`: Id da nota a cancelar
    /// - `data`: Dados do cancelamento (motivo, código municipal)
    /// - `params`: Parâmetros de query opcionais
    ///
    /// # IMPORTANTE
    ///
    /// Prazo e regras de cancelamento variam por município; fora do prazo
    /// a prefeitura rejeita e a mensagem retorna no erro.
    pub async fn cancel(
        &self,
        company_cnpj: &str,
        id: u64,
        data: &Value,
        params: &[(&str, &str)],
    ) -> Result<ResponseEnvelope> {
        tracing::debug!("Cancelando NFSe {} da empresa {}", id, company_cnpj);

        let headers = [(COMPANY_CNPJ_HEADER, company_cnpj)];
        let endpoint = format!("/invoice-services/{}/cancel", id);

        self.client
            .post(&endpoint, data, params, &headers, Decode::Json)
            .await
    }

    /// Busca a DANFSe com a marcação de cancelamento
    ///
    /// # Endpoint da API
    ///
    /// `GET /invoice-services/{id}/cancel/danfse`
    pub async fn print_cancel_document(
        &self,
        company_cnpj: &str,
        id: u64,
        params: &[(&str, &str)],
    ) -> Result<ResponseEnvelope> {
        let headers = [(COMPANY_CNPJ_HEADER, company_cnpj)];
        let endpoint = format!("/invoice-services/{}/cancel/danfse", id);

        self.client
            .get(&endpoint, params, &headers, Decode::Raw)
            .await
    }

    /// Busca o RPS (Recibo Provisório de Serviço) da NFSe em processamento
    ///
    /// # Endpoint da API
    ///
    /// `GET /invoice-services/{id}/rps/pdf`
    pub async fn print_receipt(
        &self,
        company_cnpj: &str,
        id: u64,
        params: &[(&str, &str)],
    ) -> Result<ResponseEnvelope> {
        let headers = [(COMPANY_CNPJ_HEADER, company_cnpj)];
        let endpoint = format!("/invoice-services/{}/rps/pdf", id);

        self.client
            .get(&endpoint, params, &headers, Decode::Raw)
            .await
    }

    /// Consulta a homologação do município
    ///
    /// # Endpoint da API
    ///
    /// `GET /invoice-services/cities/{city_id}`
    ///
    /// # Argumentos
    ///
    /// - `company_cnpj`: CNPJ da empresa emissora
    /// - `city_id`: Código IBGE do município
    ///
    /// # Retorno
    ///
    /// Indica se a emissão está disponível para o município e suas
    /// particularidades.
    pub async fn check_city_availability(
        &self,
        company_cnpj: &str,
        city_id: u64,
        params: &[(&str, &str)],
    ) -> Result<ResponseEnvelope> {
        let headers = [(COMPANY_CNPJ_HEADER, company_cnpj)];
        let endpoint = format!("/invoice-services/cities/{}", city_id);

        self.client
            .get(&endpoint, params, &headers, Decode::Raw)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_services_creation() {
        let client = NfHubClient::new("test-token").unwrap();
        let services = InvoiceServices::new(client);
        let _cloned = services.clone();
    }

    #[test]
    fn test_services_from_token() {
        assert!(InvoiceServices::from_token("test-token").is_ok());
    }
}
