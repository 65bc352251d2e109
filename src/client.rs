//! Cliente HTTP para a API do NFHub

use crate::error::{Result, SpedNfseError};
use crate::types::{Decode, ErrorBody, ResponseBody, ResponseEnvelope};
use reqwest::{Client as HttpClient, Response};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// URL base de produção da API do NFHub
const DEFAULT_BASE_URL: &str = "https://api.nfhub.com.br/v1";

const DEFAULT_TOTAL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Cliente para interagir com a API do NFHub
///
/// Centraliza conexão, autenticação e execução das requisições. O modo de
/// decodificação do corpo é um parâmetro explícito de cada chamada
/// ([`Decode`]), então uma mesma instância pode ser compartilhada entre
/// tasks sem que uma chamada esperando JSON observe o modo de outra
/// esperando bytes.
#[derive(Debug, Clone)]
pub struct NfHubClient {
    http_client: HttpClient,
    api_token: String,
    base_url: String,
}

impl NfHubClient {
    /// Cria um novo cliente NFHub
    ///
    /// # Argumentos
    ///
    /// * `api_token` - Token de autenticação da conta NFHub
    ///
    /// # Timeouts
    ///
    /// - Total: 30s
    /// - Connect: 5s
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::build(
            api_token.into(),
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_TOTAL_TIMEOUT_SECS,
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )
    }

    /// Cria um novo cliente com timeouts customizados
    pub fn with_timeouts(
        api_token: impl Into<String>,
        total_timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        Self::build(
            api_token.into(),
            DEFAULT_BASE_URL.to_string(),
            total_timeout_secs,
            connect_timeout_secs,
        )
    }

    /// Cria um novo cliente apontando para outra URL base
    ///
    /// Usado para ambientes de homologação e para testes locais.
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::build(
            api_token.into(),
            base_url.into(),
            DEFAULT_TOTAL_TIMEOUT_SECS,
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )
    }

    /// Cria um cliente a partir das variáveis de ambiente
    ///
    /// Lê `NFHUB_API_TOKEN` (obrigatória) e `NFHUB_API_BASE_URL`
    /// (opcional, padrão produção).
    pub fn from_env() -> Result<Self> {
        let api_token = std::env::var("NFHUB_API_TOKEN")
            .map_err(|_| SpedNfseError::Config("NFHUB_API_TOKEN não configurado".to_string()))?;
        let base_url = std::env::var("NFHUB_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::build(
            api_token,
            base_url,
            DEFAULT_TOTAL_TIMEOUT_SECS,
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )
    }

    fn build(
        api_token: String,
        base_url: String,
        total_timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(total_timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()
            .map_err(|e| SpedNfseError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Executa uma requisição GET
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
        decode: Decode,
    ) -> Result<ResponseEnvelope> {
        let url = self.build_url(endpoint);

        tracing::debug!("GET {}", url);

        let mut request = self
            .http_client
            .get(&url)
            .header("Authorization", &self.api_token)
            .header("Content-Type", "application/json");

        if !params.is_empty() {
            request = request.query(params);
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        self.handle_response(response, decode).await
    }

    /// Executa uma requisição POST
    pub async fn post(
        &self,
        endpoint: &str,
        data: &Value,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
        decode: Decode,
    ) -> Result<ResponseEnvelope> {
        let url = self.build_url(endpoint);

        tracing::debug!(
            "POST {} with body: {}",
            url,
            serde_json::to_string(data).unwrap_or_default()
        );

        let mut request = self
            .http_client
            .post(&url)
            .header("Authorization", &self.api_token)
            .header("Content-Type", "application/json")
            .json(data);

        if !params.is_empty() {
            request = request.query(params);
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        self.handle_response(response, decode).await
    }

    /// Monta o envelope de resposta e aplica a política de erro da API.
    ///
    /// Sucesso é estritamente a faixa 2xx. Fora dela, a mensagem do erro é
    /// extraída do corpo nesta ordem: campo `message`, campo `errors`
    /// (juntado com CRLF), ou o próprio envelope serializado.
    async fn handle_response(&self, response: Response, decode: Decode) -> Result<ResponseEnvelope> {
        let status = response.status();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }

        let bytes = response.bytes().await?;
        let body = match decode {
            // resposta sem corpo decodifica como null
            Decode::Json if bytes.is_empty() => ResponseBody::Json(Value::Null),
            Decode::Json => match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => ResponseBody::Json(value),
                Err(e) if status.is_success() => return Err(e.into()),
                // corpo de erro fora do formato JSON fica como bytes crus
                Err(_) => ResponseBody::Raw(bytes.to_vec()),
            },
            Decode::Raw => ResponseBody::Raw(bytes.to_vec()),
        };

        let envelope = ResponseEnvelope {
            http_code: status.as_u16(),
            body,
            headers,
        };

        if status.is_success() {
            Ok(envelope)
        } else {
            Err(self.api_error(envelope))
        }
    }

    /// Extrai a mensagem de erro de um envelope com status fora de 2xx
    fn api_error(&self, envelope: ResponseEnvelope) -> SpedNfseError {
        let status = envelope.http_code;
        let message = match envelope.error_body() {
            Some(ErrorBody {
                message: Some(message),
                ..
            }) => message,
            Some(ErrorBody {
                errors: Some(errors),
                ..
            }) => errors.join("\r\n"),
            _ => serde_json::to_string(&envelope).unwrap_or_else(|e| e.to_string()),
        };

        tracing::error!("NFHub API error ({}): {}", status, message);

        SpedNfseError::Api { status, message }
    }

    /// Constrói a URL completa para um endpoint
    fn build_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.trim_start_matches('/');
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Obtém o token de autenticação
    pub fn token(&self) -> &str {
        &self.api_token
    }

    /// Obtém a URL base configurada
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = NfHubClient::new("test-token").unwrap();
        assert_eq!(client.token(), "test-token");
        assert_eq!(client.base_url(), "https://api.nfhub.com.br/v1");
    }

    #[test]
    fn test_client_with_custom_timeouts() {
        let client = NfHubClient::with_timeouts("test-token", 60, 10).unwrap();
        assert_eq!(client.token(), "test-token");
    }

    #[test]
    fn test_url_building() {
        // barra no final da base e no início do endpoint são normalizadas
        let client = NfHubClient::with_base_url("test-token", "http://localhost:8080/").unwrap();

        assert_eq!(
            client.build_url("/invoice-services/42"),
            "http://localhost:8080/invoice-services/42"
        );
        assert_eq!(
            client.build_url("invoice-services"),
            "http://localhost:8080/invoice-services"
        );
    }

    #[test]
    fn test_from_env() {
        std::env::remove_var("NFHUB_API_TOKEN");
        assert!(matches!(
            NfHubClient::from_env(),
            Err(SpedNfseError::Config(_))
        ));

        std::env::set_var("NFHUB_API_TOKEN", "env-token");
        let client = NfHubClient::from_env().unwrap();
        assert_eq!(client.token(), "env-token");
        assert_eq!(client.base_url(), "https://api.nfhub.com.br/v1");
        std::env::remove_var("NFHUB_API_TOKEN");
    }
}
