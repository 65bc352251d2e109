//! Tipos de resposta da API SpedNfse do NFHub

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Modo de tratamento do corpo da resposta, escolhido por chamada.
///
/// `Json` desserializa o corpo; `Raw` devolve os bytes como recebidos,
/// para documentos binários (DANFSe e RPS em PDF, XML da NFSe).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decode {
    Json,
    Raw,
}

/// Corpo de uma resposta da API
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Corpo desserializado como JSON
    Json(Value),
    /// Bytes crus, sem desserialização
    Raw(Vec<u8>),
}

impl ResponseBody {
    /// Corpo como JSON, se foi desserializado
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Raw(_) => None,
        }
    }

    /// Corpo como bytes crus, se não foi desserializado
    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            ResponseBody::Raw(bytes) => Some(bytes),
            ResponseBody::Json(_) => None,
        }
    }
}

impl Serialize for ResponseBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ResponseBody::Json(value) => value.serialize(serializer),
            // bytes crus entram na serialização como texto UTF-8 com perdas
            ResponseBody::Raw(bytes) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

/// Envelope de resposta produzido pelo [`NfHubClient`](crate::NfHubClient)
///
/// Serializa com o nome de campo `httpCode`, o mesmo usado no payload
/// da API.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    /// Código de status HTTP da resposta
    #[serde(rename = "httpCode")]
    pub http_code: u16,
    /// Corpo da resposta
    pub body: ResponseBody,
    /// Headers da resposta
    pub headers: HashMap<String, String>,
}

impl ResponseEnvelope {
    /// Visão tipada do corpo de uma resposta de erro.
    ///
    /// Tenta interpretar o corpo como o payload de erro da API (campos
    /// opcionais `message` e `errors`), inclusive quando a resposta veio
    /// em modo `Raw` — um erro em uma chamada de PDF/XML ainda chega como
    /// JSON na rede.
    pub fn error_body(&self) -> Option<ErrorBody> {
        match &self.body {
            ResponseBody::Json(value) => serde_json::from_value(value.clone()).ok(),
            ResponseBody::Raw(bytes) => serde_json::from_slice(bytes).ok(),
        }
    }
}

/// Campos opcionais do payload de erro da API
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(http_code: u16, body: ResponseBody) -> ResponseEnvelope {
        ResponseEnvelope {
            http_code,
            body,
            headers: HashMap::new(),
        }
    }

    #[test]
    fn envelope_serializes_with_http_code_key() {
        let env = envelope(200, ResponseBody::Json(json!({"id": 42})));
        let serialized = serde_json::to_value(&env).unwrap();
        assert_eq!(serialized["httpCode"], 200);
        assert_eq!(serialized["body"]["id"], 42);
    }

    #[test]
    fn raw_body_serializes_as_lossy_string() {
        let env = envelope(500, ResponseBody::Raw(b"bad gateway".to_vec()));
        let serialized = serde_json::to_value(&env).unwrap();
        assert_eq!(serialized["body"], "bad gateway");
    }

    #[test]
    fn error_body_reads_message_from_json() {
        let env = envelope(404, ResponseBody::Json(json!({"message": "not found"})));
        let body = env.error_body().unwrap();
        assert_eq!(body.message.as_deref(), Some("not found"));
        assert!(body.errors.is_none());
    }

    #[test]
    fn error_body_reads_errors_from_raw_bytes() {
        let payload = br#"{"errors": ["a", "b"]}"#.to_vec();
        let env = envelope(422, ResponseBody::Raw(payload));
        let body = env.error_body().unwrap();
        assert!(body.message.is_none());
        assert_eq!(body.errors.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));
    }

    #[test]
    fn error_body_is_none_for_non_object_bodies() {
        let env = envelope(502, ResponseBody::Raw(b"<html>Bad Gateway</html>".to_vec()));
        assert!(env.error_body().is_none());
    }

    #[test]
    fn body_accessors() {
        let json_body = ResponseBody::Json(json!([1, 2]));
        assert!(json_body.as_json().is_some());
        assert!(json_body.as_raw().is_none());

        let raw_body = ResponseBody::Raw(vec![0x25, 0x50, 0x44, 0x46]);
        assert_eq!(raw_body.as_raw(), Some(&[0x25, 0x50, 0x44, 0x46][..]));
        assert!(raw_body.as_json().is_none());
    }
}
