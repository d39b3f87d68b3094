//! # Configuration
//!
//! File form of the generator configuration.
//!
//! ```yaml
//! title: Todo API
//! version: 2.1.0
//! servers:
//!   - url: https://api.example.com
//! bearer_auth: true
//! api_key:
//!   name: X-API-Key
//!   in: header
//! ```

use crate::error::{AppError, AppResult};
use crate::generator::{Generator, DEFAULT_DOCUMENT_PATH};
use crate::oas::document::{Contact, Info, License, ParameterIn, SecurityScheme, Server, Tag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default document title.
pub const DEFAULT_TITLE: &str = "API Documentation";

/// Default API version.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Default document description.
pub const DEFAULT_DESCRIPTION: &str = "API documentation powered by OpenAPI and Swagger UI";

/// Generator settings loaded from YAML or JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocConfig {
    /// Document title.
    pub title: String,
    /// API version.
    pub version: String,
    /// Document description. Empty means none.
    pub description: String,
    /// Terms of service URL.
    pub terms_of_service: Option<String>,
    /// Contact information.
    pub contact: Option<Contact>,
    /// License information.
    pub license: Option<License>,
    /// Servers.
    pub servers: Vec<Server>,
    /// Path the document is served from.
    pub document_path: String,
    /// Registers `basicAuth`.
    pub basic_auth: bool,
    /// Registers `bearerAuth`.
    pub bearer_auth: bool,
    /// Registers `apiKey`.
    pub api_key: Option<ApiKeyConfig>,
    /// Additional named schemes, carried through unchanged.
    pub security_schemes: BTreeMap<String, SecurityScheme>,
    /// Tag descriptions.
    pub tags: Vec<Tag>,
}

/// Where the `apiKey` scheme reads its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyConfig {
    /// Header, query or cookie name.
    pub name: String,
    /// Location of the key.
    #[serde(rename = "in", default = "default_api_key_location")]
    pub location: ParameterIn,
}

fn default_api_key_location() -> ParameterIn {
    ParameterIn::Header
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            version: DEFAULT_VERSION.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            terms_of_service: None,
            contact: None,
            license: None,
            servers: Vec::new(),
            document_path: DEFAULT_DOCUMENT_PATH.to_string(),
            basic_auth: false,
            bearer_auth: false,
            api_key: None,
            security_schemes: BTreeMap::new(),
            tags: Vec::new(),
        }
    }
}

impl DocConfig {
    /// Loads a config file. `.json` files are read as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::General(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// The info block described by this config.
    pub fn info(&self) -> Info {
        Info {
            title: self.title.clone(),
            description: (!self.description.is_empty()).then(|| self.description.clone()),
            version: self.version.clone(),
            terms_of_service: self.terms_of_service.clone(),
            contact: self.contact.clone(),
            license: self.license.clone(),
        }
    }

    /// Builds a configured generator.
    pub fn into_generator(self) -> Generator {
        let mut generator = Generator::new(self.info()).with_document_path(self.document_path);

        for server in self.servers {
            generator = generator.with_server(server.url, server.description.unwrap_or_default());
        }
        if self.basic_auth {
            generator = generator.with_basic_auth("basicAuth", "");
        }
        if self.bearer_auth {
            generator = generator.with_bearer_auth("bearerAuth", "");
        }
        if let Some(api_key) = self.api_key {
            generator = generator.with_api_key("apiKey", "", api_key.location, api_key.name);
        }
        for (name, scheme) in self.security_schemes {
            generator = generator.with_security_scheme(name, scheme);
        }
        for tag in self.tags {
            generator = generator.with_tag(tag.name, tag.description.unwrap_or_default());
        }

        generator
    }
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let config = DocConfig::default();
        assert_eq!(config.title, "API Documentation");
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.document_path, "/openapi.json");

        let doc = config.into_generator().generate(&[]);
        assert_eq!(
            doc.info.description.as_deref(),
            Some("API documentation powered by OpenAPI and Swagger UI")
        );
    }

    #[test]
    fn test_load_yaml() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            r#"
title: Todo API
version: 2.1.0
servers:
  - url: https://api.example.com
    description: Production
bearer_auth: true
api_key:
  name: X-API-Key
document_path: /spec.json
"#
        )
        .unwrap();

        let config = DocConfig::load(file.path()).unwrap();
        assert_eq!(config.title, "Todo API");
        assert_eq!(config.version, "2.1.0");
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
        assert_eq!(
            config.api_key,
            Some(ApiKeyConfig {
                name: "X-API-Key".into(),
                location: ParameterIn::Header
            })
        );

        let generator = config.into_generator();
        assert_eq!(generator.document_path(), "/spec.json");
        let value = serde_json::to_value(generator.generate(&[])).unwrap();
        assert_eq!(
            value["components"]["securitySchemes"],
            json!({
                "apiKey": {"type": "apiKey", "name": "X-API-Key", "in": "header"},
                "bearerAuth": {"type": "http", "scheme": "bearer", "bearerFormat": "JWT"}
            })
        );
        assert_eq!(value["servers"][0]["url"], json!("https://api.example.com"));
    }

    #[test]
    fn test_load_json_with_custom_scheme() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"title": "Ops", "description": "", "security_schemes": {{"oidc": {{"type": "openIdConnect", "openIdConnectUrl": "https://id.example.com/.well-known/openid-configuration"}}}}}}"#
        )
        .unwrap();

        let config = DocConfig::load(file.path()).unwrap();
        assert_eq!(config.info().description, None);
        let doc = config.into_generator().generate(&[]);
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("oidc"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = DocConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
