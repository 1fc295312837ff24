//! Bridge between the Gemini client and the pipeline's `StyleService` trait.

use std::future::Future;
use std::pin::Pin;

use cineframe_gemini::{Client, FinalImage, ImageFile, StyleDescription};
use cineframe_pipeline::{ServiceError, StyleService};

use crate::config::StudioConfig;

/// Implements [`StyleService`] on top of an optional Gemini client.
///
/// Without a client (no key, or a key that is not a valid header value)
/// every call fails with [`ServiceError::Unavailable`].
#[derive(Debug)]
pub struct GeminiService {
    client: Option<Client>,
    unavailable: String,
}

impl GeminiService {
    /// Builds the client from the current configuration.
    pub fn from_config(config: &StudioConfig) -> Result<Self, cineframe_gemini::Error> {
        let client = Client::new(&config.effective_api_key(), config.request_timeout())?
            .with_base_url(config.base_url.trim())
            .with_models(config.analysis_model.trim(), config.image_model.trim());
        Ok(Self {
            client: Some(client),
            unavailable: String::new(),
        })
    }

    /// A service that refuses every call with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            client: None,
            unavailable: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&Client, ServiceError> {
        self.client
            .as_ref()
            .ok_or_else(|| ServiceError::Unavailable(self.unavailable.clone()))
    }
}

impl StyleService for GeminiService {
    fn analyze(
        &self,
        image: &ImageFile,
    ) -> Pin<Box<dyn Future<Output = Result<StyleDescription, ServiceError>> + Send + '_>> {
        let image = image.clone();
        Box::pin(async move {
            self.client()?
                .analyze(&image)
                .await
                .map_err(to_service_error)
        })
    }

    fn generate(
        &self,
        image: &ImageFile,
        style: &StyleDescription,
    ) -> Pin<Box<dyn Future<Output = Result<FinalImage, ServiceError>> + Send + '_>> {
        let image = image.clone();
        let style = style.clone();
        Box::pin(async move {
            self.client()?
                .generate(&image, &style)
                .await
                .map_err(to_service_error)
        })
    }
}

fn to_service_error(e: cineframe_gemini::Error) -> ServiceError {
    use cineframe_gemini::Error;

    match e {
        Error::Http(e) => ServiceError::Transport(e.to_string()),
        Error::Api { status, body } => ServiceError::Api { status, body },
        Error::NoImage { text } => ServiceError::NoImage(text),
        Error::MissingKey | Error::InvalidKey => ServiceError::Unavailable(e.to_string()),
        Error::Json(_) | Error::EmptyResponse(_) | Error::Malformed(_) | Error::Decode(_) => {
            ServiceError::Malformed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageFile {
        ImageFile::new("ref.png", "image/png", vec![1, 2, 3])
    }

    #[tokio::test]
    async fn unavailable_service_refuses_calls() {
        let service = GeminiService::unavailable("missing API key");
        assert!(!service.is_available());

        let err = service.analyze(&image()).await.unwrap_err();
        assert_eq!(err, ServiceError::Unavailable("missing API key".into()));
    }

    #[test]
    fn from_config_without_key_fails() {
        let config = StudioConfig::default();
        // Only meaningful when the environment does not provide a key.
        if config.effective_api_key().is_empty() {
            assert!(matches!(
                GeminiService::from_config(&config),
                Err(cineframe_gemini::Error::MissingKey)
            ));
        }
    }

    #[test]
    fn from_config_with_key_builds_client() {
        let config = StudioConfig {
            api_key: "test-key".into(),
            ..StudioConfig::default()
        };
        let service = GeminiService::from_config(&config).unwrap();
        assert!(service.is_available());
    }

    #[test]
    fn error_mapping() {
        use cineframe_gemini::Error;

        assert_eq!(
            to_service_error(Error::Api {
                status: 400,
                body: "bad".into()
            }),
            ServiceError::Api {
                status: 400,
                body: "bad".into()
            }
        );
        assert_eq!(
            to_service_error(Error::NoImage {
                text: "sorry".into()
            }),
            ServiceError::NoImage("sorry".into())
        );
        assert!(matches!(
            to_service_error(Error::Malformed("eof".into())),
            ServiceError::Malformed(_)
        ));
        assert!(matches!(
            to_service_error(Error::InvalidKey),
            ServiceError::Unavailable(_)
        ));
    }
}
