//! Gemini `generateContent` client.
//!
//! Async HTTP client using `reqwest` with `x-goog-api-key` authentication.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{info, warn};

use crate::encoder::EncodedImage;
use crate::prompt;
use crate::types::{
    Content, FinalImage, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImageFile, Part, StyleDescription,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used to describe the reference image.
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash";

/// Model used to render the final portrait.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Errors from the Gemini client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing API key")]
    MissingKey,

    #[error("invalid API key")]
    InvalidKey,

    #[error("empty response: {0}")]
    EmptyResponse(String),

    #[error("malformed style description: {0}")]
    Malformed(String),

    #[error("response contained no image")]
    NoImage {
        /// Any text the model returned instead.
        text: String,
    },

    #[error("image decode error: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    analysis_model: String,
    image_model: String,
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// `timeout` applies to each whole request; `None` keeps reqwest's
    /// default (no timeout).
    pub fn new(api_key: &str, timeout: Option<Duration>) -> Result<Self, Error> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::MissingKey);
        }

        let mut key = HeaderValue::from_str(api_key).map_err(|_| Error::InvalidKey)?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-goog-api-key"), key);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: DEFAULT_BASE_URL.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        })
    }

    /// Overrides the API base URL (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the analysis and image models.
    pub fn with_models(mut self, analysis: impl Into<String>, image: impl Into<String>) -> Self {
        self.analysis_model = analysis.into();
        self.image_model = image.into();
        self
    }

    /// Describes a reference image as a [`StyleDescription`].
    pub async fn analyze(&self, image: &ImageFile) -> Result<StyleDescription, Error> {
        let encoded = EncodedImage::from_image(image);
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::inline(encoded.mime_type, encoded.data),
                Part::text(prompt::ANALYSIS_PROMPT),
            ])],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".into()),
                response_schema: Some(prompt::analysis_schema()),
                ..Default::default()
            }),
        };

        info!(
            model = %self.analysis_model,
            mime = %image.mime_type,
            size = image.bytes.len(),
            "requesting reference analysis"
        );
        let response = self.generate_content(&self.analysis_model, &request).await?;
        let text = response
            .text()
            .ok_or_else(|| Error::EmptyResponse(response.empty_reason()))?;

        let style = parse_style_description(&text)?;
        info!("reference analysis complete");
        Ok(style)
    }

    /// Renders the user photo in the described style.
    pub async fn generate(
        &self,
        image: &ImageFile,
        style: &StyleDescription,
    ) -> Result<FinalImage, Error> {
        let encoded = EncodedImage::from_image(image);
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::inline(encoded.mime_type, encoded.data),
                Part::text(prompt::generation_prompt(style)),
            ])],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".into(), "TEXT".into()]),
                ..Default::default()
            }),
        };

        info!(
            model = %self.image_model,
            mime = %image.mime_type,
            size = image.bytes.len(),
            "requesting portrait generation"
        );
        let response = self.generate_content(&self.image_model, &request).await?;
        let image = extract_image(&response)?;
        info!(mime = %image.mime_type, size = image.bytes.len(), "portrait generated");
        Ok(image)
    }

    /// Performs an authenticated `generateContent` POST.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, Error> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            model.trim().trim_start_matches("models/")
        );
        let resp = self.http.post(&url).json(request).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Parses the model's text output as a [`StyleDescription`].
pub fn parse_style_description(text: &str) -> Result<StyleDescription, Error> {
    serde_json::from_str(text.trim()).map_err(|e| Error::Malformed(e.to_string()))
}

/// Takes the first inline image part of the first candidate.
fn extract_image(response: &GenerateContentResponse) -> Result<FinalImage, Error> {
    let mut images = response
        .first_parts()
        .iter()
        .filter_map(|p| p.inline_data.as_ref())
        .filter(|d| !d.data.is_empty());

    let Some(inline) = images.next() else {
        let text = response.text().unwrap_or_else(|| response.empty_reason());
        return Err(Error::NoImage { text });
    };

    let extra = images.count();
    if extra > 0 {
        warn!(extra, "response contained more than one image, using the first");
    }

    let bytes = STANDARD.decode(inline.data.as_bytes())?;
    Ok(FinalImage::new(inline.mime_type.clone(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a one-shot mock HTTP server.
    ///
    /// The handle resolves to the raw request (head and body) it received.
    async fn mock_server(status: u16, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let Ok((mut stream, _)) = listener.accept().await else {
                return String::new();
            };
            let request = read_request(&mut stream).await;

            let resp = format!(
                "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes()).await;
            let _ = stream.shutdown().await;
            request
        });

        (url, handle)
    }

    /// Reads one HTTP/1.1 request with a `Content-Length` body.
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let n = stream.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    /// Extracts the JSON body from a captured request.
    fn request_json(raw: &str) -> serde_json::Value {
        let (_, body) = raw.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    fn reference() -> ImageFile {
        ImageFile::new("ref.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
    }

    fn style() -> StyleDescription {
        StyleDescription {
            scene: "a".into(),
            lighting: "b".into(),
            camera: "c".into(),
            character: "d".into(),
            color_palette: "e".into(),
            composition: "f".into(),
            style: "g".into(),
        }
    }

    /// Wraps a string as a `generateContent` text response.
    fn text_response(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn analyze_returns_style_description() {
        let body = text_response(
            r#"{"scene":"a","lighting":"b","camera":"c","character":"d","color_palette":"e","composition":"f","style":"g"}"#,
        );
        let (url, handle) = mock_server(200, &body).await;

        let client = Client::new("test-key", None).unwrap().with_base_url(url);
        let result = client.analyze(&reference()).await.unwrap();
        assert_eq!(result, style());

        let raw = handle.await.unwrap();
        assert!(raw.starts_with("POST /models/gemini-2.5-flash:generateContent"));
        assert!(raw.to_lowercase().contains("x-goog-api-key: test-key"));

        let json = request_json(&raw);
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "iVBORw==");
        assert!(parts[1]["text"].as_str().unwrap().contains("color palette"));
        let config = &json["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["required"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn analyze_malformed_text() {
        let (url, handle) = mock_server(200, &text_response("Sorry, I can't do that.")).await;

        let client = Client::new("test-key", None).unwrap().with_base_url(url);
        let err = client.analyze(&reference()).await.unwrap_err();
        assert!(matches!(err, Error::Malformed(_)), "{err}");

        handle.abort();
    }

    #[tokio::test]
    async fn analyze_schema_mismatch() {
        let (url, handle) = mock_server(200, &text_response(r#"{"scene":"a"}"#)).await;

        let client = Client::new("test-key", None).unwrap().with_base_url(url);
        let err = client.analyze(&reference()).await.unwrap_err();
        assert!(matches!(err, Error::Malformed(_)), "{err}");

        handle.abort();
    }

    #[tokio::test]
    async fn analyze_blocked_prompt() {
        let body = r#"{"candidates":[],"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let (url, handle) = mock_server(200, body).await;

        let client = Client::new("test-key", None).unwrap().with_base_url(url);
        let err = client.analyze(&reference()).await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"), "{err}");

        handle.abort();
    }

    #[tokio::test]
    async fn analyze_api_error() {
        let (url, handle) =
            mock_server(403, r#"{"error":{"code":403,"message":"API key not valid"}}"#).await;

        let client = Client::new("bad-key", None).unwrap().with_base_url(url);
        let err = client.analyze(&reference()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("403"), "error should mention 403: {msg}");

        handle.abort();
    }

    #[tokio::test]
    async fn generate_returns_image() {
        let body = r#"{"candidates":[{"content":{"parts":[
            {"text":"Here is your portrait."},
            {"inlineData":{"mimeType":"image/png","data":"AQID"}}
        ]}}]}"#;
        let (url, handle) = mock_server(200, body).await;

        let client = Client::new("test-key", None)
            .unwrap()
            .with_base_url(url)
            .with_models("analysis-x", "painter-y");
        let image = client.generate(&reference(), &style()).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(&image.bytes[..], &[1, 2, 3]);

        let raw = handle.await.unwrap();
        assert!(raw.starts_with("POST /models/painter-y:generateContent"));
        let json = request_json(&raw);
        assert_eq!(
            json["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE", "TEXT"])
        );
        let prompt = json["contents"][0]["parts"][1]["text"].as_str().unwrap();
        assert!(prompt.contains("Color palette: e"));
    }

    #[tokio::test]
    async fn generate_without_image_part() {
        let (url, handle) = mock_server(200, &text_response("I cannot edit this photo.")).await;

        let client = Client::new("test-key", None).unwrap().with_base_url(url);
        let err = client.generate(&reference(), &style()).await.unwrap_err();
        match err {
            Error::NoImage { text } => assert_eq!(text, "I cannot edit this photo."),
            other => panic!("expected NoImage, got {other}"),
        }

        handle.abort();
    }

    #[tokio::test]
    async fn generate_server_error() {
        let (url, handle) = mock_server(500, r#"{"error":{"message":"internal"}}"#).await;

        let client = Client::new("test-key", None).unwrap().with_base_url(url);
        let err = client.generate(&reference(), &style()).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, .. }));

        handle.abort();
    }

    #[tokio::test]
    async fn transport_failure_is_http_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = Client::new("test-key", Some(Duration::from_secs(5)))
            .unwrap()
            .with_base_url(format!("http://127.0.0.1:{port}"));
        let err = client.analyze(&reference()).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)), "{err}");
    }

    #[test]
    fn client_new_requires_key() {
        assert!(matches!(Client::new("", None), Err(Error::MissingKey)));
        assert!(matches!(Client::new("   ", None), Err(Error::MissingKey)));
    }

    #[test]
    fn client_new_rejects_invalid_header() {
        assert!(matches!(Client::new("bad\nkey", None), Err(Error::InvalidKey)));
    }

    #[test]
    fn client_defaults() {
        let client = Client::new("valid-key", None).unwrap();
        assert_eq!(client.analysis_model, DEFAULT_ANALYSIS_MODEL);
        assert_eq!(client.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = Client::new("k", None)
            .unwrap()
            .with_base_url("http://localhost:1234/v1beta/");
        assert_eq!(client.base_url, "http://localhost:1234/v1beta");
    }

    #[test]
    fn parse_style_description_trims_whitespace() {
        let text = "\n  {\"scene\":\"a\",\"lighting\":\"b\",\"camera\":\"c\",\"character\":\"d\",\"color_palette\":\"e\",\"composition\":\"f\",\"style\":\"g\"}\n";
        assert_eq!(parse_style_description(text).unwrap(), style());
    }

    #[test]
    fn extract_image_picks_first_of_many() {
        let json = r#"{"candidates":[{"content":{"parts":[
            {"inlineData":{"mimeType":"image/jpeg","data":"/9j/"}},
            {"inlineData":{"mimeType":"image/png","data":"AQID"}}
        ]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let image = extract_image(&resp).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
    }
}
