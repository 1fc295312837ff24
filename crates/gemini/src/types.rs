//! Domain types and `generateContent` wire types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An image picked by the user, held in memory for the session.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// File name shown in the UI (no directory).
    pub name: String,
    /// Media type, one of `image/png`, `image/jpeg`, `image/webp`.
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

// Byte payloads end up in message logs; print the size only.
impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Structured description of a reference image's visual style.
///
/// Field order matches the declared response schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleDescription {
    pub scene: String,
    pub lighting: String,
    pub camera: String,
    pub character: String,
    pub color_palette: String,
    pub composition: String,
    pub style: String,
}

impl StyleDescription {
    /// JSON property names, in schema order.
    pub const FIELDS: [&'static str; 7] = [
        "scene",
        "lighting",
        "camera",
        "character",
        "color_palette",
        "composition",
        "style",
    ];

    /// `(property, value)` pairs in schema order.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("scene", &self.scene),
            ("lighting", &self.lighting),
            ("camera", &self.camera),
            ("character", &self.character),
            ("color_palette", &self.color_palette),
            ("composition", &self.composition),
            ("style", &self.style),
        ]
    }
}

/// The generated portrait returned by the image model.
#[derive(Clone, PartialEq, Eq)]
pub struct FinalImage {
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl FinalImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_png(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case("image/png")
    }
}

impl fmt::Debug for FinalImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinalImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".into()),
            parts,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    #[serde(alias = "mime_type")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

/// Response body from `generateContent` (only the fields we read).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate, or an empty slice.
    pub fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }

    /// Why the response carries nothing usable, for diagnostics.
    pub fn empty_reason(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return format!("prompt blocked: {reason}");
        }
        match self.candidates.first() {
            None => "no candidates".into(),
            Some(c) => match c.finish_reason.as_deref() {
                Some(reason) => format!("finish reason: {reason}"),
                None => "candidate has no content".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_style() -> StyleDescription {
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

    #[test]
    fn style_description_parses_all_fields() {
        let json = r#"{"scene":"a","lighting":"b","camera":"c","character":"d",
            "color_palette":"e","composition":"f","style":"g"}"#;
        let style: StyleDescription = serde_json::from_str(json).unwrap();
        assert_eq!(style, sample_style());
    }

    #[test]
    fn style_description_missing_field_rejected() {
        let json = r#"{"scene":"a","lighting":"b"}"#;
        assert!(serde_json::from_str::<StyleDescription>(json).is_err());
    }

    #[test]
    fn style_description_unknown_field_rejected() {
        let json = r#"{"scene":"a","lighting":"b","camera":"c","character":"d",
            "color_palette":"e","composition":"f","style":"g","mood":"h"}"#;
        assert!(serde_json::from_str::<StyleDescription>(json).is_err());
    }

    #[test]
    fn style_fields_follow_schema_order() {
        let style = sample_style();
        let names: Vec<&str> = style.fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, StyleDescription::FIELDS);
        assert_eq!(style.fields()[4], ("color_palette", "e"));
    }

    #[test]
    fn final_image_png_detection() {
        assert!(FinalImage::new("image/png", vec![1, 2, 3]).is_png());
        assert!(FinalImage::new("IMAGE/PNG", vec![1]).is_png());
        assert!(!FinalImage::new("image/jpeg", vec![]).is_png());
    }

    #[test]
    fn image_file_debug_hides_bytes() {
        let file = ImageFile::new("ref.png", "image/png", vec![0; 4096]);
        let dbg = format!("{file:?}");
        assert!(dbg.contains("len: 4096"));
        assert!(dbg.len() < 200);
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::inline("image/png", "AAAA"),
                Part::text("describe"),
            ])],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".into()),
                ..Default::default()
            }),
        };
        let value = serde_json::to_value(&req).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
        assert_eq!(parts[1]["text"], "describe");
        assert!(parts[1].get("inlineData").is_none());
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(value["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn response_text_concatenates_parts() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn response_accepts_snake_case_inline_data() {
        let json = r#"{"candidates":[{"content":{"parts":[
            {"inline_data":{"mime_type":"image/png","data":"AQID"}}
        ]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let inline = resp.first_parts()[0].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert!(resp.text().is_none());
    }

    #[test]
    fn empty_reason_reports_block() {
        let json = r#"{"candidates":[],"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.empty_reason(), "prompt blocked: SAFETY");

        let resp = GenerateContentResponse::default();
        assert_eq!(resp.empty_reason(), "no candidates");
    }
}
