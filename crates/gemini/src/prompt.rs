//! Prompt text and the structured-output schema.

use serde_json::{Value, json};

use crate::types::StyleDescription;

/// Instruction sent alongside the reference image.
pub const ANALYSIS_PROMPT: &str = "You are a cinematographer and art director. \
Study this reference image and describe its visual style so it can be \
reproduced on a different person. Describe the scene and setting, the \
lighting (key, fill, direction, quality, color temperature), the camera \
framing (shot type, angle, lens, depth of field), the character (pose, \
wardrobe, expression), the color palette, the composition and the overall \
artistic style. Return a single JSON object with exactly these string \
fields: scene, lighting, camera, character, color_palette, composition, style.";

/// Response schema declaring the seven required string properties.
pub fn analysis_schema() -> Value {
    let properties: serde_json::Map<String, Value> = StyleDescription::FIELDS
        .iter()
        .map(|name| ((*name).to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": StyleDescription::FIELDS,
        "propertyOrdering": StyleDescription::FIELDS,
    })
}

/// Instruction sent alongside the user photo.
///
/// Every field of the description becomes an explicit directive.
pub fn generation_prompt(style: &StyleDescription) -> String {
    format!(
        "Create a photorealistic cinematic portrait of the person in the \
supplied photo. Preserve their facial features, identity and likeness \
exactly; do not change who they are. Reproduce the following look:\n\
- Scene: {scene}\n\
- Lighting: {lighting}\n\
- Camera: {camera}\n\
- Character: {character}\n\
- Color palette: {color_palette}\n\
- Composition: {composition}\n\
- Style: {style}\n\
Return the final image.",
        scene = style.scene,
        lighting = style.lighting,
        camera = style.camera,
        character = style.character,
        color_palette = style.color_palette,
        composition = style.composition,
        style = style.style,
    )
}
