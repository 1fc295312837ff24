//! Read-only, colorized JSON-style view of the style description.

use cosmic::iced::{Font, Length};
use cosmic::widget::{self, container};
use cosmic::Element;

use cineframe_gemini::StyleDescription;

use crate::message::Message;
use crate::theme;

/// One `"key": "value"` line of the rendered object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    pub value: String,
    pub last: bool,
}

/// Quoted rows in schema order.
pub fn rows(style: &StyleDescription) -> Vec<Row> {
    let fields = style.fields();
    let count = fields.len();
    fields
        .into_iter()
        .enumerate()
        .map(|(i, (key, value))| Row {
            key: format!("\"{key}\""),
            value: format!("\"{}\"", value.replace('"', "\\\"")),
            last: i + 1 == count,
        })
        .collect()
}

/// Renders the style description as an indented object with colored
/// keys and values.
pub fn view(style: &StyleDescription) -> Element<'static, Message> {
    let mono = |s: String| widget::text::caption(s).font(Font::MONOSPACE);

    let mut lines = widget::column().spacing(2).push(mono("{".into()));
    for row in rows(style) {
        let mut line = widget::row()
            .push(mono("  ".into()))
            .push(mono(row.key).class(theme::CYAN))
            .push(mono(": ".into()))
            .push(mono(row.value).class(theme::PURPLE));
        if !row.last {
            line = line.push(mono(",".into()));
        }
        lines = lines.push(line);
    }
    lines = lines.push(mono("}".into()));

    container(widget::scrollable(lines).height(Length::Fixed(220.0)))
        .width(Length::Fill)
        .padding(12)
        .class(cosmic::theme::Container::Custom(Box::new(theme::code_bg)))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> StyleDescription {
        StyleDescription {
            scene: "rainy street".into(),
            lighting: "sodium vapor".into(),
            camera: "anamorphic".into(),
            character: "detective".into(),
            color_palette: "teal & orange".into(),
            composition: "low angle".into(),
            style: "say \"cut\"".into(),
        }
    }

    #[test]
    fn one_row_per_field_in_order() {
        let rows = rows(&style());
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "\"scene\"",
                "\"lighting\"",
                "\"camera\"",
                "\"character\"",
                "\"color_palette\"",
                "\"composition\"",
                "\"style\"",
            ]
        );
        assert_eq!(rows[0].value, "\"rainy street\"");
    }

    #[test]
    fn only_last_row_has_no_comma() {
        let rows = rows(&style());
        assert!(rows[..6].iter().all(|r| !r.last));
        assert!(rows[6].last);
    }

    #[test]
    fn embedded_quotes_escaped() {
        let rows = rows(&style());
        assert_eq!(rows[6].value, r#""say \"cut\"""#);
    }
}
