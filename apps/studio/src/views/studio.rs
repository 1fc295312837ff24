//! Studio view: three stage cards, footer actions and the error banner.

use std::sync::Arc;

use cosmic::iced::widget::image::Handle;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{self, container};
use cosmic::Element;

use cineframe_pipeline::{Session, Stage, StageStatus};

use crate::message::{ImageSlot, Message};
use crate::theme;
use crate::views::style_viewer;

const PREVIEW_HEIGHT: f32 = 200.0;
const OUTPUT_HEIGHT: f32 = 360.0;

/// Decoded image handle tied to the bytes it was built from.
#[derive(Debug, Clone)]
struct Preview {
    source: Arc<[u8]>,
    handle: Handle,
}

/// Image handles for the two uploads and the result.
///
/// Rebuilt only when the underlying bytes change.
#[derive(Debug, Clone, Default)]
pub struct Previews {
    reference: Option<Preview>,
    user: Option<Preview>,
    output: Option<Preview>,
}

impl Previews {
    /// Brings the handles in line with the session.
    pub fn sync(&mut self, session: &Session) {
        refresh(&mut self.reference, session.reference_image().map(|i| &i.bytes));
        refresh(&mut self.user, session.user_image().map(|i| &i.bytes));
        refresh(&mut self.output, session.final_image().map(|i| &i.bytes));
    }

    fn handle(&self, slot: ImageSlot) -> Option<&Handle> {
        match slot {
            ImageSlot::Reference => self.reference.as_ref(),
            ImageSlot::User => self.user.as_ref(),
        }
        .map(|p| &p.handle)
    }
}

fn refresh(slot: &mut Option<Preview>, bytes: Option<&Arc<[u8]>>) {
    match bytes {
        None => *slot = None,
        Some(bytes) => {
            if slot.as_ref().is_some_and(|p| Arc::ptr_eq(&p.source, bytes)) {
                return;
            }
            *slot = Some(Preview {
                source: bytes.clone(),
                handle: Handle::from_bytes(bytes.to_vec()),
            });
        }
    }
}

/// Renders the studio page.
pub fn view<'a>(
    session: &'a Session,
    previews: &'a Previews,
    note: Option<&'a str>,
) -> Element<'a, Message> {
    let mut content = widget::column().spacing(16);

    content = content.push(
        widget::column()
            .push(widget::text::title3("Cinematic Face Transformer"))
            .push(
                widget::text(
                    "Capture the look of a film frame, then step into it with your own photo.",
                )
                .class(theme::MUTED_TEXT),
            )
            .spacing(4),
    );

    if let Some(err) = session.error() {
        content = content.push(
            container(widget::text(err.to_string()).class(theme::ERROR_TEXT))
                .width(Length::Fill)
                .padding(12)
                .class(cosmic::theme::Container::Custom(Box::new(theme::error_bg))),
        );
    }

    let cards = widget::row()
        .push(stage_card(session, Stage::Reference, reference_body(session, previews)))
        .push(stage_card(session, Stage::Personalization, personalization_body(session, previews)))
        .push(stage_card(session, Stage::FinalOutput, output_body(session, previews)))
        .spacing(16)
        .width(Length::Fill);
    content = content.push(cards);

    content = content.push(footer(session));

    if let Some(note) = note {
        content = content.push(widget::text::caption(note).class(theme::MUTED_TEXT));
    }

    widget::scrollable(content).into()
}

/// Card frame with a numbered status badge.
fn stage_card<'a>(
    session: &Session,
    stage: Stage,
    body: Element<'a, Message>,
) -> Element<'a, Message> {
    let status = session.stage_status(stage);
    let color = theme::status_color(status);

    let header = widget::row()
        .push(widget::text::title4(stage.number().to_string()).class(color))
        .push(widget::text::heading(stage.title()))
        .push(widget::Space::with_width(Length::Fill))
        .push(widget::text::caption(status.label().to_uppercase()).class(color))
        .spacing(10)
        .align_y(Alignment::Center);

    container(widget::column().push(header).push(body).spacing(12).padding(16))
        .width(Length::FillPortion(1))
        .class(cosmic::theme::Container::Custom(Box::new(theme::stage_card(
            status,
        ))))
        .into()
}

fn reference_body<'a>(session: &'a Session, previews: &'a Previews) -> Element<'a, Message> {
    let mut body = widget::column().spacing(12);
    body = body.push(
        widget::text::caption("Upload a still from a film whose look you want to borrow.")
            .class(theme::MUTED_TEXT),
    );
    body = body.push(uploader(
        ImageSlot::Reference,
        session.reference_image().map(|i| i.name.as_str()),
        previews.handle(ImageSlot::Reference),
        !session.is_busy(),
    ));

    if session.is_analyzing() {
        body = body.push(widget::text::caption("Analyzing reference style...").class(theme::PURPLE));
    } else if let Some(style) = session.style() {
        body = body.push(widget::text::caption("Style description").class(theme::MUTED_TEXT));
        body = body.push(style_viewer::view(style));
    }

    body.into()
}

fn personalization_body<'a>(session: &'a Session, previews: &'a Previews) -> Element<'a, Message> {
    let ready = session.stage_status(Stage::Personalization) != StageStatus::Pending;
    let hint = if ready {
        "Upload a clear photo of your face."
    } else {
        "Available once the reference has been analyzed."
    };

    widget::column()
        .push(widget::text::caption(hint).class(theme::MUTED_TEXT))
        .push(uploader(
            ImageSlot::User,
            session.user_image().map(|i| i.name.as_str()),
            previews.handle(ImageSlot::User),
            ready && !session.is_generating(),
        ))
        .spacing(12)
        .into()
}

fn output_body<'a>(session: &'a Session, previews: &'a Previews) -> Element<'a, Message> {
    let panel: Element<'a, Message> = if session.is_generating() {
        placeholder(
            "Generating your cinematic portrait...",
            "This can take up to a minute.",
            OUTPUT_HEIGHT,
        )
    } else if let Some(preview) = &previews.output {
        container(
            widget::image(preview.handle.clone())
                .width(Length::Fill)
                .height(Length::Fixed(OUTPUT_HEIGHT)),
        )
        .width(Length::Fill)
        .into()
    } else {
        placeholder(
            "Your portrait will appear here",
            "Complete the first two steps, then generate.",
            OUTPUT_HEIGHT,
        )
    };

    widget::column()
        .push(
            widget::text::caption("The final image blends your likeness with the reference style.")
                .class(theme::MUTED_TEXT),
        )
        .push(panel)
        .spacing(12)
        .into()
}

/// Click-to-pick slot showing the current image when there is one.
fn uploader<'a>(
    slot: ImageSlot,
    file_name: Option<&'a str>,
    handle: Option<&'a Handle>,
    enabled: bool,
) -> Element<'a, Message> {
    let inner: Element<'a, Message> = match handle {
        Some(handle) => widget::column()
            .push(
                widget::image(handle.clone())
                    .width(Length::Fill)
                    .height(Length::Fixed(PREVIEW_HEIGHT)),
            )
            .push(widget::text::caption(file_name.unwrap_or_default()).class(theme::MUTED_TEXT))
            .spacing(6)
            .align_x(Alignment::Center)
            .into(),
        None => placeholder("Click to upload", "PNG, JPG or WEBP", PREVIEW_HEIGHT),
    };

    let btn = widget::button::custom(inner).width(Length::Fill);
    if enabled {
        btn.on_press(Message::PickImage(slot)).into()
    } else {
        btn.into()
    }
}

fn placeholder<'a>(title: &'a str, detail: &'a str, height: f32) -> Element<'a, Message> {
    container(
        widget::column()
            .push(widget::text(title))
            .push(widget::text::caption(detail).class(theme::MUTED_TEXT))
            .spacing(4)
            .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fixed(height))
    .align_x(Alignment::Center)
    .align_y(Alignment::Center)
    .class(cosmic::theme::Container::Custom(Box::new(theme::placeholder_bg)))
    .into()
}

/// Start Over, Download and Generate actions.
fn footer(session: &Session) -> Element<'_, Message> {
    let mut row = widget::row().spacing(12).align_y(Alignment::Center);

    if session.has_progress() {
        let reset = widget::button::destructive("Start Over");
        row = row.push(if session.is_busy() {
            reset
        } else {
            reset.on_press(Message::Reset)
        });
    }

    row = row.push(widget::Space::with_width(Length::Fill));

    if session.final_image().is_some() {
        row = row.push(widget::button::standard("Download").on_press(Message::Download));
    }

    let label = if session.is_generating() {
        "Generating..."
    } else {
        "Generate Final Image"
    };
    let generate = widget::button::suggested(label);
    row = row.push(if session.can_generate() {
        generate.on_press(Message::Generate)
    } else {
        generate
    });

    row.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cineframe_gemini::{FinalImage, ImageFile, StyleDescription};
    use cineframe_pipeline::{Command, Pipeline};

    fn image(name: &str) -> ImageFile {
        ImageFile::new(name, "image/png", vec![1, 2, 3])
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

    #[test]
    fn previews_follow_session() {
        let mut pipeline = Pipeline::new();
        let mut previews = Previews::default();

        previews.sync(pipeline.session());
        assert!(previews.handle(ImageSlot::Reference).is_none());

        let Command::Analyze { ticket, .. } = pipeline.select_reference(image("ref.png")) else {
            panic!("expected analyze command");
        };
        pipeline.finish_analysis(ticket, Ok(style()));
        pipeline.select_user_image(image("me.png"));
        previews.sync(pipeline.session());
        assert!(previews.handle(ImageSlot::Reference).is_some());
        assert!(previews.handle(ImageSlot::User).is_some());
        assert!(previews.output.is_none());

        let Command::Generate { ticket, .. } = pipeline.generate() else {
            panic!("expected generate command");
        };
        pipeline.finish_generation(ticket, Ok(FinalImage::new("image/png", vec![9])));
        previews.sync(pipeline.session());
        assert!(previews.output.is_some());

        pipeline.reset();
        previews.sync(pipeline.session());
        assert!(previews.reference.is_none());
        assert!(previews.user.is_none());
        assert!(previews.output.is_none());
    }

    #[test]
    fn preview_reused_for_same_bytes() {
        let img = image("ref.png");
        let mut slot = None;
        refresh(&mut slot, Some(&img.bytes));
        let first = slot.as_ref().map(|p| p.source.clone());

        refresh(&mut slot, Some(&img.bytes));
        let second = slot.as_ref().map(|p| p.source.clone());
        assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));

        let other = image("other.png");
        refresh(&mut slot, Some(&other.bytes));
        assert!(Arc::ptr_eq(&slot.unwrap().source, &other.bytes));
    }
}
