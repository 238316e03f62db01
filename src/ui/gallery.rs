/// Gallery screen
///
/// Wrap grid of the uploaded photographs with the whole selection
/// workflow: click to select (one more copy per click), shift-click to
/// range-select, per-photo copy controls, bulk delete, a secondary upload
/// action and the print entry point.

use iced::widget::{
    button, column, container, horizontal_space, image, mouse_area, pick_list, row, scrollable,
    text,
};
use iced::{Alignment, Border, Color, Element, Length, Theme};
use iced_aw::Wrap;

use crate::state::data::Photography;
use crate::state::selection::{next_multiple, PRINT_GROUP_SIZE};
use crate::{Message, PhotoPrint, PrintedFilter};

const CARD_WIDTH: f32 = 220.0;
const CARD_HEIGHT: f32 = 160.0;

pub fn view(app: &PhotoPrint) -> Element<'_, Message> {
    if app.busy && app.photos.is_empty() {
        return centered_note("Loading photographs...");
    }

    let toolbar = toolbar(app);

    if app.photos.is_empty() {
        return column![toolbar, centered_note("No photographs to show.")]
            .spacing(16)
            .into();
    }

    let cards: Vec<Element<Message>> = app
        .photos
        .iter()
        .enumerate()
        .map(|(index, photo)| photo_card(app, index, photo))
        .collect();

    let grid = Wrap::with_elements(cards).spacing(12.0).line_spacing(12.0);

    column![toolbar, scrollable(grid).height(Length::Fill)]
        .spacing(16)
        .into()
}

fn toolbar(app: &PhotoPrint) -> Element<'_, Message> {
    let idle = !app.busy;
    let selected = app.selection.len();

    let mut toolbar = row![
        text(format!("{} photo(s)", app.photos.len())).size(16),
        pick_list(PrintedFilter::ALL, Some(app.filter), Message::FilterChanged),
        horizontal_space(),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    if selected > 0 {
        toolbar = toolbar
            .push(
                text(format!(
                    "{}/{} selected",
                    selected,
                    next_multiple(selected, PRINT_GROUP_SIZE)
                ))
                .size(16),
            )
            .push(button("Print").on_press_maybe(idle.then_some(Message::PrintSelected)))
            .push(
                button("Delete")
                    .style(button::danger)
                    .on_press_maybe(idle.then_some(Message::DeleteSelected)),
            )
            .push(
                button("Clear")
                    .style(button::secondary)
                    .on_press_maybe(idle.then_some(Message::ClearSelection)),
            );
    }

    toolbar
        .push(button("Upload").on_press_maybe(idle.then_some(Message::GalleryUpload)))
        .into()
}

fn photo_card<'a>(app: &'a PhotoPrint, index: usize, photo: &'a Photography) -> Element<'a, Message> {
    let copies = app.selection.count_of(&photo.id);
    let selected = copies > 0;

    let thumbnail: Element<Message> = match app.thumbnails.get(&photo.url) {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(CARD_WIDTH))
            .height(Length::Fixed(CARD_HEIGHT))
            .into(),
        None => container(text("...").size(14))
            .width(Length::Fixed(CARD_WIDTH))
            .height(Length::Fixed(CARD_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    // Clicking the photo itself adds one more copy (or extends the range
    // when shift is held); the row below carries the per-photo controls.
    let clickable = mouse_area(thumbnail).on_press(Message::PhotoPressed(index));

    let mut controls = row![
        button(text(photo.code.as_str()).size(12))
            .style(button::text)
            .on_press(Message::CopyCode(photo.code.clone())),
        horizontal_space(),
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    if photo.is_printed() {
        let copies_printed = photo.printed_quantity.unwrap_or(0);
        let when = photo
            .printed_at
            .map(|printed_at| printed_at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        controls = controls.push(text(format!("🖨 {} on {}", copies_printed, when)).size(11));
    }

    if selected {
        controls = controls
            .push(text(format!("x{}", copies)).size(14))
            .push(
                button(text("-").size(12))
                    .style(button::secondary)
                    .on_press(Message::UnselectOne(photo.id.clone())),
            )
            .push(
                button(text("x").size(12))
                    .style(button::danger)
                    .on_press(Message::UnselectAll(photo.id.clone())),
            );
    }

    let card = column![clickable, controls].spacing(6);

    container(card)
        .padding(6)
        .style(move |theme: &Theme| card_style(theme, selected))
        .into()
}

/// Selected cards get a border in the theme's primary color
fn card_style(theme: &Theme, selected: bool) -> container::Style {
    let palette = theme.extended_palette();
    let border_color = if selected {
        palette.primary.strong.color
    } else {
        Color::TRANSPARENT
    };

    container::Style {
        border: Border {
            color: border_color,
            width: 3.0,
            radius: 8.0.into(),
        },
        ..container::Style::default()
    }
}

fn centered_note(note: &str) -> Element<'_, Message> {
    container(text(note).size(18))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
