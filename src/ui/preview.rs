/// PDF screen
///
/// Shown while the printable PDF is being generated and once it is ready:
/// page summary, save-a-copy, and the confirm-printed round trip that
/// updates the backend's print tracking.

use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length};

use crate::{Message, PhotoPrint};

pub fn view(app: &PhotoPrint) -> Element<'_, Message> {
    let content = match &app.pdf {
        None if app.busy => column![
            text("Generating PDF...").size(24),
            text("Downloading the photographs and laying out the pages.").size(14),
        ]
        .spacing(12)
        .align_x(Alignment::Center),

        None => column![
            text("The PDF could not be generated.").size(24),
            button("Back to gallery").on_press(Message::OpenGallery),
        ]
        .spacing(12)
        .align_x(Alignment::Center),

        Some(pdf) => {
            let idle = !app.busy;
            column![
                text("Print the photographs").size(28),
                text(format!(
                    "{} photograph(s) laid out on {} page(s).",
                    app.print_batch.len(),
                    pdf.page_count
                ))
                .size(16),
                text(pdf.path.display().to_string()).size(13),
                row![
                    button("Save a copy").on_press_maybe(idle.then_some(Message::SaveCopy)),
                    button("Confirm printed")
                        .on_press_maybe(idle.then_some(Message::ConfirmPrinted)),
                    button("Back to gallery")
                        .style(button::secondary)
                        .on_press_maybe(idle.then_some(Message::OpenGallery)),
                ]
                .spacing(10),
            ]
            .spacing(16)
            .align_x(Alignment::Center)
        }
    };

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
