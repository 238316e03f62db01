/// Upload screen
///
/// Queue local image files (picked one by one or by scanning a folder)
/// and push them to the backend in a single multipart request. This
/// screen feeds directly into a print run, so it requires full 2x2 pages
/// before the upload is allowed.

use iced::widget::{button, column, horizontal_space, row, scrollable, text};
use iced::{Alignment, Element, Length};

use crate::state::selection::{next_multiple, PRINT_GROUP_SIZE};
use crate::{Message, PhotoPrint};

pub fn view(app: &PhotoPrint) -> Element<'_, Message> {
    let idle = !app.busy;

    let pickers = row![
        button("Pick files").on_press_maybe(idle.then_some(Message::PickFiles)),
        button("Pick folder").on_press_maybe(idle.then_some(Message::PickFolder)),
        button("Clear")
            .style(button::secondary)
            .on_press_maybe((idle && !app.pending.is_empty()).then_some(Message::ClearPending)),
    ]
    .spacing(10);

    let mut files = column![].spacing(6);
    for (index, path) in app.pending.iter().enumerate() {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        files = files.push(
            row![
                text(name).size(14),
                horizontal_space(),
                button(text("Remove").size(12))
                    .style(button::danger)
                    .on_press_maybe(idle.then_some(Message::RemovePending(index))),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        );
    }

    let progress: Element<Message> = if app.pending.is_empty() {
        text("No files queued yet.").size(14).into()
    } else {
        let queued = app.pending.len();
        text(format!(
            "{}/{} queued",
            queued,
            next_multiple(queued, PRINT_GROUP_SIZE)
        ))
        .size(16)
        .into()
    };

    column![
        text("Upload the photographs").size(28),
        text(format!(
            "Photos print {} to a page; queue a multiple of {}.",
            PRINT_GROUP_SIZE, PRINT_GROUP_SIZE
        ))
        .size(14),
        pickers,
        scrollable(files).height(Length::Fill),
        progress,
        button("Upload and print").on_press_maybe(idle.then_some(Message::UploadPending)),
    ]
    .spacing(16)
    .align_x(Alignment::Center)
    .into()
}
