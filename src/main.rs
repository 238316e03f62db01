use iced::keyboard;
use iced::widget::{button, column, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::collections::HashMap;
use std::path::PathBuf;
use walkdir::WalkDir;

mod api;
mod config;
mod pdf;
mod state;
mod ui;

use api::{ApiClient, ApiError};
use pdf::{PdfError, RenderedPdf};
use state::data::Photography;
use state::selection::{self, Selection, PRINT_GROUP_SIZE};

/// Which screen is on display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Pick local files and push them to the backend
    Upload,
    /// Browse, select and manage the uploaded photographs
    Gallery,
    /// Generated PDF summary with the confirm-printed action
    Pdf,
}

/// Printed-state filter for the gallery (a server-side query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintedFilter {
    All,
    Printed,
    Unprinted,
}

impl PrintedFilter {
    pub const ALL: [PrintedFilter; 3] = [
        PrintedFilter::All,
        PrintedFilter::Printed,
        PrintedFilter::Unprinted,
    ];

    /// Value for the `printed` query parameter, if any
    pub fn as_query(self) -> Option<bool> {
        match self {
            PrintedFilter::All => None,
            PrintedFilter::Printed => Some(true),
            PrintedFilter::Unprinted => Some(false),
        }
    }
}

impl std::fmt::Display for PrintedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PrintedFilter::All => "All photos",
            PrintedFilter::Printed => "Printed",
            PrintedFilter::Unprinted => "Not printed",
        };
        write!(f, "{}", label)
    }
}

/// Main application state
pub struct PhotoPrint {
    /// Backend client
    pub client: ApiClient,
    /// Optional frame image overlaid on printed cells
    pub frame_path: Option<PathBuf>,
    pub screen: Screen,
    /// Status message to display to the user
    pub status: String,
    /// A request is in flight; actions stay disabled until it resolves
    pub busy: bool,
    /// Shift is held down (drives range selection)
    pub shift_held: bool,

    /// Files queued on the upload screen
    pub pending: Vec<PathBuf>,

    /// Gallery contents, newest first
    pub photos: Vec<Photography>,
    /// Downloaded thumbnails, keyed by photo URL
    pub thumbnails: HashMap<String, iced::widget::image::Handle>,
    /// The print selection (ordered, repeats allowed)
    pub selection: Selection,
    pub filter: PrintedFilter,

    /// Photos being printed, one entry per copy
    pub print_batch: Vec<Photography>,
    /// The generated PDF, once ready
    pub pdf: Option<RenderedPdf>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    OpenUpload,
    OpenGallery,

    // Upload screen
    PickFiles,
    PickFolder,
    RemovePending(usize),
    ClearPending,
    UploadPending,
    UploadFinished(Result<Vec<Photography>, ApiError>),

    // Gallery screen
    PhotosLoaded(Result<Vec<Photography>, ApiError>),
    ThumbnailFetched(String, Result<Vec<u8>, ApiError>),
    FilterChanged(PrintedFilter),
    PhotoPressed(usize),
    UnselectOne(String),
    UnselectAll(String),
    ClearSelection,
    CopyCode(String),
    GalleryUpload,
    GalleryUploadFinished(Result<Vec<Photography>, ApiError>),
    DeleteSelected,
    SelectedDeleted(Result<(), ApiError>),
    PrintSelected,

    // PDF screen
    PdfReady(Result<RenderedPdf, PdfError>),
    SaveCopy,
    ConfirmPrinted,
    PrintConfirmed(Result<(), ApiError>),

    // Global
    ModifiersChanged(keyboard::Modifiers),
}

impl PhotoPrint {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = config::Config::load();
        println!("🖨️  Photo Print pointed at {}", config.api_url);

        let app = PhotoPrint {
            client: ApiClient::new(config.api_url),
            frame_path: config.frame_path,
            screen: Screen::Upload,
            status: "Ready.".to_string(),
            busy: false,
            shift_held: false,
            pending: Vec::new(),
            photos: Vec::new(),
            thumbnails: HashMap::new(),
            selection: Selection::new(),
            filter: PrintedFilter::All,
            print_batch: Vec::new(),
            pdf: None,
        };

        (app, Task::none())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenUpload => {
                self.screen = Screen::Upload;
                Task::none()
            }
            Message::OpenGallery => {
                self.screen = Screen::Gallery;
                self.busy = true;
                self.status = "Loading photographs...".to_string();
                self.fetch_photos()
            }

            Message::PickFiles => {
                let picked = FileDialog::new()
                    .set_title("Select Photographs")
                    .add_filter("Images", &["jpg", "jpeg", "png"])
                    .pick_files();

                if let Some(paths) = picked {
                    self.queue_pending(paths);
                }
                Task::none()
            }
            Message::PickFolder => {
                let folder = FileDialog::new()
                    .set_title("Select Folder with Photographs")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    println!("🔍 Scanning folder: {}", folder_path.display());
                    self.queue_pending(scan_folder(&folder_path));
                }
                Task::none()
            }
            Message::RemovePending(index) => {
                if index < self.pending.len() {
                    self.pending.remove(index);
                }
                Task::none()
            }
            Message::ClearPending => {
                self.pending.clear();
                Task::none()
            }
            Message::UploadPending => {
                if self.pending.is_empty() {
                    self.status = "Pick some photographs first.".to_string();
                    return Task::none();
                }
                // This screen feeds straight into a print run, so it only
                // accepts full 2x2 pages. The gallery's upload action has
                // no such requirement.
                if self.pending.len() % PRINT_GROUP_SIZE != 0 {
                    self.status = format!(
                        "The number of photographs must be a multiple of {}.",
                        PRINT_GROUP_SIZE
                    );
                    return Task::none();
                }

                self.busy = true;
                self.status = format!("Uploading {} photograph(s)...", self.pending.len());
                let client = self.client.clone();
                let paths = self.pending.clone();
                Task::perform(
                    async move { client.upload_photos(paths).await },
                    Message::UploadFinished,
                )
            }
            Message::UploadFinished(Ok(photos)) => {
                println!("✅ Uploaded {} photograph(s)", photos.len());
                self.pending.clear();
                self.status = format!("Uploaded {} photograph(s). Generating PDF...", photos.len());
                // Straight to the printable PDF with the created records
                self.print_batch = photos;
                self.pdf = None;
                self.screen = Screen::Pdf;
                self.generate_pdf()
            }
            Message::UploadFinished(Err(error)) => self.fail("Upload failed", error),

            Message::PhotosLoaded(Ok(photos)) => {
                self.busy = false;
                self.photos = photos;
                self.selection.prune(&self.photos);
                self.status = format!("{} photograph(s).", self.photos.len());
                self.fetch_missing_thumbnails()
            }
            Message::PhotosLoaded(Err(error)) => self.fail("Could not load the photographs", error),
            Message::ThumbnailFetched(url, Ok(bytes)) => {
                self.thumbnails
                    .insert(url, iced::widget::image::Handle::from_bytes(bytes));
                Task::none()
            }
            Message::ThumbnailFetched(url, Err(error)) => {
                // Not worth a notice; the card keeps its placeholder
                eprintln!("⚠️  Thumbnail fetch failed for {}: {}", url, error);
                Task::none()
            }
            Message::FilterChanged(filter) => {
                self.filter = filter;
                self.busy = true;
                self.status = "Loading photographs...".to_string();
                self.fetch_photos()
            }
            Message::PhotoPressed(index) => {
                self.selection
                    .select_range(&self.photos, index, self.shift_held);
                Task::none()
            }
            Message::UnselectOne(id) => {
                self.selection.unselect_one(&id);
                Task::none()
            }
            Message::UnselectAll(id) => {
                self.selection.unselect_all(&id);
                Task::none()
            }
            Message::ClearSelection => {
                self.selection.clear();
                Task::none()
            }
            Message::CopyCode(code) => {
                self.status = format!("Copied code {} to the clipboard.", code);
                iced::clipboard::write(code)
            }
            Message::GalleryUpload => {
                let picked = FileDialog::new()
                    .set_title("Select Photographs")
                    .add_filter("Images", &["jpg", "jpeg", "png"])
                    .pick_files();

                match picked {
                    Some(paths) if !paths.is_empty() => {
                        self.busy = true;
                        self.status = format!("Uploading {} photograph(s)...", paths.len());
                        let client = self.client.clone();
                        Task::perform(
                            async move { client.upload_photos(paths).await },
                            Message::GalleryUploadFinished,
                        )
                    }
                    _ => Task::none(),
                }
            }
            Message::GalleryUploadFinished(Ok(photos)) => {
                println!("✅ Uploaded {} photograph(s)", photos.len());
                self.status = format!("Uploaded {} photograph(s).", photos.len());
                // Stay busy until the refetch lands
                self.fetch_photos()
            }
            Message::GalleryUploadFinished(Err(error)) => self.fail("Upload failed", error),
            Message::DeleteSelected => {
                if self.selection.is_empty() {
                    return Task::none();
                }
                self.busy = true;
                self.status = "Deleting photographs...".to_string();
                let client = self.client.clone();
                let ids = self.selection.unique_ids();
                Task::perform(
                    async move {
                        // A single photo goes through the by-id endpoint
                        if let [id] = ids.as_slice() {
                            client.delete_photo(id).await
                        } else {
                            client.delete_photos(&ids).await
                        }
                    },
                    Message::SelectedDeleted,
                )
            }
            Message::SelectedDeleted(Ok(())) => {
                self.busy = false;
                let selection = &self.selection;
                self.photos.retain(|photo| !selection.is_selected(&photo.id));
                self.selection.clear();
                self.status = "Photographs deleted.".to_string();
                Task::none()
            }
            Message::SelectedDeleted(Err(error)) => {
                self.fail("Could not delete the photographs", error)
            }
            Message::PrintSelected => {
                if self.selection.is_empty() {
                    self.status = "Select some photographs first.".to_string();
                    return Task::none();
                }
                if !self.selection.is_print_ready() {
                    self.status = format!(
                        "The number of selected photographs must be a multiple of {}.",
                        PRINT_GROUP_SIZE
                    );
                    return Task::none();
                }

                self.print_batch = self.selection.resolve(&self.photos);
                self.pdf = None;
                self.screen = Screen::Pdf;
                self.generate_pdf()
            }

            Message::PdfReady(Ok(rendered)) => {
                self.busy = false;
                self.status = format!("PDF ready: {}", rendered.path.display());
                self.pdf = Some(rendered);
                Task::none()
            }
            Message::PdfReady(Err(error)) => {
                self.busy = false;
                self.status = format!("Could not generate the PDF: {}", error);
                eprintln!("⚠️  {}", self.status);
                Task::none()
            }
            Message::SaveCopy => {
                let Some(pdf) = &self.pdf else {
                    return Task::none();
                };
                let target = FileDialog::new()
                    .set_title("Save PDF")
                    .set_file_name("photographs.pdf")
                    .save_file();

                if let Some(target) = target {
                    match std::fs::copy(&pdf.path, &target) {
                        Ok(_) => self.status = format!("Saved to {}.", target.display()),
                        Err(error) => {
                            self.status = format!("Could not save the PDF: {}", error);
                            eprintln!("⚠️  {}", self.status);
                        }
                    }
                }
                Task::none()
            }
            Message::ConfirmPrinted => {
                if self.print_batch.is_empty() {
                    return Task::none();
                }
                self.busy = true;
                self.status = "Confirming the print run...".to_string();
                let client = self.client.clone();
                let items = selection::aggregate_print_items(&self.print_batch);
                Task::perform(
                    async move { client.confirm_printed(&items).await },
                    Message::PrintConfirmed,
                )
            }
            Message::PrintConfirmed(Ok(())) => {
                println!("✅ Print run confirmed");
                self.status = "Photographs marked as printed.".to_string();
                self.print_batch.clear();
                self.pdf = None;
                self.selection.clear();
                self.screen = Screen::Gallery;
                // Refetch so the printed fields show up to date
                self.fetch_photos()
            }
            Message::PrintConfirmed(Err(error)) => {
                self.fail("Could not confirm the print run", error)
            }

            Message::ModifiersChanged(modifiers) => {
                self.shift_held = modifiers.shift();
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let idle = !self.busy;
        let header = row![
            text("Photo Print").size(24),
            horizontal_space(),
            button("Upload").on_press_maybe(idle.then_some(Message::OpenUpload)),
            button("Gallery").on_press_maybe(idle.then_some(Message::OpenGallery)),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let body = match self.screen {
            Screen::Upload => ui::upload::view(self),
            Screen::Gallery => ui::gallery::view(self),
            Screen::Pdf => ui::preview::view(self),
        };

        column![
            header,
            container(body).width(Length::Fill).height(Length::Fill),
            text(&self.status).size(14),
        ]
        .spacing(16)
        .padding(16)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Track keyboard modifiers for shift-range selection
    fn subscription(&self) -> Subscription<Message> {
        iced::event::listen_with(|event, _status, _window| match event {
            iced::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                Some(Message::ModifiersChanged(modifiers))
            }
            _ => None,
        })
    }

    fn fetch_photos(&self) -> Task<Message> {
        let client = self.client.clone();
        let printed = self.filter.as_query();
        Task::perform(
            async move { client.get_photos(printed).await },
            Message::PhotosLoaded,
        )
    }

    /// Fetch thumbnails for photos we have not downloaded yet
    fn fetch_missing_thumbnails(&self) -> Task<Message> {
        let tasks: Vec<Task<Message>> = self
            .photos
            .iter()
            .filter(|photo| !self.thumbnails.contains_key(&photo.url))
            .map(|photo| {
                let client = self.client.clone();
                let url = photo.url.clone();
                Task::perform(
                    async move {
                        let result = client.fetch_bytes(&url).await;
                        (url, result)
                    },
                    |(url, result)| Message::ThumbnailFetched(url, result),
                )
            })
            .collect();

        Task::batch(tasks)
    }

    fn generate_pdf(&mut self) -> Task<Message> {
        self.busy = true;
        self.status = "Generating PDF...".to_string();
        Task::perform(
            pdf::render::generate(
                self.client.clone(),
                self.print_batch.clone(),
                self.frame_path.clone(),
            ),
            Message::PdfReady,
        )
    }

    /// Append picked files to the upload queue, skipping duplicates
    fn queue_pending(&mut self, paths: Vec<PathBuf>) {
        for path in paths {
            if !self.pending.contains(&path) {
                self.pending.push(path);
            }
        }
        self.status = format!("{} file(s) queued.", self.pending.len());
    }

    /// Surface a backend failure as a transient notice and go idle again
    fn fail(&mut self, context: &str, error: ApiError) -> Task<Message> {
        self.busy = false;
        self.status = format!("{}: {}", context, error);
        eprintln!("⚠️  {}", self.status);
        Task::none()
    }
}

/// Collect the jpeg/png files under a folder, recursively, in path order
fn scan_folder(folder: &std::path::Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|extension| {
                    let extension = extension.to_string_lossy().to_lowercase();
                    matches!(extension.as_str(), "jpg" | "jpeg" | "png")
                })
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    paths.sort();
    paths
}

fn main() -> iced::Result {
    iced::application("Photo Print", PhotoPrint::update, PhotoPrint::view)
        .theme(PhotoPrint::theme)
        .subscription(PhotoPrint::subscription)
        .centered()
        .run_with(PhotoPrint::new)
}
