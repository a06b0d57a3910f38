use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use iced::keyboard::{self, key::Named, Key, Modifiers};
use iced::widget::scrollable::{self, AbsoluteOffset};
use iced::widget::{container, text, Stack};
use iced::{window, Element, Length, Size, Subscription, Task, Theme};
use reqwest::Client;

mod config;
mod error;
mod net;
mod source;
mod state;
mod ui;

use config::{Cli, Settings};
use net::fetch::{self, FetchedImage};
use source::Origin;
use state::cache::ImageCache;
use state::columns::column_count;
use state::data::Collections;
use state::lightbox::Step;
use state::prefetch::PrefetchRequest;
use state::proximity::ScrollMetrics;
use state::route::Route;
use state::session::GallerySession;

/// Main application state
struct EventGallery {
    settings: Settings,
    client: Client,
    /// Where collections are loaded from (None until a source is given)
    origin: Option<Origin>,
    /// Session state, created once the first load succeeds
    session: Option<GallerySession>,
    /// Decoded images shared by grid and lightbox
    cache: ImageCache,
    /// Photo reference to open once collections arrive
    pending_route: Option<Route>,
    /// Tab requested on the command line
    initial_tab: Option<String>,
    /// Last grid scroll position per tab
    scroll_offsets: HashMap<String, f32>,
    scroll: ScrollMetrics,
    window_size: Size,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Background load of the collections finished
    CollectionsLoaded(Result<Collections, String>),
    /// User asked to fetch the collections again
    Reload,
    SelectTab(String),
    /// Pointer entered a tab button
    TabHovered(String),
    GridScrolled(ScrollMetrics),
    /// "Load more" pressed on the sentinel rendered after this many photos
    LoadMore(usize),
    /// Observe the new sentinel after a reveal
    Rearm,
    /// An image fetch finished (None when it failed)
    ImageFetched(String, Option<FetchedImage>),
    OpenPhoto(usize),
    Step(Step),
    CloseLightbox,
    Download,
    DownloadFinished(Result<PathBuf, String>),
    /// The download failure alert was dismissed
    AlertClosed,
    /// Wheel over the lightbox, swallowed so the grid stays put
    OverlayScrolled,
    WindowResized(Size),
}

impl EventGallery {
    /// Create a new instance of the application
    fn new(cli: Cli) -> (Self, Task<Message>) {
        let (settings, mut status) = match Settings::load(cli.config.as_deref()) {
            Ok(settings) => (settings.with_cli(&cli), String::new()),
            Err(e) => {
                log::error!("❌ Could not read settings: {}", e);
                (Settings::default().with_cli(&cli), format!("Settings ignored: {e}"))
            }
        };

        let origin = settings.source.as_deref().map(Origin::parse);
        let pending_route = cli.link.as_deref().and_then(|link| link.parse().ok());

        let mut gallery = EventGallery {
            client: fetch::client(),
            origin,
            session: None,
            cache: ImageCache::new(),
            pending_route,
            initial_tab: cli.tab.clone(),
            scroll_offsets: HashMap::new(),
            scroll: ScrollMetrics::default(),
            window_size: Size::new(1280.0, 900.0),
            status: String::new(),
            settings,
        };

        let task = match &gallery.origin {
            Some(origin) => {
                status = format!("Loading {origin}...");
                gallery.load_task()
            }
            None => {
                if status.is_empty() {
                    status = "No photo source. Pass a manifest file, manifest URL or folder.".to_string();
                }
                Task::none()
            }
        };
        gallery.status = status;

        (gallery, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CollectionsLoaded(Ok(collections)) => {
                let summary = format!(
                    "{} photos in {} tabs",
                    collections.total_images(),
                    collections.len()
                );
                // handles from the previous load are keyed by URLs that may be gone
                self.cache.clear();
                let requests = match self.session.as_mut() {
                    Some(session) => session.replace_collections(collections),
                    None => {
                        let mut session = GallerySession::new(collections, &self.settings);
                        let first = self
                            .initial_tab
                            .take()
                            .filter(|tab| session.collections().get(tab).is_some())
                            .or_else(|| session.collections().first_name().map(str::to_string));
                        let requests = match first {
                            Some(tab) => session.activate(&tab),
                            None => Vec::new(),
                        };
                        self.session = Some(session);
                        requests
                    }
                };
                self.scroll_offsets.clear();
                self.status = summary;

                if let (Some(route), Some(session)) = (self.pending_route.take(), self.session.as_mut()) {
                    session.navigate(route);
                }

                Task::batch([
                    self.prefetch(requests),
                    self.load_visible(),
                    self.load_lightbox(),
                    scrollable::scroll_to(ui::grid::grid_id(), AbsoluteOffset { x: 0.0, y: 0.0 }),
                    self.rearm_later(),
                ])
            }
            Message::CollectionsLoaded(Err(e)) => {
                log::error!("❌ Failed to load collections: {}", e);
                self.status = format!("Failed to load photos: {e}");
                Task::none()
            }
            Message::Reload => {
                if self.origin.is_none() {
                    return Task::none();
                }
                self.status = "Reloading...".to_string();
                self.load_task()
            }
            Message::SelectTab(name) => {
                let Some(session) = self.session.as_mut() else {
                    return Task::none();
                };
                if let Some(previous) = session.active() {
                    self.scroll_offsets.insert(previous.to_string(), self.scroll.offset_y);
                }
                let requests = session.activate(&name);
                let offset = self.scroll_offsets.get(&name).copied().unwrap_or(0.0);

                Task::batch([
                    self.prefetch(requests),
                    self.load_visible(),
                    scrollable::scroll_to(ui::grid::grid_id(), AbsoluteOffset { x: 0.0, y: offset }),
                    self.rearm_later(),
                ])
            }
            Message::TabHovered(name) => {
                let requests = match self.session.as_mut() {
                    Some(session) => session.hover(&name),
                    None => Vec::new(),
                };
                self.prefetch(requests)
            }
            Message::GridScrolled(metrics) => {
                self.scroll = metrics;
                let revealed = self
                    .session
                    .as_mut()
                    .is_some_and(|session| session.on_scroll(&metrics));
                if revealed {
                    Task::batch([self.load_visible(), self.rearm_later()])
                } else {
                    Task::none()
                }
            }
            Message::LoadMore(index) => {
                let revealed = self
                    .session
                    .as_mut()
                    .is_some_and(|session| session.reveal_after(index));
                if revealed {
                    Task::batch([self.load_visible(), self.rearm_later()])
                } else {
                    Task::none()
                }
            }
            Message::Rearm => {
                let scroll = self.scroll;
                let revealed = self
                    .session
                    .as_mut()
                    .is_some_and(|session| session.rearm_and_check(&scroll));
                if revealed {
                    Task::batch([self.load_visible(), self.rearm_later()])
                } else {
                    Task::none()
                }
            }
            Message::ImageFetched(url, Some(image)) => {
                self.cache.insert(url, image.bytes, image.width, image.height);
                Task::none()
            }
            Message::ImageFetched(url, None) => {
                self.cache.fail(&url);
                Task::none()
            }
            Message::OpenPhoto(position) => {
                if let Some(session) = self.session.as_mut() {
                    session.open_photo(position);
                }
                self.load_lightbox()
            }
            Message::Step(step) => {
                if let Some(session) = self.session.as_mut() {
                    session.step(step);
                }
                self.load_lightbox()
            }
            Message::CloseLightbox => {
                let Some(last) = self.session.as_mut().and_then(GallerySession::close_lightbox) else {
                    return Task::none();
                };
                Task::batch([self.load_visible(), self.scroll_into_view(last), self.rearm_later()])
            }
            Message::Download => {
                let Some(record) = self.session.as_ref().and_then(GallerySession::current_photo) else {
                    return Task::none();
                };
                let url = if record.source_url.is_empty() {
                    record.display_url.clone()
                } else {
                    record.source_url.clone()
                };
                let dir = match self.settings.download_dir.clone() {
                    Some(dir) => dir,
                    None => match net::download::default_download_dir() {
                        Ok(dir) => dir,
                        Err(e) => return Task::done(Message::DownloadFinished(Err(e.to_string()))),
                    },
                };

                self.status = "Downloading...".to_string();
                Task::perform(
                    net::download::download(self.client.clone(), url, None, dir),
                    |result| Message::DownloadFinished(result.map_err(|e| e.to_string())),
                )
            }
            Message::DownloadFinished(Ok(path)) => {
                self.status = format!("Saved {}", path.display());
                Task::none()
            }
            Message::DownloadFinished(Err(e)) => {
                log::error!("❌ Error downloading photo: {}", e);
                self.status = "Download failed".to_string();
                let alert = rfd::AsyncMessageDialog::new()
                    .set_level(rfd::MessageLevel::Error)
                    .set_title("Download failed")
                    .set_description("Failed to download photo. Please try again.")
                    .set_buttons(rfd::MessageButtons::Ok)
                    .show();
                Task::perform(alert, |_| Message::AlertClosed)
            }
            Message::AlertClosed | Message::OverlayScrolled => Task::none(),
            Message::WindowResized(size) => {
                self.window_size = size;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let Some(session) = &self.session else {
            return container(text(self.status.as_str()).size(16))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        };

        let grid = ui::grid::view(
            session,
            &self.cache,
            &self.settings.title,
            &self.status,
            self.window_size.width,
        );

        match ui::lightbox::view(session, &self.cache) {
            Some(overlay) => Stack::new()
                .push(grid)
                .push(overlay)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => grid,
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let resize = window::resize_events().map(|(_id, size)| Message::WindowResized(size));

        let lightbox_open = self
            .session
            .as_ref()
            .is_some_and(|session| session.lightbox().is_open());
        if lightbox_open {
            Subscription::batch([resize, keyboard::on_key_press(lightbox_key)])
        } else {
            resize
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn title(&self) -> String {
        match self.session.as_ref().and_then(GallerySession::active) {
            Some(tab) => format!("{} · {}", self.settings.title, tab),
            None => self.settings.title.clone(),
        }
    }

    fn load_task(&self) -> Task<Message> {
        let Some(origin) = self.origin.clone() else {
            return Task::none();
        };
        Task::perform(source::load(self.client.clone(), origin), |result| {
            Message::CollectionsLoaded(result.map_err(|e| e.to_string()))
        })
    }

    /// Fire-and-forget fetches for prefetch requests
    fn prefetch(&mut self, requests: Vec<PrefetchRequest>) -> Task<Message> {
        let urls: Vec<String> = requests.into_iter().map(|request| request.url).collect();
        self.fetch_all(urls)
    }

    /// Fetch every rendered photo of the active tab that isn't cached yet
    fn load_visible(&mut self) -> Task<Message> {
        let urls: Vec<String> = match &self.session {
            Some(session) => session
                .visible_images()
                .iter()
                .map(|record| record.display_url.clone())
                .collect(),
            None => Vec::new(),
        };
        self.fetch_all(urls)
    }

    /// Fetch the lightbox photo and its two neighbours
    fn load_lightbox(&mut self) -> Task<Message> {
        let urls: Vec<String> = match &self.session {
            Some(session) => match session.lightbox().position() {
                Some(position) => {
                    let images = session.active_images();
                    let start = position.saturating_sub(1);
                    let end = (position + 2).min(images.len());
                    images[start..end].iter().map(|record| record.display_url.clone()).collect()
                }
                None => Vec::new(),
            },
            None => Vec::new(),
        };
        self.fetch_all(urls)
    }

    fn fetch_all(&mut self, urls: Vec<String>) -> Task<Message> {
        let tasks: Vec<Task<Message>> = urls
            .into_iter()
            .filter(|url| self.cache.begin(url))
            .map(|url| fetch_task(self.client.clone(), url))
            .collect();
        Task::batch(tasks)
    }

    fn rearm_later(&self) -> Task<Message> {
        let delay = Duration::from_millis(self.settings.rearm_delay_ms);
        Task::perform(tokio::time::sleep(delay), |_| Message::Rearm)
    }

    /// Scroll the grid so the photo at `position` sits in the middle
    fn scroll_into_view(&self, position: usize) -> Task<Message> {
        let Some(session) = &self.session else {
            return Task::none();
        };
        let width = self.window_size.width;
        let columns = column_count(width);
        let Some(top) = session.estimated_top(columns, position) else {
            return Task::none();
        };

        let tile_width = ui::grid::column_width(width, columns);
        let y = ui::grid::PADDING + ui::grid::HEADER_HEIGHT + ui::grid::SPACING + top * tile_width;
        let centered = (y - self.scroll.viewport_height / 2.0).max(0.0);
        scrollable::scroll_to(ui::grid::grid_id(), AbsoluteOffset { x: 0.0, y: centered })
    }
}

fn fetch_task(client: Client, url: String) -> Task<Message> {
    let key = url.clone();
    Task::perform(fetch::prefetch_image(client, url), move |image| {
        Message::ImageFetched(key.clone(), image)
    })
}

fn lightbox_key(key: Key, _modifiers: Modifiers) -> Option<Message> {
    match key.as_ref() {
        Key::Named(Named::ArrowLeft) => Some(Message::Step(Step::Previous)),
        Key::Named(Named::ArrowRight) => Some(Message::Step(Step::Next)),
        Key::Named(Named::Escape) => Some(Message::CloseLightbox),
        _ => None,
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    iced::application(EventGallery::title, EventGallery::update, EventGallery::view)
        .subscription(EventGallery::subscription)
        .theme(EventGallery::theme)
        .window_size((1280.0, 900.0))
        .centered()
        .run_with(move || EventGallery::new(cli))
}
