/// Tabbed masonry grid
///
/// Header with the tab buttons, then the rendered prefix of the active tab
/// laid out in columns, then the sentinel row while more photos remain.
use iced::widget::{button, column, container, image, mouse_area, row, scrollable, text, Column, Row};
use iced::{Alignment, Background, Color, Element, Length, Theme};

use crate::state::cache::ImageCache;
use crate::state::columns::{column_count, estimate_height};
use crate::state::data::ImageRecord;
use crate::state::proximity::ScrollMetrics;
use crate::state::session::GallerySession;
use crate::Message;

/// Fixed height of the header card above the grid
pub const HEADER_HEIGHT: f32 = 220.0;
/// Outer padding of the grid
pub const PADDING: f32 = 16.0;
/// Gap between columns and between tiles
pub const SPACING: f32 = 16.0;

pub fn grid_id() -> scrollable::Id {
    scrollable::Id::new("gallery-grid")
}

/// Width of one column for a viewport `width`
pub fn column_width(width: f32, columns: usize) -> f32 {
    let columns = columns.max(1) as f32;
    ((width - PADDING * 2.0 - SPACING * (columns - 1.0)) / columns).max(1.0)
}

pub fn view<'a>(
    session: &'a GallerySession,
    cache: &'a ImageCache,
    title: &'a str,
    status: &'a str,
    width: f32,
) -> Element<'a, Message> {
    let columns = column_count(width);
    let tile_width = column_width(width, columns);

    let grid = Row::with_children(session.columns(columns).into_iter().map(move |records| {
        Column::with_children(records.into_iter().map(move |record| tile(session, record, cache, tile_width)))
            .spacing(SPACING)
            .width(Length::FillPortion(1))
            .into()
    }))
    .spacing(SPACING)
    .width(Length::Fill);

    let mut content = column![header(session, title, status), grid]
        .spacing(SPACING)
        .padding(PADDING)
        .width(Length::Fill);

    if session.has_sentinel() {
        content = content.push(sentinel(session));
    }

    scrollable(content)
        .id(grid_id())
        .width(Length::Fill)
        .height(Length::Fill)
        .on_scroll(|viewport| {
            Message::GridScrolled(ScrollMetrics {
                offset_y: viewport.absolute_offset().y,
                viewport_height: viewport.bounds().height,
                content_height: viewport.content_bounds().height,
            })
        })
        .into()
}

fn header<'a>(session: &'a GallerySession, title: &'a str, status: &'a str) -> Element<'a, Message> {
    let tabs = Row::with_children(session.collections().names().map(move |name| {
        let style: fn(&Theme, button::Status) -> button::Style = if session.active() == Some(name) {
            button::primary
        } else {
            button::secondary
        };
        mouse_area(
            button(text(name).size(14))
                .padding([8, 16])
                .style(style)
                .on_press(Message::SelectTab(name.to_string())),
        )
        .on_enter(Message::TabHovered(name.to_string()))
        .into()
    }))
    .spacing(8);

    let card = column![
        text(title).size(28),
        tabs,
        row![
            text(status).size(13),
            button(text("Reload").size(13))
                .style(button::text)
                .on_press(Message::Reload),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    container(card)
        .width(Length::Fill)
        .height(Length::Fixed(HEADER_HEIGHT))
        .center_x(Length::Fill)
        .align_y(iced::alignment::Vertical::Bottom)
        .padding(24)
        .style(|_theme: &Theme| container::Style {
            background: Some(Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.08))),
            border: iced::Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        })
        .into()
}

fn tile<'a>(
    session: &GallerySession,
    record: &'a ImageRecord,
    cache: &'a ImageCache,
    tile_width: f32,
) -> Element<'a, Message> {
    let low_res = session.low_res_url(record);
    let content: Element<'a, Message> = match cache.best(&record.display_url, low_res.as_deref()) {
        Some(cached) => image(cached.handle.clone()).width(Length::Fill).into(),
        None => container(text(record.alt_text.as_str()).size(12))
            .width(Length::Fill)
            .height(Length::Fixed(estimate_height(record) * tile_width))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(estimate_height(record) * tile_width))
            .style(|_theme: &Theme| container::Style {
                background: Some(Background::Color(Color::from_rgb(0.12, 0.12, 0.14))),
                ..Default::default()
            })
            .into(),
    };

    button(content)
        .padding(0)
        .style(button::text)
        .on_press(Message::OpenPhoto(record.id))
        .into()
}

fn sentinel(session: &GallerySession) -> Element<'_, Message> {
    let remaining = session.active_images().len() - session.visible_count();
    container(
        button(text(format!("Load more ({remaining} left)")).size(14))
            .padding([8, 16])
            .style(button::secondary)
            .on_press(Message::LoadMore(session.visible_count())),
    )
    .width(Length::Fill)
    .center_x(Length::Fill)
    .padding(24)
    .into()
}
