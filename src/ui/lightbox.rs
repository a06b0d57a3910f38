/// Full-screen lightbox overlay
use iced::widget::{button, column, container, horizontal_space, image, mouse_area, row, text, Stack};
use iced::{Alignment, Background, Color, Element, Length, Theme};

use crate::state::cache::ImageCache;
use crate::state::lightbox::{Direction, Step};
use crate::state::session::GallerySession;
use crate::Message;

/// The overlay for the open photo, or `None` while the lightbox is closed
pub fn view<'a>(session: &'a GallerySession, cache: &'a ImageCache) -> Option<Element<'a, Message>> {
    let position = session.lightbox().position()?;
    let record = session.current_photo()?;
    let total = session.active_images().len();
    let direction = session.lightbox().direction();

    let low_res = session.low_res_url(record);
    let photo: Element<'a, Message> = match cache.best(&record.display_url, low_res.as_deref()) {
        Some(cached) => image(cached.handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => container(text("Loading…").size(16))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    let previous = nav_button("‹", Step::Previous, position > 0, direction == Direction::Backward);
    let next = nav_button("›", Step::Next, position + 1 < total, direction == Direction::Forward);

    let top_bar = row![
        text(format!("{} / {}", position + 1, total)).size(14),
        horizontal_space(),
        button(text("Download").size(14))
            .style(button::secondary)
            .on_press(Message::Download),
        button(text("Close").size(14))
            .style(button::secondary)
            .on_press(Message::CloseLightbox),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let middle = row![previous, container(photo).width(Length::Fill).height(Length::Fill), next]
        .spacing(12)
        .align_y(Alignment::Center)
        .height(Length::Fill);

    let content = column![top_bar, middle, text(record.alt_text.as_str()).size(13)]
        .spacing(12)
        .padding(24)
        .align_x(Alignment::Center);

    let backdrop = mouse_area(
        container(horizontal_space())
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme: &Theme| container::Style {
                background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.85))),
                ..Default::default()
            }),
    )
    .on_press(Message::CloseLightbox);

    // wheel events stop here instead of scrolling the grid underneath
    let overlay = mouse_area(
        Stack::new()
            .push(backdrop)
            .push(content)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .on_scroll(|_delta| Message::OverlayScrolled);

    Some(overlay.into())
}

fn nav_button<'a>(label: &'a str, step: Step, enabled: bool, highlighted: bool) -> Element<'a, Message> {
    let style: fn(&Theme, button::Status) -> button::Style = if highlighted {
        button::primary
    } else {
        button::secondary
    };
    let control = button(text(label).size(28)).padding([12, 16]).style(style);
    if enabled {
        control.on_press(Message::Step(step)).into()
    } else {
        control.into()
    }
}
