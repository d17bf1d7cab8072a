//! # UI Styling Module
//!
//! Button styles for the recording controls.

use iced::widget::button;
use iced::{Background, Border, Color};

fn solid(background: Color, border: Color) -> button::Style {
    button::Style {
        background: Some(Background::Color(background)),
        text_color: Color::WHITE,
        border: Border {
            color: border,
            width: 1.0,
            radius: 4.0.into(),
        },
        ..Default::default()
    }
}

/// Record toggle: green to start, red to stop
pub fn record_button_style(recording: bool) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme: &iced::Theme, status: button::Status| {
        let (active, hovered, pressed) = if recording {
            (
                Color::from_rgb(0.8, 0.2, 0.2),
                Color::from_rgb(0.9, 0.3, 0.3),
                Color::from_rgb(0.7, 0.15, 0.15),
            )
        } else {
            (
                Color::from_rgb(0.2, 0.7, 0.2),
                Color::from_rgb(0.3, 0.8, 0.3),
                Color::from_rgb(0.15, 0.6, 0.15),
            )
        };

        match status {
            button::Status::Active => solid(active, hovered),
            button::Status::Hovered => solid(hovered, hovered),
            button::Status::Pressed => solid(pressed, active),
            button::Status::Disabled => button::Style {
                text_color: Color::from_rgb(0.6, 0.6, 0.6),
                ..solid(Color::from_rgb(0.3, 0.3, 0.3), Color::from_rgb(0.4, 0.4, 0.4))
            },
        }
    }
}

/// Save button: teal, muted while recording
pub fn save_button_style(recording: bool) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme: &iced::Theme, status: button::Status| {
        if recording {
            return solid(Color::from_rgb(0.5, 0.5, 0.5), Color::from_rgb(0.6, 0.6, 0.6));
        }
        match status {
            button::Status::Hovered => {
                solid(Color::from_rgb(0.3, 0.7, 0.8), Color::from_rgb(0.4, 0.8, 0.9))
            }
            button::Status::Pressed => {
                solid(Color::from_rgb(0.15, 0.5, 0.6), Color::from_rgb(0.2, 0.6, 0.7))
            }
            _ => solid(Color::from_rgb(0.2, 0.6, 0.7), Color::from_rgb(0.3, 0.7, 0.8)),
        }
    }
}
