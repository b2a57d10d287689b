// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! The screen splits along the divider from the layout adapter: viewfinder
//! on the leading side, control strip (gallery, shutter, settings) on the
//! trailing side. Portrait stacks them vertically with a horizontal button
//! row; landscape puts the strip on the right as a vertical column.

use crate::app::state::{AccessState, AppModel, Message};
use crate::fl;
use crate::layout::{self, Axis};
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget::{self, icon};

/// Screen share of the viewfinder, derived from the divider position.
const VIEWFINDER_PORTION: u16 = (layout::DIVIDER_POSITION * 100.0) as u16;
const CONTROLS_PORTION: u16 = 100 - VIEWFINDER_PORTION;

impl AppModel {
    /// Build the main application view for the current display orientation.
    pub fn view(&self) -> Element<'_, Message> {
        let config = layout::arrange(self.display_orientation);

        let viewfinder = widget::container(self.build_viewfinder())
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Alignment::Center)
            .align_y(Alignment::Center);

        let controls = widget::container(self.build_controls(config.controls.axis))
            .align_x(Alignment::Center)
            .align_y(Alignment::Center);

        let content: Element<'_, Message> = match config.divider.axis {
            // Portrait: horizontal divider, buttons below it spanning the width
            Axis::Horizontal => widget::column()
                .push(
                    widget::container(viewfinder)
                        .width(Length::Fill)
                        .height(Length::FillPortion(VIEWFINDER_PORTION)),
                )
                .push(
                    controls
                        .width(Length::Fill)
                        .height(Length::FillPortion(CONTROLS_PORTION)),
                )
                .into(),
            // Landscape: vertical divider, buttons to its right spanning the height
            Axis::Vertical => widget::row()
                .push(
                    widget::container(viewfinder)
                        .width(Length::FillPortion(VIEWFINDER_PORTION))
                        .height(Length::Fill),
                )
                .push(
                    controls
                        .width(Length::FillPortion(CONTROLS_PORTION))
                        .height(Length::Fill),
                )
                .into(),
        };

        let content = widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::BLACK)),
                ..Default::default()
            });

        widget::toaster(&self.toasts, content)
    }

    /// Live preview, or a placeholder while no frame is available.
    fn build_viewfinder(&self) -> Element<'_, Message> {
        if let Some(handle) = &self.viewfinder {
            return cosmic::iced::widget::image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        }

        match self.access {
            AccessState::Denied => widget::text(fl!("camera-denied")).into(),
            _ => icon::from_name("camera-photo-symbolic").size(64).icon().into(),
        }
    }

    /// The button group: gallery, shutter, settings.
    fn build_controls(&self, axis: Axis) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let gallery = widget::button::icon(icon::from_name("folder-pictures-symbolic").size(24))
            .on_press(Message::OpenGallery);
        let capture = widget::button::icon(icon::from_name("camera-photo-symbolic").size(40))
            .on_press(Message::Capture);
        let settings = widget::button::icon(icon::from_name("preferences-system-symbolic").size(24))
            .on_press(Message::OpenSettings);

        match axis {
            Axis::Horizontal => widget::row()
                .push(gallery)
                .push(capture)
                .push(settings)
                .spacing(spacing.space_l)
                .align_y(Alignment::Center)
                .into(),
            Axis::Vertical => widget::column()
                .push(gallery)
                .push(capture)
                .push(settings)
                .spacing(spacing.space_l)
                .align_x(Alignment::Center)
                .into(),
        }
    }
}
