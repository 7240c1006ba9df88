use common::{catalog::Catalog, picker::Picker};
use iced::{Alignment, Border, Length, Theme, mouse, widget};

use crate::icons::Icons;

use super::PickerMessage;

const ICON_SIZE: f32 = 20.0;
const CELL_PADDING: f32 = 4.0;

/// The "Select Item" dialog: every catalog icon in rows of four.
pub fn view<'a>(
    picker: &'a Picker,
    catalog: &'a Catalog,
    icons: &'a Icons,
) -> iced::Element<'a, PickerMessage> {
    let mut grid = widget::column![].spacing(CELL_PADDING);
    for entries in picker.rows() {
        let row = widget::row(entries.iter().map(|entry| {
            let name = catalog
                .get(entry.index)
                .map(|e| e.name.as_str())
                .unwrap_or_default();
            let cell: iced::Element<'a, PickerMessage> = widget::tooltip(
                widget::mouse_area(
                    widget::container(icons.item(entry.index, ICON_SIZE)).padding(CELL_PADDING),
                )
                .on_press(PickerMessage::Choose(*entry))
                .interaction(mouse::Interaction::Pointer),
                widget::container(widget::text(name).size(12.0))
                    .padding(4.0)
                    .style(widget::container::rounded_box),
                widget::tooltip::Position::Bottom,
            )
            .into();
            cell
        }))
        .spacing(CELL_PADDING);
        grid = grid.push(row);
    }

    let body: iced::Element<'a, PickerMessage> = if picker.rows().is_empty() {
        widget::text("No items available").into()
    } else {
        widget::scrollable(grid).height(Length::Shrink).into()
    };

    widget::container(
        widget::column![
            widget::text("Select Item").size(16.0),
            widget::horizontal_rule(2.0),
            body,
            widget::button("Cancel")
                .style(widget::button::secondary)
                .on_press(PickerMessage::Dismiss),
        ]
        .spacing(8.0)
        .align_x(Alignment::Center),
    )
    .padding(12.0)
    .style(|theme: &Theme| {
        let palette = theme.extended_palette();
        widget::container::Style {
            text_color: Some(palette.background.weak.text),
            background: Some(palette.background.base.color.into()),
            border: Border::default().rounded(8.0),
            ..Default::default()
        }
    })
    .into()
}
