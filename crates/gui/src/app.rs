use std::{
    env,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Result};
use common::{
    board::BoardState,
    catalog::Catalog,
    geometry::Point,
    layout::BoardMetrics,
    picker::{Picker, Placement},
};
use iced::{
    Border, Color, Element, Length, Padding, Theme, alignment, keyboard, mouse, widget,
};
use tracing::{error, info};

use crate::{
    CONFIG,
    grid::{GridMessage, widget::GridWidget},
    icons::Icons,
    picker::{self, PickerMessage},
    settings::keymap::BindableMessage,
};

pub const APP_NAME: &str = "Ishizakis Location Tracker";
const MENU_HEIGHT: f32 = 28.0;
const STATUS_HEIGHT: f32 = 24.0;

/// Everything the window needs at startup. Cloned into each new `App`.
#[derive(Debug, Clone)]
pub struct Setup {
    pub board: BoardState,
    pub catalog: Catalog,
    pub icons: Icons,
    pub metrics: BoardMetrics,
}

impl Setup {
    pub fn window_size(&self) -> iced::Size {
        let board = self.metrics.board_size(self.board.layout(), self.board.display_rows());
        let status = if self.icons.failures().is_empty() {
            0.0
        } else {
            STATUS_HEIGHT
        };
        iced::Size::new(board.width, MENU_HEIGHT + board.height + status)
    }
}

#[derive(Debug)]
enum Modal {
    Picker(Picker),
    ConfirmRestart,
    Notice { title: String, body: String },
}

#[derive(Debug)]
pub struct App {
    pub dark_mode: bool,
    grid: GridWidget,
    catalog: Catalog,
    icons: Icons,
    modal: Option<Modal>,
    menu: Option<Menu>,
    /// Program started by Restart.
    exe: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Program,
    Help,
}

impl Menu {
    fn label(self) -> &'static str {
        match self {
            Menu::Program => "Program",
            Menu::Help => "Help",
        }
    }

    fn entries(self) -> &'static [(&'static str, BindableMessage)] {
        match self {
            Menu::Program => &[
                ("Restart", BindableMessage::Restart),
                ("Exit", BindableMessage::Quit),
            ],
            Menu::Help => &[("About", BindableMessage::About)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenModal {
    ConfirmRestart,
    About,
}

#[derive(Debug, Clone)]
pub enum AppMessage {
    Grid(GridMessage),
    Picker(PickerMessage),
    CursorMoved(iced::Point),
    PointerReleased,
    Key(keyboard::Event),
    Modal(OpenModal),
    CloseModal,
    ToggleMenu(Menu),
    CloseMenu,
    Restart,
    Quit,
}

impl App {
    pub fn new(setup: Setup) -> Self {
        Self {
            dark_mode: true,
            grid: GridWidget::new(setup.board, setup.metrics),
            catalog: setup.catalog,
            icons: setup.icons,
            modal: None,
            menu: None,
            exe: env::current_exe().ok(),
        }
    }

    pub fn update(&mut self, message: AppMessage) -> iced::Task<AppMessage> {
        match message {
            AppMessage::Grid(GridMessage::OpenPicker(id)) => {
                if self.modal.is_none() {
                    self.grid.cancel_drag();
                    self.modal = Some(Modal::Picker(Picker::open(id, &self.catalog)));
                }
                iced::Task::none()
            }
            AppMessage::Grid(msg @ GridMessage::BeginDrag(_)) => {
                if self.modal.is_some() {
                    return iced::Task::none();
                }
                self.grid.update(msg).map(AppMessage::Grid)
            }
            AppMessage::Grid(msg) => self.grid.update(msg).map(AppMessage::Grid),
            AppMessage::CursorMoved(p) => {
                // The board sits directly below the menu bar.
                let pointer = Point::new(p.x, p.y - MENU_HEIGHT);
                self.grid
                    .update(GridMessage::PointerMoved(pointer))
                    .map(AppMessage::Grid)
            }
            AppMessage::PointerReleased => self
                .grid
                .update(GridMessage::PointerReleased)
                .map(AppMessage::Grid),
            AppMessage::Picker(PickerMessage::Choose(entry)) => {
                match self.modal.take() {
                    Some(Modal::Picker(picker)) => match self.grid.commit(picker, entry) {
                        Ok(Placement { slot, item }) => {
                            let name = self.catalog.get(item).map(|e| e.name.as_str());
                            info!("Placed {:?} on {}", name.unwrap_or_default(), slot);
                        }
                        Err(e) => error!("Could not place item: {}", e),
                    },
                    other => self.modal = other,
                }
                iced::Task::none()
            }
            AppMessage::Picker(PickerMessage::Dismiss) | AppMessage::CloseModal => {
                self.menu = None;
                if let Some(Modal::Picker(picker)) = self.modal.take() {
                    picker.dismiss();
                }
                iced::Task::none()
            }
            AppMessage::Key(event) => {
                let action = CONFIG
                    .write()
                    .ok()
                    .and_then(|mut config| config.keyboard.dispatch(&event).copied());
                match action {
                    Some(action) => iced::Task::done(action.into()),
                    None => iced::Task::none(),
                }
            }
            AppMessage::ToggleMenu(menu) => {
                self.menu = match self.menu {
                    Some(open) if open == menu => None,
                    _ => Some(menu),
                };
                iced::Task::none()
            }
            AppMessage::CloseMenu => {
                self.menu = None;
                iced::Task::none()
            }
            AppMessage::Modal(open) => {
                self.menu = None;
                // The picker keeps the board and the menu blocked until it closes.
                if !matches!(self.modal, Some(Modal::Picker(_))) {
                    self.grid.cancel_drag();
                    self.modal = Some(match open {
                        OpenModal::ConfirmRestart => Modal::ConfirmRestart,
                        OpenModal::About => Modal::Notice {
                            title: "About".to_string(),
                            body: APP_NAME.to_string(),
                        },
                    });
                }
                iced::Task::none()
            }
            AppMessage::Restart => match relaunch(self.exe.as_deref()) {
                Ok(()) => {
                    info!("Restarted, closing this instance");
                    iced::exit()
                }
                Err(e) => {
                    error!("Restart failed: {:#}", e);
                    self.modal = Some(Modal::Notice {
                        title: "Restart failed".to_string(),
                        body: format!("Could not restart application:\n{:#}", e),
                    });
                    iced::Task::none()
                }
            },
            AppMessage::Quit => {
                self.menu = None;
                iced::exit()
            }
        }
    }

    pub fn view(&self) -> Element<'_, AppMessage> {
        let mut content = widget::column![
            self.menu_bar(),
            self.grid.view(&self.icons).map(AppMessage::Grid),
        ];
        if !self.icons.failures().is_empty() {
            content = content.push(self.status_bar());
        }

        let base: Element<'_, AppMessage> = widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|theme: &Theme| {
                let palette = theme.extended_palette();
                widget::container::Style {
                    text_color: Some(palette.background.base.text),
                    background: Some(palette.background.base.color.into()),
                    ..Default::default()
                }
            })
            .into();
        let base = match self.menu {
            Some(menu) => dropdown(base, menu),
            None => base,
        };

        match &self.modal {
            None => base,
            Some(Modal::Picker(p)) => overlay(
                base,
                picker::widget::view(p, &self.catalog, &self.icons).map(AppMessage::Picker),
                AppMessage::Picker(PickerMessage::Dismiss),
            ),
            Some(Modal::ConfirmRestart) => overlay(
                base,
                dialog(
                    "Restart",
                    "Restart application? Unsaved changes will be lost.",
                    widget::row![
                        widget::button("Yes").on_press(AppMessage::Restart),
                        widget::button("No")
                            .style(widget::button::secondary)
                            .on_press(AppMessage::CloseModal),
                    ]
                    .spacing(8.0)
                    .into(),
                ),
                AppMessage::CloseModal,
            ),
            Some(Modal::Notice { title, body }) => overlay(
                base,
                dialog(
                    title,
                    body,
                    widget::button("OK").on_press(AppMessage::CloseModal).into(),
                ),
                AppMessage::CloseModal,
            ),
        }
    }

    pub fn subscription(&self) -> iced::Subscription<AppMessage> {
        iced::event::listen_with(|event, _status, _window| match event {
            iced::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                Some(AppMessage::CursorMoved(position))
            }
            iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                Some(AppMessage::PointerReleased)
            }
            iced::Event::Keyboard(event) => Some(AppMessage::Key(event)),
            _ => None,
        })
    }

    fn menu_bar(&self) -> Element<'_, AppMessage> {
        let heading = |menu: Menu| {
            let style = if self.menu == Some(menu) {
                widget::button::secondary
            } else {
                widget::button::text
            };
            widget::button(widget::text(menu.label()).size(13.0))
                .padding(Padding::default().left(8.0).right(8.0).top(4.0).bottom(4.0))
                .style(style)
                .on_press(AppMessage::ToggleMenu(menu))
        };
        widget::container(
            widget::row![
                heading(Menu::Program),
                widget::horizontal_space(),
                heading(Menu::Help),
            ]
            .align_y(alignment::Vertical::Center),
        )
        .height(MENU_HEIGHT)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let palette = theme.extended_palette();
            widget::container::Style {
                background: Some(palette.background.weak.color.into()),
                ..Default::default()
            }
        })
        .into()
    }

    fn status_bar(&self) -> Element<'_, AppMessage> {
        let missing = self.icons.failures().join(", ");
        widget::container(
            widget::text(format!("Missing images: {}", missing))
                .size(12.0)
                .style(|theme: &Theme| {
                    let palette = theme.extended_palette();
                    widget::text::Style {
                        color: Some(palette.danger.base.color),
                    }
                }),
        )
        .height(STATUS_HEIGHT)
        .padding(Padding::default().left(4.0))
        .align_y(alignment::Vertical::Center)
        .into()
    }
}

/// Starts `exe` with the arguments this process got.
fn relaunch(exe: Option<&Path>) -> Result<()> {
    let exe = exe.context("locating the running executable")?;
    Command::new(exe)
        .args(env::args_os().skip(1))
        .spawn()
        .with_context(|| format!("launching {}", exe.display()))?;
    Ok(())
}

/// Key sequence shown next to a menu entry, taken from the loaded config.
fn shortcut_label(action: BindableMessage) -> String {
    CONFIG
        .read()
        .ok()
        .and_then(|config| config.shortcut(action).map(str::to_string))
        .unwrap_or_default()
}

/// Opens `menu` below its heading. Clicking anywhere else closes it.
fn dropdown(base: Element<'_, AppMessage>, menu: Menu) -> Element<'_, AppMessage> {
    let entries = widget::column(menu.entries().iter().map(|&(label, action)| {
        let entry: Element<'_, AppMessage> = widget::button(
            widget::row![
                widget::text(label).size(13.0),
                widget::horizontal_space(),
                widget::text(shortcut_label(action)).size(12.0),
            ]
            .spacing(16.0),
        )
        .width(Length::Fill)
        .style(widget::button::text)
        .on_press(AppMessage::from(action))
        .into();
        entry
    }));
    let panel = widget::container(entries)
        .width(180.0)
        .padding(4.0)
        .style(widget::container::rounded_box);
    let align = match menu {
        Menu::Program => alignment::Horizontal::Left,
        Menu::Help => alignment::Horizontal::Right,
    };

    widget::stack![
        base,
        widget::mouse_area(
            widget::container(widget::opaque(panel))
                .padding(Padding::default().top(MENU_HEIGHT))
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(align)
                .align_y(alignment::Vertical::Top),
        )
        .on_press(AppMessage::CloseMenu)
    ]
    .into()
}

/// Puts `content` over `base`, which stops receiving input until the dialog
/// closes. Clicking the backdrop sends `on_blur`.
fn overlay<'a>(
    base: Element<'a, AppMessage>,
    content: Element<'a, AppMessage>,
    on_blur: AppMessage,
) -> Element<'a, AppMessage> {
    widget::stack![
        base,
        widget::opaque(
            widget::mouse_area(widget::center(widget::opaque(content)).style(|_theme| {
                widget::container::Style {
                    background: Some(
                        Color {
                            a: 0.7,
                            ..Color::BLACK
                        }
                        .into(),
                    ),
                    ..Default::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

fn dialog<'a>(
    title: &'a str,
    body: &'a str,
    actions: Element<'a, AppMessage>,
) -> Element<'a, AppMessage> {
    widget::container(
        widget::column![
            widget::text(title).size(16.0),
            widget::text(body),
            actions,
        ]
        .spacing(12.0),
    )
    .padding(16.0)
    .max_width(360.0)
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

#[cfg(test)]
mod tests {
    use common::{
        board::{Band, SlotId, build_board},
        catalog::LOCATIONS,
        layout::BoardLayout,
        picker::PickerEntry,
    };

    use super::*;

    fn app() -> App {
        let catalog = Catalog::builtin();
        let dir = tempfile::tempdir().unwrap();
        App::new(Setup {
            board: build_board(BoardLayout::default(), LOCATIONS),
            icons: Icons::load(&catalog, dir.path()),
            catalog,
            metrics: BoardMetrics::default(),
        })
    }

    fn entry(index: usize) -> PickerEntry {
        PickerEntry { index }
    }

    #[test]
    fn choosing_commits_and_closes_picker() {
        let mut app = app();
        let id = SlotId::new(Band::Left, 3, 1);
        let potion = app.catalog.position("Red Potion").unwrap();

        let _ = app.update(AppMessage::Grid(GridMessage::OpenPicker(id)));
        assert!(matches!(app.modal, Some(Modal::Picker(ref p)) if p.target() == id));

        let _ = app.update(AppMessage::Picker(PickerMessage::Choose(entry(potion))));
        assert!(app.modal.is_none());
        assert_eq!(app.grid.board().slot(id).unwrap().item(), Some(potion));
    }

    #[test]
    fn dismissing_leaves_slot_unchanged() {
        let mut app = app();
        let id = SlotId::new(Band::Right, 0, 0);

        let _ = app.update(AppMessage::Grid(GridMessage::OpenPicker(id)));
        let _ = app.update(AppMessage::Picker(PickerMessage::Dismiss));
        assert!(app.modal.is_none());
        assert!(!app.grid.board().is_committed(id));
    }

    #[test]
    fn board_is_blocked_while_picker_is_open() {
        let mut app = app();
        let first = SlotId::new(Band::Left, 0, 0);
        let second = SlotId::new(Band::Left, 0, 1);

        let _ = app.update(AppMessage::Grid(GridMessage::OpenPicker(first)));
        let _ = app.update(AppMessage::Picker(PickerMessage::Choose(entry(0))));
        let _ = app.update(AppMessage::Grid(GridMessage::OpenPicker(second)));
        // A second picker request and a drag on the placed item are ignored.
        let _ = app.update(AppMessage::Grid(GridMessage::OpenPicker(first)));
        let before = app.grid.board().slot(first).unwrap().position();
        let _ = app.update(AppMessage::Grid(GridMessage::BeginDrag(first)));
        let _ = app.update(AppMessage::CursorMoved(iced::Point::new(400.0, 400.0)));

        assert!(matches!(app.modal, Some(Modal::Picker(ref p)) if p.target() == second));
        assert_eq!(app.grid.board().slot(first).unwrap().position(), before);
    }

    #[test]
    fn cursor_is_translated_into_board_coordinates() {
        let mut app = app();
        let id = SlotId::new(Band::Left, 0, 0);
        let _ = app.update(AppMessage::Grid(GridMessage::OpenPicker(id)));
        let _ = app.update(AppMessage::Picker(PickerMessage::Choose(entry(1))));
        let start = app.grid.board().slot(id).unwrap().position().unwrap();

        let _ = app.update(AppMessage::CursorMoved(iced::Point::new(175.0, 40.0)));
        let _ = app.update(AppMessage::Grid(GridMessage::BeginDrag(id)));
        let _ = app.update(AppMessage::CursorMoved(iced::Point::new(185.0, 35.0)));
        let _ = app.update(AppMessage::PointerReleased);

        assert_eq!(
            app.grid.board().slot(id).unwrap().position(),
            Some(Point::new(start.x + 10.0, start.y - 5.0))
        );
    }

    #[test]
    fn restart_asks_first() {
        let mut app = app();
        let _ = app.update(AppMessage::Modal(OpenModal::ConfirmRestart));
        assert!(matches!(app.modal, Some(Modal::ConfirmRestart)));
        let _ = app.update(AppMessage::CloseModal);
        assert!(app.modal.is_none());
    }

    #[test]
    fn failed_restart_shows_notice_and_keeps_running() {
        let mut app = app();
        let dir = tempfile::tempdir().unwrap();
        app.exe = Some(dir.path().join("no-such-tracker"));

        let _ = app.update(AppMessage::Modal(OpenModal::ConfirmRestart));
        let _ = app.update(AppMessage::Restart);

        match &app.modal {
            Some(Modal::Notice { title, body }) => {
                assert_eq!(title, "Restart failed");
                assert!(body.contains("no-such-tracker"));
            }
            other => panic!("expected a notice, got {other:?}"),
        }
        let _ = app.update(AppMessage::CloseModal);
        assert!(app.modal.is_none());
    }

    #[test]
    fn restart_without_known_executable_is_reported() {
        let err = relaunch(None).unwrap_err();
        assert!(format!("{err:#}").contains("locating the running executable"));
    }

    #[test]
    fn menus_toggle_and_close_when_an_entry_is_used() {
        let mut app = app();
        let _ = app.update(AppMessage::ToggleMenu(Menu::Program));
        assert_eq!(app.menu, Some(Menu::Program));
        let _ = app.update(AppMessage::ToggleMenu(Menu::Help));
        assert_eq!(app.menu, Some(Menu::Help));
        let _ = app.update(AppMessage::ToggleMenu(Menu::Help));
        assert_eq!(app.menu, None);

        let _ = app.update(AppMessage::ToggleMenu(Menu::Program));
        let (_, restart) = Menu::Program.entries()[0];
        let _ = app.update(restart.into());
        assert_eq!(app.menu, None);
        assert!(matches!(app.modal, Some(Modal::ConfirmRestart)));
    }

    #[test]
    fn menus_group_program_and_help_entries() {
        let labels = |menu: Menu| -> Vec<&str> {
            menu.entries().iter().map(|(label, _)| *label).collect()
        };
        assert_eq!(labels(Menu::Program), ["Restart", "Exit"]);
        assert_eq!(labels(Menu::Help), ["About"]);
        assert_eq!(shortcut_label(BindableMessage::Restart), "Ctrl+r");
        assert_eq!(shortcut_label(BindableMessage::Quit), "Ctrl+q");
    }

    #[test]
    fn window_fits_board_and_menu() {
        let catalog = Catalog::builtin();
        let dir = tempfile::tempdir().unwrap();
        let setup = Setup {
            board: build_board(BoardLayout::default(), LOCATIONS),
            icons: Icons::load(&catalog, dir.path()),
            catalog,
            metrics: BoardMetrics::default(),
        };
        // Every built-in image is missing from the empty directory.
        assert_eq!(setup.window_size(), iced::Size::new(528.0, 28.0 + 540.0 + 24.0));
    }
}
