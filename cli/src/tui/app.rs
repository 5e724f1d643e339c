use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use mapty_core::{
    FileStorage, FixedPosition, FormField, LatLng, QueuedAlerts, TargetRole, TrackerConfig,
    WorkoutController,
};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::TableState;
use tracing::error;

use crate::tui::map::TerminalMap;

/// Width of the row selection marker drawn in front of every list row.
pub const HIGHLIGHT_WIDTH: u16 = 2;
/// Width of the `×` and `⚙` columns.
pub const CONTROL_WIDTH: u16 = 2;
/// Each workout takes a title line and a details line.
pub const ROW_HEIGHT: u16 = 2;

pub type Controller = WorkoutController<FileStorage, TerminalMap, QueuedAlerts>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
    /// Start a fresh session, as after a page reload.
    Restart,
}

pub struct App {
    pub controller: Controller,
    pub state: TableState,
    /// Inner areas from the last draw, for mouse hit testing.
    pub map_area: Rect,
    pub list_area: Rect,
}

impl App {
    pub fn new(storage: FileStorage, config: TrackerConfig, position: Option<LatLng>) -> App {
        let mut controller =
            WorkoutController::new(storage, TerminalMap::default(), QueuedAlerts::default(), config);
        controller.start(&FixedPosition(position));

        let mut state = TableState::default();
        if !controller.rows().is_empty() {
            state.select(Some(0));
        }
        App {
            controller,
            state,
            map_area: Rect::default(),
            list_area: Rect::default(),
        }
    }

    pub fn tick(&mut self) {
        self.controller.tick(Instant::now());
    }

    pub fn next(&mut self) {
        let len = self.controller.rows().len();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.controller.rows().len();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn selected_id(&self) -> Option<String> {
        let i = self.state.selected()?;
        self.controller.rows().get(i).map(|row| row.id.clone())
    }

    fn click_row(&mut self, id: &str, role: TargetRole) {
        if let Err(e) = self.controller.handle_list_click(id, role) {
            error!(error = %e, id, "list action failed");
        }

        // Keep the selection on a row that still exists.
        let len = self.controller.rows().len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            _ => {}
        }
    }

    fn click_selected(&mut self, role: TargetRole) {
        if let Some(id) = self.selected_id() {
            self.click_row(&id, role);
        }
    }

    fn open_form_at_center(&mut self) {
        if let Some(center) = self.controller.map().center_at(Instant::now()) {
            self.controller.handle_map_click(center);
        }
    }

    fn submit(&mut self) {
        match self.controller.submit() {
            Ok(Some(_)) => self.state.select(Some(0)),
            Ok(None) => {}
            // Both cases have already been alerted.
            Err(mapty_core::TrackerError::InvalidInput) => {}
            Err(e) => error!(error = %e, "saving workout failed"),
        }
    }

    fn reset(&mut self) -> AppAction {
        if !self.controller.is_reset_visible() {
            return AppAction::Continue;
        }
        match self.controller.reset() {
            Ok(_) => AppAction::Restart,
            Err(e) => {
                error!(error = %e, "reset failed");
                AppAction::Continue
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if self.controller.alerter().is_blocking() {
            self.controller.alerter_mut().dismiss();
            return AppAction::Continue;
        }

        if self.controller.form().is_shown() {
            self.handle_form_key(key);
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Enter => self.click_selected(TargetRole::RowBody),
            KeyCode::Char('d') | KeyCode::Delete => self.click_selected(TargetRole::CloseButton),
            KeyCode::Char('s') => self.click_selected(TargetRole::SettingsIcon),
            KeyCode::Char('n') => self.open_form_at_center(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.controller.map_mut().zoom_in(),
            KeyCode::Char('-') => self.controller.map_mut().zoom_out(),
            KeyCode::Char('R') => return self.reset(),
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let focus = self.controller.form().focus();
        match key.code {
            KeyCode::Esc => self.controller.cancel_form(),
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.controller.form_mut().focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.controller.form_mut().focus_previous(),
            KeyCode::Left | KeyCode::Right if focus == FormField::Type => self.controller.toggle_type(),
            KeyCode::Char(' ') | KeyCode::Char('t') if focus == FormField::Type => {
                self.controller.toggle_type()
            }
            KeyCode::Char(c) => {
                if let Some(value) = self.controller.form_mut().value_mut(focus) {
                    value.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(value) = self.controller.form_mut().value_mut(focus) {
                    value.pop();
                }
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let at = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.controller.alerter().is_blocking() {
                    self.controller.alerter_mut().dismiss();
                } else if self.map_area.contains(at) {
                    self.click_map(at);
                } else if self.list_area.contains(at) {
                    self.click_list(at);
                }
            }
            MouseEventKind::ScrollUp if self.map_area.contains(at) => {
                self.controller.map_mut().zoom_in()
            }
            MouseEventKind::ScrollDown if self.map_area.contains(at) => {
                self.controller.map_mut().zoom_out()
            }
            _ => {}
        }
    }

    fn click_map(&mut self, at: Position) {
        let viewport = self.controller.map().viewport(Instant::now(), self.map_area);
        if let Some(coords) = viewport.and_then(|v| v.cell_to_latlng(self.map_area, at.x, at.y)) {
            self.controller.handle_map_click(coords);
        }
    }

    fn click_list(&mut self, at: Position) {
        let row_index = self.state.offset() + ((at.y - self.list_area.y) / ROW_HEIGHT) as usize;
        let Some(id) = self.controller.rows().get(row_index).map(|row| row.id.clone()) else {
            return;
        };
        let role = resolve_role(at.x - self.list_area.x, self.list_area.width);
        self.state.select(Some(row_index));
        self.click_row(&id, role);
    }
}

/// Which control of a list row sits at `column` (relative to the list's inner area).
pub fn resolve_role(column: u16, width: u16) -> TargetRole {
    let close = HIGHLIGHT_WIDTH..HIGHLIGHT_WIDTH + CONTROL_WIDTH;
    if close.contains(&column) {
        TargetRole::CloseButton
    } else if column + CONTROL_WIDTH >= width {
        TargetRole::SettingsIcon
    } else {
        TargetRole::RowBody
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_role() {
        assert_eq!(resolve_role(0, 40), TargetRole::RowBody);
        assert_eq!(resolve_role(2, 40), TargetRole::CloseButton);
        assert_eq!(resolve_role(3, 40), TargetRole::CloseButton);
        assert_eq!(resolve_role(4, 40), TargetRole::RowBody);
        assert_eq!(resolve_role(37, 40), TargetRole::RowBody);
        assert_eq!(resolve_role(38, 40), TargetRole::SettingsIcon);
        assert_eq!(resolve_role(39, 40), TargetRole::SettingsIcon);
    }
}
