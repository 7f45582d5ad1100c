use crate::color::Rgba;
use crate::hoist::HoistState;
use crate::renderer::SceneRenderer;
use crate::state::AppState;
use crate::terminal::{viewport_for_cells, CellGrid};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::debug;

/// Orbit or pan distance, in pixels, of one arrow key press
const KEY_STEP: f64 = 7.0;
/// Pixels of message slide per terminal row
const MESSAGE_PIXELS_PER_ROW: f64 = 10.0;

const BUTTON_FG: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
const BUTTON_BG: Rgba = Rgba::rgb(0.8, 0.35, 0.05);
const BUTTON_DISABLED_FG: Rgba = Rgba::rgb(0.6, 0.6, 0.6);
const BUTTON_DISABLED_BG: Rgba = Rgba::rgb(0.25, 0.25, 0.25);
const HELP_FG: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
const HELP_BG: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
const MESSAGE_FG: Rgba = Rgba::rgb(1.0, 0.84, 0.0);

pub const MESSAGE_LINES: [&str; 2] = ["Happy Independence Day!", "Jai Hind!"];

const HELP_LINES: [&str; 4] = [
    "Left drag: rotate view",
    "Right drag: pan camera",
    "Scroll: zoom in/out",
    "h hoist  r reset  c reset view  d debug  ? help  q quit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Hoist,
    Reset,
    ResetView,
}

/// A clickable control in the top row
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub kind: ButtonKind,
    pub label: &'static str,
    pub col: u16,
    pub enabled: bool,
}

impl Button {
    pub fn width(&self) -> u16 {
        self.label.chars().count() as u16
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        row == 0 && col >= self.col && col < self.col + self.width()
    }
}

/// Buttons shown for the current hoist state, laid out left to right
pub fn buttons(state: HoistState) -> Vec<Button> {
    let mut layout = vec![(
        ButtonKind::Hoist,
        "[ Hoist the Flag ]",
        state == HoistState::Lowered,
    )];
    if state == HoistState::Hoisted {
        layout.push((ButtonKind::Reset, "[ Reset ]", true));
    }
    layout.push((ButtonKind::ResetView, "[ Reset View ]", true));

    let mut col = 1;
    layout
        .into_iter()
        .map(|(kind, label, enabled)| {
            let button = Button {
                kind,
                label,
                col,
                enabled,
            };
            col += button.width() + 1;
            button
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Rotate,
    Pan,
}

/// Maps terminal input onto scene commands and draws the UI on top of the scene
#[derive(Debug, Default)]
pub struct FlagWidget {
    drag: Option<DragMode>,
    last_mouse_pos: (u16, u16),
}

impl FlagWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle events for the flag widget
    pub fn event(
        &mut self,
        event: &Event,
        renderer: &mut SceneRenderer,
        data: &mut AppState,
    ) -> Response {
        match event {
            Event::Key(key) => self.key(key, renderer, data),
            Event::Mouse(mouse) => {
                self.mouse(mouse, renderer);
                Response::Continue
            }
            Event::Resize(cols, rows) => {
                renderer.resize(viewport_for_cells(*cols, *rows));
                Response::Continue
            }
            _ => Response::Continue,
        }
    }

    fn key(
        &mut self,
        key: &KeyEvent,
        renderer: &mut SceneRenderer,
        data: &mut AppState,
    ) -> Response {
        if key.kind == KeyEventKind::Release {
            return Response::Continue;
        }
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Response::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Response::Quit
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                renderer.hoist();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                renderer.reset();
            }
            KeyCode::Char('c') | KeyCode::Char('C') => renderer.reset_camera_view(),
            KeyCode::Char('d') | KeyCode::Char('D') => data.debug = !data.debug,
            KeyCode::Char('?') => data.show_help = !data.show_help,
            KeyCode::Char('+') | KeyCode::Char('=') => renderer.zoom(1.0),
            KeyCode::Char('-') | KeyCode::Char('_') => renderer.zoom(-1.0),
            KeyCode::Left if shift => renderer.pan(KEY_STEP, 0.0),
            KeyCode::Right if shift => renderer.pan(-KEY_STEP, 0.0),
            KeyCode::Up if shift => renderer.pan(0.0, KEY_STEP),
            KeyCode::Down if shift => renderer.pan(0.0, -KEY_STEP),
            KeyCode::Left => renderer.orbit(KEY_STEP, 0.0),
            KeyCode::Right => renderer.orbit(-KEY_STEP, 0.0),
            KeyCode::Up => renderer.orbit(0.0, KEY_STEP),
            KeyCode::Down => renderer.orbit(0.0, -KEY_STEP),
            _ => {}
        }
        Response::Continue
    }

    fn mouse(&mut self, mouse: &MouseEvent, renderer: &mut SceneRenderer) {
        let pos = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(button) => {
                let clicked = buttons(renderer.hoist_state())
                    .into_iter()
                    .find(|b| b.contains(pos.0, pos.1));
                if let Some(clicked) = clicked {
                    if clicked.enabled {
                        press(clicked.kind, renderer);
                    }
                    return;
                }
                self.drag = match button {
                    MouseButton::Left => Some(DragMode::Rotate),
                    MouseButton::Right => Some(DragMode::Pan),
                    MouseButton::Middle => None,
                };
                self.last_mouse_pos = pos;
            }
            MouseEventKind::Drag(_) => {
                if let Some(mode) = self.drag {
                    // A cell is one pixel wide and two pixels tall
                    let dx = pos.0 as f64 - self.last_mouse_pos.0 as f64;
                    let dy = (pos.1 as f64 - self.last_mouse_pos.1 as f64) * 2.0;
                    match mode {
                        DragMode::Rotate => renderer.orbit(dx, dy),
                        DragMode::Pan => renderer.pan(dx, dy),
                    }
                    self.last_mouse_pos = pos;
                }
            }
            MouseEventKind::Up(_) => self.drag = None,
            MouseEventKind::ScrollUp => renderer.zoom(1.0),
            MouseEventKind::ScrollDown => renderer.zoom(-1.0),
            _ => {}
        }
    }

    /// Scene plus buttons, message, help and debug text
    pub fn compose(&self, renderer: &SceneRenderer, data: &AppState) -> CellGrid {
        let mut grid = CellGrid::from_framebuffer(renderer.framebuffer());

        for button in buttons(renderer.hoist_state()) {
            let (fg, bg) = if button.enabled {
                (BUTTON_FG, BUTTON_BG)
            } else {
                (BUTTON_DISABLED_FG, BUTTON_DISABLED_BG)
            };
            grid.put_text(button.col as usize, 0, button.label, fg, Some(bg));
        }

        if renderer.message_visible() {
            draw_message(&mut grid, renderer);
        }

        if data.show_help {
            let top = grid.rows().saturating_sub(HELP_LINES.len());
            for (i, line) in HELP_LINES.iter().enumerate() {
                grid.put_text(1, top + i, line, HELP_FG, Some(HELP_BG));
            }
        }

        if data.debug {
            let camera = renderer.camera();
            let lines = [
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("FPS: {:.2}", data.fps.fps()),
                format!("State: {}", renderer.hoist_state()),
                format!("Time: {:.2}", renderer.elapsed()),
                format!(
                    "Camera: ({:.2}, {:.2}, {:.2})",
                    camera.position.x, camera.position.y, camera.position.z
                ),
                format!("Flag Y: {:.2}", renderer.cloth_transform().position.y),
            ];
            for (i, line) in lines.iter().enumerate() {
                let col = grid.cols().saturating_sub(line.chars().count() + 1);
                grid.put_text(col, i + 2, line, HELP_FG, Some(HELP_BG));
            }
        }

        grid
    }
}

fn press(kind: ButtonKind, renderer: &mut SceneRenderer) {
    debug!("button {kind:?} pressed");
    match kind {
        ButtonKind::Hoist => {
            renderer.hoist();
        }
        ButtonKind::Reset => {
            renderer.reset();
        }
        ButtonKind::ResetView => renderer.reset_camera_view(),
    }
}

/// Centered celebration text, faded, narrowed and slid by the entrance pose
fn draw_message(grid: &mut CellGrid, renderer: &SceneRenderer) {
    let pose = renderer.message_pose();
    let offset_rows = (pose.offset_y / MESSAGE_PIXELS_PER_ROW).round() as isize;
    let base_row = (grid.rows() / 4) as isize + offset_rows;

    for (i, line) in MESSAGE_LINES.iter().enumerate() {
        let row = base_row + i as isize;
        if row < 0 || row as usize >= grid.rows() {
            continue;
        }
        let row = row as usize;
        let len = line.chars().count();
        let shown = ((len as f64 * pose.scale).round() as usize).min(len);
        let skip = (len - shown) / 2;
        let text: String = line.chars().skip(skip).take(shown).collect();
        let col = grid.cols().saturating_sub(shown) / 2;
        let under = grid.cell(col.min(grid.cols().saturating_sub(1)), row).bg;
        grid.put_text(col, row, &text, under.lerp(MESSAGE_FG, pose.opacity), None);
    }
}
