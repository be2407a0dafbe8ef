//! Drive an editor through a recorded script.

use crate::script::{Script, Step};
use certcraft_core::{Document, Editor, Element, InteractionKind};
use kurbo::Point;
use std::fmt::Write as _;

/// What happened during a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Steps executed.
    pub steps: usize,
    /// Steps the editor turned down (unknown ids, refused gestures, no-op
    /// undo/redo, ...).
    pub rejected: usize,
    pub history_len: usize,
    pub history_cursor: usize,
    /// Gesture still in progress when the script ran out; it was cancelled.
    pub unfinished: Option<InteractionKind>,
}

/// Run every step of `script` against `editor`.
///
/// A step the editor refuses is logged and skipped; the replay carries on,
/// the same way an interactive session would.
pub fn replay(editor: &mut Editor, script: &Script) -> ReplayReport {
    let mut report = ReplayReport::default();
    for (index, step) in script.steps.iter().enumerate() {
        log::debug!("Step {index}: {step:?}");
        if !run_step(editor, step) {
            log::warn!("Step {index} had no effect: {step:?}");
            report.rejected += 1;
        }
        report.steps += 1;
    }
    if let Some(kind) = editor.session().kind() {
        log::warn!("Script ended mid-gesture ({kind:?}), cancelling");
        editor.cancel_transform();
        report.unfinished = Some(kind);
    }
    report.history_len = editor.history().len();
    report.history_cursor = editor.history().cursor();
    report
}

fn run_step(editor: &mut Editor, step: &Step) -> bool {
    match step {
        Step::Down { x, y } => match editor.pointer_down(Point::new(*x, *y)) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Pointer down refused: {e}");
                false
            }
        },
        Step::Begin { id, kind, handle, x, y } => {
            let started = Step::interaction(*kind, handle.as_deref())
                .and_then(|kind| editor.begin_transform(id, kind, Point::new(*x, *y)));
            match started {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Gesture refused: {e}");
                    false
                }
            }
        }
        Step::Move { x, y } => editor.pointer_move(Step::move_position(*x, *y)),
        Step::Up => {
            editor.pointer_up();
            true
        }
        Step::Cancel => {
            editor.cancel_transform();
            true
        }
        Step::Undo => editor.undo(),
        Step::Redo => editor.redo(),
        Step::Add { kind } => {
            editor.add_new(*kind);
            true
        }
        Step::Delete { id } => editor.delete_element(id),
        Step::Reorder { id, direction } => editor.reorder(id, *direction),
        Step::Update { id, patch } => editor.update_element(id, patch),
    }
}

/// One line per element, back to front.
pub fn summarize(document: &Document) -> String {
    let settings = &document.settings;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "canvas {}x{} background {} border {} ({:?})",
        settings.canvas_width,
        settings.canvas_height,
        settings.background_color,
        settings.border_color,
        settings.border_style,
    );
    for element in &document.elements {
        let g = element.geometry();
        let _ = writeln!(
            out,
            "{:<6} {} at ({:.1}, {:.1}) size {:.1}x{:.1} rotation {:.1}{}",
            format!("{:?}", element.kind()).to_lowercase(),
            element.id(),
            g.x,
            g.y,
            g.width,
            g.height,
            g.rotation,
            detail(element),
        );
    }
    out
}

fn detail(element: &Element) -> String {
    match element {
        Element::Text(text) => format!(" \"{}\"", text.content),
        Element::Image(image) => format!(" src {}", image.src),
        Element::Line(line) => format!(" stroke {} {}px", line.stroke, line.stroke_width),
    }
}
