//! Editor state: document, history, selection and the active gesture.
//!
//! This is the single owner the UI layer talks to. Every discrete mutation
//! goes store -> history commit. A gesture previews its geometry on a
//! working copy of the current snapshot and commits once on pointer-up.

use crate::config::EditorConfig;
use crate::document::{Document, DocumentResult, DocumentSettings, Template, validate_elements};
use crate::elements::{Element, ElementId, ElementKind, ElementPatch};
use crate::handles::{Handle, HandleKind, get_handles};
use crate::hit::{element_at, handle_at};
use crate::history::{History, Snapshot};
use crate::input::{MouseButton, PointerEvent};
use crate::math::is_finite_point;
use crate::store::{self, ReorderDirection};
use crate::transform::{InteractionKind, TransformError, TransformSession};
use crate::viewport::Viewport;
use kurbo::Point;

/// Certificate editor.
#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    settings: DocumentSettings,
    history: History,
    selection: Option<ElementId>,
    /// `None` until the canvas has been laid out on screen.
    viewport: Option<Viewport>,
    session: TransformSession,
    /// Working copy shown while a gesture is in progress.
    preview: Option<Vec<Element>>,
    /// Latest geometry emitted by the session.
    pending: Option<ElementPatch>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Editor on an empty document.
    pub fn new(config: EditorConfig) -> Self {
        let settings = DocumentSettings {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            ..Default::default()
        };
        Self {
            history: History::new().with_limit(config.history_limit),
            config,
            settings,
            selection: None,
            viewport: None,
            session: TransformSession::new(),
            preview: None,
            pending: None,
        }
    }

    /// Editor whose history starts at a loaded document.
    pub fn from_document(document: Document, config: EditorConfig) -> DocumentResult<Self> {
        validate_elements(&document.elements)?;
        let mut editor = Self::new(config);
        editor.settings = document.settings;
        editor.history = History::with_initial(document.elements).with_limit(editor.config.history_limit);
        Ok(editor)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    /// Canvas settings are edited directly; they are not part of history.
    pub fn settings_mut(&mut self) -> &mut DocumentSettings {
        &mut self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Committed state at the history cursor.
    pub fn snapshot(&self) -> &Snapshot {
        self.history.current()
    }

    /// What should be drawn: the gesture preview if one is live, otherwise
    /// the committed state.
    pub fn elements(&self) -> &[Element] {
        match &self.preview {
            Some(preview) => preview.as_slice(),
            None => &self.history.current()[..],
        }
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        store::get(self.elements(), id)
    }

    /// Current document, including any live gesture preview.
    pub fn document(&self) -> Document {
        Document {
            settings: self.settings,
            elements: self.elements().to_vec(),
        }
    }

    pub fn selection(&self) -> Option<&ElementId> {
        self.selection.as_ref()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.as_ref().and_then(|id| self.element(id))
    }

    /// Select an element. Unknown ids clear the selection.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.selection = id.filter(|id| store::contains(self.elements(), id));
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Record where the canvas is on screen; `None` when it is not mounted.
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    /// Handles of the selected element, for drawing.
    pub fn handles(&self) -> Vec<Handle> {
        self.selected_element()
            .map(|e| get_handles(e.geometry(), self.config.rotate_handle_offset))
            .unwrap_or_default()
    }

    pub fn is_transforming(&self) -> bool {
        self.session.is_active()
    }

    pub fn session(&self) -> &TransformSession {
        &self.session
    }

    // --- Discrete mutations ---

    /// Add an element on top and select it. Returns `None` if its id is
    /// already taken.
    pub fn add_element(&mut self, element: Element) -> Option<ElementId> {
        let id = element.id().clone();
        if store::contains(self.history.current(), &id) {
            log::warn!("Element {id} already exists");
            return None;
        }
        let next = store::add(self.history.current(), element);
        self.commit(next);
        self.selection = Some(id.clone());
        Some(id)
    }

    /// Add a default element of the given kind and select it.
    pub fn add_new(&mut self, kind: ElementKind) -> ElementId {
        let element = Element::new_of_kind(kind);
        let id = element.id().clone();
        let next = store::add(self.history.current(), element);
        self.commit(next);
        self.selection = Some(id.clone());
        id
    }

    /// Remove an element and clear the selection. A gesture on that element
    /// is cancelled without emitting anything.
    pub fn delete_element(&mut self, id: &ElementId) -> bool {
        if self.session.invalidate(id) {
            self.discard_preview();
        }
        if !store::contains(self.history.current(), id) {
            return false;
        }
        let next = store::remove(self.history.current(), id);
        self.commit(next);
        self.selection = None;
        true
    }

    /// Merge field edits into an element. Returns false if the element is
    /// gone or nothing changed.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        if !store::contains(self.history.current(), id) {
            if self.session.invalidate(id) {
                self.discard_preview();
            }
            return false;
        }
        let next = store::update(self.history.current(), id, patch);
        if next[..] == self.history.current()[..] {
            return false;
        }
        self.commit(next);
        true
    }

    /// Change an element's paint order.
    pub fn reorder(&mut self, id: &ElementId, direction: ReorderDirection) -> bool {
        let next = store::reorder(self.history.current(), id, direction);
        if next[..] == self.history.current()[..] {
            return false;
        }
        self.commit(next);
        true
    }

    /// Replace settings and contents with a template, as one history entry.
    pub fn apply_template(&mut self, template: Template) -> DocumentResult<()> {
        validate_elements(&template.elements)?;
        self.cancel_transform();
        template.apply_settings(&mut self.settings);
        log::info!("Applying template with {} elements", template.elements.len());
        self.commit(template.elements);
        self.selection = None;
        Ok(())
    }

    // --- Gestures ---

    /// Route a pointer press: a handle of the selected element starts a
    /// resize or rotate, an element starts a move, empty canvas deselects.
    ///
    /// Returns the gesture started, if any.
    pub fn pointer_down(&mut self, screen_point: Point) -> Result<Option<InteractionKind>, TransformError> {
        let Some(viewport) = self.viewport else {
            log::warn!("Pointer down before the canvas is mounted");
            return Err(TransformError::CanvasUnavailable);
        };
        if !is_finite_point(screen_point) {
            return Err(TransformError::InvalidPointer);
        }
        if self.session.is_active() {
            // The previous release never arrived
            log::debug!("Dropping stale gesture");
            self.cancel_transform();
        }

        let canvas_point = viewport.screen_to_canvas(screen_point);
        if let Some(selected) = self.selection.clone() {
            let handle = handle_at(
                self.elements(),
                &selected,
                canvas_point,
                self.config.handle_hit_radius,
                self.config.rotate_handle_offset,
            );
            if let Some(handle) = handle {
                let kind = match handle {
                    HandleKind::Resize(h) => InteractionKind::Resize(h),
                    HandleKind::Rotate => InteractionKind::Rotate,
                };
                self.begin_transform(&selected, kind, screen_point)?;
                return Ok(Some(kind));
            }
        }

        match element_at(self.elements(), canvas_point, 0.0).cloned() {
            Some(id) => {
                self.begin_transform(&id, InteractionKind::Move, screen_point)?;
                Ok(Some(InteractionKind::Move))
            }
            None => {
                self.selection = None;
                Ok(None)
            }
        }
    }

    /// Start a gesture on a specific element. The element becomes selected.
    pub fn begin_transform(
        &mut self,
        id: &ElementId,
        kind: InteractionKind,
        screen_point: Point,
    ) -> Result<(), TransformError> {
        let element = store::get(self.history.current(), id)
            .ok_or_else(|| TransformError::UnknownElement(id.clone()))?;
        self.session.start(
            id.clone(),
            element.geometry(),
            kind,
            screen_point,
            self.viewport,
            self.config.min_element_size,
        )?;
        self.preview = Some(self.history.current().to_vec());
        self.pending = None;
        self.selection = Some(id.clone());
        Ok(())
    }

    /// Feed a pointer sample to the active gesture. Returns true if the
    /// preview changed.
    pub fn pointer_move(&mut self, screen_point: Option<Point>) -> bool {
        let Some(update) = self.session.update(screen_point) else {
            return false;
        };
        let Some(preview) = self.preview.as_mut() else {
            return false;
        };
        let Some(element) = preview.iter_mut().find(|e| e.id() == &update.id) else {
            self.cancel_transform();
            return false;
        };
        let changed = element.apply_patch(&update.patch);
        self.pending = Some(update.patch);
        changed
    }

    /// Finish the gesture. Commits one history entry if the geometry changed.
    pub fn pointer_up(&mut self) -> bool {
        if self.session.end().is_none() {
            return false;
        }
        self.pending = None;
        let Some(preview) = self.preview.take() else {
            return false;
        };
        if preview[..] == self.history.current()[..] {
            return false;
        }
        self.history.commit(preview);
        true
    }

    /// Abandon the gesture; the element keeps its committed geometry.
    pub fn cancel_transform(&mut self) {
        self.session.cancel();
        self.discard_preview();
    }

    /// Dispatch a pointer event. Returns true if anything visible changed.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Result<bool, TransformError> {
        match event {
            PointerEvent::Down { position, button } => {
                if *button != MouseButton::Left {
                    return Ok(false);
                }
                let before = self.selection.clone();
                let started = self.pointer_down(*position)?;
                Ok(started.is_some() || before != self.selection)
            }
            PointerEvent::Move { position } => Ok(self.pointer_move(*position)),
            PointerEvent::Up => Ok(self.pointer_up()),
            PointerEvent::Cancel => {
                let active = self.is_transforming();
                self.cancel_transform();
                Ok(active)
            }
        }
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        self.cancel_transform();
        self.selection = None;
        self.history.undo().is_some()
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_transform();
        self.selection = None;
        self.history.redo().is_some()
    }

    fn commit(&mut self, elements: Vec<Element>) {
        self.history.commit(elements);
        self.refresh_preview();
    }

    /// Rebuild the gesture preview on top of a newly committed state.
    fn refresh_preview(&mut self) {
        let Some(id) = self.session.element_id().cloned() else {
            return;
        };
        if !store::contains(self.history.current(), &id) {
            self.cancel_transform();
            return;
        }
        let preview = match &self.pending {
            Some(patch) => store::update(self.history.current(), &id, patch),
            None => self.history.current().to_vec(),
        };
        self.preview = Some(preview);
    }

    fn discard_preview(&mut self) {
        self.preview = None;
        self.pending = None;
    }
}
