//! The paper: a window's worth of recorded primitives plus key bindings.

use crate::display::{DisplaySurface, PaintTarget};
use crate::error::{PaperError, PaperResult};
use crate::headless::HeadlessDisplay;
use crate::keys::Key;
use crate::primitive::Primitive;
use crate::prompt::{PromptKind, PromptRequest, PromptValue};
use crate::text::{EstimatedMetrics, FontStyle, TextExtent, TextMetrics};
use crate::title::TitleSequence;
use crate::Rgba;
use kurbo::{Point, Size};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError, Weak};

/// Process-unique identifier of a paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaperId(u64);

impl PaperId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "paper-{}", self.0)
    }
}

/// How a new paper looks.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperConfig {
    /// Content width in logical pixels.
    pub width: u32,
    /// Content height in logical pixels.
    pub height: u32,
    /// Window title; `None` picks the next "Paper #N".
    pub title: Option<String>,
    pub background: Rgba,
}

impl PaperConfig {
    pub const DEFAULT_WIDTH: u32 = 854;
    pub const DEFAULT_HEIGHT: u32 = 480;

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_background(mut self, color: impl Into<Rgba>) -> Self {
        self.background = color.into();
        self
    }
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            title: None,
            background: Rgba::WHITE,
        }
    }
}

type KeyAction = Arc<Mutex<dyn FnMut() + Send>>;

struct KeyBinding {
    key: Key,
    action: KeyAction,
}

/// Mutable part of a paper.
struct PaperState {
    background: Rgba,
    primitives: Vec<Primitive>,
    bindings: Vec<KeyBinding>,
    open: bool,
}

pub(crate) struct PaperInner {
    id: PaperId,
    title: String,
    size: Size,
    state: Mutex<PaperState>,
    display: Arc<dyn DisplaySurface>,
    metrics: Arc<dyn TextMetrics>,
}

/// Shared handle to a paper.
///
/// Cloning is cheap; every clone talks to the same primitives, bindings and
/// window. Pens keep only a weak reference, so a paper lives as long as its
/// owner and its host hold handles.
#[derive(Clone)]
pub struct Paper {
    inner: Arc<PaperInner>,
}

impl Paper {
    /// Open a paper drawn by `display`, titled from the global sequence.
    pub fn open(
        config: PaperConfig,
        display: Arc<dyn DisplaySurface>,
        metrics: Arc<dyn TextMetrics>,
    ) -> Self {
        Self::open_with_titles(config, display, metrics, TitleSequence::global())
    }

    /// Open a paper taking its default title from `titles`.
    pub fn open_with_titles(
        config: PaperConfig,
        display: Arc<dyn DisplaySurface>,
        metrics: Arc<dyn TextMetrics>,
        titles: &TitleSequence,
    ) -> Self {
        let numbered = titles.next_title();
        let title = config.title.unwrap_or(numbered);
        let id = PaperId::next();
        log::debug!("Opening {id} \"{title}\" ({}x{})", config.width, config.height);
        Self {
            inner: Arc::new(PaperInner {
                id,
                title,
                size: Size::new(f64::from(config.width), f64::from(config.height)),
                state: Mutex::new(PaperState {
                    background: config.background,
                    primitives: Vec::new(),
                    bindings: Vec::new(),
                    open: true,
                }),
                display,
                metrics,
            }),
        }
    }

    /// Open a paper with no window, backed by a fresh [`HeadlessDisplay`] and
    /// [`EstimatedMetrics`].
    pub fn headless(config: PaperConfig) -> (Self, Arc<HeadlessDisplay>) {
        let display = Arc::new(HeadlessDisplay::new());
        let paper = Self::open(config, display.clone(), Arc::new(EstimatedMetrics));
        (paper, display)
    }

    pub(crate) fn downgrade(&self) -> Weak<PaperInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn from_inner(inner: Arc<PaperInner>) -> Self {
        Self { inner }
    }

    fn state(&self) -> MutexGuard<'_, PaperState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the state, failing if the paper has been closed.
    fn open_state(&self) -> PaperResult<MutexGuard<'_, PaperState>> {
        let state = self.state();
        if state.open {
            Ok(state)
        } else {
            Err(self.closed_error())
        }
    }

    pub(crate) fn closed_error(&self) -> PaperError {
        PaperError::Closed(self.inner.title.clone())
    }

    pub fn id(&self) -> PaperId {
        self.inner.id
    }

    pub fn title(&self) -> &str {
        &self.inner.title
    }

    /// Initial content size in logical pixels.
    pub fn size(&self) -> Size {
        self.inner.size
    }

    pub fn is_open(&self) -> bool {
        self.state().open
    }

    pub fn background(&self) -> Rgba {
        self.state().background
    }

    /// Change the background color and repaint.
    pub fn set_background(&self, color: impl Into<Rgba>) -> PaperResult<()> {
        self.open_state()?.background = color.into();
        self.request_redraw();
        Ok(())
    }

    /// Forget everything drawn so far. Pens keep their position and heading.
    pub fn clear(&self) -> PaperResult<()> {
        self.open_state()?.primitives.clear();
        self.request_redraw();
        Ok(())
    }

    /// Append a primitive. Pens call this for everything they draw.
    pub fn add_primitive(&self, primitive: impl Into<Primitive>) -> PaperResult<()> {
        self.open_state()?.primitives.push(primitive.into());
        Ok(())
    }

    /// Snapshot of the recorded primitives in drawing order.
    pub fn primitives(&self) -> Vec<Primitive> {
        self.state().primitives.clone()
    }

    pub fn len(&self) -> usize {
        self.state().primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().primitives.is_empty()
    }

    /// Paint the background, then every primitive in insertion order.
    pub fn replay(&self, target: &mut dyn PaintTarget) {
        let state = self.state();
        target.fill_background(state.background, self.inner.size);
        for primitive in &state.primitives {
            target.paint(primitive);
        }
    }

    /// Run `action` every time `key` is pressed over this paper.
    ///
    /// Several actions may listen for the same key; they run in the order
    /// they were added.
    pub fn add_key_binding(
        &self,
        key: Key,
        action: impl FnMut() + Send + 'static,
    ) -> PaperResult<()> {
        self.open_state()?.bindings.push(KeyBinding {
            key,
            action: Arc::new(Mutex::new(action)),
        });
        Ok(())
    }

    /// Fire the actions bound to `key`; returns how many ran.
    ///
    /// The paper is not locked while actions run, so they may draw, bind more
    /// keys or open prompts. An action that is still running, for example one
    /// that dispatches its own key, is skipped.
    pub fn dispatch_key(&self, key: Key) -> usize {
        let actions: Vec<KeyAction> = {
            let state = self.state();
            if !state.open {
                return 0;
            }
            state
                .bindings
                .iter()
                .filter(|binding| binding.key == key)
                .map(|binding| binding.action.clone())
                .collect()
        };
        if !actions.is_empty() {
            log::debug!("{}: {} action(s) for key {key}", self.inner.id, actions.len());
        }
        let mut fired = 0;
        for action in &actions {
            let mut action = match action.try_lock() {
                Ok(action) => action,
                Err(TryLockError::Poisoned(e)) => e.into_inner(),
                Err(TryLockError::WouldBlock) => {
                    log::warn!("{}: action for key {key} is already running, skipping", self.inner.id);
                    continue;
                }
            };
            (&mut *action)();
            fired += 1;
        }
        fired
    }

    /// Ask for an integer with the default message and title.
    pub fn request_integer(&self) -> PaperResult<i32> {
        match self.request(PromptRequest::new(PromptKind::Integer))? {
            PromptValue::Integer(value) => Ok(value),
            other => Err(Self::mismatch(PromptKind::Integer, other)),
        }
    }

    /// Ask for a number with the default message and title.
    pub fn request_number(&self) -> PaperResult<f64> {
        match self.request(PromptRequest::new(PromptKind::Number))? {
            PromptValue::Number(value) => Ok(value),
            other => Err(Self::mismatch(PromptKind::Number, other)),
        }
    }

    /// Ask for a line of text with the default message and title.
    pub fn request_text(&self) -> PaperResult<String> {
        match self.request(PromptRequest::new(PromptKind::Text))? {
            PromptValue::Text(value) => Ok(value),
            other => Err(Self::mismatch(PromptKind::Text, other)),
        }
    }

    /// Show a modal prompt and block until the user confirms it.
    pub fn request(&self, request: PromptRequest) -> PaperResult<PromptValue> {
        if !self.is_open() {
            return Err(self.closed_error());
        }
        let prompt = request.into_prompt(&self.inner.title);
        log::debug!("{}: prompting for {} ({:?})", self.inner.id, prompt.kind(), prompt.message());
        let mut prompt = self.inner.display.run_prompt(self.inner.id, prompt)?;
        let value = prompt.submit()?;
        log::debug!("{}: prompt returned {value:?}", self.inner.id);
        Ok(value)
    }

    fn mismatch(kind: PromptKind, value: PromptValue) -> PaperError {
        PaperError::InvalidInput {
            kind,
            text: format!("{value:?}"),
        }
    }

    /// Pointer position relative to the content's top-left corner, if the
    /// pointer is over the paper.
    pub fn pointer_position(&self) -> Option<Point> {
        self.inner.display.pointer_position(self.inner.id)
    }

    pub fn mouse_x(&self) -> Option<f64> {
        self.pointer_position().map(|p| p.x)
    }

    pub fn mouse_y(&self) -> Option<f64> {
        self.pointer_position().map(|p| p.y)
    }

    /// Measure a line of text with this paper's font metrics.
    pub fn measure_text(&self, text: &str, style: FontStyle, size: f64) -> TextExtent {
        self.inner.metrics.measure(text, style, size)
    }

    pub fn request_redraw(&self) {
        self.inner.display.request_redraw(self.inner.id);
    }

    pub fn focus(&self) {
        self.inner.display.focus(self.inner.id);
    }

    /// Close the paper. Later drawing on it fails with [`PaperError::Closed`].
    pub fn close(&self) {
        {
            let mut state = self.state();
            if !state.open {
                return;
            }
            state.open = false;
            state.bindings.clear();
        }
        log::debug!("Closing {} \"{}\"", self.inner.id, self.inner.title);
        self.inner.display.close(self.inner.id);
    }
}

impl fmt::Debug for Paper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paper")
            .field("id", &self.inner.id)
            .field("title", &self.inner.title)
            .field("size", &self.inner.size)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
