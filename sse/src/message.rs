use axum::response::sse::Event;
use domain::error::Error as DomainError;
use domain::Fragment;
use std::fmt;

/// SSE event name for datastar element patches.
pub const PATCH_ELEMENTS_EVENT: &str = "datastar-patch-elements";

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// How the client applies patched elements to the DOM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatchMode {
    /// Morph the target element, matched by id (protocol default).
    #[default]
    Outer,
    Inner,
    Replace,
    Prepend,
    Append,
    Before,
    After,
    Remove,
}

impl PatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchMode::Outer => "outer",
            PatchMode::Inner => "inner",
            PatchMode::Replace => "replace",
            PatchMode::Prepend => "prepend",
            PatchMode::Append => "append",
            PatchMode::Before => "before",
            PatchMode::After => "after",
            PatchMode::Remove => "remove",
        }
    }
}

impl fmt::Display for PatchMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `datastar-patch-elements` message carrying markup for the client to merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchElements {
    elements: String,
    selector: Option<String>,
    mode: PatchMode,
    use_view_transition: bool,
}

impl PatchElements {
    /// Builds a patch with protocol defaults. Markup containing a carriage
    /// return cannot be split into SSE data lines and is rejected.
    pub fn new(elements: impl Into<String>) -> Result<Self, DomainError> {
        let elements = elements.into();
        if elements.contains('\r') {
            return Err(DomainError::encode("markup contains a carriage return"));
        }

        Ok(Self {
            elements,
            selector: None,
            mode: PatchMode::default(),
            use_view_transition: false,
        })
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_mode(mut self, mode: PatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_view_transition(mut self, enabled: bool) -> Self {
        self.use_view_transition = enabled;
        self
    }

    pub fn elements(&self) -> &str {
        &self.elements
    }

    /// The event's `data` payload, one protocol line per `\n`-separated entry.
    /// Options equal to their protocol default are omitted.
    pub fn data_lines(&self) -> String {
        let mut lines = Vec::new();

        if let Some(selector) = &self.selector {
            lines.push(format!("selector {selector}"));
        }
        if self.mode != PatchMode::Outer {
            lines.push(format!("mode {}", self.mode));
        }
        if self.use_view_transition {
            lines.push("useViewTransition true".to_string());
        }
        for line in self.elements.lines() {
            lines.push(format!("elements {line}"));
        }

        lines.join("\n")
    }

    /// Frames the patch as an SSE event.
    pub fn into_event(self) -> Event {
        Event::default()
            .event(self.event_type())
            .data(self.data_lines())
    }
}

impl TryFrom<&Fragment> for PatchElements {
    type Error = DomainError;

    fn try_from(fragment: &Fragment) -> Result<Self, Self::Error> {
        PatchElements::new(fragment.as_str())
    }
}

impl EventType for PatchElements {
    fn event_type(&self) -> &'static str {
        PATCH_ELEMENTS_EVENT
    }
}
