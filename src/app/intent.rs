use crate::style::StyleDocument;

/// User-level requests handled by [`reduce`](super::handler::reduce).
#[derive(Debug, Clone)]
pub enum Intent {
    /// Stamp the current style as modified and persist it.
    Save,
    /// Persist a new style and adopt whatever the store returns.
    Upload(StyleDocument),
    /// Export the current style to a file, then save it.
    Download,
    /// Delete every persisted style and adopt the default style.
    Reset,
    /// Replace the current style without persisting it.
    StyleChanged(StyleDocument),
    AccessTokenChanged(String),
    OpenSettings,
    OpenAbout,
    OpenSources,
    CloseModal,
    Quit,
}
