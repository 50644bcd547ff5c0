use crate::style::StyleDocument;

/// Side effects requested by the reducer, executed by the main loop.
#[derive(Debug)]
pub enum Action {
    /// Persist a style. With `adopt`, the stored value replaces the current
    /// style when the store answers. `revision` is the state revision the
    /// save was issued at.
    SaveStyle {
        style: StyleDocument,
        adopt: bool,
        revision: u64,
    },
    /// Purge the store, then adopt the default style.
    ResetStore,
    /// Write the style to `<id>.json` in the export directory.
    ExportStyle { style: StyleDocument },
}
