use services::{CatalogState, ProgressState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Remote(String),
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &'static str {
        "Something went wrong. Please try again."
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            ViewError::Remote(detail) => detail,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Error(ViewError),
}

/// Collapse the two data sources into one render state.
///
/// Loading wins while either source is outstanding. A failed progress load
/// still renders the catalog with every topic unread.
#[must_use]
pub fn view_state_from_sync<T>(
    catalog: &CatalogState,
    progress: &ProgressState,
    ready: impl FnOnce() -> T,
) -> ViewState<T> {
    if catalog.is_loading() || progress.is_loading() {
        return ViewState::Loading;
    }
    if let Some(message) = catalog.error() {
        return ViewState::Error(ViewError::Remote(message.to_owned()));
    }
    ViewState::Ready(ready())
}
