mod renderers;
mod storage;

pub use renderers::{chrome::ChromeRenderer, http::HttpRenderer, PageRenderer};
pub use storage::xlsx_store::XlsxStore;
