pub mod external_url;
pub use external_url::{external_base_url, external_url};
pub mod markup;
pub use markup::escape_markup;
