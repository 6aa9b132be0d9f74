pub mod error;
pub mod index;
pub mod resultset;
pub mod ycd;

pub use error::{Error, Result};
pub use resultset::ResultSet;
pub use ycd::{Header, YcdFile};
