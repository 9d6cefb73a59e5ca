pub mod config;
pub mod error;
pub mod level;
pub mod name;
pub mod value;

pub use config::Config;
pub use error::*;
pub use level::*;
pub use name::normalize_name;
pub use value::*;
