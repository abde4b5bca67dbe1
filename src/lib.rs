pub mod banner;
pub mod config;
pub mod consts;
pub mod coze;
pub mod error;
pub mod server;
pub mod spinner;
pub mod transport;
pub mod upload;

pub use coze::{CozeClient, PromptOptions};
pub use error::CozeError;
