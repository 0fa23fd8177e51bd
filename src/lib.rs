pub mod config;
pub mod display;
pub mod draw;
pub mod error;
pub mod parser;
pub mod session;
pub mod store;
pub mod web;

pub use config::AppConfig;
pub use draw::{distribute, order_numerically, shuffle, DayMode, DrawLists, DrawReport, Drawer, ShiftCategory};
pub use error::{DrawError, SessionError, StoreError};
pub use session::{Session, SessionContext};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
