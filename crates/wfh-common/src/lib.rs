pub mod config;
pub mod date_window;
pub mod error;
pub mod types;

pub use config::{BatchMode, GeneralConfig, PolicyConfig, Span, WeekStart, WindowSpec};
pub use date_window::{
    next_navigable_date, next_navigable_week, week_of, DateWindow, DateWindowPolicy, Direction,
    WithdrawActor,
};
pub use error::{Error, Result};
pub use types::*;
