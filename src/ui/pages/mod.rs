//! Page components rendered into the layout outlet.

mod dashboard;
mod data_exploration;

pub use dashboard::Dashboard;
pub use data_exploration::DataExploration;
