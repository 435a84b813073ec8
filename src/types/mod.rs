pub mod chart;
pub mod market;
pub mod notification;
pub mod settings;
pub mod trade;

pub use chart::*;
pub use market::*;
pub use notification::*;
pub use settings::*;
pub use trade::*;
