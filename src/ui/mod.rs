pub mod notice;
pub mod popup;

#[cfg(feature = "egui")]
pub mod panel;

pub use notice::{Notice, NoticeLevel};
pub use popup::Popup;

#[cfg(feature = "egui")]
pub use panel::ControlPanel;
