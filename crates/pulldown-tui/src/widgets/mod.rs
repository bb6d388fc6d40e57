mod banner;
mod content;
mod popup;
mod status_bar;

pub use banner::BannerWidget;
pub use content::ContentWidget;
pub use popup::PopupWidget;
pub use status_bar::StatusBarWidget;
