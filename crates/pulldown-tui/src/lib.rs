pub mod app;
pub mod demo;
pub mod event;
pub mod input;
pub mod surface;
pub mod theme;
pub mod transition;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use surface::TerminalSurface;
pub use theme::Theme;
