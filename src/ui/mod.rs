mod notifier;
mod renderer;
mod terminal;

pub use notifier::{LogNotifier, Notice, NoticeLevel, Notifier};
pub use renderer::Renderer;
pub use terminal::{TerminalRenderer, sparkline};
