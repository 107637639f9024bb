pub mod chat;
pub mod console;
pub mod settings;
pub mod shared;
pub mod staging;

pub use chat::ChatView;
pub use console::DemoConsoleView;
pub use settings::SettingsView;
