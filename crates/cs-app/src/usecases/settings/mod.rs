pub mod get_settings;
pub mod set_typing_speed;

pub use get_settings::GetSettings;
pub use set_typing_speed::SetTypingSpeed;
