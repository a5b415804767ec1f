pub mod setting;
pub mod message;

pub use setting::Entity as Setting;
pub use message::Entity as StarMessage;
