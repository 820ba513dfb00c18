pub mod chat;
pub mod directory;
pub mod health;
pub mod lookup;
