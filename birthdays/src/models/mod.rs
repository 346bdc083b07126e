pub mod birthdays;
pub mod health;
