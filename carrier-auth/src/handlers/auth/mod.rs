pub mod registration;
pub mod session;

pub use registration::{company_register, moderator_register, register};
pub use session::{company_login, login, moderator_login, profile};
