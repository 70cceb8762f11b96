// Services layer - Business logic
pub mod crypto;
pub mod password_policy;
pub mod qr_renderer;
pub mod token_service;

pub use password_policy::PasswordPolicyError;
pub use qr_renderer::{QrError, QrRenderer};
pub use token_service::TokenService;
