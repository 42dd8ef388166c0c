// ABOUTME: Account management and authentication for GiveLink
// ABOUTME: Donor and receiver records, argon2 password hashing and signed session tokens

pub mod error;
pub mod password;
pub mod storage;
pub mod token;
pub mod types;

// Re-export main types
pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
pub use storage::AccountStorage;
pub use token::{constant_time_eq, Claims, TokenService, TOKEN_TTL_HOURS};
pub use types::{
    Credentials, Donor, DonorSignup, DonorType, Receiver, ReceiverSignup, ReceiverType, Role,
};
