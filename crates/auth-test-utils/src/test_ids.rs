//! Fixed test identities for deterministic tests
//!
//! The in-memory store numbers records in creation order, so the first user
//! created in a fresh store is always `u1`.

// Alice
pub const TEST_USERNAME_ALICE: &str = "alice";
pub const TEST_EMAIL_ALICE: &str = "a@x.com";
pub const TEST_PASSWORD_ALICE: &str = "secret1";

// Bob
pub const TEST_USERNAME_BOB: &str = "bob";
pub const TEST_EMAIL_BOB: &str = "b@x.com";
pub const TEST_PASSWORD_BOB: &str = "hunter22";

// An address no test ever signs up
pub const TEST_EMAIL_GHOST: &str = "ghost@x.com";

pub const TEST_WRONG_PASSWORD: &str = "wrong";

// In-memory store ids
pub const TEST_FIRST_USER_ID: &str = "u1";
pub const TEST_SECOND_USER_ID: &str = "u2";
