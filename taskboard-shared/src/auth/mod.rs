/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer token issuing and verification
/// - [`middleware`]: Resolving a request's bearer token to a user
/// - [`authorization`]: The role policy every handler consults
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::TokenService;
/// use taskboard_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let tokens = TokenService::new("secret-key-that-is-at-least-32-bytes");
/// let token = tokens.issue(Uuid::new_v4())?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
