/// JWT validation for engagement-service
///
/// Tokens are issued by the identity provider; this service only validates
/// them. RS256 only — no symmetric algorithms, so a leaked validation key
/// cannot mint tokens.
///
/// The validation key is loaded once at startup and immutable thereafter:
///
/// ```ignore
/// let public_key = auth::load_validation_key()?;
/// auth::initialize_validation_key(&public_key)?;
/// ```
use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT algorithm - MUST be RS256
const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

/// JWT claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
    /// Email address
    pub email: String,
    /// Username
    pub username: String,
}

static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Read the PEM-formatted validation key from `JWT_PUBLIC_KEY_PEM`.
pub fn load_validation_key() -> Result<String> {
    std::env::var("JWT_PUBLIC_KEY_PEM")
        .map_err(|_| anyhow!("JWT_PUBLIC_KEY_PEM environment variable not set"))
}

/// Initialize the validation key from a PEM-formatted string.
///
/// Must be called during startup before any token validation. Can only be
/// called once.
pub fn initialize_validation_key(public_key_pem: &str) -> Result<()> {
    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

fn get_decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_validation_key() during startup.")
    })
}

/// Validate a token and return its decoded claims.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, decoding_key, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Extract the user ID from a validated token.
pub fn get_user_id_from_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;
    Uuid::parse_str(&token_data.claims.sub).map_err(|e| anyhow!("Invalid user ID in token: {e}"))
}
