use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::{distributions::Alphanumeric, Rng};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

// 260000 comme Werkzeug; réduit en test pour garder des tests rapides
const ITERATIONS: u32 = if cfg!(test) { 1_000 } else { 260_000 };
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

/// Hash un mot de passe au format Werkzeug (compatible avec finance.db)
/// Format: pbkdf2:sha256:iterations$salt$hash_hex
/// Le salt est une chaîne alphanumérique utilisée telle quelle (pas décodée)
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect();

    let key = derive(password, salt.as_bytes(), ITERATIONS, KEY_LENGTH)?;

    Ok(format!("pbkdf2:sha256:{}${}${}", ITERATIONS, salt, hex::encode(key)))
}

/// Vérifie un mot de passe contre un hash Werkzeug
/// Accepte aussi l'ancien en-tête sans itérations ("pbkdf2:sha256$...")
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let mut parts = stored_hash.splitn(3, '$');
    let (Some(header), Some(salt), Some(hash_hex)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AppError::PasswordHash("invalid hash format".to_string()));
    };

    let header_parts: Vec<&str> = header.split(':').collect();
    let iterations = match header_parts.as_slice() {
        ["pbkdf2", "sha256"] => 150_000,
        ["pbkdf2", "sha256", iterations] => iterations
            .parse::<u32>()
            .map_err(|_| AppError::PasswordHash("invalid iterations".to_string()))?,
        _ => return Err(AppError::PasswordHash(format!("unsupported method: {}", header))),
    };

    if iterations == 0 {
        return Err(AppError::PasswordHash("zero iterations".to_string()));
    }

    let expected = hex::decode(hash_hex)
        .map_err(|e| AppError::PasswordHash(format!("hex decode failed: {}", e)))?;

    // Digest vide: deux tranches vides seraient "égales" pour n'importe quel mot de passe
    if expected.is_empty() {
        return Err(AppError::PasswordHash("empty digest".to_string()));
    }

    let computed = derive(password, salt.as_bytes(), iterations, expected.len())?;

    Ok(computed.ct_eq(&expected).into())
}

fn derive(password: &str, salt: &[u8], iterations: u32, len: usize) -> Result<Vec<u8>, AppError> {
    let mut key = vec![0u8; len];
    pbkdf2::<HmacSha256>(password.as_bytes(), salt, iterations, &mut key)
        .map_err(|e| AppError::PasswordHash(format!("PBKDF2 failed: {}", e)))?;
    Ok(key)
}
