//! Password Hashing, Verification and Policy
//!
//! NIST SP 800-63B oriented password handling with:
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of sensitive data
//! - Constant-time comparison
//! - A pluggable policy made of enumerated rules
//! - Optional HIBP (Have I Been Pwned) breach checking
//!
//! ## Security Features
//! - Memory-hard hashing prevents GPU/ASIC attacks
//! - Zeroization prevents memory inspection attacks
//! - Pepper support for additional security layer
//! - k-Anonymity model for breach checking (only SHA-1 prefix sent)

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use sha1::{Digest, Sha1};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants (NIST SP 800-63B compliant)
// ============================================================================

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Character classes required by the default policy
pub const DEFAULT_MIN_CHARACTER_CLASSES: usize = 2;

/// Shortest user attribute fragment considered by the similarity rule
const SIMILARITY_MIN_FRAGMENT: usize = 4;

/// HIBP API endpoint (k-Anonymity model)
const HIBP_API_URL: &str = "https://api.pwnedpasswords.com/range/";

/// Upper bound for one breach range request
const HIBP_TIMEOUT: Duration = Duration::from_secs(3);

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violations
///
/// The `Display` text is user-facing and is returned verbatim in field errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("This password cannot be empty or contain only whitespace.")]
    EmptyOrWhitespace,

    #[error("This password is too short. It must contain at least {min} characters.")]
    TooShort { min: usize, actual: usize },

    #[error("This password is too long. It must contain at most {max} characters.")]
    TooLong { max: usize, actual: usize },

    #[error("This password contains invalid control characters.")]
    InvalidCharacter,

    #[error(
        "This password must mix at least {required} of: lowercase letters, uppercase letters, digits, symbols."
    )]
    TooSimple { required: usize, actual: usize },

    #[error("This password is entirely numeric.")]
    EntirelyNumeric,

    #[error("This password is too common.")]
    CommonPattern,

    #[error("The password is too similar to the {attribute}.")]
    TooSimilar { attribute: String },

    #[error("This password has appeared in a data breach.")]
    Compromised,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// HIBP API check failed (non-fatal, logged)
    #[error("Breach check failed: {0}")]
    BreachCheckFailed(String),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Input is NFKC-normalized on construction so that the policy and the hash
/// see the same code points. Construction never fails; policy checks are a
/// separate step ([`PasswordPolicy::validate`]) so that login does not reject
/// passwords created under an older policy.
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize (NFKC) and wrap a raw password
    pub fn new(raw: String) -> Self {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    /// Whether the password is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Constant-time comparison with another clear text password
    pub fn matches(&self, other: &ClearTextPassword) -> bool {
        crate::crypto::constant_time_eq(self.as_bytes(), other.as_bytes())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash the password using Argon2id
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret for additional security
    ///
    /// ## Returns
    /// PHC-formatted hash string wrapped in `HashedPassword`
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let mut password_bytes = self.peppered(pepper);

        // Generate random salt (128 bits = 16 bytes)
        let salt = SaltString::generate(OsRng);

        // OWASP recommended Argon2id parameters:
        // m=19456 (19 MiB), t=2, p=1
        let result = Argon2::default()
            .hash_password(&password_bytes, &salt)
            .map(|hash| hash.to_string());
        password_bytes.zeroize();

        let hash = result.map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword { hash })
    }

    /// Check if password has been compromised using HIBP API
    ///
    /// Uses k-Anonymity model:
    /// 1. Hash password with SHA-1
    /// 2. Send only first 5 characters of hash
    /// 3. Check if full hash appears in response
    ///
    /// ## Returns
    /// - `Ok(true)` if password is compromised
    /// - `Ok(false)` if password is not found in breaches
    /// - `Err(_)` if API check failed (should be treated as non-blocking)
    pub async fn check_breach(&self) -> Result<bool, PasswordHashError> {
        self.check_breach_at(HIBP_API_URL, HIBP_TIMEOUT).await
    }

    /// Breach check against a range endpoint with a request timeout
    async fn check_breach_at(
        &self,
        range_url: &str,
        timeout: Duration,
    ) -> Result<bool, PasswordHashError> {
        let mut hasher = Sha1::new();
        hasher.update(self.as_bytes());
        let hash_hex = hex::encode_upper(hasher.finalize());

        // k-Anonymity: send only first 5 chars
        let (prefix, suffix) = hash_hex.split_at(5);

        tracing::debug!(prefix, "Querying breach range API");

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PasswordHashError::BreachCheckFailed(e.to_string()))?;

        let url = format!("{}{}", range_url, prefix);
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| PasswordHashError::BreachCheckFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PasswordHashError::BreachCheckFailed(format!(
                "API returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PasswordHashError::BreachCheckFailed(e.to_string()))?;

        Ok(range_contains_suffix(&body, suffix))
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Password Policy
// ============================================================================

/// A single password rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordRule {
    /// At least `n` characters
    MinLength(usize),
    /// At most `n` characters
    MaxLength(usize),
    /// No control characters other than space, tab and newline
    NoControlCharacters,
    /// At least `min_classes` of: lowercase, uppercase, digit, other
    Complexity { min_classes: usize },
    /// Not made of digits only
    NotNumeric,
    /// Not a well-known password, keyboard run, digit sequence or repeated character
    NotCommon,
    /// Does not contain a fragment of a user attribute (email, username)
    NotSimilarToAttributes,
}

impl PasswordRule {
    /// Check the rule against a normalized password
    ///
    /// `attributes` are `(name, value)` pairs describing the account.
    pub fn check(&self, password: &str, attributes: &[(&str, &str)]) -> Result<(), PasswordPolicyError> {
        match self {
            PasswordRule::MinLength(min) => {
                let actual = password.chars().count();
                if actual < *min {
                    return Err(PasswordPolicyError::TooShort { min: *min, actual });
                }
            }
            PasswordRule::MaxLength(max) => {
                let actual = password.chars().count();
                if actual > *max {
                    return Err(PasswordPolicyError::TooLong { max: *max, actual });
                }
            }
            PasswordRule::NoControlCharacters => {
                if password
                    .chars()
                    .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
                {
                    return Err(PasswordPolicyError::InvalidCharacter);
                }
            }
            PasswordRule::Complexity { min_classes } => {
                let actual = character_classes(password);
                if actual < *min_classes {
                    return Err(PasswordPolicyError::TooSimple {
                        required: *min_classes,
                        actual,
                    });
                }
            }
            PasswordRule::NotNumeric => {
                if password.chars().all(|c| c.is_numeric()) {
                    return Err(PasswordPolicyError::EntirelyNumeric);
                }
            }
            PasswordRule::NotCommon => {
                if is_common_pattern(password) {
                    return Err(PasswordPolicyError::CommonPattern);
                }
            }
            PasswordRule::NotSimilarToAttributes => {
                if let Some(attribute) = similar_attribute(password, attributes) {
                    return Err(PasswordPolicyError::TooSimilar {
                        attribute: attribute.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Password policy: an ordered list of rules plus the optional breach check
///
/// ## Examples
/// ```rust
/// use platform::password::{ClearTextPassword, PasswordPolicy, PasswordRule};
///
/// let policy = PasswordPolicy::default();
/// let password = ClearTextPassword::new("Str0ng!Pass".to_string());
/// assert!(policy.validate(&password, &[("email", "a@x.com")]).is_ok());
///
/// let lenient = PasswordPolicy::new(vec![PasswordRule::MinLength(4)]);
/// assert!(lenient.validate(&ClearTextPassword::new("abcd".to_string()), &[]).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    rules: Vec<PasswordRule>,
    breach_check: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(vec![
            PasswordRule::MinLength(MIN_PASSWORD_LENGTH),
            PasswordRule::MaxLength(MAX_PASSWORD_LENGTH),
            PasswordRule::NoControlCharacters,
            PasswordRule::Complexity {
                min_classes: DEFAULT_MIN_CHARACTER_CLASSES,
            },
            PasswordRule::NotNumeric,
            PasswordRule::NotCommon,
            PasswordRule::NotSimilarToAttributes,
        ])
    }
}

impl PasswordPolicy {
    pub fn new(rules: Vec<PasswordRule>) -> Self {
        Self {
            rules,
            breach_check: false,
        }
    }

    /// Replace any rule of the same kind, or append it
    pub fn with_rule(mut self, rule: PasswordRule) -> Self {
        let kind = std::mem::discriminant(&rule);
        match self
            .rules
            .iter_mut()
            .find(|r| std::mem::discriminant(*r) == kind)
        {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    /// Enable the HIBP breach check
    pub fn with_breach_check(mut self, enabled: bool) -> Self {
        self.breach_check = enabled;
        self
    }

    pub fn rules(&self) -> &[PasswordRule] {
        &self.rules
    }

    pub fn breach_check_enabled(&self) -> bool {
        self.breach_check
    }

    /// Run every rule, collecting all violations
    ///
    /// A blank password yields only [`PasswordPolicyError::EmptyOrWhitespace`].
    pub fn validate(
        &self,
        password: &ClearTextPassword,
        attributes: &[(&str, &str)],
    ) -> Result<(), Vec<PasswordPolicyError>> {
        if password.is_blank() {
            return Err(vec![PasswordPolicyError::EmptyOrWhitespace]);
        }

        let violations: Vec<PasswordPolicyError> = self
            .rules
            .iter()
            .filter_map(|rule| rule.check(password.as_str(), attributes).err())
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// This type stores the Argon2id hash in PHC format, which includes:
/// - Algorithm identifier
/// - Version
/// - Parameters (memory, iterations, parallelism)
/// - Salt
/// - Hash
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// Uses constant-time comparison to prevent timing attacks.
    ///
    /// ## Arguments
    /// * `password` - The clear text password to verify
    /// * `pepper` - Optional pepper (must match the one used during hashing)
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        let mut password_bytes = password.peppered(pepper);

        // Argon2 uses constant-time comparison internally
        let valid = Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok();
        password_bytes.zeroize();
        valid
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

static DUMMY_HASH: LazyLock<Option<HashedPassword>> = LazyLock::new(|| {
    ClearTextPassword::new("timing-equalizer-not-a-real-password".to_string())
        .hash(None)
        .ok()
});

/// Spend one verification on a fixed hash
///
/// Called when no account matched, so that "unknown user" costs the same
/// time as "wrong password". Always returns `false`.
pub fn verify_against_dummy(password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
    if let Some(hash) = DUMMY_HASH.as_ref() {
        let _ = hash.verify(password, pepper);
    }
    false
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Count character classes present: lowercase, uppercase, digit, other
fn character_classes(password: &str) -> usize {
    let (mut lower, mut upper, mut digit, mut other) = (false, false, false, false);
    for c in password.chars() {
        if c.is_lowercase() {
            lower = true;
        } else if c.is_uppercase() {
            upper = true;
        } else if c.is_numeric() {
            digit = true;
        } else {
            other = true;
        }
    }
    [lower, upper, digit, other].into_iter().filter(|&b| b).count()
}

/// Name of the first attribute that has a fragment inside the password
fn similar_attribute<'a>(password: &str, attributes: &[(&'a str, &str)]) -> Option<&'a str> {
    let password = password.to_lowercase();

    attributes.iter().find_map(|(name, value)| {
        let value = value.to_lowercase();
        let hit = std::iter::once(value.as_str())
            .chain(value.split(|c: char| !c.is_alphanumeric()))
            .filter(|fragment| fragment.chars().count() >= SIMILARITY_MIN_FRAGMENT)
            .any(|fragment| password.contains(fragment));
        hit.then_some(*name)
    })
}

/// Check for common weak patterns
fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    // All same character (e.g., "aaaaaaaa")
    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if lower.chars().count() >= 3 && chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    const KEYBOARD_PATTERNS: &[&str] = &[
        "qwerty",
        "qwertyuiop",
        "asdfgh",
        "asdfghjkl",
        "zxcvbn",
        "qazwsx",
        "1qaz2wsx",
    ];

    if KEYBOARD_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "passw0rd",
        "12345678",
        "123456789",
        "1234567890",
        "abcdefgh",
        "abc12345",
        "letmein",
        "letmein1",
        "welcome",
        "welcome1",
        "admin123",
        "iloveyou",
        "sunshine",
        "princess",
        "football",
        "monkey",
        "shadow",
        "master",
        "dragon",
        "baseball",
        "michael",
        "trustno1",
    ];

    COMMON_PASSWORDS.contains(&lower.as_str())
}

/// Check if the digits of a string form a run (e.g., "12345678", "9876")
fn is_sequential_numbers(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    // Only when the string is digits only
    if digits.len() < 4 || digits.len() != s.chars().count() {
        return false;
    }

    let is_ascending = digits
        .windows(2)
        .all(|w| w[1] == w[0] + 1 || (w[0] == 9 && w[1] == 0));

    let is_descending = digits
        .windows(2)
        .all(|w| w[0] == w[1] + 1 || (w[0] == 0 && w[1] == 9));

    is_ascending || is_descending
}

/// Whether a HIBP range response (`SUFFIX:COUNT` lines) lists `suffix`
fn range_contains_suffix(body: &str, suffix: &str) -> bool {
    body.lines()
        .filter_map(|line| line.split_once(':'))
        .any(|(hash_suffix, _count)| hash_suffix.trim().eq_ignore_ascii_case(suffix))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn violations(raw: &str, attributes: &[(&str, &str)]) -> Vec<PasswordPolicyError> {
        PasswordPolicy::default()
            .validate(&ClearTextPassword::new(raw.to_string()), attributes)
            .err()
            .unwrap_or_default()
    }

    #[test]
    fn test_password_too_short() {
        let errors = violations("Ab1!", &[]);
        assert!(errors.contains(&PasswordPolicyError::TooShort { min: 8, actual: 4 }));
    }

    #[test]
    fn test_password_too_long() {
        let long_password = format!("Ab1!{}", "xy".repeat(MAX_PASSWORD_LENGTH));
        let errors = violations(&long_password, &[]);
        assert!(matches!(errors[..], [PasswordPolicyError::TooLong { .. }]));
    }

    #[test]
    fn test_password_blank_reports_single_error() {
        assert_eq!(violations("", &[]), vec![PasswordPolicyError::EmptyOrWhitespace]);
        assert_eq!(
            violations("        ", &[]),
            vec![PasswordPolicyError::EmptyOrWhitespace]
        );
    }

    #[test]
    fn test_password_control_character() {
        let errors = violations("Secure\u{7}Pass9", &[]);
        assert!(errors.contains(&PasswordPolicyError::InvalidCharacter));
    }

    #[test]
    fn test_password_common_pattern() {
        assert!(violations("password123", &[]).contains(&PasswordPolicyError::CommonPattern));
        assert!(violations("qwertyuiop", &[]).contains(&PasswordPolicyError::CommonPattern));
        assert!(violations("zzzzzzzzzz", &[]).contains(&PasswordPolicyError::CommonPattern));
    }

    #[test]
    fn test_password_numeric_collects_every_violation() {
        let errors = violations("12345678", &[]);
        assert!(errors.contains(&PasswordPolicyError::EntirelyNumeric));
        assert!(errors.contains(&PasswordPolicyError::CommonPattern));
        assert!(errors.contains(&PasswordPolicyError::TooSimple {
            required: 2,
            actual: 1
        }));
    }

    #[test]
    fn test_password_similar_to_attribute() {
        let errors = violations("alice-Secret9", &[("email", "alice@example.org")]);
        assert_eq!(
            errors,
            vec![PasswordPolicyError::TooSimilar {
                attribute: "email".to_string()
            }]
        );

        // Short fragments are ignored
        assert!(violations("Str0ng!Pass", &[("email", "a@x.com")]).is_empty());
    }

    #[test]
    fn test_valid_password() {
        assert!(violations("MySecure#Pass2024!", &[]).is_empty());
        assert!(violations("Str0ng!Pass", &[("username", "bob")]).is_empty());
    }

    #[test]
    fn test_unicode_password() {
        // Letters without case count as "other"
        assert!(violations("パスワード安全です1", &[]).is_empty());
    }

    #[test]
    fn test_policy_error_messages() {
        assert_eq!(
            PasswordPolicyError::TooShort { min: 8, actual: 3 }.to_string(),
            "This password is too short. It must contain at least 8 characters."
        );
        assert_eq!(
            PasswordPolicyError::CommonPattern.to_string(),
            "This password is too common."
        );
    }

    #[test]
    fn test_custom_policy() {
        let policy = PasswordPolicy::default()
            .with_rule(PasswordRule::MinLength(12))
            .with_rule(PasswordRule::Complexity { min_classes: 3 });
        assert_eq!(policy.rules().len(), PasswordPolicy::default().rules().len());

        let password = ClearTextPassword::new("Str0ng!Pass".to_string());
        let errors = policy.validate(&password, &[]).unwrap_err();
        assert_eq!(errors, vec![PasswordPolicyError::TooShort { min: 12, actual: 11 }]);

        let minimal = PasswordPolicy::new(vec![PasswordRule::MinLength(4)]);
        assert!(!minimal.breach_check_enabled());
        assert!(minimal.with_breach_check(true).breach_check_enabled());
    }

    #[test]
    fn test_matches() {
        let a = ClearTextPassword::new("Str0ng!Pass".to_string());
        assert!(a.matches(&ClearTextPassword::new("Str0ng!Pass".to_string())));
        assert!(!a.matches(&ClearTextPassword::new("Str0ng!Pas".to_string())));
        // Compared after normalization
        assert!(
            ClearTextPassword::new("ｐａｓｓ".to_string())
                .matches(&ClearTextPassword::new("pass".to_string()))
        );
    }

    #[test]
    fn test_nfkc_normalization() {
        let password = ClearTextPassword::new("Ｐａｓｓ１".to_string());
        assert_eq!(password.as_str(), "Pass1");
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::new("TestPassword123!".to_string());
        let hashed = password.hash(None).unwrap();

        assert!(hashed.verify(&password, None));

        let wrong_password = ClearTextPassword::new("WrongPassword123!".to_string());
        assert!(!hashed.verify(&wrong_password, None));
    }

    #[test]
    fn test_hash_with_pepper() {
        let password = ClearTextPassword::new("TestPassword123!".to_string());
        let pepper = b"my_secret_pepper";
        let hashed = password.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"wrong_pepper")));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = ClearTextPassword::new("TestPassword123!".to_string());
        let hashed = password.hash(None).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();

        assert!(restored.verify(&password, None));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_verify_against_dummy_is_false() {
        let password = ClearTextPassword::new("timing-equalizer-not-a-real-password".to_string());
        assert!(!verify_against_dummy(&password, None));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let hashed = password.hash(None).unwrap();
        assert!(format!("{:?}", hashed).contains("[HASH]"));
    }

    #[test]
    fn test_range_contains_suffix() {
        let body = "0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n1E4C9B93F3F0682250B6CF8331B7EE68FD8:3861493\r\n";
        assert!(range_contains_suffix(body, "1e4c9b93f3f0682250b6cf8331b7ee68fd8"));
        assert!(!range_contains_suffix(body, "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF"));
    }

    mod breach_range {
        use super::*;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::{TcpListener, TcpStream};

        /// SHA-1 of "password" is 5BAA6 + this suffix
        const PASSWORD_SUFFIX: &str = "1E4C9B93F3F0682250B6CF8331B7EE68FD8";

        async fn read_request(stream: &mut TcpStream) -> String {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            String::from_utf8_lossy(&buf).into_owned()
        }

        #[tokio::test]
        async fn test_stalled_range_api_times_out() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                let (mut stream, _) = listener.accept().await.unwrap();
                read_request(&mut stream).await;
                // Hold the connection open without answering
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(stream);
            });

            let password = ClearTextPassword::new("password".to_string());
            let started = std::time::Instant::now();
            let result = password
                .check_breach_at(&format!("http://{addr}/range/"), Duration::from_millis(200))
                .await;

            assert!(matches!(result, Err(PasswordHashError::BreachCheckFailed(_))));
            assert!(started.elapsed() < Duration::from_secs(10));
        }

        #[tokio::test]
        async fn test_range_api_sends_prefix_only() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let server = tokio::spawn(async move {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request = read_request(&mut stream).await;
                let body = format!("{PASSWORD_SUFFIX}:3\r\n");
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                request
            });

            let password = ClearTextPassword::new("password".to_string());
            let breached = password
                .check_breach_at(&format!("http://{addr}/range/"), Duration::from_secs(5))
                .await
                .unwrap();
            assert!(breached);

            let request = server.await.unwrap();
            assert!(request.starts_with("GET /range/5BAA6 "));
            assert!(!request.contains(PASSWORD_SUFFIX));
        }
    }
}
