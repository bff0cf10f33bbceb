//! 密码哈希

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use atrium_errors::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// 与 `Argon2::default()` 参数一致的固定哈希，不对应任何密码
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// 哈希后的密码（PHC 字符串）
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// 从明文密码创建哈希密码
    pub fn from_plain(password: &str) -> AppResult<Self> {
        validate_password(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

        Ok(Self(hash.to_string()))
    }

    /// 从已有的哈希值创建
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// 账号不存在时代替真实哈希参与校验，校验结果恒为 false
    pub fn dummy() -> Self {
        Self(DUMMY_HASH.to_string())
    }

    /// 验证密码
    pub fn verify(&self, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&self.0)
            .map_err(|e| AppError::internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if password.chars().count() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_LEN
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = HashedPassword::from_plain("correct horse").unwrap();
        assert!(hashed.as_str().starts_with("$argon2"));
        assert!(hashed.verify("correct horse").unwrap());
        assert!(!hashed.verify("wrong horse").unwrap());
    }

    #[test]
    fn test_dummy_hash_runs_full_verification() {
        let dummy = HashedPassword::dummy();
        assert!(!dummy.verify("correct horse").unwrap());
        assert!(!dummy.verify("").unwrap());
    }

    #[test]
    fn test_short_password_rejected() {
        let err = HashedPassword::from_plain("short").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let hashed = HashedPassword::from_plain("correct horse").unwrap();
        assert_eq!(format!("{:?}", hashed), "HashedPassword([REDACTED])");
    }
}
