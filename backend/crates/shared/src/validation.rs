//! Field Errors - Structured validation failures
//!
//! [`FieldErrors`] は入力検証の結果を「フィールド名 → メッセージ一覧」の形で保持します。
//! フィールドに紐付かないエラーは [`NON_FIELD_ERRORS`] キーに格納します。

use std::collections::BTreeMap;

use serde::Serialize;

/// フィールドに紐付かないエラーのキー
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// 必須フィールドが存在しない場合のメッセージ
pub const MSG_REQUIRED: &str = "This field is required.";

/// 空文字列が許可されないフィールドのメッセージ
pub const MSG_BLANK: &str = "This field may not be blank.";

/// フィールド単位の検証エラー
///
/// キーはアルファベット順に並ぶため、レスポンスは常に同じ形になります。
///
/// ## Examples
/// ```rust
/// use kernel::validation::FieldErrors;
///
/// let mut errors = FieldErrors::new();
/// errors.add("password", "Password fields didn't match.");
/// assert!(errors.contains("password"));
/// assert!(!errors.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 単一メッセージのエラーを作成
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// フィールドにメッセージを追加
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// フィールドのメッセージ一覧を取得
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 最初のメッセージ（`detail` 用の要約）
    pub fn first_message(&self) -> Option<&str> {
        self.0
            .values()
            .flat_map(|messages| messages.iter())
            .next()
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates_messages() {
        let mut errors = FieldErrors::new();
        errors.add("password", "too short");
        errors.add("password", "too common");
        assert_eq!(errors.get("password"), ["too short", "too common"]);
        assert!(errors.get("email").is_empty());
    }

    #[test]
    fn test_serializes_as_map() {
        let mut errors = FieldErrors::single("username", MSG_BLANK);
        errors.add("email", MSG_REQUIRED);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "email": [MSG_REQUIRED],
                "username": [MSG_BLANK],
            })
        );
        assert_eq!(errors.first_message(), Some(MSG_REQUIRED));
    }
}
