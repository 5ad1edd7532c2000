//! Convenience accessors over `serde_json::Value`.

use serde_json::Value;

pub trait ValueExt {
    /// String field with a fallback.
    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str;

    /// Boolean field with a fallback.
    fn bool_or(&self, key: &str, default: bool) -> bool;

    /// Optional string field.
    fn str_opt(&self, key: &str) -> Option<&str>;

    /// Optional float field (accepts integers too).
    fn f64_opt(&self, key: &str) -> Option<f64>;
}

impl ValueExt for Value {
    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn str_opt(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn f64_opt(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_str_or() {
        let v = json!({"name": "Login page", "empty": null});
        assert_eq!(v.str_or("name", "-"), "Login page");
        assert_eq!(v.str_or("empty", "-"), "-");
        assert_eq!(v.str_or("missing", "-"), "-");
    }

    #[test]
    fn test_f64_opt_accepts_int() {
        let v = json!({"estimate": 3});
        assert_eq!(v.f64_opt("estimate"), Some(3.0));
    }
}
