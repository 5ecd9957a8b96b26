//! Everything related to authentication.
//!

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Describe the possible ways to authenticate oneself
///
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Auth {
    /// Nothing special, no auth
    #[default]
    Anon,
    /// Using an API key supplied as a bearer token
    Key { api_key: String },
    /// Using a login/passwd to get a token, `token` being the route to ask
    Token {
        login: String,
        password: String,
        token: String,
    },
}

impl Display for Auth {
    /// Obfuscate the passwords & keys
    ///
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Hide passwords & API keys
        //
        let auth = match self.clone() {
            Auth::Key { .. } => Auth::Key {
                api_key: "HIDDEN".to_string(),
            },
            Auth::Token { login, token, .. } => Auth::Token {
                login,
                token,
                password: "HIDDEN".to_string(),
            },
            Auth::Anon => Auth::Anon,
        };
        write!(f, "{:?}", auth)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Auth::Key { api_key: "s3cr3t".into() })]
    #[case(Auth::Token { login: "u".into(), password: "s3cr3t".into(), token: "/login".into() })]
    fn test_auth_display_hides_secrets(#[case] auth: Auth) {
        let s = auth.to_string();
        assert!(!s.contains("s3cr3t"));
        assert!(s.contains("HIDDEN"));
    }

    #[test]
    fn test_auth_untagged_token() {
        let a: Auth = serde_json::from_str(
            r#"{"login": "officer@example.org", "password": "x", "token": "/login/"}"#,
        )
        .unwrap();
        assert!(matches!(a, Auth::Token { .. }));
    }
}
