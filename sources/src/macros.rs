//! Define our own macro to simplify the code
//!

/// Call the HTTP client with the proper arguments
///
/// - unauth GET with query parameters (geocoders)
///
#[macro_export]
macro_rules! http_get {
    ($self:ident, $url:ident, $query:expr) => {
        $self
            .client
            .get(&$url)
            .header(
                "user-agent",
                format!("{}/{}", clap::crate_name!(), clap::crate_version!()),
            )
            .header("accept", "application/json")
            .query($query)
            .send()
    };
}

/// Call the HTTP client with the proper arguments
///
/// - auth GET to fetch data, token is optional
///
#[macro_export]
macro_rules! http_get_auth {
    ($self:ident, $url:ident, $token:ident) => {{
        let req = $self
            .client
            .get(&$url)
            .header(
                "user-agent",
                format!("{}/{}", clap::crate_name!(), clap::crate_version!()),
            )
            .header("accept", "application/json");
        let req = match $token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        req.send()
    }};
}

/// Call the HTTP client with the proper arguments
///
/// - unauth call to fetch token by submitting credentials
///
#[macro_export]
macro_rules! http_post {
    ($self:ident, $url:ident, $cred:expr) => {
        $self
            .client
            .post(&$url)
            .header(
                "user-agent",
                format!("{}/{}", clap::crate_name!(), clap::crate_version!()),
            )
            .header("content-type", "application/json")
            .json($cred)
            .send()
    };
}
