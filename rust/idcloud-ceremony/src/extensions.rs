//! Vendor extensions added to ceremony results for the server.
//!
//! Enrollment results always carry two of them:
//!
//! ```json
//! "clientExtensionResults": {
//!   "thalesgroup_ext_v1": { "authenticatorDescription": { "friendlyName": "Windows NT Gecko" } },
//!   "thalesgroup_client_ext_v1": { "clientType": "web" }
//! }
//! ```
//!
//! Both ceremonies also echo the server's challenge token, when the request
//! carried one, verbatim under [`CHALLENGE_TOKEN_EXTENSION`].

use serde_json::{Map, Value, json};

/// Extension carrying the authenticator's human-readable name.
pub const FRIENDLY_NAME_EXTENSION: &str = "thalesgroup_ext_v1";

/// Extension identifying the kind of client that ran the ceremony.
pub const CLIENT_TYPE_EXTENSION: &str = "thalesgroup_client_ext_v1";

/// Transport-bound challenge token, passed through from request to result.
pub const CHALLENGE_TOKEN_EXTENSION: &str = "thalesgroup_chl_tkn_ext_v1";

/// Client type reported under [`CLIENT_TYPE_EXTENSION`].
pub const CLIENT_TYPE: &str = "web";

/// Characters dropped from the user agent before it is tokenized.
fn is_noise(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ';' | ':' | '.' | '/' | '(' | ')')
}

/// Derive an authenticator name from a user-agent string: drop digits and
/// `;:./()`, then keep the 2nd to 4th whitespace-delimited tokens.
///
/// Runs of whitespace count as one separator, so tokens emptied by the
/// filter never show up as blanks in the name.
///
/// ```
/// use idcloud_ceremony::default_name;
///
/// let ua = "Mozilla/5.0 (Windows NT 10.0) Gecko/20100101 Firefox/110.0";
/// assert_eq!(default_name(ua), "Windows NT Gecko");
/// ```
pub fn default_name(user_agent: &str) -> String {
    let cleaned: String = user_agent.chars().filter(|c| !is_noise(*c)).collect();
    cleaned
        .split_whitespace()
        .skip(1)
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Choose the friendly name of a new credential.
///
/// The default is the name the platform reported, or one derived from the
/// user agent. A `name_with` callback sees that default and may replace it;
/// a blank answer keeps the default.
pub fn friendly_name(
    reported: Option<&str>,
    user_agent: &str,
    name_with: Option<&dyn Fn(&str) -> Option<String>>,
) -> String {
    let default = reported
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| default_name(user_agent));

    name_with
        .and_then(|name_with| name_with(&default))
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or(default)
}

/// Add the enrollment-only vendor extensions to `results`.
pub(crate) fn describe_authenticator(results: &mut Map<String, Value>, friendly_name: &str) {
    results.insert(
        FRIENDLY_NAME_EXTENSION.to_owned(),
        json!({ "authenticatorDescription": { "friendlyName": friendly_name } }),
    );
    results.insert(
        CLIENT_TYPE_EXTENSION.to_owned(),
        json!({ "clientType": CLIENT_TYPE }),
    );
}

/// Copy the challenge token of `request`, if any, into `results`.
pub(crate) fn pass_challenge_token(request: &Value, results: &mut Map<String, Value>) {
    if let Some(token) = request
        .get("extensions")
        .and_then(|extensions| extensions.get(CHALLENGE_TOKEN_EXTENSION))
    {
        results.insert(CHALLENGE_TOKEN_EXTENSION.to_owned(), token.clone());
    }
}
