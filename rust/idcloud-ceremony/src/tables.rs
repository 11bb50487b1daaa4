//! Transcoding policies for each ceremony, request and response.

use idcloud_transcode::PathPolicy;

use crate::{
    CHALLENGE_TOKEN_EXTENSION, CLIENT_TYPE_EXTENSION, Config, FRIENDLY_NAME_EXTENSION,
    ProtocolVersion, UserIdEncoding,
};

/// Request fields the platform must never see: server status echoes, the
/// payment block (handled by the payment fallback) and inbound echoes of our
/// own vendor extensions.
fn request_skips() -> [String; 6] {
    [
        "status".to_owned(),
        "errorMessage".to_owned(),
        "extensions.payment".to_owned(),
        format!("extensions.{FRIENDLY_NAME_EXTENSION}"),
        format!("extensions.{CLIENT_TYPE_EXTENSION}"),
        format!("extensions.{CHALLENGE_TOKEN_EXTENSION}"),
    ]
}

const PRF_INPUTS: [&str; 2] = ["extensions.prf.eval.first", "extensions.prf.eval.second"];

const PRF_OUTPUTS: [&str; 2] = [
    "clientExtensionResults.prf.results.first",
    "clientExtensionResults.prf.results.second",
];

/// Policy for `PublicKeyCredentialCreationOptions`.
pub fn enrollment_request(config: &Config) -> PathPolicy {
    let policy = PathPolicy::new()
        .skip(request_skips().iter().map(String::as_str))
        .binary(["challenge", "excludeCredentials.[].id"])
        .binary(PRF_INPUTS);

    match config.user_id {
        UserIdEncoding::Binary => policy.binary(["user.id"]),
        UserIdEncoding::Text => policy.text(["user.id"]),
    }
}

/// Policy for `PublicKeyCredentialRequestOptions`.
pub fn authentication_request(_config: &Config) -> PathPolicy {
    PathPolicy::new()
        .skip(request_skips().iter().map(String::as_str))
        .binary(["challenge", "allowCredentials.[].id"])
        .binary(PRF_INPUTS)
        .binary([
            "extensions.prf.evalByCredential.*.first",
            "extensions.prf.evalByCredential.*.second",
        ])
        .wildcard(["extensions.prf.evalByCredential"])
}

/// Policy for the credential returned by an enrollment.
pub fn enrollment_response(config: &Config) -> PathPolicy {
    versioned(PathPolicy::new().binary(PRF_OUTPUTS), config)
}

/// Policy for the assertion returned by an authentication.
pub fn authentication_response(config: &Config) -> PathPolicy {
    let policy = PathPolicy::new().binary(PRF_OUTPUTS);
    let policy = match config.user_id {
        UserIdEncoding::Binary => policy.binary(["response.userHandle"]),
        UserIdEncoding::Text => policy.text(["response.userHandle"]),
    };
    versioned(policy, config)
}

fn versioned(policy: PathPolicy, config: &Config) -> PathPolicy {
    match config.protocol {
        ProtocolVersion::V1 => policy.skip(["authenticatorAttachment"]),
        ProtocolVersion::V2 => policy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idcloud_transcode::{FieldPath, ScopedPath, Treatment};

    fn at(pattern: &str) -> ScopedPath {
        ScopedPath::from(FieldPath::parse(pattern))
    }

    #[idcloud_macros::test]
    fn it_follows_the_user_id_encoding() {
        let binary = enrollment_request(&Config::default());
        let text = enrollment_request(&Config::default().with_user_id(UserIdEncoding::Text));

        assert_eq!(binary.treatment(&at("user.id")), Treatment::Binary);
        assert_eq!(text.treatment(&at("user.id")), Treatment::Text);
    }

    #[idcloud_macros::test]
    fn it_strips_vendor_echoes_from_requests() {
        let policy = authentication_request(&Config::default());

        for path in [
            "status",
            "extensions.payment",
            "extensions.thalesgroup_chl_tkn_ext_v1",
        ] {
            assert_eq!(policy.treatment(&at(path)), Treatment::Skip, "{path}");
        }
    }

    #[idcloud_macros::test]
    fn it_hides_the_attachment_from_v1_responses() {
        let v1 = enrollment_response(&Config::default().with_protocol(ProtocolVersion::V1));
        let v2 = enrollment_response(&Config::default());

        assert_eq!(v1.treatment(&at("authenticatorAttachment")), Treatment::Skip);
        assert_eq!(
            v2.treatment(&at("authenticatorAttachment")),
            Treatment::Descend
        );
    }
}
