//! Behaviour of the transcoder across both directions, using the shapes that
//! WebAuthn ceremonies actually carry.

use idcloud_transcode::{Native, PathPolicy, base64url, decode, encode};
use pretty_assertions::assert_eq;
use serde_json::json;
use testresult::TestResult;

fn prf_policy() -> PathPolicy {
    PathPolicy::new()
        .skip(["status", "extensions.thalesgroup_chl_tkn_ext_v1"])
        .binary([
            "challenge",
            "allowCredentials.[].id",
            "extensions.prf.eval.first",
            "extensions.prf.eval.second",
            "extensions.prf.evalByCredential.*.first",
            "extensions.prf.evalByCredential.*.second",
        ])
        .wildcard(["extensions.prf.evalByCredential"])
}

#[idcloud_macros::test]
fn wildcard_children_decode_regardless_of_key() -> TestResult {
    let first_a = base64url::encode(b"salt-a");
    let first_b = base64url::encode(b"salt-b");
    let wire = json!({
        "extensions": {
            "prf": {
                "evalByCredential": {
                    "credA": { "first": first_a },
                    "credB": { "first": first_b, "second": "AQ" }
                }
            }
        }
    });

    let native = decode(&wire, &prf_policy())?;

    let by_credential = native
        .pointer(["extensions", "prf", "evalByCredential"])
        .ok_or("missing evalByCredential")?;
    assert_eq!(
        by_credential.pointer(["credA", "first"]),
        Some(&Native::Bytes(b"salt-a".to_vec()))
    );
    assert_eq!(
        by_credential.pointer(["credB", "first"]),
        Some(&Native::Bytes(b"salt-b".to_vec()))
    );
    assert_eq!(
        by_credential.pointer(["credB", "second"]),
        Some(&Native::Bytes(vec![1]))
    );
    Ok(())
}

#[idcloud_macros::test]
fn prf_inputs_decode_independently() -> TestResult {
    let wire = json!({ "extensions": { "prf": { "eval": { "second": "AQI" } } } });

    let native = decode(&wire, &prf_policy())?;

    assert!(native.pointer(["extensions", "prf", "eval", "first"]).is_none());
    assert_eq!(
        native.pointer(["extensions", "prf", "eval", "second"]),
        Some(&Native::Bytes(vec![1, 2]))
    );
    Ok(())
}

#[idcloud_macros::test]
fn skipped_fields_never_come_back() -> TestResult {
    let policy = prf_policy();
    let native = Native::from([
        ("status", Native::from("OK")),
        ("challenge", Native::Bytes(vec![9, 9, 9])),
        (
            "extensions",
            Native::from([(
                "thalesgroup_chl_tkn_ext_v1",
                Native::from([("token", Native::from("abc"))]),
            )]),
        ),
    ]);

    let wire = encode(&native, &policy);
    assert!(wire.get("status").is_none());

    let round_tripped = decode(&wire, &policy)?;
    assert!(round_tripped.get("status").is_none());
    assert!(
        round_tripped
            .pointer(["extensions", "thalesgroup_chl_tkn_ext_v1"])
            .is_none()
    );
    assert_eq!(
        round_tripped.get("challenge"),
        Some(&Native::Bytes(vec![9, 9, 9]))
    );
    Ok(())
}

#[idcloud_macros::test]
fn unset_members_are_omitted() -> TestResult {
    let wire = json!({ "rp": { "id": "example.com", "name": null }, "timeout": null });

    let native = decode(&wire, &prf_policy())?;

    assert_eq!(
        encode(&native, &prf_policy()),
        json!({ "rp": { "id": "example.com" } })
    );
    Ok(())
}

#[idcloud_macros::test]
fn shapes_survive_a_round_trip() -> TestResult {
    let wire = json!({
        "challenge": "3q2-7w",
        "rpId": "example.com",
        "timeout": 60000,
        "userVerification": "preferred",
        "allowCredentials": [
            { "type": "public-key", "id": "AQID", "transports": ["usb", "nfc"] },
            { "type": "public-key", "id": "BAUG" }
        ],
        "extensions": { "prf": { "eval": { "first": "AA" } } }
    });

    let native = decode(&wire, &prf_policy())?;

    assert_eq!(encode(&native, &prf_policy()), wire);
    Ok(())
}
