use maxbridge::error::BridgeError;

#[test]
fn error_constructors_group_1() {
    assert!(matches!(
        BridgeError::config("x"),
        BridgeError::Config { .. }
    ));
    assert!(matches!(BridgeError::io("x"), BridgeError::Io { .. }));
    assert!(matches!(
        BridgeError::validation("f", "m"),
        BridgeError::Validation { .. }
    ));
    assert!(matches!(BridgeError::parse("x"), BridgeError::Parse { .. }));
}

#[test]
fn error_constructors_group_2() {
    assert!(matches!(
        BridgeError::transport("http://gw/", "refused"),
        BridgeError::Transport { .. }
    ));
    assert!(matches!(
        BridgeError::timeout("http://gw/", "10s"),
        BridgeError::Timeout { .. }
    ));
    assert!(matches!(
        BridgeError::status("http://gw/", 404),
        BridgeError::Status { status: 404, .. }
    ));
    assert!(matches!(
        BridgeError::not_found("0a1b2c_123456_climate"),
        BridgeError::NotFound { .. }
    ));
    assert!(matches!(
        BridgeError::command("x"),
        BridgeError::Command { .. }
    ));
    assert!(matches!(
        BridgeError::generic("x"),
        BridgeError::Generic { .. }
    ));
}

#[test]
fn display_messages_carry_url() {
    let e = BridgeError::status("http://gw:8080/get-duty?cube=0a1b2c", 500);
    let s = format!("{}", e);
    assert!(s.contains("get-duty"));
    assert!(s.contains("500"));

    let e = BridgeError::validation("gateways[0].port", "bad");
    assert!(format!("{}", e).contains("Validation error"));
}

#[test]
fn json_errors_become_parse_errors() {
    let err: BridgeError = serde_json::from_str::<serde_json::Value>("{oops")
        .unwrap_err()
        .into();
    assert!(matches!(err, BridgeError::Parse { .. }));
    assert!(!err.is_transport());
}
