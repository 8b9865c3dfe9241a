use super::*;

#[test]
fn validate_login_input_trims_account() {
    assert_eq!(
        validate_login_input("  20240001 ", "pw"),
        Ok(("20240001".to_owned(), "pw".to_owned()))
    );
}

#[test]
fn validate_login_input_keeps_password_whitespace() {
    assert_eq!(
        validate_login_input("13800000000", " pw "),
        Ok(("13800000000".to_owned(), " pw ".to_owned()))
    );
}

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("   ", "pw"), Err("Enter both account and password."));
    assert_eq!(validate_login_input("20240001", ""), Err("Enter both account and password."));
}
