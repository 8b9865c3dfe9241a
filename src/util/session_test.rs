use super::*;

fn record(role: &str) -> SessionRecord {
    SessionRecord {
        role: role.to_owned(),
        username: "20240001".to_owned(),
        nickname: "Li".to_owned(),
        user_type: "farmer".to_owned(),
        avatar_url: String::new(),
        phone: "13800000000".to_owned(),
        extra: serde_json::Map::new(),
    }
}

// =============================================================
// SessionState parsing
// =============================================================

#[test]
fn missing_and_empty_text_are_absent() {
    assert_eq!(SessionState::from_raw(None), SessionState::Absent);
    assert_eq!(SessionState::from_raw(Some("")), SessionState::Absent);
}

#[test]
fn non_json_text_is_malformed() {
    assert_eq!(SessionState::from_raw(Some("{not json")), SessionState::Malformed);
}

#[test]
fn record_without_role_is_malformed() {
    assert_eq!(
        SessionState::from_raw(Some(r#"{"username":"20240001"}"#)),
        SessionState::Malformed
    );
}

#[test]
fn null_role_is_malformed() {
    assert_eq!(SessionState::from_raw(Some(r#"{"role":null}"#)), SessionState::Malformed);
}

#[test]
fn minimal_record_parses_with_defaults() {
    let state = SessionState::from_raw(Some(r#"{"role":"user"}"#));
    let rec = state.record().expect("present");
    assert_eq!(rec.role, "user");
    assert!(rec.username.is_empty());
    assert!(!rec.is_admin());
    assert!(state.is_authenticated());
}

#[test]
fn server_payload_keeps_unknown_fields() {
    let raw = r#"{"username":"20240001","role":"admin","userType":"expert","nickname":"Wang","avatarUrl":"/uploads/a.png","phone":"13800000000","createdAt":"2025-01-02T03:04:05"}"#;
    let state = SessionState::from_raw(Some(raw));
    let rec = state.record().expect("present");
    assert!(rec.is_admin());
    assert_eq!(rec.user_type, "expert");
    assert_eq!(rec.avatar_url, "/uploads/a.png");
    assert_eq!(rec.extra.get("createdAt"), Some(&serde_json::json!("2025-01-02T03:04:05")));
}

#[test]
fn malformed_is_not_authenticated() {
    assert!(!SessionState::Malformed.is_authenticated());
    assert!(!SessionState::Absent.is_authenticated());
    assert!(SessionState::Malformed.record().is_none());
}

// =============================================================
// SessionStore over memory storage
// =============================================================

#[test]
fn write_then_read_returns_record() {
    let store = SessionStore::new(MemorySessionStorage::new());
    store.write(&record("user")).expect("write");
    assert_eq!(store.read(), Some(record("user")));
}

#[test]
fn clear_removes_record_and_is_idempotent() {
    let store = SessionStore::new(MemorySessionStorage::new());
    store.write(&record("admin")).expect("write");
    store.clear().expect("clear");
    assert_eq!(store.state(), SessionState::Absent);
    store.clear().expect("second clear");
    assert_eq!(store.state(), SessionState::Absent);
}

#[test]
fn read_yields_none_for_garbage() {
    let store = SessionStore::new(MemorySessionStorage::with_raw("undefined"));
    assert_eq!(store.read(), None);
    assert_eq!(store.state(), SessionState::Malformed);
}

#[test]
fn store_accepts_borrowed_storage() {
    let storage = MemorySessionStorage::new();
    SessionStore::new(&storage).write(&record("user")).expect("write");
    assert!(storage.get_item(SESSION_KEY).is_some());
}

#[cfg(not(feature = "csr"))]
#[test]
fn browser_storage_is_empty_off_browser() {
    let store = browser_session();
    assert_eq!(store.state(), SessionState::Absent);
    assert!(store.clear().is_err());
}
