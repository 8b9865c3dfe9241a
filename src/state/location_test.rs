use super::*;

#[test]
fn location_state_default_is_unknown() {
    let state = LocationState::default();
    assert_eq!(state.coordinates(), None);
    assert!(state.city.is_empty());
    assert!(state.updated_at.abs() < f64::EPSILON);
}

#[test]
fn apply_overwrites_only_provided_fields() {
    let mut state = LocationState { city: "Dalian".to_owned(), adcode: "210200".to_owned(), ..LocationState::default() };
    state.apply(LocationPatch { lng: Some(121.6), lat: Some(38.9), ..LocationPatch::default() }, 1_000.0);

    assert_eq!(state.coordinates(), Some((121.6, 38.9)));
    assert_eq!(state.city, "Dalian");
    assert_eq!(state.adcode, "210200");
    assert!((state.updated_at - 1_000.0).abs() < f64::EPSILON);
}

#[test]
fn empty_patch_still_stamps_time() {
    let mut state = LocationState::default();
    state.apply(LocationPatch::default(), 42.0);
    assert!((state.updated_at - 42.0).abs() < f64::EPSILON);
    assert_eq!(state.coordinates(), None);
}

#[test]
fn string_fields_can_be_cleared_explicitly() {
    let mut state = LocationState { address: "Old Rd".to_owned(), ..LocationState::default() };
    state.apply(LocationPatch { address: Some(String::new()), ..LocationPatch::default() }, 1.0);
    assert!(state.address.is_empty());
}

#[test]
fn single_coordinate_is_not_a_position() {
    let mut state = LocationState::default();
    state.apply(LocationPatch { lat: Some(38.9), ..LocationPatch::default() }, 1.0);
    assert_eq!(state.coordinates(), None);
}
