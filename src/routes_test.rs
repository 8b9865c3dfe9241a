use super::*;

#[test]
fn static_paths_match_exactly() {
    assert_eq!(find_route("/home").map(|r| r.name), Some("home"));
    assert_eq!(find_route("/admin").map(|r| r.name), Some("admin"));
    assert!(find_route("/homes").is_none());
}

#[test]
fn trailing_slash_is_ignored() {
    assert_eq!(find_route("/cart/").map(|r| r.name), Some("cart"));
}

#[test]
fn param_segments_match_single_segment() {
    assert_eq!(find_route("/news/42").map(|r| r.name), Some("news-detail"));
    assert_eq!(find_route("/guide/7").map(|r| r.name), Some("guide-detail"));
    assert!(find_route("/news").is_none());
    assert!(find_route("/news/1/2").is_none());
}

#[test]
fn pay_result_is_not_shadowed_by_pay() {
    assert_eq!(find_route("/shop/pay/9").map(|r| r.name), Some("shop-pay"));
    assert_eq!(find_route("/shop/pay/result/9").map(|r| r.name), Some("pay-result"));
}

#[test]
fn only_login_and_register_are_public() {
    let public: Vec<_> = ROUTES.iter().filter(|r| !r.requires_auth).map(|r| r.path).collect();
    assert_eq!(public, vec![LOGIN_PATH, REGISTER_PATH]);
}

#[test]
fn role_restriction_only_on_admin_route() {
    let restricted: Vec<_> = ROUTES.iter().filter(|r| r.role_restricted).map(|r| r.path).collect();
    assert_eq!(restricted, vec![ADMIN_PATH]);
}

#[test]
fn admin_route_also_requires_auth() {
    let admin = find_route(ADMIN_PATH).expect("admin route registered");
    assert!(admin.requires_auth);
    assert!(admin.role_restricted);
}

#[test]
fn auth_page_detection_uses_prefixes() {
    assert!(is_auth_page("/login"));
    assert!(is_auth_page("/login?next=/home"));
    assert!(is_auth_page("/register"));
    assert!(!is_auth_page("/home"));
    assert!(!is_auth_page("/"));
}
