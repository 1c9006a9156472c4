use super::*;

#[test]
fn submission_defaults_optional_fields() {
    let submission: ContactSubmission = serde_json::from_value(serde_json::json!({
        "name": "山田太郎",
        "email": "a@b.com",
        "message": "相談したい",
    }))
    .expect("json");
    assert_eq!(submission.company, "");
    assert_eq!(submission.budget, "");
    assert!(!submission.privacy);
}

#[test]
fn ack_omits_error_on_success() {
    let json = serde_json::to_value(RelayAck::success()).expect("json");
    assert_eq!(json, serde_json::json!({ "ok": true }));

    let json = serde_json::to_value(RelayAck::failure("boom")).expect("json");
    assert_eq!(json, serde_json::json!({ "ok": false, "error": "boom" }));
}
