use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use tipline_crypto::{EncryptedField, FieldCipher, FieldValue, KdfParams, MasterSecret};
use tipline_store::{
    FieldOutcome, SensitiveField, decrypt_fields, encrypt_fields, report_fields,
};
use tipline_types::ReportId;

fn test_cipher() -> FieldCipher {
    let secret = MasterSecret::new("0123456789abcdef").unwrap();
    FieldCipher::with_params(secret, KdfParams { iterations: 10 })
}

fn report_data() -> Map<String, Value> {
    json!({
        "category": "safety",
        "message": "need help at booth 12",
        "location": {"lat": 37.77, "lng": -122.41},
        "reporter_contact": "burner@example.org",
    })
    .as_object()
    .unwrap()
    .clone()
}

fn corrupt_triple(data: &mut Map<String, Value>, key: &str, f: impl FnOnce(&mut EncryptedField)) {
    let mut triple = EncryptedField::from_value(&data[key]).unwrap();
    f(&mut triple);
    data.insert(key.to_string(), triple.to_value().unwrap());
}

// ── encrypt_fields ───────────────────────────────────────────────

#[test]
fn plaintext_keys_replaced_with_triples() {
    let cipher = test_cipher();
    let mut data = report_data();
    let summary = encrypt_fields(&cipher, ReportId::new(), &mut data, &report_fields());

    assert_eq!(
        summary.encrypted,
        vec!["message", "location", "reporter_contact"]
    );
    assert!(summary.failed.is_empty());

    for name in ["message", "location", "reporter_contact"] {
        assert!(!data.contains_key(name), "{name} plaintext left behind");
        assert!(data.contains_key(&format!("{name}_encrypted")));
    }
    // Non-sensitive fields untouched.
    assert_eq!(data["category"], json!("safety"));
    // Absent fields get no forced nulls.
    assert!(!data.contains_key("admin_notes"));
    assert!(!data.contains_key("admin_notes_encrypted"));
}

#[test]
fn empty_and_null_fields_are_skipped() {
    let cipher = test_cipher();
    let mut data = json!({"message": "", "admin_notes": null})
        .as_object()
        .unwrap()
        .clone();
    let summary = encrypt_fields(&cipher, ReportId::new(), &mut data, &report_fields());

    assert!(!summary.any_encrypted());
    assert_eq!(data["message"], json!(""));
    assert_eq!(data["admin_notes"], json!(null));
}

#[test]
fn each_field_gets_its_own_salt_and_iv() {
    let cipher = test_cipher();
    let mut data = json!({"message": "same text", "admin_notes": "same text"})
        .as_object()
        .unwrap()
        .clone();
    encrypt_fields(&cipher, ReportId::new(), &mut data, &report_fields());

    let msg = EncryptedField::from_value(&data["message_encrypted"]).unwrap();
    let notes = EncryptedField::from_value(&data["admin_notes_encrypted"]).unwrap();
    assert_ne!(msg.salt, notes.salt);
    assert_ne!(msg.iv, notes.iv);
    assert_ne!(msg.ciphertext, notes.ciphertext);
}

// ── decrypt_fields ───────────────────────────────────────────────

#[test]
fn projection_recovers_all_fields() {
    let cipher = test_cipher();
    let id = ReportId::new();
    let mut data = report_data();
    encrypt_fields(&cipher, id, &mut data, &report_fields());

    let projection = decrypt_fields(&cipher, id, &data, &report_fields());
    assert_eq!(projection.len(), 3);
    assert_eq!(projection.text("message"), Some("need help at booth 12"));
    assert_eq!(
        projection.structured("location"),
        Some(&json!({"lat": 37.77, "lng": -122.41}))
    );
    assert_eq!(
        projection.text("reporter_contact"),
        Some("burner@example.org")
    );
    // Absent field: not in the projection at all.
    assert!(projection.get("admin_notes").is_none());
    assert!(!projection.is_unavailable("admin_notes"));
}

#[test]
fn corrupted_field_is_isolated() {
    let cipher = test_cipher();
    let id = ReportId::new();
    let mut data = report_data();
    encrypt_fields(&cipher, id, &mut data, &report_fields());

    // One byte flipped in one field's ciphertext.
    corrupt_triple(&mut data, "message_encrypted", |t| t.ciphertext[0] ^= 0x01);

    let projection = decrypt_fields(&cipher, id, &data, &report_fields());
    assert_eq!(projection.get("message"), Some(&FieldOutcome::Unavailable));
    assert!(projection.is_unavailable("message"));
    assert_eq!(projection.text("message"), None);
    // Siblings decrypt normally.
    assert_eq!(
        projection.structured("location"),
        Some(&json!({"lat": 37.77, "lng": -122.41}))
    );
    assert_eq!(
        projection.text("reporter_contact"),
        Some("burner@example.org")
    );
}

#[test]
fn truncated_ciphertext_is_isolated() {
    let cipher = test_cipher();
    let id = ReportId::new();
    let mut data = json!({"message": "healthy", "admin_notes": "to be truncated"})
        .as_object()
        .unwrap()
        .clone();
    encrypt_fields(&cipher, id, &mut data, &report_fields());

    corrupt_triple(&mut data, "admin_notes_encrypted", |t| {
        t.ciphertext.pop();
    });

    let projection = decrypt_fields(&cipher, id, &data, &report_fields());
    assert_eq!(projection.text("message"), Some("healthy"));
    assert!(projection.is_unavailable("admin_notes"));
}

#[test]
fn partial_triple_is_isolated() {
    let cipher = test_cipher();
    let id = ReportId::new();
    let mut data = report_data();
    encrypt_fields(&cipher, id, &mut data, &report_fields());

    // Drop the salt member from one triple.
    let mut triple = data["message_encrypted"].as_object().unwrap().clone();
    triple.remove("salt");
    data.insert("message_encrypted".into(), Value::Object(triple));

    let projection = decrypt_fields(&cipher, id, &data, &report_fields());
    assert!(projection.is_unavailable("message"));
    assert_eq!(
        projection.structured("location"),
        Some(&json!({"lat": 37.77, "lng": -122.41}))
    );
}

#[test]
fn wrong_secret_marks_all_fields_unavailable() {
    let cipher = test_cipher();
    let id = ReportId::new();
    let mut data = report_data();
    encrypt_fields(&cipher, id, &mut data, &report_fields());

    let other = FieldCipher::with_params(
        MasterSecret::new("not-the-same-secret").unwrap(),
        KdfParams { iterations: 10 },
    );
    let projection = decrypt_fields(&other, id, &data, &report_fields());
    assert_eq!(projection.len(), 3);
    for (name, outcome) in projection.iter() {
        assert!(outcome.is_unavailable(), "{name} should be unavailable");
    }
}

#[test]
fn custom_field_set_roundtrip() {
    let cipher = test_cipher();
    let id = ReportId::new();
    let fields = vec![
        SensitiveField::text("witness_statement"),
        SensitiveField::structured("route"),
    ];
    let mut data = json!({
        "witness_statement": "saw it happen",
        "route": [[1.0, 2.0], [3.0, 4.0]],
    })
    .as_object()
    .unwrap()
    .clone();

    encrypt_fields(&cipher, id, &mut data, &fields);
    let projection = decrypt_fields(&cipher, id, &data, &fields);
    assert_eq!(projection.text("witness_statement"), Some("saw it happen"));
    assert_eq!(
        projection.structured("route"),
        Some(&json!([[1.0, 2.0], [3.0, 4.0]]))
    );
}

#[test]
fn decrypted_value_kind_follows_content() {
    // A text-declared field that held a JSON object comes back structured;
    // the triple records nothing about the original type.
    let cipher = test_cipher();
    let id = ReportId::new();
    let fields = vec![SensitiveField::text("message")];
    let mut data = json!({"message": {"nested": true}})
        .as_object()
        .unwrap()
        .clone();

    encrypt_fields(&cipher, id, &mut data, &fields);
    let projection = decrypt_fields(&cipher, id, &data, &fields);
    assert_eq!(
        projection.get("message").unwrap().value(),
        Some(&FieldValue::Structured(json!({"nested": true})))
    );
}
