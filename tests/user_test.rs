//! Authentication tests — password hashing, verification, and user rows.

mod common;

use draftdeck::auth::password;
use draftdeck::models::user;
use common::*;

const TEST_PASSWORD: &str = "password123";

#[test]
fn test_hash_and_verify_password() {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");
    assert!(hash.len() > 20);

    assert!(password::verify_password(TEST_PASSWORD, &hash).expect("Verification failed"));
    assert!(!password::verify_password("wrongpassword", &hash).expect("Verification failed"));
}

#[test]
fn test_verify_rejects_malformed_stored_hash() {
    assert!(password::verify_password(TEST_PASSWORD, "not-a-phc-string").is_err());
}

#[test]
fn test_hash_password_randomness() {
    let hash1 = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");
    let hash2 = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    // Different salts, same password.
    assert_ne!(hash1, hash2);
    assert!(password::verify_password(TEST_PASSWORD, &hash1).expect("Verification failed"));
    assert!(password::verify_password(TEST_PASSWORD, &hash2).expect("Verification failed"));
}

#[test]
fn test_create_and_find_user() {
    let (_dir, conn) = setup_test_db();

    let id = seed_user(&conn);
    let found = user::find_by_email(&conn, TEST_EMAIL)
        .expect("Query failed")
        .expect("User not found");
    assert_eq!(found.id, id);
    assert_eq!(found.email, TEST_EMAIL);

    let by_id = user::find_by_id(&conn, id).expect("Query failed").expect("User not found");
    assert_eq!(by_id.email, TEST_EMAIL);
}

#[test]
fn test_duplicate_email_rejected() {
    let (_dir, conn) = setup_test_db();

    seed_user(&conn);
    assert!(user::create(&conn, TEST_EMAIL, TEST_HASH).is_err());
}

#[test]
fn test_find_missing_user_is_none() {
    let (_dir, conn) = setup_test_db();
    assert!(user::find_by_email(&conn, "nobody@example.com").expect("Query failed").is_none());
    assert!(user::find_by_id(&conn, 999).expect("Query failed").is_none());
}
