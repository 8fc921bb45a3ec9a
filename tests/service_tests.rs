//! Integration tests for the `VaultService` façade.

use std::fs;
use std::sync::Arc;
use std::thread;

use credvault::crypto::{Argon2Params, CipherProvider, CredentialHasher, EncryptionKey};
use credvault::vault::{UserId, VaultStore, MASTER_PASS_KEY};
use credvault::{VaultError, VaultService};
use tempfile::TempDir;

const MASTER: &str = "master-password";

/// Helper: a service over a fresh temp vault with cheap Argon2 params.
fn new_service() -> (TempDir, VaultService) {
    let dir = TempDir::new().expect("create temp dir");
    let service = build_service(&dir, EncryptionKey::new([0x5A; 32]));
    (dir, service)
}

fn build_service(dir: &TempDir, key: EncryptionKey) -> VaultService {
    let hasher = CredentialHasher::new(&Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid params");

    VaultService::new(
        VaultStore::new(dir.path().join("vault.json")),
        CipherProvider::new(&key),
        hasher,
    )
}

/// Helper: a user that has already set `MASTER`.
fn initialized(service: &VaultService, id: &str) -> UserId {
    let user = UserId::from(id);
    service.set_master_password(&user, MASTER).expect("set master");
    user
}

// ---------------------------------------------------------------------------
// Uninitialized users
// ---------------------------------------------------------------------------

#[test]
fn privileged_actions_before_init_fail_without_writing() {
    let (dir, service) = new_service();
    let user = UserId::from("newcomer");
    let vault = dir.path().join("vault.json");

    assert!(matches!(
        service.store_credential(&user, "mail", "pw"),
        Err(VaultError::NotInitialized)
    ));
    assert!(matches!(
        service.get_credential(&user, MASTER, "mail"),
        Err(VaultError::NotInitialized)
    ));
    assert!(matches!(
        service.update_credential(&user, MASTER, "mail", "pw"),
        Err(VaultError::NotInitialized)
    ));
    assert!(matches!(
        service.delete_credential(&user, MASTER, "mail"),
        Err(VaultError::NotInitialized)
    ));
    assert!(matches!(
        service.export_all(&user, MASTER),
        Err(VaultError::NotInitialized)
    ));
    assert!(matches!(
        service.list_services(&user),
        Err(VaultError::NotInitialized)
    ));
    assert!(matches!(
        service.verify_master_password(&user, MASTER),
        Err(VaultError::NotInitialized)
    ));

    assert!(!vault.exists(), "no operation may create the vault file");
}

#[test]
fn uninitialized_user_in_existing_vault_stays_absent() {
    let (_dir, service) = new_service();
    let alice = initialized(&service, "alice");
    service.store_credential(&alice, "mail", "pw").unwrap();

    let bob = UserId::from("bob");
    assert!(service.store_credential(&bob, "mail", "pw").is_err());
    assert!(service.store().read_user(&bob).unwrap().is_none());
    assert!(!service.is_initialized(&bob).unwrap());
}

// ---------------------------------------------------------------------------
// Master password
// ---------------------------------------------------------------------------

#[test]
fn verify_master_password_distinguishes_right_and_wrong() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");

    assert!(service.verify_master_password(&user, MASTER).unwrap());
    assert!(!service.verify_master_password(&user, "wrong").unwrap());
}

#[test]
fn master_password_is_never_stored_in_plaintext() {
    let (dir, service) = new_service();
    initialized(&service, "alice");

    let raw = fs::read_to_string(dir.path().join("vault.json")).unwrap();
    assert!(!raw.contains(MASTER));
    assert!(raw.contains(MASTER_PASS_KEY));
    assert!(raw.contains("$argon2id$"));
}

#[test]
fn resetting_master_password_keeps_credentials() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");
    service.store_credential(&user, "mail", "mail-pw").unwrap();

    service.set_master_password(&user, "new-master").unwrap();

    assert!(!service.verify_master_password(&user, MASTER).unwrap());
    assert_eq!(
        service
            .get_credential(&user, "new-master", "mail")
            .unwrap()
            .as_str(),
        "mail-pw"
    );
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[test]
fn wrong_master_password_blocks_every_privileged_action() {
    let (dir, service) = new_service();
    let user = initialized(&service, "alice");
    service.store_credential(&user, "mail", "pw").unwrap();
    let before = fs::read(dir.path().join("vault.json")).unwrap();

    assert!(matches!(
        service.get_credential(&user, "nope", "mail"),
        Err(VaultError::AuthenticationFailed)
    ));
    assert!(matches!(
        service.update_credential(&user, "nope", "mail", "changed"),
        Err(VaultError::AuthenticationFailed)
    ));
    assert!(matches!(
        service.delete_credential(&user, "nope", "mail"),
        Err(VaultError::AuthenticationFailed)
    ));
    assert!(matches!(
        service.export_all(&user, "nope"),
        Err(VaultError::AuthenticationFailed)
    ));
    assert!(matches!(
        service.destroy_vault(&user, "nope"),
        Err(VaultError::AuthenticationFailed)
    ));

    assert_eq!(fs::read(dir.path().join("vault.json")).unwrap(), before);
}

#[test]
fn store_does_not_require_master_password() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");

    service.store_credential(&user, "GitHub", "gh-token").unwrap();
    assert_eq!(service.list_services(&user).unwrap(), vec!["GitHub"]);
}

// ---------------------------------------------------------------------------
// Credential lifecycle
// ---------------------------------------------------------------------------

#[test]
fn get_without_store_is_not_found() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");

    assert!(matches!(
        service.get_credential(&user, MASTER, "x"),
        Err(VaultError::CredentialNotFound(name)) if name == "x"
    ));
}

#[test]
fn store_then_get_returns_plaintext() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");

    service.store_credential(&user, "x", "P").unwrap();
    assert_eq!(service.get_credential(&user, MASTER, "x").unwrap().as_str(), "P");
}

#[test]
fn stored_secret_is_encrypted_on_disk() {
    let (dir, service) = new_service();
    let user = initialized(&service, "alice");
    service
        .store_credential(&user, "bank", "very-distinctive-secret")
        .unwrap();

    let raw = fs::read_to_string(dir.path().join("vault.json")).unwrap();
    assert!(raw.contains("bank"));
    assert!(!raw.contains("very-distinctive-secret"));
}

#[test]
fn update_replaces_existing_credential() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");
    service.store_credential(&user, "mail", "old").unwrap();

    service.update_credential(&user, MASTER, "mail", "new").unwrap();
    assert_eq!(
        service.get_credential(&user, MASTER, "mail").unwrap().as_str(),
        "new"
    );
}

#[test]
fn update_of_unknown_service_is_not_found() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");

    assert!(matches!(
        service.update_credential(&user, MASTER, "ghost", "pw"),
        Err(VaultError::CredentialNotFound(_))
    ));
    assert!(service.list_services(&user).unwrap().is_empty());
}

#[test]
fn delete_then_get_is_not_found() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");
    service.store_credential(&user, "x", "P").unwrap();

    assert!(service.delete_credential(&user, MASTER, "x").unwrap());
    assert!(matches!(
        service.get_credential(&user, MASTER, "x"),
        Err(VaultError::CredentialNotFound(_))
    ));
}

#[test]
fn delete_of_absent_service_returns_false_without_writing() {
    let (dir, service) = new_service();
    let user = initialized(&service, "alice");
    let path = dir.path().join("vault.json");
    let before = fs::read(&path).unwrap();
    let mtime = fs::metadata(&path).unwrap().modified().unwrap();

    assert!(!service.delete_credential(&user, MASTER, "absent").unwrap());

    assert_eq!(fs::read(&path).unwrap(), before);
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), mtime);
}

#[test]
fn reserved_name_is_rejected_as_service() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");

    assert!(matches!(
        service.store_credential(&user, MASTER_PASS_KEY, "pw"),
        Err(VaultError::InvalidServiceName(_))
    ));
    assert!(matches!(
        service.store_credential(&user, "", "pw"),
        Err(VaultError::InvalidServiceName(_))
    ));
    assert!(service.verify_master_password(&user, MASTER).unwrap());
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[test]
fn export_returns_exactly_the_stored_pairs() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");
    service.store_credential(&user, "b", "P2").unwrap();
    service.store_credential(&user, "a", "P1").unwrap();

    let exported: Vec<(String, String)> = service
        .export_all(&user, MASTER)
        .unwrap()
        .into_iter()
        .map(|(service, secret)| (service, secret.as_str().to_string()))
        .collect();

    assert_eq!(
        exported,
        vec![
            ("a".to_string(), "P1".to_string()),
            ("b".to_string(), "P2".to_string())
        ]
    );
}

#[test]
fn export_of_empty_vault_is_empty() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");
    assert!(service.export_all(&user, MASTER).unwrap().is_empty());
}

#[test]
fn export_fails_whole_operation_on_undecryptable_entry() {
    let (_dir, service) = new_service();
    let user = initialized(&service, "alice");
    service.store_credential(&user, "good", "fine").unwrap();

    // Plant a ciphertext that fails authentication.
    service
        .store()
        .mutate(&user, |r| r.insert_credential("bad", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".into()))
        .unwrap();

    assert!(matches!(
        service.export_all(&user, MASTER),
        Err(VaultError::DecryptionFailed)
    ));
}

#[test]
fn secrets_under_another_key_fail_to_decrypt() {
    let dir = TempDir::new().unwrap();
    let original = build_service(&dir, EncryptionKey::new([1; 32]));
    let user = initialized(&original, "alice");
    original.store_credential(&user, "mail", "pw").unwrap();

    let rekeyed = build_service(&dir, EncryptionKey::new([2; 32]));
    assert!(matches!(
        rekeyed.get_credential(&user, MASTER, "mail"),
        Err(VaultError::DecryptionFailed)
    ));
}

// ---------------------------------------------------------------------------
// Destroy
// ---------------------------------------------------------------------------

#[test]
fn destroy_removes_record_and_returns_to_uninitialized() {
    let (_dir, service) = new_service();
    let alice = initialized(&service, "alice");
    let bob = initialized(&service, "bob");
    service.store_credential(&alice, "mail", "pw").unwrap();

    assert!(service.destroy_vault(&alice, MASTER).unwrap());
    assert!(!service.is_initialized(&alice).unwrap());
    assert!(matches!(
        service.list_services(&alice),
        Err(VaultError::NotInitialized)
    ));
    assert!(service.is_initialized(&bob).unwrap());
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_stores_for_different_users_all_persist() {
    const USERS: usize = 8;

    let (dir, service) = new_service();
    let service = Arc::new(service);
    let users: Vec<UserId> = (0..USERS)
        .map(|i| initialized(&service, &format!("user-{i}")))
        .collect();

    let handles: Vec<_> = users
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, user)| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                service
                    .store_credential(&user, "mail", &format!("secret-{i}"))
                    .expect("store");
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    // Read back through a fresh service on the same file.
    let reopened = build_service(&dir, EncryptionKey::new([0x5A; 32]));
    for (i, user) in users.iter().enumerate() {
        let secret = reopened.get_credential(user, MASTER, "mail").unwrap();
        assert_eq!(secret.as_str(), format!("secret-{i}"));
    }
}

#[test]
fn legacy_record_is_kept_but_must_be_reset() {
    let (dir, service) = new_service();
    fs::write(
        dir.path().join("vault.json"),
        r#"{ "1234": { "master_pass": "$2b$12$legacyhash", "GitHub": "gAAAAABlegacy" } }"#,
    )
    .unwrap();
    let legacy = UserId::from(1234u64);

    // A bcrypt hash never verifies, so the record cannot be unlocked.
    assert!(!service.verify_master_password(&legacy, MASTER).unwrap());
    assert!(matches!(
        service.get_credential(&legacy, MASTER, "GitHub"),
        Err(VaultError::AuthenticationFailed)
    ));

    // Writes for other users carry the legacy record through untouched.
    let other = initialized(&service, "alice");
    service.store_credential(&other, "mail", "pw").unwrap();
    assert_eq!(
        service.store().read_user(&legacy).unwrap().unwrap().services(),
        vec!["GitHub"]
    );

    // Removing the record lets the owner start over.
    assert!(service.store().remove_user(&legacy).unwrap());
    service.set_master_password(&legacy, MASTER).unwrap();
    assert!(service.list_services(&legacy).unwrap().is_empty());
}
