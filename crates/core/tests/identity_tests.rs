// ═══════════════════════════════════════════════════════════════════
// Identity Tests — IdentityStore persistence, IdentityService
// memoization and failure handling
// ═══════════════════════════════════════════════════════════════════

use crypto_alerts_core::services::identity_service::IdentityService;
use crypto_alerts_core::storage::identity_store::IdentityStore;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> IdentityStore {
    IdentityStore::new(dir.path().join("identity"))
}

// ── IdentityStore ───────────────────────────────────────────────────

mod identity_store {
    use super::*;

    #[test]
    fn load_returns_none_when_missing() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[test]
    fn load_returns_none_for_blank_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("identity");
        std::fs::write(&path, "  \n").unwrap();
        assert!(IdentityStore::new(path).load().unwrap().is_none());
    }

    #[test]
    fn load_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("identity");
        std::fs::write(&path, "abc\n").unwrap();
        let id = IdentityStore::new(path).load().unwrap().unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn creates_64_char_lowercase_hex_token() {
        let dir = TempDir::new().unwrap();
        let id = store_in(&dir).load_or_create().unwrap();
        assert_eq!(id.as_str().len(), 64);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn persists_before_returning() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let id = store.load_or_create().unwrap();
        let on_disk = std::fs::read_to_string(dir.path().join("identity")).unwrap();
        assert_eq!(on_disk.trim(), id.as_str());
    }

    #[test]
    fn load_or_create_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let first = store.load_or_create().unwrap();
        let second = store.load_or_create().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = IdentityStore::new(dir.path().join("nested/dirs/identity"));
        assert!(store.load_or_create().is_ok());
    }

    #[test]
    fn fresh_installations_get_distinct_tokens() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let id_a = store_in(&a).load_or_create().unwrap();
        let id_b = store_in(&b).load_or_create().unwrap();
        // 256 bits of entropy — a collision here means the generator is broken.
        assert_ne!(id_a, id_b);
    }

    #[test]
    fn unusable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // Parent "identity" is a file, so the nested path cannot be created.
        let blocker = dir.path().join("identity");
        std::fs::write(&blocker, "occupied").unwrap();
        let store = IdentityStore::new(blocker.join("token"));
        assert!(store.load_or_create().is_err());
    }
}

// ── IdentityService ─────────────────────────────────────────────────

mod identity_service {
    use super::*;

    #[test]
    fn resolve_is_idempotent_within_a_session() {
        let dir = TempDir::new().unwrap();
        let service = IdentityService::new(store_in(&dir));
        let first = service.resolve().unwrap();
        let second = service.resolve().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn resolve_memoizes_past_store_loss() {
        let dir = TempDir::new().unwrap();
        let service = IdentityService::new(store_in(&dir));
        let first = service.resolve().unwrap();

        // Even if the backing file disappears mid-session, the session's
        // identity must not change.
        std::fs::remove_file(dir.path().join("identity")).unwrap();
        let second = service.resolve().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unavailable_store_yields_none_not_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("identity");
        std::fs::write(&blocker, "occupied").unwrap();
        let service = IdentityService::new(IdentityStore::new(blocker.join("token")));
        assert!(service.resolve().is_none());
        // Failure is not cached either — still None, still no panic.
        assert!(service.resolve().is_none());
    }

    #[test]
    fn resolution_recovers_once_store_becomes_usable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("identity");
        std::fs::write(&blocker, "occupied").unwrap();

        let service = IdentityService::new(IdentityStore::new(blocker.join("token")));
        assert!(service.resolve().is_none());

        // Clear the obstruction; the next resolution attempt succeeds and
        // the value is memoized from then on.
        std::fs::remove_file(&blocker).unwrap();
        let resolved = service.resolve().unwrap();
        assert_eq!(service.resolve().unwrap(), resolved);
    }

    #[test]
    fn resolve_reads_existing_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("identity");
        std::fs::write(&path, "abc").unwrap();
        let service = IdentityService::new(IdentityStore::new(path));
        assert_eq!(service.resolve().unwrap().as_str(), "abc");
    }
}
