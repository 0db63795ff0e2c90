//! Integration tests for the save/load manager.

use std::collections::HashMap;
use std::fs;

use ntest::timeout;
use serde::{Deserialize, Serialize};
use tempfile::{tempdir, TempDir};

use saveload_core::{
    CustomFormat, JsonCarrier, SaveLoadConfig, SaveLoadError, SaveLoadManager, SerializationMethod,
};

const BASE_DIRECTORY: &str = "GameData";
const SAVE_DIRECTORY: &str = "SaveData";
const TEST_KEY: &str = "SaveLoadTestEncryptionKey";
const TEST_SALT: &str = "SaveLoadTestEncryptionSalt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TestObject {
    list_of_strings: Vec<String>,
    count: i32,
}

fn test_object() -> TestObject {
    TestObject {
        list_of_strings: vec!["one".to_string(), "two".to_string()],
        count: 10,
    }
}

/// Pass-through JSON custom format, standing in for an externally
/// supplied third-party codec.
struct PlainJson;

impl CustomFormat for PlainJson {
    fn encode(&self, value: &serde_json::Value) -> Result<Vec<u8>, SaveLoadError> {
        serde_json::to_vec(value).map_err(|e| SaveLoadError::Serialization(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<serde_json::Value, SaveLoadError> {
        serde_json::from_slice(bytes).map_err(|e| SaveLoadError::Deserialization(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "plain-json"
    }
}

fn all_methods() -> [SerializationMethod; 5] {
    [
        SerializationMethod::Binary,
        SerializationMethod::Text,
        SerializationMethod::BinaryEncrypted,
        SerializationMethod::TextEncrypted,
        SerializationMethod::Custom,
    ]
}

struct Roots {
    data: TempDir,
    bundle: TempDir,
}

fn roots() -> Roots {
    Roots {
        data: tempdir().unwrap(),
        bundle: tempdir().unwrap(),
    }
}

fn create_manager(roots: &Roots, method: SerializationMethod) -> SaveLoadManager {
    let mut manager = SaveLoadManager::new(SaveLoadConfig {
        data_root: roots.data.path().to_path_buf(),
        bundle_root: roots.bundle.path().to_path_buf(),
        base_folder: BASE_DIRECTORY.to_string(),
        default_folder: SAVE_DIRECTORY.to_string(),
        method,
        key: TEST_KEY.to_string(),
        salt: TEST_SALT.to_string(),
    });
    if method == SerializationMethod::Custom {
        manager.set_custom_format(Box::new(PlainJson));
    }
    manager
}

#[timeout(4000)]
#[test]
fn save_load_and_delete_with_every_method() {
    for method in all_methods() {
        let roots = roots();
        let mut manager = create_manager(&roots, method);

        manager.save(&test_object(), "Testfile", None).unwrap();
        assert!(manager.exists("Testfile", None), "missing after save: {method}");

        let filepath = manager.default_save_path().join("Testfile");
        assert!(filepath.is_file());

        let loaded: Option<TestObject> = manager.load("Testfile", None).unwrap();
        assert_eq!(loaded.unwrap(), test_object(), "round trip failed: {method}");

        manager.delete("Testfile", None).unwrap();
        assert!(!manager.exists("Testfile", None), "still present after delete: {method}");
        assert!(!filepath.exists());
    }
}

#[timeout(4000)]
#[test]
fn list_files_returns_exactly_the_saved_names() {
    let roots = roots();
    let mut manager = create_manager(&roots, SerializationMethod::Binary);

    assert!(manager.list_files(None, None).is_empty());

    manager.save(&test_object(), "TestSave.sav", Some("TestFolder")).unwrap();
    manager.save(&test_object(), "Other.json", Some("TestFolder")).unwrap();

    let mut files = manager.list_files(Some("TestFolder"), None);
    files.sort();
    assert_eq!(files, vec!["Other.json", "TestSave.sav"]);

    // Extension filter keeps only matching names, still without any path.
    let files = manager.list_files(Some("TestFolder"), Some("sav"));
    assert_eq!(files, vec!["TestSave.sav"]);

    manager.delete("TestSave.sav", Some("TestFolder")).unwrap();
    manager.delete("Other.json", Some("TestFolder")).unwrap();
    assert!(manager.list_files(Some("TestFolder"), None).is_empty());
}

#[timeout(4000)]
#[test]
fn dictionary_round_trips_through_the_binary_method() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct DictObject {
        dict: HashMap<String, i32>,
        name: String,
    }

    let roots = roots();
    let mut manager = create_manager(&roots, SerializationMethod::Binary);

    let value = DictObject {
        dict: HashMap::from([("one".to_string(), 1), ("two".to_string(), 2)]),
        name: "Test".to_string(),
    };
    manager.save(&value, "Dict.sav", None).unwrap();

    let loaded: DictObject = manager.load("Dict.sav", None).unwrap().unwrap();
    assert_eq!(loaded.dict.len(), 2);
    assert_eq!(loaded.dict["one"], 1);
    assert_eq!(loaded.dict["two"], 2);
    assert_eq!(loaded.name, "Test");
}

#[timeout(4000)]
#[test]
fn copy_returns_an_independent_value() {
    for method in all_methods() {
        let roots = roots();
        let mut manager = create_manager(&roots, method);

        let original = test_object();
        let mut copy = manager.copy(&original).unwrap();
        assert_eq!(copy, original);

        copy.list_of_strings.push("three".to_string());
        copy.count += 1;
        assert_eq!(original, test_object());
    }
}

#[timeout(4000)]
#[test]
fn encrypted_file_is_unreadable_without_credentials() {
    let roots = roots();
    let mut manager = create_manager(&roots, SerializationMethod::TextEncrypted);
    manager.save(&test_object(), "Secret.sav", None).unwrap();

    let raw = fs::read(manager.default_save_path().join("Secret.sav")).unwrap();
    let raw = String::from_utf8_lossy(&raw);
    assert!(!raw.contains("one"), "plaintext leaked into the save file");

    // Same roots, different credentials.
    let mut wrong = SaveLoadManager::new(SaveLoadConfig {
        data_root: roots.data.path().to_path_buf(),
        bundle_root: roots.bundle.path().to_path_buf(),
        base_folder: BASE_DIRECTORY.to_string(),
        default_folder: SAVE_DIRECTORY.to_string(),
        method: SerializationMethod::TextEncrypted,
        key: "SomeOtherKey".to_string(),
        salt: "SomeOtherSalt".to_string(),
    });
    let result: Result<Option<TestObject>, _> = wrong.load("Secret.sav", None);
    match result {
        Err(SaveLoadError::Decryption(_)) | Err(SaveLoadError::Deserialization(_)) => {}
        Ok(Some(loaded)) => assert_ne!(loaded, test_object()),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[timeout(4000)]
#[test]
fn is_encrypted_reflects_the_bound_method() {
    let roots = roots();
    assert!(!create_manager(&roots, SerializationMethod::Binary).is_encrypted());
    assert!(!create_manager(&roots, SerializationMethod::Text).is_encrypted());
    assert!(create_manager(&roots, SerializationMethod::BinaryEncrypted).is_encrypted());
    assert!(create_manager(&roots, SerializationMethod::TextEncrypted).is_encrypted());
    assert!(!create_manager(&roots, SerializationMethod::Custom).is_encrypted());
    assert!(create_manager(&roots, SerializationMethod::Binary).has_credentials());
}

#[timeout(4000)]
#[test]
fn encrypted_method_with_empty_key_fails_before_any_io() {
    let roots = roots();
    let mut manager = SaveLoadManager::new(SaveLoadConfig {
        data_root: roots.data.path().to_path_buf(),
        bundle_root: roots.bundle.path().to_path_buf(),
        base_folder: BASE_DIRECTORY.to_string(),
        default_folder: SAVE_DIRECTORY.to_string(),
        method: SerializationMethod::BinaryEncrypted,
        key: String::new(),
        salt: TEST_SALT.to_string(),
    });
    assert!(!manager.has_credentials());

    let result = manager.save(&test_object(), "Testfile", None);
    assert!(matches!(result, Err(SaveLoadError::InvalidCredentials(_))));
    // Construction failed first: nothing was written anywhere.
    assert!(manager.list_files(None, None).is_empty());
}

#[timeout(4000)]
#[test]
fn load_of_a_file_never_saved_returns_none() {
    let roots = roots();
    let mut manager = create_manager(&roots, SerializationMethod::Text);
    let loaded: Option<TestObject> = manager.load("NeverSaved", None).unwrap();
    assert!(loaded.is_none());
}

#[timeout(4000)]
#[test]
fn explicit_method_overrides_the_bound_one() {
    let roots = roots();
    let mut manager = create_manager(&roots, SerializationMethod::Binary);

    manager
        .save_with_method(SerializationMethod::Text, &test_object(), "AsText.json", None)
        .unwrap();

    // The file really is structured text, not the bound binary format.
    let raw = fs::read_to_string(manager.default_save_path().join("AsText.json")).unwrap();
    assert!(raw.contains("list_of_strings"));

    let loaded: Option<TestObject> = manager
        .load_with_method(SerializationMethod::Text, "AsText.json", None)
        .unwrap();
    assert_eq!(loaded.unwrap(), test_object());
}

#[timeout(4000)]
#[test]
fn carrier_record_passes_through_the_pipeline_unchanged() {
    let roots = roots();
    let mut manager = create_manager(&roots, SerializationMethod::Binary);

    let carrier = JsonCarrier {
        json_data: r#"{"position":{"x":1.0,"y":2.0},"name":"player"}"#.to_string(),
    };
    manager.save(&carrier, "HostObject.sav", None).unwrap();

    let loaded: JsonCarrier = manager.load("HostObject.sav", None).unwrap().unwrap();
    assert_eq!(loaded, carrier);
}

#[timeout(4000)]
#[test]
fn bundled_assets_load_from_the_read_only_root() {
    let roots = roots();
    let mut manager = create_manager(&roots, SerializationMethod::Text);

    // Stage an asset under the bundle root the way a build step would.
    let asset_dir = roots
        .bundle
        .path()
        .join(BASE_DIRECTORY)
        .join(SAVE_DIRECTORY);
    fs::create_dir_all(&asset_dir).unwrap();
    fs::write(
        asset_dir.join("starting_loadout.json"),
        serde_json::to_vec(&test_object()).unwrap(),
    )
    .unwrap();

    let loaded: Option<TestObject> = manager.load_bundled("starting_loadout.json", None).unwrap();
    assert_eq!(loaded.unwrap(), test_object());

    let files = manager.list_bundled_files(None, None);
    assert_eq!(files, vec!["starting_loadout.json"]);

    // The asset is not visible through the writable root.
    assert!(!manager.exists("starting_loadout.json", None));
}

#[timeout(4000)]
#[test]
fn delete_all_wipes_the_default_folder() {
    let roots = roots();
    let mut manager = create_manager(&roots, SerializationMethod::Text);

    // Wiping a folder that was never created is a no-op.
    manager.delete_all(None).unwrap();

    manager.save(&test_object(), "a.sav", None).unwrap();
    manager.save(&test_object(), "b.sav", None).unwrap();
    manager.delete_all(None).unwrap();

    assert!(manager.list_files(None, None).is_empty());
    assert!(!manager.default_save_path().exists());
}

#[timeout(4000)]
#[test]
fn resave_overwrites_the_previous_artifact() {
    let roots = roots();
    let mut manager = create_manager(&roots, SerializationMethod::Text);

    manager.save(&test_object(), "Testfile", None).unwrap();
    let updated = TestObject {
        list_of_strings: vec!["replaced".to_string()],
        count: 99,
    };
    manager.save(&updated, "Testfile", None).unwrap();

    let loaded: TestObject = manager.load("Testfile", None).unwrap().unwrap();
    assert_eq!(loaded, updated);
}
