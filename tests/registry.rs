#![cfg(feature = "sentences")]

use std::{env::consts::DLL_SUFFIX, fs, path::Path};

use nmea0183_stream::{
    DirectorySource, Dispatcher, DispatchError, ModuleCatalog, ModuleSource, Registry,
    RegistryConfig, RegistryError, SentenceType,
};

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"").unwrap();
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirectorySource::new(dir.path(), ModuleCatalog::builtin());

    let mut registry = Registry::new();
    let result = registry.register_all(&source);

    assert!(matches!(result, Err(RegistryError::RegistrationEmpty)));
    assert!(!registry.is_registered());
}

#[test]
fn test_directory_candidates() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &format!("gpgga{DLL_SUFFIX}"));
    touch(dir.path(), &format!("gpgll{DLL_SUFFIX}"));
    touch(dir.path(), &format!("gpzda{DLL_SUFFIX}"));
    touch(dir.path(), &format!(".gpgsv{DLL_SUFFIX}"));
    touch(dir.path(), "readme.txt");
    fs::create_dir(dir.path().join(format!("gprmc{DLL_SUFFIX}"))).unwrap();

    let source = DirectorySource::new(dir.path(), ModuleCatalog::builtin());

    let mut names: Vec<_> = source
        .discover()
        .unwrap()
        .into_iter()
        .map(|descriptor| descriptor.name().to_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["gpgga", "gpgll", "gpzda"]);

    let mut registry = Registry::new();
    assert_eq!(registry.register_all(&source).unwrap(), 2);

    assert_eq!(
        registry.lookup_by_type_word("GGA").unwrap().sentence_type(),
        SentenceType::Gga
    );
    assert_eq!(
        registry.lookup_by_type_word(b"GLL").unwrap().sentence_type(),
        SentenceType::Gll
    );
    assert!(registry.lookup_by_type_word("ZDA").is_none());
}

#[test]
fn test_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = RegistryConfig::new(dir.path().join("missing"));
    let source = DirectorySource::from_config(&config, ModuleCatalog::builtin());

    let mut registry = Registry::new();
    assert!(matches!(
        registry.register_all(&source),
        Err(RegistryError::Discovery(_))
    ));
}

#[test]
fn test_unknown_type_leaves_registry_unchanged() {
    let registry = Registry::builtin().unwrap();
    let before: Vec<_> = registry.modules().map(|m| m.name().to_owned()).collect();

    assert!(registry.lookup_by_type_word("XYZ").is_none());
    assert_eq!(
        Dispatcher::new(&registry)
            .dispatch(b"$GPXYZ,1,2,3\r\n")
            .unwrap_err(),
        DispatchError::UnknownSentenceType("XYZ".into())
    );

    let after: Vec<_> = registry.modules().map(|m| m.name().to_owned()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_reregister_after_teardown() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &format!("gpgll{DLL_SUFFIX}"));
    let source = DirectorySource::new(dir.path(), ModuleCatalog::builtin());

    let mut registry = Registry::new();
    assert_eq!(registry.register_all(&source).unwrap(), 1);
    assert!(matches!(
        registry.register_all(&source),
        Err(RegistryError::AlreadyRegistered)
    ));

    registry.unregister_all();
    assert!(registry.lookup_by_type(SentenceType::Gll).is_none());

    touch(dir.path(), &format!("gpgga{DLL_SUFFIX}"));
    assert_eq!(registry.register_all(&source).unwrap(), 2);
}
