use super::*;

fn settings_in(root: &Path) -> Settings {
    Settings {
        games_path: root.join("games"),
        stick_games_path: PathBuf::from("/mnt/stick/game"),
        db_path: root.join("db"),
        db_backup_path: root.join("db").join("backup"),
        db_common_name: "common.db".to_string(),
        db_games_name: "games.db".to_string(),
    }
}

fn write_sources(settings: &Settings) {
    fs::create_dir_all(&settings.db_path).unwrap();
    fs::write(settings.common_db_path(), b"common-v1").unwrap();
    fs::write(settings.games_db_path(), b"games-v1-longer").unwrap();
}

#[test]
fn creates_directory_and_copies_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    write_sources(&settings);

    let copied = BackupSet::from_settings(&settings).run().unwrap();
    assert_eq!(copied, 9 + 15);
    assert_eq!(fs::read(settings.common_backup_path()).unwrap(), b"common-v1");
    assert_eq!(
        fs::read(settings.games_backup_path()).unwrap(),
        b"games-v1-longer"
    );
}

#[test]
fn previous_backups_are_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    write_sources(&settings);
    fs::create_dir_all(&settings.db_backup_path).unwrap();
    fs::write(
        settings.games_backup_path(),
        b"stale backup that is much longer than the source",
    )
    .unwrap();

    BackupSet::from_settings(&settings).run().unwrap();
    assert_eq!(
        fs::read(settings.games_backup_path()).unwrap(),
        b"games-v1-longer"
    );
}

#[test]
fn missing_source_aborts_without_touching_backups() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    fs::create_dir_all(&settings.db_path).unwrap();
    fs::write(settings.common_db_path(), b"common-v1").unwrap();
    fs::create_dir_all(&settings.db_backup_path).unwrap();
    fs::write(settings.common_backup_path(), b"old").unwrap();

    let err = BackupSet::from_settings(&settings).run().unwrap_err();
    assert!(matches!(err, BackupError::MissingSource(p) if p == settings.games_db_path()));
    assert_eq!(fs::read(settings.common_backup_path()).unwrap(), b"old");
}

#[test]
fn backup_dir_equal_to_db_dir_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings_in(dir.path());
    settings.db_backup_path = settings.db_path.clone();
    write_sources(&settings);

    let err = BackupSet::from_settings(&settings).run().unwrap_err();
    assert!(matches!(err, BackupError::SameFile(_)));
    assert_eq!(fs::read(settings.common_db_path()).unwrap(), b"common-v1");
}
