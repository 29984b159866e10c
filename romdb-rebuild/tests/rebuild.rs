use std::fs;
use std::path::Path;

use romdb_core::Console;
use romdb_db::{CatalogDb, SchemaError, create_database, open_database};
use romdb_lib::{NormalizeError, Settings};
use romdb_rebuild::{RebuildError, RebuildOptions, SilentProgress, rebuild};
use rusqlite::Connection;
use tempfile::TempDir;

/// A games root with every console folder, both databases and a stick root.
struct Fixture {
    _dir: TempDir,
    settings: Settings,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let settings = Settings {
            games_path: root.join("games"),
            stick_games_path: root.join("stick").join("game"),
            db_path: root.join("db"),
            db_backup_path: root.join("backup"),
            db_common_name: "common.db".to_string(),
            db_games_name: "games.db".to_string(),
        };

        for &console in Console::all() {
            fs::create_dir_all(settings.console_dir(console)).unwrap();
        }
        fs::create_dir_all(&settings.db_path).unwrap();
        drop(create_database(&settings.games_db_path(), CatalogDb::Games).unwrap());
        drop(create_database(&settings.common_db_path(), CatalogDb::Common).unwrap());

        Self {
            _dir: dir,
            settings,
        }
    }

    fn add(&self, console: Console, filename: &str) {
        fs::write(self.settings.console_dir(console).join(filename), b"rom").unwrap();
    }

    fn games(&self) -> Connection {
        open_database(&self.settings.games_db_path()).unwrap()
    }

    fn common(&self) -> Connection {
        open_database(&self.settings.common_db_path()).unwrap()
    }

    fn run(&self) -> Result<romdb_rebuild::RebuildSummary, RebuildError> {
        rebuild(&self.settings, &RebuildOptions::default(), &SilentProgress)
    }

    fn stick_dir(&self, console: Console) -> String {
        self.settings
            .stick_console_dir(console)
            .to_string_lossy()
            .into_owned()
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn titles(conn: &Connection) -> Vec<(i64, String)> {
    let mut stmt = conn
        .prepare("SELECT en_id, en_title FROM tbl_en ORDER BY en_id")
        .unwrap();
    stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn seed_stale_rows(fx: &Fixture) {
    fx.games()
        .execute_batch(
            "INSERT INTO tbl_en (en_id, en_title) VALUES (99, 'Stale');
             INSERT INTO tbl_total (ID, total) VALUES (99, 99);",
        )
        .unwrap();
    fx.common()
        .execute_batch("INSERT INTO GameInfo (gameid, info) VALUES (99, 'stale');")
        .unwrap();
}

#[test]
fn single_nes_game_is_renamed_and_cataloged() {
    let fx = Fixture::new();
    fx.add(Console::Nes, "Zelda (U) [!].nes");

    let summary = fx.run().unwrap();
    assert_eq!(summary.total_games, 1);
    assert_eq!(
        file_names(&fx.settings.console_dir(Console::Nes)),
        vec!["Zelda.nes"]
    );

    let conn = fx.games();
    assert_eq!(titles(&conn), vec![(1, "Zelda".to_string())]);
    let (suffix, class_type, game_type, hard, timer): (String, i64, i64, i64, String) = conn
        .query_row(
            "SELECT suffix, class_type, game_type, hard, timer FROM tbl_game WHERE gameid = 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
        )
        .unwrap();
    assert_eq!(suffix, ".nes");
    assert_eq!((class_type, game_type, hard), (1, 1, 0));
    assert_eq!(timer, fx.stick_dir(Console::Nes));

    let path: String = conn
        .query_row("SELECT path FROM tbl_path WHERE path_id = 1", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(path, fx.settings.stick_games_path.to_string_lossy());
}

#[test]
fn identifiers_run_across_consoles_in_order() {
    let fx = Fixture::new();
    fx.add(Console::Gba, "Metroid Fusion.gba");
    fx.add(Console::Gba, "Advance Wars.gba");
    fx.add(Console::Nes, "Contra.nes");
    fx.add(Console::Nes, "Battletoads.nes");
    fx.add(Console::MegaDrive, "Sonic.md");
    fx.add(Console::MegaDrive, "Columns.bin");

    let summary = fx.run().unwrap();
    assert_eq!(summary.total_games, 6);

    let conn = fx.games();
    assert_eq!(
        titles(&conn),
        vec![
            (1, "Battletoads".to_string()),
            (2, "Contra".to_string()),
            (3, "Columns".to_string()),
            (4, "Sonic".to_string()),
            (5, "Advance Wars".to_string()),
            (6, "Metroid Fusion".to_string()),
        ]
    );

    let (id, total): (i64, i64) = conn
        .query_row("SELECT ID, total FROM tbl_total", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!((id, total), (6, 6));

    let gba_codes: (i64, i64) = conn
        .query_row(
            "SELECT class_type, game_type FROM tbl_game WHERE gameid = 5",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(gba_codes, (3, 7));
}

#[test]
fn rebuild_twice_gives_same_catalog() {
    let fx = Fixture::new();
    fx.add(Console::Sfc, "Super_Metroid (JU) [!].smc");
    fx.add(Console::GameBoy, "Tetris (W).gb");

    fx.run().unwrap();
    let first = titles(&fx.games());

    let second_summary = fx.run().unwrap();
    assert_eq!(titles(&fx.games()), first);
    assert_eq!(second_summary.total_games, 2);
    assert!(second_summary.consoles.iter().all(|c| c.renamed == 0));
    assert_eq!(count(&fx.games(), "tbl_total"), 1);
    assert_eq!(count(&fx.games(), "tbl_path"), 1);
}

#[test]
fn backups_match_databases_before_the_run() {
    let fx = Fixture::new();
    seed_stale_rows(&fx);
    fx.add(Console::Nes, "Zelda.nes");

    let games_before = fs::read(fx.settings.games_db_path()).unwrap();
    let common_before = fs::read(fx.settings.common_db_path()).unwrap();

    fx.run().unwrap();

    assert_eq!(
        fs::read(fx.settings.games_backup_path()).unwrap(),
        games_before
    );
    assert_eq!(
        fs::read(fx.settings.common_backup_path()).unwrap(),
        common_before
    );
}

#[test]
fn stale_rows_are_cleared_from_both_databases() {
    let fx = Fixture::new();
    seed_stale_rows(&fx);
    fx.common()
        .execute_batch("INSERT INTO History (gameid, played_at) VALUES (1, 'today');")
        .unwrap();

    let summary = fx.run().unwrap();
    assert_eq!(summary.total_games, 0);
    assert!(summary.rows_cleared >= 4);

    let games = fx.games();
    assert!(titles(&games).is_empty());
    let (id, total): (i64, i64) = games
        .query_row("SELECT ID, total FROM tbl_total", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!((id, total), (0, 0));

    let common = fx.common();
    assert_eq!(count(&common, "GameInfo"), 0);
    assert_eq!(count(&common, "History"), 0);
}

#[test]
fn files_with_other_extensions_are_not_cataloged() {
    let fx = Fixture::new();
    fx.add(Console::MegaDrive, "game.iso");
    fx.add(Console::Ps1, "readme");

    let summary = fx.run().unwrap();
    assert_eq!(summary.total_games, 0);
    let ps1 = summary
        .consoles
        .iter()
        .find(|c| c.console == Console::Ps1)
        .unwrap();
    assert_eq!(ps1.skipped, 1);
}

#[test]
fn missing_console_folder_aborts_before_backup() {
    let fx = Fixture::new();
    seed_stale_rows(&fx);
    fx.add(Console::Nes, "Zelda (U).nes");
    fs::remove_dir(fx.settings.console_dir(Console::Ps1)).unwrap();

    let err = fx.run().unwrap_err();
    assert!(matches!(
        err,
        RebuildError::Normalize(NormalizeError::MissingDirectory { .. })
    ));

    assert!(!fx.settings.db_backup_path.exists());
    assert_eq!(titles(&fx.games()), vec![(99, "Stale".to_string())]);
    assert_eq!(
        file_names(&fx.settings.console_dir(Console::Nes)),
        vec!["Zelda (U).nes"]
    );
}

#[test]
fn collision_aborts_before_any_rename() {
    let fx = Fixture::new();
    fx.add(Console::Nes, "Contra (U).nes");
    fx.add(Console::Gba, "Zelda (U).gba");
    fx.add(Console::Gba, "Zelda (E).gba");

    let err = fx.run().unwrap_err();
    assert!(matches!(
        err,
        RebuildError::Normalize(NormalizeError::Collision { .. })
    ));
    assert_eq!(
        file_names(&fx.settings.console_dir(Console::Nes)),
        vec!["Contra (U).nes"]
    );
    assert!(!fx.settings.db_backup_path.exists());
}

#[test]
fn missing_database_aborts() {
    let fx = Fixture::new();
    fs::remove_file(fx.settings.common_db_path()).unwrap();

    let err = fx.run().unwrap_err();
    assert!(matches!(err, RebuildError::Schema(SchemaError::NotFound(_))));
    assert!(!fx.settings.common_db_path().exists());
    assert!(!fx.settings.db_backup_path.exists());
}

#[test]
fn failure_mid_run_rolls_back_both_databases() {
    let fx = Fixture::new();
    seed_stale_rows(&fx);
    fx.games()
        .execute_batch(
            "CREATE TRIGGER reject_boom BEFORE INSERT ON tbl_game
             WHEN NEW.game = 'Boom'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();
    fx.add(Console::Nes, "Alpha.nes");
    fx.add(Console::Gba, "Boom.gba");

    let err = fx.run().unwrap_err();
    assert!(matches!(err, RebuildError::Db(_)));

    assert_eq!(titles(&fx.games()), vec![(99, "Stale".to_string())]);
    assert_eq!(count(&fx.games(), "tbl_game"), 0);
    assert_eq!(count(&fx.common(), "GameInfo"), 1);
    // The backup was taken before the failure.
    assert!(fx.settings.games_backup_path().exists());
}

#[test]
fn dry_run_touches_nothing() {
    let fx = Fixture::new();
    seed_stale_rows(&fx);
    fx.add(Console::Nes, "Zelda (U) [!].nes");
    fx.add(Console::Ps1, "Crash_Bandicoot (USA).iso");

    let options = RebuildOptions { dry_run: true };
    let summary = rebuild(&fx.settings, &options, &SilentProgress).unwrap();
    assert!(summary.dry_run);
    assert_eq!(summary.total_games, 2);

    let ps1 = &summary.consoles[Console::all().len() - 1];
    assert_eq!(ps1.console, Console::Ps1);
    assert_eq!(ps1.games[0].name, "Crash Bandicoot");
    assert_eq!(ps1.games[0].id.0, 2);

    assert_eq!(
        file_names(&fx.settings.console_dir(Console::Nes)),
        vec!["Zelda (U) [!].nes"]
    );
    assert_eq!(titles(&fx.games()), vec![(99, "Stale".to_string())]);
    assert!(!fx.settings.db_backup_path.exists());
}

#[test]
fn skipped_files_are_left_out_of_the_catalog() {
    let fx = Fixture::new();
    fx.add(Console::Nes, "(USA).nes");
    fx.add(Console::Nes, "Zelda (U).nes");

    let summary = fx.run().unwrap();
    assert_eq!(summary.total_games, 1);
    assert_eq!(summary.consoles[0].skipped, 1);
    assert_eq!(titles(&fx.games()), vec![(1, "Zelda".to_string())]);
    assert_eq!(count(&fx.games(), "tbl_game"), 1);
    assert_eq!(
        file_names(&fx.settings.console_dir(Console::Nes)),
        vec!["(USA).nes", "Zelda.nes"]
    );
}

#[cfg(unix)]
#[test]
fn non_utf8_names_are_left_out_of_the_catalog() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fx = Fixture::new();
    let name = OsStr::from_bytes(b"Zel\xffda (U).nes");
    fs::write(fx.settings.console_dir(Console::Nes).join(name), b"rom").unwrap();
    fx.add(Console::Nes, "(USA).nes");

    let summary = fx.run().unwrap();
    assert_eq!(summary.total_games, 0);
    assert_eq!(summary.consoles[0].skipped, 2);
    assert_eq!(count(&fx.games(), "tbl_game"), 0);
    assert_eq!(count(&fx.games(), "tbl_en"), 0);
    assert!(fx.settings.console_dir(Console::Nes).join(name).exists());
}
