use crudgen::{
    ErrorCode, FileAction, Filesystem, GenerateOptions, Generator, GeneratorError,
    MemoryFilesystem, Result,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const ROLES_SQL: &str = "CREATE TABLE roles (
    role_id INT PRIMARY KEY AUTO_INCREMENT,
    name VARCHAR(50) NOT NULL COMMENT '角色名称',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);";

fn setup() -> (Generator, Arc<MemoryFilesystem>) {
    let fs = Arc::new(MemoryFilesystem::new());
    let generator = Generator::new("/app/src", Arc::clone(&fs) as Arc<dyn Filesystem>);
    (generator, fs)
}

#[test]
fn preview_matches_generate_output() {
    let (generator, fs) = setup();

    let preview = generator.preview_sql(ROLES_SQL, "role").unwrap();
    assert!(fs.files().is_empty(), "preview must not write");

    generator
        .generate(ROLES_SQL, "role", GenerateOptions::default())
        .unwrap();

    let mut expected: Vec<(PathBuf, String)> = preview
        .files
        .iter()
        .map(|file| (file.path.clone(), file.content.clone()))
        .collect();
    expected.sort();
    assert_eq!(fs.files(), expected);
}

#[test]
fn preview_carries_the_parsed_table() {
    let (generator, _) = setup();
    let preview = generator.preview_sql(ROLES_SQL, "role").unwrap();

    assert_eq!(preview.table.primary_key, "role_id");
    assert_eq!(preview.files.len(), 5);
    assert!(preview
        .files
        .iter()
        .all(|file| file.action == FileAction::Create));
}

#[test]
fn generate_reports_every_written_path() {
    let (generator, _) = setup();
    let report = generator
        .generate(ROLES_SQL, "role", GenerateOptions::default())
        .unwrap();

    assert_eq!(report.written.len(), 5);
    assert!(report.skipped.is_empty());
    assert!(report
        .written
        .contains(&PathBuf::from("/app/src/controllers/role_controller.rs")));
    assert!(report
        .written
        .contains(&PathBuf::from("/app/src/routes/role.fragment")));
    assert!(report
        .written
        .contains(&PathBuf::from("/app/src/models/roles.rs")));
}

#[test]
fn second_generate_without_overwrite_conflicts() {
    let (generator, fs) = setup();
    generator
        .generate(ROLES_SQL, "role", GenerateOptions::default())
        .unwrap();
    let before = fs.files();

    let err = generator
        .generate(ROLES_SQL, "role", GenerateOptions::default())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::TargetExists);
    assert_eq!(err.code().as_str(), "GEN-FILE-001");
    assert_eq!(fs.files(), before, "conflict must leave files untouched");
}

#[test]
fn overwrite_skips_identical_and_replaces_changed() {
    let (generator, fs) = setup();
    generator
        .generate(ROLES_SQL, "role", GenerateOptions::default())
        .unwrap();

    // Simulate a hand-edited controller.
    let controller = PathBuf::from("/app/src/controllers/role_controller.rs");
    fs.seed(controller.clone(), "// edited by hand\n");

    let report = generator
        .generate(ROLES_SQL, "role", GenerateOptions { overwrite: true })
        .unwrap();

    assert_eq!(report.written, vec![controller]);
    assert_eq!(report.skipped.len(), 4);
}

#[test]
fn conflict_on_one_target_writes_nothing() {
    let (generator, fs) = setup();
    fs.seed("/app/src/models/roles.rs", "// pre-existing model\n");

    let err = generator
        .generate(ROLES_SQL, "role", GenerateOptions::default())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::TargetExists);

    assert_eq!(
        fs.files(),
        vec![(
            PathBuf::from("/app/src/models/roles.rs"),
            "// pre-existing model\n".to_string()
        )],
        "all-or-nothing: the conflicting call must not scaffold anything"
    );
}

#[test]
fn different_modules_do_not_interfere() {
    let (generator, _) = setup();
    generator
        .generate(ROLES_SQL, "role", GenerateOptions::default())
        .unwrap();

    let members_sql = "CREATE TABLE members (
        id INT PRIMARY KEY AUTO_INCREMENT,
        email VARCHAR(120) NOT NULL
    )";
    let report = generator
        .generate(members_sql, "member", GenerateOptions::default())
        .unwrap();
    assert_eq!(report.written.len(), 5);
}

#[test]
fn parse_failures_surface_with_sql_codes() {
    let (generator, fs) = setup();

    let err = generator.preview_sql("", "role").unwrap_err();
    assert_eq!(err.code(), ErrorCode::EmptySql);

    let err = generator
        .generate("CREATE TABLE t (a INT, b INT)", "thing", GenerateOptions::default())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoPrimaryKey);
    assert!(fs.files().is_empty());
}

#[test]
fn invalid_module_name_is_a_path_error() {
    let (generator, _) = setup();
    let err = generator.preview_sql(ROLES_SQL, "../escape").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidModuleName);
    assert_eq!(err.code().as_str(), "GEN-PATH-001");
}

/// Delegates to a [`MemoryFilesystem`] but fails every write to one target
/// path, and records which directories rollback asks to remove.
struct FailingFilesystem {
    inner: MemoryFilesystem,
    fail_on: PathBuf,
    removed_dirs: Mutex<Vec<PathBuf>>,
}

impl FailingFilesystem {
    fn new(fail_on: impl Into<PathBuf>) -> Self {
        Self {
            inner: MemoryFilesystem::new(),
            fail_on: fail_on.into(),
            removed_dirs: Mutex::new(Vec::new()),
        }
    }

    fn removed_dirs(&self) -> Vec<PathBuf> {
        self.removed_dirs.lock().unwrap().clone()
    }
}

impl Filesystem for FailingFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.inner.read(path)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if path == self.fail_on {
            return Err(GeneratorError::with_message(
                ErrorCode::WriteFailed,
                format!("disk full writing `{}`", path.display()),
            ));
        }
        self.inner.write(path, content)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.inner.remove(path)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        self.removed_dirs.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

#[test]
fn midway_write_failure_rolls_back_everything() {
    // The model template renders after routes, controller, and service, so
    // failing on it leaves three committed writes to undo.
    let fs = Arc::new(FailingFilesystem::new("/app/src/models/roles.rs"));
    let generator = Generator::new("/app/src", Arc::clone(&fs) as Arc<dyn Filesystem>);

    let err = generator
        .generate(ROLES_SQL, "role", GenerateOptions::default())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::WriteFailed);
    assert_eq!(err.code().as_str(), "GEN-FILE-002");

    assert_eq!(
        fs.inner.files(),
        vec![],
        "a failed generate must leave the filesystem as it was"
    );
    assert!(
        fs.removed_dirs()
            .contains(&PathBuf::from("/app/src/controllers")),
        "directories created for rolled-back files are cleaned up"
    );
    assert!(generator.preview_sql(ROLES_SQL, "role").is_ok());
}

#[test]
fn midway_write_failure_restores_prior_content() {
    let fs = Arc::new(FailingFilesystem::new("/app/src/models/roles.rs"));
    let generator = Generator::new("/app/src", Arc::clone(&fs) as Arc<dyn Filesystem>);

    let old_controller = "// hand-edited controller\n";
    fs.inner
        .seed("/app/src/controllers/role_controller.rs", old_controller);

    let err = generator
        .generate(ROLES_SQL, "role", GenerateOptions { overwrite: true })
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::WriteFailed);

    assert_eq!(
        fs.inner.files(),
        vec![(
            PathBuf::from("/app/src/controllers/role_controller.rs"),
            old_controller.to_string()
        )],
        "overwritten targets are restored, created ones removed"
    );
}

#[test]
fn error_log_data_round_trip() {
    let (generator, _) = setup();
    let err = generator
        .preview_sql("", "role")
        .unwrap_err()
        .with_track("req-42");

    let log = err.to_log_data();
    assert_eq!(log.name, "GeneratorError");
    assert_eq!(log.code, "GEN-SQL-001");
    assert_eq!(log.track.as_deref(), Some("req-42"));
}
