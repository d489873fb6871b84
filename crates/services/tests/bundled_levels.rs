use std::path::PathBuf;
use std::sync::Arc;

use escape_core::model::Language;
use services::{LevelService, SolutionService};
use storage::LevelDirectory;

fn bundled() -> SolutionService {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../levels");
    SolutionService::new(LevelService::new(Arc::new(LevelDirectory::new(dir))))
}

#[tokio::test]
async fn every_track_ships_levels() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../levels");
    let levels = LevelService::new(Arc::new(LevelDirectory::new(dir)));
    for (language, count) in levels.level_counts().await {
        assert_eq!(count, 3, "{language} should ship three levels");
    }
}

#[tokio::test]
async fn bundled_levels_are_solvable() {
    let solutions = bundled();
    let cases: &[(Language, usize, &str)] = &[
        (Language::Html, 0, "<p>Welcome to the escape room</p>"),
        (Language::Html, 1, r#"<img src="door.png" alt="door">"#),
        (Language::Html, 2, r#"<a href="/exit">Exit</a>"#),
        (Language::Css, 0, ".warning { color: red; }"),
        (Language::Css, 1, ".exit { display: flex; justify-content: center; }"),
        (Language::Css, 2, ".door { visibility: hidden; }"),
        (Language::JavaScript, 0, "if (code === 0) { openDoor(); }"),
        (Language::JavaScript, 1, "function key(a, b) { return a * b; }"),
        (Language::JavaScript, 2, "let tries = 0;\ntries++;"),
        (Language::Python, 0, "for key in keys:\n    print(key)"),
        (Language::Python, 1, "def unlock():\n    return True"),
        (Language::Python, 2, "print(\"Room \" + str(3))"),
        (Language::Sql, 0, "SELECT * FROM prisoners;"),
        (Language::Sql, 1, "SELECT name FROM prisoners WHERE cell = 404;"),
        (Language::Sql, 2, "SELECT * FROM attempts ORDER BY at DESC;"),
        (Language::Networking, 0, "listen 443;"),
        (Language::Networking, 1, "192.168.1.1"),
        (Language::Networking, 2, "404"),
    ];
    for (language, index, solution) in cases {
        let verdict = solutions.submit(*language, *index, solution).await.unwrap();
        assert!(verdict.correct, "{language} level {index} rejected {solution:?}");
    }
}

#[tokio::test]
async fn bundled_starting_code_is_rejected() {
    let solutions = bundled();
    let verdict = solutions
        .submit(Language::Python, 1, "def unlock():\nreturn True")
        .await
        .unwrap();
    assert!(!verdict.correct);

    let verdict = solutions
        .submit(Language::JavaScript, 2, "const tries = 0;")
        .await
        .unwrap();
    assert_eq!(verdict.message, "The counter still cannot change.");
}
