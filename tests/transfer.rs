mod common;

use std::{
    io,
    time::{Duration, Instant},
};

use tempfile::tempdir;
use winshare::{
    testing::{Fault, FakeSmbServer, Operation},
    DeliveryOptions, Error, FolderStatus, FolderStrategy, SessionError,
};

#[tokio::test]
async fn test_file_retrieval() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    server.path("TestShare", "/TestFilePath").write_text("Test Content");

    let output = dir.path().join("local_file");
    connection.get("TestShare", "/TestFilePath", &output).await.unwrap();

    assert_eq!(std::fs::read_to_string(output).unwrap(), "Test Content");
}

#[tokio::test]
async fn test_file_retrieval_overwrites_local_file() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let output = common::local_file(&dir, "local_file", b"previous and longer content");
    server.path("TestShare", "/TestFilePath").write_bytes(&b"\x1f\x8b\x08"[..]);

    connection.get("TestShare", "/TestFilePath", &output).await.unwrap();

    assert_eq!(std::fs::read(output).unwrap(), b"\x1f\x8b\x08");
}

#[tokio::test]
async fn test_expected_retrieval_is_served_once() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    server.expect_retrieval("TestShare", "/TestFilePath", "Expected");

    let output = dir.path().join("local_file");
    connection.get("TestShare", "/TestFilePath", &output).await.unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "Expected");
    assert!(server.reset().is_ok());
}

#[tokio::test]
async fn test_operation_failure_during_file_retrieval() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();

    let error = connection
        .get("TestShare", "/TestFilePath", dir.path().join("local_file"))
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Retrieval { .. }));
    assert_eq!(
        error.to_string(),
        r"Unable to retrieve \\TestComputer\TestShare/TestFilePath file"
    );
}

#[tokio::test]
async fn test_local_failure_during_file_retrieval_is_not_wrapped() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    server.path("TestShare", "/TestFilePath").write_text("Test Content");

    let error = connection
        .get("TestShare", "/TestFilePath", dir.path().join("missing/local_file"))
        .await
        .unwrap_err();

    assert!(error.is_local());
    assert!(server.calls_of(Operation::RetrieveFile).is_empty());
}

#[tokio::test]
async fn test_file_move() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"Test Content Move");

    connection.move_file("TestShare", "/TestFilePath", &input).await.unwrap();

    assert_eq!(
        server.path("TestShare", "/TestFilePath").read_text().as_deref(),
        Some("Test Content Move")
    );
    assert!(!server.path("TestShare", "/TestFilePath.tmp").exists());
    assert!(!input.exists());

    let stores = server.calls_of(Operation::StoreFile);
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].path, "/TestFilePath.tmp");
    let renames = server.calls_of(Operation::Rename);
    assert_eq!(renames.len(), 1);
    assert_eq!(renames[0].destination.as_deref(), Some("/TestFilePath"));
}

#[tokio::test]
async fn test_file_move_then_retrieval() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"\x00\xffbinary");

    connection.move_file("TestShare", "TestFilePath", &input).await.unwrap();
    let output = dir.path().join("local_file_retrieved");
    connection.get("TestShare", "TestFilePath", &output).await.unwrap();

    assert_eq!(std::fs::read(output).unwrap(), b"\x00\xffbinary");
}

#[tokio::test]
async fn test_file_move_without_temp_suffix() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"Direct");
    let options = DeliveryOptions::default()
        .with_temp_suffix("")
        .with_settle_delay(Duration::ZERO);

    connection
        .move_file_with("TestShare", "/TestFilePath", &input, &options)
        .await
        .unwrap();

    assert_eq!(
        server.path("TestShare", "/TestFilePath").read_text().as_deref(),
        Some("Direct")
    );
    assert_eq!(server.calls_of(Operation::StoreFile)[0].path, "/TestFilePath");
    assert!(server.calls_of(Operation::Rename).is_empty());
    assert!(!input.exists());
}

#[tokio::test]
async fn test_file_move_with_folder_creation() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"X");

    connection
        .move_file("TestShare", "/A/B/C/target", &input)
        .await
        .unwrap();

    for folder in ["/A", "/A/B", "/A/B/C"] {
        assert!(server.path("TestShare", folder).is_dir(), "{folder} missing");
    }
    assert_eq!(server.path("TestShare", "/").children(), ["A"]);
    assert_eq!(server.path("TestShare", "/A").children(), ["B"]);
    assert_eq!(server.path("TestShare", "/A/B/C").children(), ["target"]);
    assert_eq!(
        server.path("TestShare", "/A/B/C/target").read_text().as_deref(),
        Some("X")
    );
    assert!(!input.exists());
}

#[tokio::test]
async fn test_file_move_only_creates_missing_folders() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"Test Content Move");
    server.path("TestShare", "/Folder1/Folder2").mkdir();

    connection
        .move_file("TestShare", "/Folder1/Folder2/Folder3/TestFilePath", &input)
        .await
        .unwrap();

    let created = server.calls_of(Operation::CreateDirectory);
    assert_eq!(created.len(), 1);
    assert!(created[0].path.starts_with("/Folder1/Folder2/Folder3_"));

    let folder_renames: Vec<_> = server
        .calls_of(Operation::Rename)
        .into_iter()
        .filter(|call| call.destination.as_deref() == Some("/Folder1/Folder2/Folder3"))
        .collect();
    assert_eq!(folder_renames.len(), 1);
    assert_eq!(
        server
            .path("TestShare", "/Folder1/Folder2/Folder3/TestFilePath")
            .read_text()
            .as_deref(),
        Some("Test Content Move")
    );
}

#[tokio::test]
async fn test_file_move_into_existing_folder_creates_nothing() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"content");
    server.path("TestShare", "/A/B").mkdir();

    connection.move_file("TestShare", "/A/B/file", &input).await.unwrap();

    assert!(server.calls_of(Operation::CreateDirectory).is_empty());
    assert_eq!(server.calls_of(Operation::Rename).len(), 1);
}

#[tokio::test]
async fn test_file_move_with_last_folder_creation_failure() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"Test Content Move");
    server.path("TestShare", "/Folder1/Folder2").mkdir();
    server.fail(
        Operation::CreateDirectory,
        Fault::operation_failure("Unable to create directory"),
    );

    let error = connection
        .move_file("TestShare", "/Folder1/Folder2/Folder3/TestFilePath", &input)
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Write { .. }));
    assert_eq!(
        error.to_string(),
        r"Unable to write \\TestComputer\TestShare/Folder1/Folder2/Folder3/TestFilePath.tmp"
    );
    assert!(input.exists());
}

#[tokio::test]
async fn test_store_file_operation_failure_during_file_move() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"Test Content Move");
    server.fail(
        Operation::StoreFile,
        Fault::operation_failure("Mock for storeFile failure."),
    );

    let error = connection
        .move_file("TestShare", "/TestFilePath", &input)
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        r"Unable to write \\TestComputer\TestShare/TestFilePath.tmp"
    );
    assert!(input.exists());
    assert!(server.calls_of(Operation::Rename).is_empty());
}

#[tokio::test]
async fn test_store_file_timeout_during_file_move() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"Test Content Move");
    server.set_store_delay(Duration::from_secs(5));
    let options = DeliveryOptions::default()
        .with_write_timeout(Duration::from_millis(50))
        .with_settle_delay(Duration::ZERO);

    let error = connection
        .move_file_with("TestShare", "/TestFilePath", &input, &options)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        Error::Write {
            source: SessionError::Timeout,
            ..
        }
    ));
    assert!(input.exists());
    assert!(!server.path("TestShare", "/TestFilePath.tmp").exists());
}

#[tokio::test]
async fn test_rename_operation_failure_during_file_move() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"Test Content Move");
    server.fail(
        Operation::Rename,
        Fault::operation_failure("Mock for rename failure."),
    );

    let error = connection
        .move_file("TestShare", "/TestFilePath", &input)
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Rename { .. }));
    assert_eq!(
        error.to_string(),
        r"Unable to rename temp file into \\TestComputer\TestShare/TestFilePath"
    );
    assert!(input.exists());
    assert_eq!(
        server.path("TestShare", "/TestFilePath.tmp").read_text().as_deref(),
        Some("Test Content Move")
    );
    assert!(!server.path("TestShare", "/TestFilePath").exists());
}

#[tokio::test]
async fn test_missing_local_file_during_file_move() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();

    let error = connection
        .move_file("TestShare", "/TestFilePath", dir.path().join("absent"))
        .await
        .unwrap_err();

    assert!(error.is_local());
    assert!(server.calls_of(Operation::StoreFile).is_empty());
}

#[tokio::test]
async fn test_target_name_never_shows_partial_file() {
    let server = FakeSmbServer::new();
    let writer = common::connection(&server).await;
    let reader = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"Test Content Move");
    server.set_store_delay(Duration::from_millis(300));

    let (moved, during) = tokio::join!(
        writer.move_file("TestShare", "/TestFilePath", &input),
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            reader.list_folder("TestShare", "", true, "*").await
        }
    );

    moved.unwrap();
    assert!(during.iter().all(|file| file.filename != "TestFilePath"));
    assert!(during.iter().all(|file| file.filename != "TestFilePath.tmp"));

    let after = reader.list_folder("TestShare", "", true, "*").await;
    let names: Vec<_> = after.iter().map(|file| file.filename.as_str()).collect();
    assert_eq!(names, ["TestFilePath"]);
}

#[tokio::test]
async fn test_settle_delay_after_folder_creation() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let options =
        DeliveryOptions::default().with_settle_delay(Duration::from_millis(200));

    let input = common::local_file(&dir, "first", b"1");
    let start = Instant::now();
    connection
        .move_file_with("TestShare", "/New/file", &input, &options)
        .await
        .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(200));

    let input = common::local_file(&dir, "second", b"2");
    let start = Instant::now();
    connection
        .move_file_with("TestShare", "/New/other", &input, &options)
        .await
        .unwrap();
    assert!(start.elapsed() < Duration::from_millis(200));
}

#[tokio::test]
async fn test_ensure_folder_statuses() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    server.path("TestShare", "/Existing").mkdir();

    assert_eq!(
        connection.ensure_folder("TestShare", "").await,
        FolderStatus::AlreadyExisted
    );
    assert_eq!(
        connection.ensure_folder("TestShare", "/Existing").await,
        FolderStatus::AlreadyExisted
    );
    assert_eq!(
        connection.ensure_folder("TestShare", r"\Existing\Sub\Deep").await,
        FolderStatus::Created
    );
    assert!(server.path("TestShare", "/Existing/Sub/Deep").is_dir());

    server.fail(Operation::Rename, Fault::operation_failure("denied"));
    assert_eq!(
        connection.ensure_folder("TestShare", "/Other").await,
        FolderStatus::Failed
    );
    assert_eq!(server.calls_of(Operation::Rename).len(), 4);
}

#[tokio::test]
async fn test_direct_folder_strategy() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"X");
    let options = DeliveryOptions::default()
        .with_folder_strategy(FolderStrategy::Direct)
        .with_settle_delay(Duration::ZERO);

    connection
        .move_file_with("TestShare", "/A/B/target", &input, &options)
        .await
        .unwrap();

    let created: Vec<_> = server
        .calls_of(Operation::CreateDirectory)
        .into_iter()
        .map(|call| call.path)
        .collect();
    assert_eq!(created, ["/A/B", "/A", "/A/B"]);
    assert_eq!(server.calls_of(Operation::Rename).len(), 1);
}

#[tokio::test]
async fn test_file_rename() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    server.path("TestShare", "/file_to_rename").write_text("Test Rename");

    connection
        .rename("TestShare", "/file_to_rename", "/file_new_name")
        .await
        .unwrap();

    assert!(!server.path("TestShare", "/file_to_rename").exists());
    assert_eq!(
        server.path("TestShare", "/file_new_name").read_text().as_deref(),
        Some("Test Rename")
    );
}

#[tokio::test]
async fn test_rename_operation_failure_during_file_rename() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    server.path("TestShare", "/file_to_rename").write_text("Test Rename");
    server.fail(
        Operation::Rename,
        Fault::operation_failure("Mock for rename failure."),
    );

    let error = connection
        .rename("TestShare", "/file_to_rename", "/file_new_name")
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        concat!(
            r"Unable to rename \\TestComputer\TestShare/file_to_rename",
            r" into \\TestComputer\TestShare/file_new_name"
        )
    );
}

#[tokio::test]
async fn test_file_rename_file_does_not_exist() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;

    let error = connection
        .rename("TestShare", "/file_to_rename_2", "/file_new_name")
        .await
        .unwrap_err();

    assert!(error.is_not_found());
    assert_eq!(
        error.to_string(),
        r"\\TestComputer\TestShare/file_to_rename_2 doesn't exist"
    );
    assert!(server.calls_of(Operation::Rename).is_empty());
}

#[tokio::test]
async fn test_local_stream_failure_during_file_retrieval() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    server.path("TestShare", "/TestFilePath").write_text("Test Content");
    server.fail(
        Operation::RetrieveFile,
        Fault::LocalIo(io::ErrorKind::WriteZero),
    );

    let error = connection
        .get("TestShare", "/TestFilePath", dir.path().join("local_file"))
        .await
        .unwrap_err();

    assert!(error.is_local());
    assert!(
        matches!(&error, Error::Io(cause) if cause.kind() == io::ErrorKind::WriteZero)
    );
}

#[tokio::test]
async fn test_local_stream_failure_during_file_move() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();
    let input = common::local_file(&dir, "local_file", b"Test Content Move");
    server.fail(
        Operation::StoreFile,
        Fault::LocalIo(io::ErrorKind::UnexpectedEof),
    );

    let error = connection
        .move_file("TestShare", "/TestFilePath", &input)
        .await
        .unwrap_err();

    assert!(
        matches!(&error, Error::Io(cause) if cause.kind() == io::ErrorKind::UnexpectedEof)
    );
    assert!(input.exists());
    assert!(server.calls_of(Operation::Rename).is_empty());
}

#[tokio::test]
async fn test_second_delivery_to_same_target_wins() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;
    let dir = tempdir().unwrap();

    let first = common::local_file(&dir, "first", b"1");
    connection
        .move_file("TestShare", "/out/report", &first)
        .await
        .unwrap();
    let second = common::local_file(&dir, "second", b"2");
    connection
        .move_file("TestShare", "/out/report", &second)
        .await
        .unwrap();

    assert_eq!(
        server.path("TestShare", "/out/report").read_text().as_deref(),
        Some("2")
    );
    assert!(!server.path("TestShare", "/out/report.tmp").exists());
    assert!(!second.exists());
}

#[tokio::test]
async fn test_ensure_folder_with_trailing_separator() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;

    assert_eq!(
        connection.ensure_folder("TestShare", "/A/B/").await,
        FolderStatus::Created
    );
    assert_eq!(
        connection.ensure_folder("TestShare", r"\C\D\").await,
        FolderStatus::Created
    );
    assert_eq!(
        connection.ensure_folder("TestShare", r"\A\B\").await,
        FolderStatus::AlreadyExisted
    );

    assert!(server.path("TestShare", "/A/B").is_dir());
    assert!(server.path("TestShare", "/C/D").is_dir());
    assert_eq!(server.path("TestShare", "/").children(), ["A", "C"]);
    assert_eq!(server.path("TestShare", "/A").children(), ["B"]);
    assert!(server.path("TestShare", "/A/B").children().is_empty());
}

#[tokio::test]
async fn test_ensure_folder_with_separators_only() {
    let server = FakeSmbServer::new();
    let connection = common::connection(&server).await;

    assert_eq!(
        connection.ensure_folder("TestShare", "//").await,
        FolderStatus::AlreadyExisted
    );
    assert_eq!(
        connection.ensure_folder("TestShare", r"\\").await,
        FolderStatus::AlreadyExisted
    );

    assert!(server.calls_of(Operation::CreateDirectory).is_empty());
    assert!(server.path("TestShare", "/").children().is_empty());
}
