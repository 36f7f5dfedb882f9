//! Download through the export sink.

mod common;

use kittest::Queryable;
use qrstudio_business::EXPORT_FILE_NAME;
use qrstudio_ui::QrStudioApp;
use qrstudio_ui::state::{ExportMessage, State};

use crate::common::{FailingSink, RecordingSink, edit, harness, wait_for_render};

#[tokio::test(flavor = "multi_thread")]
async fn download_saves_qrcode_png() {
    let sink = RecordingSink::default();
    let saved = sink.saved.clone();
    let app = QrStudioApp::builder()
        .state(State::test())
        .export_sink(Box::new(sink))
        .build();
    let mut harness = harness(app);

    edit(&mut harness, |p| {
        p.text = "https://example.com".to_owned();
        p.output_dimension = 384;
    });
    wait_for_render(&mut harness).await;

    harness.get_by_label("Download PNG").click();
    harness.step();
    harness.step();

    let saved = saved.lock().expect("lock");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].file_name, EXPORT_FILE_NAME);
    let decoded = image::load_from_memory(&saved[0].bytes).expect("png decodes");
    assert_eq!((decoded.width(), decoded.height()), (384, 384));

    assert_eq!(
        harness.state().state().export_message,
        Some(ExportMessage::Saved("memory/qrcode.png".to_owned()))
    );
    assert!(harness.query_by_label_contains("Saved to").is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_save_is_reported() {
    let app = QrStudioApp::builder()
        .state(State::test())
        .export_sink(Box::new(FailingSink))
        .build();
    let mut harness = harness(app);

    edit(&mut harness, |p| p.text = "nowhere to go".to_owned());
    wait_for_render(&mut harness).await;

    harness.get_by_label("Download PNG").click();
    harness.step();
    harness.step();

    assert!(
        harness
            .query_by_label_contains("Export failed: ")
            .is_some()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn export_message_clears_on_edit() {
    let app = QrStudioApp::builder()
        .state(State::test())
        .export_sink(Box::new(RecordingSink::default()))
        .build();
    let mut harness = harness(app);
    edit(&mut harness, |p| p.text = "first".to_owned());
    wait_for_render(&mut harness).await;
    harness.get_by_label("Download PNG").click();
    harness.step();
    harness.step();
    assert!(harness.state().state().export_message.is_some());

    edit(&mut harness, |p| p.text = "second".to_owned());
    harness.step();

    assert!(harness.state().state().export_message.is_none());
    assert!(harness.query_by_label_contains("Saved to").is_none());
}
