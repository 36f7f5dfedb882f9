//! Logo drop, picker and removal.

mod common;

use std::sync::Arc;

use kittest::Queryable;
use qrstudio_ui::QrStudioApp;
use qrstudio_ui::state::State;

use crate::common::{StubPicker, default_harness, harness, params, png_logo, wait_for_render};

fn drop_file(harness: &mut common::AppHarness, name: &str, mime: &str, bytes: Vec<u8>) {
    harness.input_mut().dropped_files.push(egui::DroppedFile {
        name: name.to_owned(),
        mime: mime.to_owned(),
        bytes: Some(Arc::from(bytes)),
        ..Default::default()
    });
    harness.step();
    harness.step();
}

#[tokio::test(flavor = "multi_thread")]
async fn dropped_image_becomes_the_logo() {
    let mut harness = default_harness();
    harness.step();
    assert!(harness.query_by_label("Drop an image here").is_some());

    drop_file(&mut harness, "brand.png", "image/png", png_logo());

    assert!(params(&harness).has_logo());
    assert!(harness.query_by_label("Logo: brand.png").is_some());
    assert!(harness.query_by_label("Logo thumbnail").is_some());
    assert!(harness.query_by_label("Drop an image here").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn dropped_non_image_is_ignored() {
    let mut harness = default_harness();
    harness.step();

    drop_file(&mut harness, "notes.txt", "text/plain", b"hello".to_vec());
    drop_file(&mut harness, "archive.zip", "", b"PK\x03\x04".to_vec());

    assert!(!params(&harness).has_logo());
    assert!(harness.query_by_label("Drop an image here").is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_logo_restores_the_drop_zone() {
    let mut harness = default_harness();
    drop_file(&mut harness, "brand.png", "image/png", png_logo());

    harness.get_by_label("Remove logo").click();
    harness.step();
    harness.step();

    assert!(!params(&harness).has_logo());
    assert!(harness.query_by_label("Drop an image here").is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn shortcut_opens_the_picker() {
    let picker = StubPicker::default();
    let requests = Arc::clone(&picker.requests);
    let app = QrStudioApp::builder()
        .state(State::test())
        .file_picker(Box::new(picker))
        .build();
    let mut harness = harness(app);
    harness.step();

    harness.key_press_modifiers(egui::Modifiers::COMMAND, egui::Key::O);
    harness.step();

    assert_eq!(*requests.lock().expect("lock"), 1);
    assert!(params(&harness).has_logo());
}

#[tokio::test(flavor = "multi_thread")]
async fn choose_file_button_opens_the_picker() {
    let picker = StubPicker::default();
    let requests = Arc::clone(&picker.requests);
    let app = QrStudioApp::builder()
        .state(State::test())
        .file_picker(Box::new(picker))
        .build();
    let mut harness = harness(app);
    harness.step();

    harness.get_by_label("Choose file…").click();
    harness.step();
    harness.step();

    assert_eq!(*requests.lock().expect("lock"), 1);
    assert!(harness.query_by_label("Logo: brand.png").is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn logo_renders_into_the_preview() {
    let mut harness = default_harness();
    drop_file(&mut harness, "brand.png", "image/png", png_logo());
    common::edit(&mut harness, |p| p.text = "with logo".to_owned());

    wait_for_render(&mut harness).await;

    assert!(harness.query_by_label("Download PNG").is_some());
    let logo = params(&harness).logo.clone().expect("logo kept");
    assert_eq!(logo.live_handles(), 0);
}
