//! Integration tests for conversion runs.

use std::sync::Arc;
use tempfile::TempDir;

use filemorph::config::OutputFormat;
use filemorph::convert::DocumentKind;
use filemorph::input::InputSpec;
use filemorph::report::LogEntry;

use crate::common::{
    StubOffice, folder_config, make_dir, pipeline_with, read_log, stub_pipeline, write_docx,
    write_pdf, write_png,
};

#[tokio::test]
async fn test_docx_folder_to_pdf_and_txt() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    let out = temp.path().join("out");

    write_docx(&src, "a.docx", &["Alpha one", "Alpha two"]);
    write_docx(&src, "b.docx", &["Beta"]);
    write_docx(&src, "c.docx", &[]);

    let config = folder_config(&src, &out, &[OutputFormat::Pdf, OutputFormat::Txt]);
    let report = stub_pipeline().run(&config).await.unwrap();

    assert_eq!(report.converted(), 6);
    assert!(!report.has_failures());

    for stem in ["a", "b", "c"] {
        assert!(out.join("pdf_output").join(format!("{stem}.pdf")).exists());
        assert!(out.join("txt_output").join(format!("{stem}.txt")).exists());
    }

    assert_eq!(
        std::fs::read_to_string(out.join("txt_output").join("a.txt")).unwrap(),
        "Alpha one\nAlpha two\n"
    );
    assert_eq!(
        std::fs::read_to_string(out.join("txt_output").join("c.txt")).unwrap(),
        ""
    );

    let log = read_log(&config);
    assert_eq!(
        log.lines().collect::<Vec<_>>(),
        vec![
            "[OK] a.docx -> a.pdf",
            "[OK] a.docx -> a.txt",
            "[OK] b.docx -> b.pdf",
            "[OK] b.docx -> b.txt",
            "[OK] c.docx -> c.pdf",
            "[OK] c.docx -> c.txt",
        ]
    );
    assert!(!log.ends_with('\n'));
}

#[tokio::test]
async fn test_docx_to_html_escapes_text() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    let input = write_docx(&src, "menu.docx", &["Fish & Chips", "<today>"]);
    let out = temp.path().join("out");

    let config = folder_config(&input, &out, &[OutputFormat::Html]);
    stub_pipeline().run(&config).await.unwrap();

    let html = std::fs::read_to_string(out.join("html_output").join("menu.html")).unwrap();
    assert_eq!(
        html,
        "<html><body>\n<p>Fish &amp; Chips</p>\n<p>&lt;today&gt;</p>\n</body></html>"
    );
}

#[tokio::test]
async fn test_presentations_use_office_backend() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    std::fs::write(src.join("deck.pptx"), b"pptx").unwrap();
    std::fs::write(src.join("old.PPT"), b"ppt").unwrap();

    let office = Arc::new(StubOffice::default());
    let out = temp.path().join("out");
    let config = folder_config(&src, &out, &[OutputFormat::Pdf, OutputFormat::Txt]);

    let report = pipeline_with(office.clone()).run(&config).await.unwrap();

    // Presentations only convert to PDF; the TXT pairs are skipped.
    assert_eq!(report.entries.len(), 2);
    assert!(out.join("pdf_output").join("deck.pdf").exists());
    assert!(out.join("pdf_output").join("old.pdf").exists());

    let kinds: Vec<DocumentKind> = office
        .calls
        .lock()
        .unwrap()
        .iter()
        .map(|(_, kind)| *kind)
        .collect();
    assert_eq!(
        kinds,
        vec![DocumentKind::Presentation, DocumentKind::Presentation]
    );
}

#[tokio::test]
async fn test_unsupported_files_are_skipped() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    std::fs::write(src.join("budget.xlsx"), b"xlsx").unwrap();
    std::fs::write(src.join("README"), b"readme").unwrap();
    write_docx(&src, "notes.docx", &["Note"]);

    let out = temp.path().join("out");
    let config = folder_config(&src, &out, &[OutputFormat::Txt]);
    let report = stub_pipeline().run(&config).await.unwrap();

    assert_eq!(report.entries.len(), 1);
    assert_eq!(read_log(&config), "[OK] notes.docx -> notes.txt");

    let produced: Vec<_> = std::fs::read_dir(out.join("txt_output"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(produced, vec!["notes.txt"]);
}

#[tokio::test]
async fn test_repeated_runs_never_overwrite() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    let input = write_docx(&src, "report.docx", &["Quarterly"]);
    let out = temp.path().join("out");

    let config = folder_config(&input, &out, &[OutputFormat::Txt]);
    let pipeline = stub_pipeline();

    for _ in 0..3 {
        pipeline.run(&config).await.unwrap();
    }

    let dir = out.join("txt_output");
    assert!(dir.join("report.txt").exists());
    assert!(dir.join("report_1.txt").exists());
    assert!(dir.join("report_2.txt").exists());

    // The log describes the latest run only.
    assert_eq!(read_log(&config), "[OK] report.docx -> report_2.txt");
}

#[tokio::test]
async fn test_same_stem_in_one_run() {
    let temp = TempDir::new().unwrap();
    let first = write_docx(&make_dir(temp.path(), "one"), "report.docx", &["1"]);
    let second = write_docx(&make_dir(temp.path(), "two"), "report.docx", &["2"]);
    let out = temp.path().join("out");

    let mut config = folder_config(&first, &out, &[OutputFormat::Txt]);
    config.inputs = InputSpec::List(vec![first, second]);

    stub_pipeline().run(&config).await.unwrap();

    let dir = out.join("txt_output");
    assert_eq!(std::fs::read_to_string(dir.join("report.txt")).unwrap(), "1\n");
    assert_eq!(std::fs::read_to_string(dir.join("report_1.txt")).unwrap(), "2\n");
}

#[tokio::test]
async fn test_image_transcoding() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    write_png(&src, "photo.png", true);

    let out = temp.path().join("out");
    let config = folder_config(
        &src,
        &out,
        &[OutputFormat::Jpg, OutputFormat::Png, OutputFormat::Bmp],
    );
    let report = stub_pipeline().run(&config).await.unwrap();

    // PNG to PNG is not a conversion.
    assert_eq!(report.converted(), 2);
    assert!(!out.join("png_output").exists());

    let jpg = image::open(out.join("jpg_output").join("photo.jpg")).unwrap();
    assert_eq!((jpg.width(), jpg.height()), (8, 6));
    assert!(!jpg.color().has_alpha());

    let bmp = image::open(out.join("bmp_output").join("photo.bmp")).unwrap();
    assert_eq!((bmp.width(), bmp.height()), (8, 6));
}

#[tokio::test]
async fn test_pdf_inputs_are_copied() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    let input = write_pdf(&src, "scan.pdf", &[300, 400]);
    let out = temp.path().join("out");

    let config = folder_config(&input, &out, &[OutputFormat::Pdf]);
    stub_pipeline().run(&config).await.unwrap();

    assert_eq!(
        std::fs::read(&input).unwrap(),
        std::fs::read(out.join("pdf_output").join("scan.pdf")).unwrap()
    );
}

#[tokio::test]
async fn test_failures_do_not_stop_the_run() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    write_docx(&src, "a_broken.docx", &["Lost"]);
    std::fs::write(src.join("b.docx"), b"not a zip archive").unwrap();
    write_docx(&src, "c.docx", &["Fine"]);

    let out = temp.path().join("out");
    let config = folder_config(&src, &out, &[OutputFormat::Pdf, OutputFormat::Txt]);
    let report = stub_pipeline().run(&config).await.unwrap();

    assert_eq!(report.entries.len(), 6);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.converted(), 4);

    let log = read_log(&config);
    let lines: Vec<&str> = log.lines().collect();
    assert!(lines[0].starts_with("[FAIL] a_broken.docx to PDF: "));
    assert!(lines[0].contains("export produced no file"));
    assert_eq!(lines[1], "[OK] a_broken.docx -> a_broken.txt");
    assert!(lines[2].starts_with("[OK] b.docx -> b.pdf"));
    assert!(lines[3].starts_with("[FAIL] b.docx to TXT: "));
    assert_eq!(lines[5], "[OK] c.docx -> c.txt");

    assert!(matches!(report.entries[3], LogEntry::Failed { .. }));
}

#[tokio::test]
async fn test_report_json() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    let input = write_docx(&src, "a.docx", &["A"]);
    let out = temp.path().join("out");

    let config = folder_config(&input, &out, &[OutputFormat::Txt]);
    let report = stub_pipeline().run(&config).await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["entries"][0]["status"], "converted");
    assert_eq!(json["entries"][0]["format"], "txt");
    assert!(
        json["log_path"]
            .as_str()
            .unwrap()
            .ends_with("conversion_log.txt")
    );
}
