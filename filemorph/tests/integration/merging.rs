//! Integration tests for merging the produced PDFs.

use tempfile::TempDir;

use filemorph::config::OutputFormat;
use filemorph::merge::Merger;

use crate::common::{
    UNNUMBERED_WIDTH, folder_config, make_dir, page_widths, read_log, stub_pipeline, write_docx,
    write_pdf,
};

#[tokio::test]
async fn test_merge_orders_by_first_number() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    write_docx(&src, "report10.docx", &["ten"]);
    write_docx(&src, "report2.docx", &["two"]);
    write_docx(&src, "cover.docx", &["cover"]);
    write_pdf(&src, "chapter_03.pdf", &[31, 32]);

    let out = temp.path().join("out");
    let mut config = folder_config(&src, &out, &[OutputFormat::Pdf, OutputFormat::Txt]);
    config.merge_name = Some("Book".to_string());

    let report = stub_pipeline().run(&config).await.unwrap();

    let merged = out.join("Book.pdf");
    assert_eq!(report.merged_path(), Some(merged.as_path()));
    assert_eq!(page_widths(&merged), vec![2, 31, 32, 10, UNNUMBERED_WIDTH]);

    // TXT outputs never take part in the merge.
    assert!(out.join("txt_output").join("report2.txt").exists());

    let log = read_log(&config);
    assert_eq!(
        log.lines().last().unwrap(),
        format!("[MERGED] PDF saved to: {}", merged.display())
    );
    assert_eq!(log.lines().count(), 8);
}

#[tokio::test]
async fn test_merge_name_collision() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    write_pdf(&src, "part1.pdf", &[100]);

    let out = make_dir(temp.path(), "out");
    std::fs::write(out.join("Merged.pdf"), b"keep me").unwrap();

    let mut config = folder_config(&src, &out, &[OutputFormat::Pdf]);
    config.merge_name = Some("Merged".to_string());

    let report = stub_pipeline().run(&config).await.unwrap();

    assert_eq!(report.merged_path(), Some(out.join("Merged_1.pdf").as_path()));
    assert_eq!(std::fs::read(out.join("Merged.pdf")).unwrap(), b"keep me");
    assert_eq!(page_widths(&out.join("Merged_1.pdf")), vec![100]);
}

#[tokio::test]
async fn test_merge_needs_pdf_format() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    write_docx(&src, "a1.docx", &["text"]);

    let out = temp.path().join("out");
    let mut config = folder_config(&src, &out, &[OutputFormat::Txt]);
    config.merge_name = Some("Book".to_string());

    let report = stub_pipeline().run(&config).await.unwrap();

    assert_eq!(report.merged_path(), None);
    assert_eq!(report.entries.len(), 1);
    assert!(!out.join("Book.pdf").exists());
}

#[tokio::test]
async fn test_merge_failure_is_logged() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    write_pdf(&src, "1_good.pdf", &[100]);
    std::fs::write(src.join("2_bad.pdf"), b"%PDF-1.4 truncated").unwrap();

    let out = temp.path().join("out");
    let mut config = folder_config(&src, &out, &[OutputFormat::Pdf]);
    config.merge_name = Some("Book".to_string());

    let report = stub_pipeline().run(&config).await.unwrap();

    // Both copies succeed; the merge cannot read the bad one.
    assert_eq!(report.converted(), 2);
    assert!(report.has_failures());
    assert!(!out.join("Book.pdf").exists());

    let log = read_log(&config);
    let last = log.lines().last().unwrap();
    assert!(last.starts_with("[ERROR] Merging failed: "), "{last}");
    assert!(last.contains("2_bad.pdf"), "{last}");
}

#[tokio::test]
async fn test_merger_statistics() {
    let temp = TempDir::new().unwrap();
    let a = write_pdf(temp.path(), "a.pdf", &[1, 2, 3]);
    let b = write_pdf(temp.path(), "b.pdf", &[4]);

    let result = Merger::new().merge(&[b, a]).await.unwrap();

    assert_eq!(result.statistics.files_merged, 2);
    assert_eq!(result.statistics.total_pages, 4);
    assert_eq!(result.document.get_pages().len(), 4);
    assert!(result.merged_files[0].ends_with("b.pdf"));
}
