//! Integration tests for dry runs.

use tempfile::TempDir;

use filemorph::config::OutputFormat;
use filemorph::convert::Action;

use crate::common::{folder_config, make_dir, stub_pipeline, write_docx, write_png};

#[tokio::test]
async fn test_dry_run_plan_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    write_docx(&src, "a.docx", &["A"]);
    write_png(&src, "b.png", false);
    std::fs::write(src.join("c.xlsx"), b"").unwrap();

    let out = temp.path().join("out");
    let mut config = folder_config(&src, &out, &[OutputFormat::Pdf, OutputFormat::Jpg]);
    config.dry_run = true;
    config.merge_name = Some("All".to_string());

    let plan = stub_pipeline().plan(&config).unwrap();

    let actions: Vec<Action> = plan.steps.iter().map(|s| s.action).collect();
    assert_eq!(
        actions,
        vec![Action::DocumentToPdf, Action::Transcode(OutputFormat::Jpg)]
    );
    assert_eq!(plan.skipped, 4);
    assert_eq!(plan.steps[1].output, out.join("jpg_output").join("b.jpg"));
    assert_eq!(plan.merge_output, Some(out.join("All.pdf")));
    assert_eq!(plan.log_path, out.join("conversion_log.txt"));

    assert!(!out.exists());
}

#[tokio::test]
async fn test_dry_run_plan_matches_real_run() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    write_docx(&src, "notes.docx", &["N"]);

    let out = make_dir(temp.path(), "out");
    let txt_dir = make_dir(&out, "txt_output");
    std::fs::write(txt_dir.join("notes.txt"), b"old").unwrap();

    let config = folder_config(&src, &out, &[OutputFormat::Txt, OutputFormat::Html]);
    let pipeline = stub_pipeline();

    let planned: Vec<_> = pipeline
        .plan(&config)
        .unwrap()
        .steps
        .into_iter()
        .map(|s| s.output)
        .collect();
    assert_eq!(planned[0], txt_dir.join("notes_1.txt"));

    pipeline.run(&config).await.unwrap();
    for output in planned {
        assert!(output.exists(), "{} missing", output.display());
    }
}

#[tokio::test]
async fn test_dry_run_plan_serializes() {
    let temp = TempDir::new().unwrap();
    let input = write_docx(temp.path(), "a.docx", &["A"]);

    let config = folder_config(&input, &temp.path().join("out"), &[OutputFormat::Html]);
    let plan = stub_pipeline().plan(&config).unwrap();

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["steps"][0]["action"], "docx_to_html");
    assert_eq!(json["steps"][0]["format"], "html");
    assert_eq!(json["skipped"], 0);
    assert!(json["merge_output"].is_null());
}
