//! Shared helpers for filemorph integration tests.
//!
//! Fixtures are generated on the fly: DOCX packages with `zip`, PDFs with
//! `lopdf`, images with `image`. Office exports go through [`StubOffice`],
//! which writes a one-page PDF instead of launching an office suite.

#![allow(dead_code)]

use futures::future::BoxFuture;
use lopdf::{Document, Object, dictionary};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use filemorph::config::{Config, OutputFormat};
use filemorph::convert::{Converter, DocumentKind, OfficeBackend};
use filemorph::error::{FileMorphError, Result};
use filemorph::input::InputSpec;
use filemorph::pipeline::Pipeline;

/// Page width used for pages of files whose name has no number.
pub const UNNUMBERED_WIDTH: i64 = 999;

/// Write a DOCX package whose body holds `paragraphs`.
pub fn write_docx(dir: &Path, name: &str, paragraphs: &[&str]) -> PathBuf {
    let path = dir.join(name);

    let mut body = String::new();
    for paragraph in paragraphs {
        body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&escape_xml(paragraph));
        body.push_str("</w:t></w:r></w:p>");
    }
    let document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}<w:sectPr/></w:body></w:document>"
    );

    let file = File::create(&path).expect("Failed to create DOCX fixture");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
          <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"/>",
    )
    .unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap();

    path
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Document with one page per entry of `widths`, each page's MediaBox
/// width set to that entry so page order can be checked after a merge.
pub fn marked_document(widths: &[i64]) -> Document {
    let mut doc = Document::with_version("1.5");
    let catalog_id = doc.new_object_id();
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = widths
        .iter()
        .map(|&width| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), 792.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => widths.len() as i64,
        }
        .into(),
    );
    doc.objects.insert(
        catalog_id,
        dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        }
        .into(),
    );
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Write a marked PDF to `dir/name`.
pub fn write_pdf(dir: &Path, name: &str, widths: &[i64]) -> PathBuf {
    let path = dir.join(name);
    marked_document(widths)
        .save(&path)
        .expect("Failed to write PDF fixture");
    path
}

/// MediaBox widths of every page of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load PDF");
    doc.get_pages()
        .into_values()
        .map(|id| {
            let page = doc.get_object(id).unwrap().as_dict().unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

/// Write a small solid-colour PNG, with alpha when `alpha` is set.
pub fn write_png(dir: &Path, name: &str, alpha: bool) -> PathBuf {
    let path = dir.join(name);
    if alpha {
        image::RgbaImage::from_pixel(8, 6, image::Rgba([10, 120, 200, 100]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
    } else {
        image::RgbImage::from_pixel(8, 6, image::Rgb([10, 120, 200]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
    }
    path
}

/// Office backend that writes a one-page PDF per export.
///
/// The page width is the first number in the input file name, or
/// [`UNNUMBERED_WIDTH`]. Inputs whose name contains `broken` fail.
#[derive(Default)]
pub struct StubOffice {
    pub calls: Mutex<Vec<(PathBuf, DocumentKind)>>,
}

impl OfficeBackend for StubOffice {
    fn name(&self) -> &str {
        "stub"
    }

    fn convert_to_pdf<'a>(
        &'a self,
        input: &'a Path,
        output: &'a Path,
        kind: DocumentKind,
    ) -> BoxFuture<'a, Result<()>> {
        self.calls.lock().unwrap().push((input.to_path_buf(), kind));

        Box::pin(async move {
            let name = input.file_name().unwrap().to_string_lossy().into_owned();
            if name.contains("broken") {
                return Err(FileMorphError::office_failed(
                    input.to_path_buf(),
                    "export produced no file",
                ));
            }

            let width = filemorph::merge::order::first_number(&name)
                .and_then(|n| n.parse().ok())
                .unwrap_or(UNNUMBERED_WIDTH);
            marked_document(&[width]).save(output)?;
            Ok(())
        })
    }
}

/// Pipeline backed by `office` with no settle delay.
pub fn pipeline_with(office: Arc<StubOffice>) -> Pipeline {
    Pipeline::with_converter(Converter::with_backend(office, Duration::ZERO))
}

/// Pipeline backed by a fresh [`StubOffice`].
pub fn stub_pipeline() -> Pipeline {
    pipeline_with(Arc::new(StubOffice::default()))
}

/// Config converting every file in `src` to `formats` under `out`.
pub fn folder_config(src: &Path, out: &Path, formats: &[OutputFormat]) -> Config {
    let mut config = Config::new(InputSpec::Single(src.to_path_buf()), out, formats.to_vec());
    config.quiet = true;
    config.open_output = false;
    config
}

/// Create `root/name` and return it.
pub fn make_dir(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Read the conversion log of a finished run.
pub fn read_log(config: &Config) -> String {
    std::fs::read_to_string(config.log_path()).expect("Failed to read conversion log")
}
