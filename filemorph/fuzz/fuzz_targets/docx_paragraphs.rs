#![no_main]

use filemorph::convert::docx;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(xml) = std::str::from_utf8(data) else {
        return;
    };

    // Malformed XML must surface as an error, never a panic.
    if let Ok(paragraphs) = docx::paragraphs_from_xml(xml) {
        let text = docx::render_text(&paragraphs);
        assert!(text.matches('\n').count() >= paragraphs.len());

        let html = docx::render_html(&paragraphs);
        assert!(html.starts_with("<html><body>"));
    }
});
