//! PDF fixtures for integration tests.
//!
//! Each page is a list of text lines; every line is drawn in its own text
//! object so extracted text keeps one catalog line per text line.

#![allow(dead_code)]

use lopdf::{Object, Stream, dictionary};

/// Escape a string for a PDF literal string.
fn pdf_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

fn page_content(lines: &[&str]) -> Vec<u8> {
    let mut ops = String::new();
    for (i, line) in lines.iter().enumerate() {
        let y = 720 - 14 * i as i64;
        ops.push_str(&format!(
            "BT\n/F1 10 Tf\n72 {y} Td\n({}) Tj\nET\n",
            pdf_escape(line)
        ));
    }
    ops.into_bytes()
}

/// Build a PDF with one page per entry of `pages`.
pub fn catalog_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for lines in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(lines)));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(font_id),
                },
            },
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(page_ids.len() as i64),
    });
    for &pid in &page_ids {
        if let Ok(obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// A two-page catalog: a cover page and the profile C table on page 2.
pub fn two_page_catalog() -> Vec<u8> {
    catalog_pdf(&[
        &["Drive design catalog", "Edition 2024"],
        &[
            "Rated power per belt kW",
            "Profile C",
            "180 200 224",
            "710 1,20 1,50 1,90",
            "950 1,55 1,95 2,45*",
            "1.450 2,20 2,80 3,50",
            "Profile D",
            "355 400",
        ],
    ])
}
