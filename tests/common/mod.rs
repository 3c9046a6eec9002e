//! PDF fixtures shared by integration tests.

#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Build a PDF with one page per entry of `pages` and a flat outline.
///
/// Each line of a page's text is written as its own text object so line
/// breaks survive extraction. Outline pages are 1-indexed.
pub fn build_pdf(pages: &[&str], outline: &[(&str, u32)]) -> Vec<u8> {
    build(pages, outline, false)
}

/// Like [`build_pdf`], but outline items jump to named destinations kept in
/// a `/Names /Dests` tree, as hyperref-generated PDFs do.
pub fn build_named_pdf(pages: &[&str], outline: &[(&str, u32)]) -> Vec<u8> {
    build(pages, outline, true)
}

fn build(pages: &[&str], outline: &[(&str, u32)], named: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let page_ids: Vec<ObjectId> = pages
        .iter()
        .map(|text| {
            let mut operations = Vec::new();
            for (i, line) in text.lines().enumerate() {
                let y = 740 - 16 * i as i64;
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
                operations.push(Operation::new("Td", vec![72.into(), y.into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(line.as_bytes().to_vec(), StringFormat::Literal)],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap(),
            ));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ],
            })
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => Object::Integer(page_ids.len() as i64),
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };

    if !outline.is_empty() {
        let outlines_id = doc.new_object_id();
        let item_ids: Vec<ObjectId> = outline.iter().map(|_| doc.new_object_id()).collect();

        let mut names = Vec::new();
        for (i, (title, page)) in outline.iter().enumerate() {
            let dest = Object::Array(vec![
                Object::Reference(page_ids[(*page - 1) as usize]),
                "Fit".into(),
            ]);
            let mut item = dictionary! {
                "Title" => Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
                "Parent" => outlines_id,
            };
            if named {
                // Zero-padded so the leaf keys stay sorted.
                let key = format!("section.{:04}", i).into_bytes();
                names.push(Object::String(key.clone(), StringFormat::Literal));
                names.push(dest);
                item.set(
                    "A",
                    dictionary! {
                        "S" => "GoTo",
                        "D" => Object::String(key, StringFormat::Literal),
                    },
                );
            } else {
                item.set("Dest", dest);
            }
            if i > 0 {
                item.set("Prev", item_ids[i - 1]);
            }
            if i + 1 < item_ids.len() {
                item.set("Next", item_ids[i + 1]);
            }
            doc.objects.insert(item_ids[i], Object::Dictionary(item));
        }

        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => item_ids[0],
                "Last" => item_ids[item_ids.len() - 1],
                "Count" => Object::Integer(item_ids.len() as i64),
            }),
        );
        catalog.set("Outlines", outlines_id);

        if named {
            let leaf_id = doc.add_object(dictionary! { "Names" => names });
            let root_id = doc.add_object(dictionary! {
                "Kids" => vec![Object::Reference(leaf_id)],
            });
            catalog.set("Names", dictionary! { "Dests" => root_id });
        }
    }

    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// Write a generated PDF to `path`.
pub fn write_pdf(path: &Path, pages: &[&str], outline: &[(&str, u32)]) {
    std::fs::write(path, build_pdf(pages, outline)).unwrap();
}
