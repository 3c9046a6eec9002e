//! PDF artifact backed by lopdf.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::PageSource;
use crate::detect::detect_pdf_version;
use crate::error::{Error, Result};
use crate::model::{Outline, OutlineItem};

/// Name trees nested deeper than this are treated as malformed.
const MAX_NAME_TREE_DEPTH: usize = 32;

/// A converted document loaded with lopdf.
pub struct PdfArtifact {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfArtifact {
    /// Open a PDF artifact from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_pdf_version(path)?;
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load a PDF artifact from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("Artifact is encrypted; text extraction will likely fail");
        }
        let pages = doc.get_pages();
        Self { doc, pages }
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn outline_root(&self) -> Result<Option<ObjectId>> {
        let catalog = self.doc.catalog()?;
        let outlines = match catalog.get(b"Outlines") {
            Ok(obj) => obj,
            Err(_) => return Ok(None),
        };
        let outlines = self.resolve_dict(outlines)?;
        match outlines.get(b"First") {
            Ok(first) => Ok(Some(first.as_reference()?)),
            Err(_) => Ok(None),
        }
    }

    /// Read a sibling chain starting at `first`, descending into children.
    fn read_items(
        &self,
        first: ObjectId,
        level: u8,
        seen: &mut HashSet<ObjectId>,
    ) -> Result<Vec<OutlineItem>> {
        let mut items = Vec::new();
        let mut cursor = Some(first);

        while let Some(item_ref) = cursor.take() {
            if !seen.insert(item_ref) {
                return Err(Error::OutlineRead(format!(
                    "cycle at object {} {}",
                    item_ref.0, item_ref.1
                )));
            }
            let dict = self.doc.get_dictionary(item_ref)?;
            let title = get_string_from_dict(dict, b"Title").unwrap_or_default();
            let page = self.item_destination(dict);
            let mut item = OutlineItem::new(title, page, level);

            if let Ok(child) = dict.get(b"First").and_then(Object::as_reference) {
                item.children = self.read_items(child, level.saturating_add(1), seen)?;
            }
            items.push(item);

            cursor = dict.get(b"Next").and_then(Object::as_reference).ok();
        }

        Ok(items)
    }

    /// Destination page of an outline item, from `/Dest` or a GoTo action.
    fn item_destination(&self, item: &Dictionary) -> Option<u32> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve_destination(dest);
        }
        let action = item.get(b"A").ok()?;
        let action = self.resolve_dict(action).ok()?;
        self.resolve_destination(action.get(b"D").ok()?)
    }

    /// Resolve an explicit destination array or a named destination to a page number.
    fn resolve_destination(&self, dest: &Object) -> Option<u32> {
        match self.deref(dest) {
            Object::Array(array) => {
                let page_ref = array.first()?.as_reference().ok()?;
                self.pages
                    .iter()
                    .find(|(_, id)| **id == page_ref)
                    .map(|(num, _)| *num)
            }
            Object::Dictionary(dict) => self.resolve_destination(dict.get(b"D").ok()?),
            Object::Name(name) | Object::String(name, _) => {
                self.resolve_destination(self.named_destination(name)?)
            }
            _ => None,
        }
    }

    /// Look up a named destination in the catalog `/Dests` dictionary
    /// (PDF 1.1) or the `/Names /Dests` name tree.
    fn named_destination(&self, name: &[u8]) -> Option<&Object> {
        let catalog = self.doc.catalog().ok()?;
        let legacy = catalog
            .get(b"Dests")
            .ok()
            .and_then(|dests| self.resolve_dict(dests).ok())
            .and_then(|dests| dests.get(name).ok());
        if legacy.is_some() {
            return legacy;
        }

        let names = self.resolve_dict(catalog.get(b"Names").ok()?).ok()?;
        let root = self.resolve_dict(names.get(b"Dests").ok()?).ok()?;
        self.find_in_name_tree(root, name, 0)
    }

    /// Search a name tree node: leaf `/Names` pairs first, then `/Kids`.
    fn find_in_name_tree<'a>(
        &'a self,
        node: &'a Dictionary,
        name: &[u8],
        depth: usize,
    ) -> Option<&'a Object> {
        if depth > MAX_NAME_TREE_DEPTH {
            log::warn!("Name tree deeper than {} levels", MAX_NAME_TREE_DEPTH);
            return None;
        }

        if let Ok(Object::Array(pairs)) = node.get(b"Names").map(|obj| self.deref(obj)) {
            let found = pairs.chunks_exact(2).find_map(|pair| match self.deref(&pair[0]) {
                Object::String(key, _) if key.as_slice() == name => Some(&pair[1]),
                _ => None,
            });
            if found.is_some() {
                return found;
            }
        }

        let Ok(Object::Array(kids)) = node.get(b"Kids").map(|obj| self.deref(obj)) else {
            return None;
        };
        kids.iter()
            .filter_map(|kid| self.resolve_dict(kid).ok())
            .find_map(|kid| self.find_in_name_tree(kid, name, depth + 1))
    }

    fn deref<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Result<&'a Dictionary> {
        match self.deref(obj) {
            Object::Dictionary(dict) => Ok(dict),
            _ => Err(Error::OutlineRead("expected a dictionary".to_string())),
        }
    }
}

impl PageSource for PdfArtifact {
    fn page_count(&self) -> Result<u32> {
        Ok(self.pages.len() as u32)
    }

    fn page_text(&self, page: u32) -> Result<String> {
        if !self.pages.contains_key(&page) {
            return Err(Error::PageOutOfRange(page, self.pages.len() as u32));
        }
        self.doc
            .extract_text(&[page])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))
    }

    fn outline(&self) -> Result<Option<Outline>> {
        let Some(first) = self.outline_root()? else {
            return Ok(None);
        };
        let mut seen = HashSet::new();
        let items = self.read_items(first, 0, &mut seen)?;
        if items.is_empty() {
            return Ok(None);
        }
        Ok(Some(Outline { items }))
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, else UTF-8, else Latin-1.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, StringFormat};

    fn title(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    }

    /// Three blank pages with a two-level outline.
    fn build_pdf() -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();

        let page_ids: Vec<ObjectId> = (0..3)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
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
                "Count" => Object::Integer(3),
            }),
        );

        let outlines_id = doc.new_object_id();
        let chapter_id = doc.new_object_id();
        let section_id = doc.new_object_id();
        let appendix_id = doc.new_object_id();

        doc.objects.insert(
            section_id,
            Object::Dictionary(dictionary! {
                "Title" => title("1.1 Scope"),
                "Parent" => chapter_id,
                "Dest" => vec![Object::Reference(page_ids[1]), "Fit".into()],
            }),
        );
        doc.objects.insert(
            chapter_id,
            Object::Dictionary(dictionary! {
                "Title" => title("Chapter 1: Overview"),
                "Parent" => outlines_id,
                "First" => section_id,
                "Last" => section_id,
                "Next" => appendix_id,
                "Dest" => vec![Object::Reference(page_ids[0]), "Fit".into()],
            }),
        );
        doc.objects.insert(
            appendix_id,
            Object::Dictionary(dictionary! {
                "Title" => title("Appendix"),
                "Parent" => outlines_id,
                "Prev" => chapter_id,
                "A" => dictionary! {
                    "S" => "GoTo",
                    "D" => vec![Object::Reference(page_ids[2]), "Fit".into()],
                },
            }),
        );
        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => chapter_id,
                "Last" => appendix_id,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "Outlines" => outlines_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_page_count() {
        let artifact = PdfArtifact::from_bytes(&build_pdf()).unwrap();
        assert_eq!(artifact.page_count().unwrap(), 3);
        assert!(matches!(
            artifact.page_text(7),
            Err(Error::PageOutOfRange(7, 3))
        ));
    }

    #[test]
    fn test_outline_tree() {
        let artifact = PdfArtifact::from_bytes(&build_pdf()).unwrap();
        let outline = artifact.outline().unwrap().unwrap();

        assert_eq!(outline.items.len(), 2);
        let chapter = &outline.items[0];
        assert_eq!(chapter.title, "Chapter 1: Overview");
        assert_eq!(chapter.page, Some(1));
        assert_eq!(chapter.children.len(), 1);
        assert_eq!(chapter.children[0].title, "1.1 Scope");
        assert_eq!(chapter.children[0].page, Some(2));
        assert_eq!(chapter.children[0].level, 1);

        let appendix = &outline.items[1];
        assert_eq!(appendix.page, Some(3));
    }

    /// Two pages whose outline items jump through the `/Names /Dests` tree,
    /// the way hyperref output does.
    fn build_named_pdf() -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();

        let page_ids: Vec<ObjectId> = (0..2)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                })
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
                "Count" => Object::Integer(2),
            }),
        );

        let leaf_id = doc.add_object(dictionary! {
            "Limits" => vec![title("chapter.2"), title("section.2.1")],
            "Names" => vec![
                title("chapter.2"),
                Object::Array(vec![Object::Reference(page_ids[0]), "Fit".into()]),
                title("section.2.1"),
                dictionary! {
                    "D" => vec![Object::Reference(page_ids[1]), "XYZ".into()],
                }
                .into(),
            ],
        });
        let tree_id = doc.add_object(dictionary! {
            "Kids" => vec![Object::Reference(leaf_id)],
        });

        let outlines_id = doc.new_object_id();
        let chapter_id = doc.new_object_id();
        let section_id = doc.new_object_id();
        let goto = |dest: &str| {
            dictionary! {
                "S" => "GoTo",
                "D" => title(dest),
            }
        };
        doc.objects.insert(
            chapter_id,
            Object::Dictionary(dictionary! {
                "Title" => title("Chapter 2: Ingest"),
                "Parent" => outlines_id,
                "Next" => section_id,
                "A" => goto("chapter.2"),
            }),
        );
        doc.objects.insert(
            section_id,
            Object::Dictionary(dictionary! {
                "Title" => title("2.1 Sources"),
                "Parent" => outlines_id,
                "Prev" => chapter_id,
                "A" => goto("section.2.1"),
            }),
        );
        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => chapter_id,
                "Last" => section_id,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "Outlines" => outlines_id,
            "Names" => dictionary! {
                "Dests" => tree_id,
            },
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_name_tree_destinations() {
        let artifact = PdfArtifact::from_bytes(&build_named_pdf()).unwrap();
        let outline = artifact.outline().unwrap().unwrap();

        assert_eq!(outline.items[0].page, Some(1));
        assert_eq!(outline.items[1].title, "2.1 Sources");
        assert_eq!(outline.items[1].page, Some(2));
    }

    #[test]
    fn test_open_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, "xelatex log output").unwrap();
        assert!(matches!(
            PdfArtifact::open(&path),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_decode_pdf_string() {
        assert_eq!(decode_pdf_string(b"Plain"), "Plain");
        assert_eq!(
            decode_pdf_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42]),
            "AB"
        );
        assert_eq!(decode_pdf_string(&[0xE9]), "é");
    }
}
