//! Concrete [`PdfSource`] backed by `lopdf::Document`.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object};

use super::{DocumentInfo, PdfSource};
use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
type PageId = (u32, u16);

/// A decoded PDF document with page-level text access.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, PageId>,
}

impl LopdfSource {
    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages();
        Self { doc, pages }
    }

    fn page_id(&self, page: u32) -> Result<PageId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
    }

    /// Raw decompressed content stream bytes for a page.
    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::Load(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::Load(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::Load(e.to_string()));
                }
                Err(Error::Load("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::Load("Invalid content stream".to_string())),
        }
    }

    /// Decode a text byte sequence using the font's encoding on the given
    /// page, falling back to simple decoding when the font or encoding is
    /// unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if !font_name.is_empty() {
            if let Ok(fonts) = self.doc.get_page_fonts(page) {
                if let Some(font_dict) = fonts.get(font_name) {
                    if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                        if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                            return text;
                        }
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }
}

impl PdfSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<String>> {
        let page_id = self.page_id(page)?;
        let data = self.page_content(page_id)?;
        let content =
            lopdf::content::Content::decode(&data).map_err(|e| Error::Load(e.to_string()))?;

        let mut fragments = Vec::new();
        let mut current_font: Vec<u8> = Vec::new();

        for op in &content.operations {
            match op.operator.as_str() {
                // Tf selects the font whose encoding decodes later strings.
                "Tf" => {
                    if let Some(Object::Name(name)) = op.operands.first() {
                        current_font = name.clone();
                    }
                }
                "Tj" | "'" => {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        fragments.push(self.decode_text(page_id, &current_font, bytes));
                    }
                }
                // " takes word and char spacing operands before the string.
                "\"" => {
                    if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                        fragments.push(self.decode_text(page_id, &current_font, bytes));
                    }
                }
                // TJ interleaves strings with kerning adjustments; the
                // strings of one TJ form a single fragment.
                "TJ" => {
                    if let Some(Object::Array(arr)) = op.operands.first() {
                        let mut run = String::new();
                        for obj in arr {
                            if let Object::String(bytes, _) = obj {
                                run.push_str(&self.decode_text(page_id, &current_font, bytes));
                            }
                        }
                        fragments.push(run);
                    }
                }
                _ => {}
            }
        }

        Ok(fragments)
    }

    fn info(&self) -> DocumentInfo {
        DocumentInfo {
            page_count: self.page_count(),
            version: self.doc.version.to_string(),
            encrypted: self.doc.is_encrypted(),
            title: self.title(),
        }
    }
}

impl LopdfSource {
    fn title(&self) -> Option<String> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        let info_ref = info.as_reference().ok()?;
        let info_dict = self.doc.get_dictionary(info_ref).ok()?;
        let title = info_dict.get(b"Title").ok()?;
        match title {
            Object::String(bytes, _) => {
                let s = decode_text_simple(bytes);
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            }
            _ => None,
        }
    }
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM marker
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
