//! PDF serialization of laid-out pages through `lopdf`.
//!
//! Text is set in the standard Helvetica pair over WinAnsiEncoding. Glyphs the
//! base encoding cannot address get spare codes from [`TextEncoder`] and are
//! named in a `/Differences` array shared by both fonts. Nothing time-dependent
//! is written, so equal pages give equal bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use super::glyphs::TextEncoder;
use super::layout::{Element, Page, PageGeometry};

/// Layout units are millimetres.
const POINTS_PER_UNIT: f64 = 72.0 / 25.4;
const PRODUCER: &str = "legaldoc-server";
const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Serialize `pages` into a complete PDF document.
pub fn write_pdf(
    pages: &[Page],
    geometry: &PageGeometry,
    title: &str,
) -> Result<Vec<u8>, lopdf::Error> {
    let blank = [Page::default()];
    let pages = if pages.is_empty() { &blank[..] } else { pages };

    let mut encoder = TextEncoder::new();
    let contents = pages
        .iter()
        .map(|page| page_content(page, geometry, &mut encoder).encode())
        .collect::<Result<Vec<_>, _>>()?;

    let missing: String = encoder.missing().collect();
    if !missing.is_empty() {
        log::warn!("No Helvetica glyph for {:?} in '{}', printed as '?'", missing, title);
    }

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let encoding_id = doc.add_object(font_encoding(&encoder));
    let regular_id = doc.add_object(font("Helvetica", encoding_id));
    let bold_id = doc.add_object(font("Helvetica-Bold", encoding_id));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        to_points(geometry.width).into(),
        to_points(geometry.height).into(),
    ];
    let mut kids: Vec<Object> = Vec::with_capacity(contents.len());
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(title),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn to_points(value: f64) -> f32 {
    (value * POINTS_PER_UNIT) as f32
}

fn font(base_font: &str, encoding_id: lopdf::ObjectId) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => encoding_id,
    }
}

fn font_encoding(encoder: &TextEncoder) -> Dictionary {
    let mut encoding = dictionary! {
        "Type" => "Encoding",
        "BaseEncoding" => "WinAnsiEncoding",
    };
    if !encoder.differences().is_empty() {
        let differences: Vec<Object> = encoder
            .differences()
            .iter()
            .flat_map(|(code, glyph)| {
                [
                    Object::Integer(i64::from(*code)),
                    Object::Name(glyph.as_bytes().to_vec()),
                ]
            })
            .collect();
        encoding.set("Differences", differences);
    }
    encoding
}

/// Document info strings are PDFDocEncoding for ASCII, UTF-16BE otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xfe, 0xff];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn page_content(page: &Page, geometry: &PageGeometry, encoder: &mut TextEncoder) -> Content {
    let flip = |y: f64| to_points(geometry.height - y);
    let mut operations = Vec::new();

    for element in &page.elements {
        match element {
            Element::Text {
                x,
                y,
                size,
                bold,
                text,
            } => {
                let font = if *bold { BOLD_FONT } else { REGULAR_FONT };
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![font.into(), (*size as f32).into()]),
                    Operation::new("Td", vec![to_points(*x).into(), flip(*y).into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(encoder.encode(text), StringFormat::Literal)],
                    ),
                    Operation::new("ET", vec![]),
                ]);
            }
            Element::Line { x1, x2, y } => {
                operations.extend([
                    Operation::new("w", vec![0.5f32.into()]),
                    Operation::new("m", vec![to_points(*x1).into(), flip(*y).into()]),
                    Operation::new("l", vec![to_points(*x2).into(), flip(*y).into()]),
                    Operation::new("S", vec![]),
                ]);
            }
        }
    }
    Content { operations }
}
