//! AcroForm writer: turns planned widgets into interactive form fields.
//!
//! Each widget becomes a merged field/widget annotation appended to its page's
//! `/Annots` and to the catalog's `/AcroForm /Fields`. Viewers are asked to
//! build appearances themselves (`/NeedAppearances true`).

use canvas::doc::{FieldKind, TextAlign};
use canvas::form::{FormPdfGenerator, FormWidget, GenerateError};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

/// Default-appearance font resource name.
const FONT_RESOURCE: &str = "Helv";
/// Annotation flag: print.
const ANNOT_PRINT: i64 = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfFormGenerator;

impl FormPdfGenerator for LopdfFormGenerator {
    fn generate(&self, source: &[u8], widgets: &[FormWidget]) -> Result<Vec<u8>, GenerateError> {
        let mut doc = Document::load_mem(source).map_err(pdf_err)?;
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

        let mut fields = Vec::with_capacity(widgets.len());
        for widget in widgets {
            let Some(&page_id) = page_ids.get(widget.page_index) else {
                tracing::warn!(name = %widget.name, page_index = widget.page_index, "no such page, skipping field");
                continue;
            };
            match add_widget(&mut doc, page_id, widget) {
                Ok(id) => fields.push(Object::Reference(id)),
                Err(e) => tracing::warn!(name = %widget.name, error = %e, "failed to create field"),
            }
        }

        register_fields(&mut doc, fields)?;

        let mut out = Vec::new();
        doc.save_to(&mut out).map_err(pdf_err)?;
        tracing::info!(widgets = widgets.len(), bytes = out.len(), "form PDF written");
        Ok(out)
    }
}

fn pdf_err(e: impl std::fmt::Display) -> GenerateError {
    GenerateError::Pdf(e.to_string())
}

#[allow(clippy::cast_possible_truncation)]
fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

fn quadding(align: Option<TextAlign>) -> i64 {
    match align {
        None | Some(TextAlign::Left) => 0,
        Some(TextAlign::Center) => 1,
        Some(TextAlign::Right) => 2,
    }
}

fn widget_dictionary(page_id: ObjectId, widget: &FormWidget) -> Dictionary {
    let r = widget.rect;
    let mut dict = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "T" => Object::string_literal(widget.name.as_str()),
        "Rect" => vec![real(r.x), real(r.y), real(r.x + r.width), real(r.y + r.height)],
        "F" => ANNOT_PRINT,
        "P" => Object::Reference(page_id),
    };
    match widget.kind {
        FieldKind::Text => {
            let size = widget.font_size.unwrap_or(0.0);
            dict.set("FT", "Tx");
            dict.set("DA", Object::string_literal(format!("/{FONT_RESOURCE} {size} Tf 0 g")));
            dict.set("Q", quadding(widget.align));
        }
        FieldKind::Checkbox => {
            dict.set("FT", "Btn");
            dict.set("V", "Off");
            dict.set("AS", "Off");
            dict.set("MK", dictionary! { "CA" => Object::string_literal("4") });
        }
    }
    dict
}

fn add_widget(doc: &mut Document, page_id: ObjectId, widget: &FormWidget) -> Result<ObjectId, GenerateError> {
    let id = doc.add_object(widget_dictionary(page_id, widget));
    append_reference(doc, page_id, b"Annots", id)?;
    Ok(id)
}

/// Push `id` onto the array at `dict_id[key]`, following an indirect array and
/// creating the array when absent.
fn append_reference(doc: &mut Document, dict_id: ObjectId, key: &[u8], id: ObjectId) -> Result<(), GenerateError> {
    append_all(doc, dict_id, key, vec![Object::Reference(id)])
}

fn append_all(doc: &mut Document, dict_id: ObjectId, key: &[u8], items: Vec<Object>) -> Result<(), GenerateError> {
    let existing = doc
        .get_object(dict_id)
        .and_then(Object::as_dict)
        .map_err(pdf_err)?
        .get(key)
        .cloned();
    match existing {
        Ok(Object::Reference(array_id)) => {
            doc.get_object_mut(array_id)
                .and_then(Object::as_array_mut)
                .map_err(pdf_err)?
                .extend(items);
        }
        Ok(Object::Array(mut array)) => {
            array.extend(items);
            set_entry(doc, dict_id, key, Object::Array(array))?;
        }
        _ => set_entry(doc, dict_id, key, Object::Array(items))?,
    }
    Ok(())
}

fn set_entry(doc: &mut Document, dict_id: ObjectId, key: &[u8], value: Object) -> Result<(), GenerateError> {
    doc.get_object_mut(dict_id)
        .and_then(Object::as_dict_mut)
        .map_err(pdf_err)?
        .set(key.to_vec(), value);
    Ok(())
}

/// Indirect id of the catalog's `/AcroForm`, creating it (or hoisting an
/// inline one) as needed.
fn acroform_id(doc: &mut Document) -> Result<ObjectId, GenerateError> {
    let catalog_id = doc.trailer.get(b"Root").and_then(Object::as_reference).map_err(pdf_err)?;
    let existing = doc
        .get_object(catalog_id)
        .and_then(Object::as_dict)
        .map_err(pdf_err)?
        .get(b"AcroForm")
        .cloned();
    let id = match existing {
        Ok(Object::Reference(id)) => return Ok(id),
        Ok(Object::Dictionary(inline)) => doc.add_object(inline),
        _ => doc.add_object(dictionary! { "Fields" => Vec::<Object>::new() }),
    };
    set_entry(doc, catalog_id, b"AcroForm", Object::Reference(id))?;
    Ok(id)
}

fn register_fields(doc: &mut Document, fields: Vec<Object>) -> Result<(), GenerateError> {
    let form_id = acroform_id(doc)?;
    append_all(doc, form_id, b"Fields", fields)?;

    let form = doc.get_object_mut(form_id).and_then(Object::as_dict_mut).map_err(pdf_err)?;
    form.set("NeedAppearances", true);
    if !form.has(b"DA") {
        form.set("DA", Object::string_literal(format!("/{FONT_RESOURCE} 0 Tf 0 g")));
    }
    if !form.has(b"DR") {
        form.set(
            "DR",
            dictionary! {
                "Font" => dictionary! {
                    FONT_RESOURCE => dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type1",
                        "BaseFont" => "Helvetica",
                    },
                },
            },
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "acroform_test.rs"]
mod tests;
