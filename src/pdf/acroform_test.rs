use canvas::camera::PdfRect;
use canvas::doc::FieldDefinition;
use canvas::form::generate_form_pdf;

use super::*;
use crate::pdf::tests::sample_pdf;

fn text_widget(name: &str, page_index: usize) -> FormWidget {
    FormWidget {
        name: name.to_owned(),
        kind: FieldKind::Text,
        page_index,
        rect: PdfRect { x: 100.0, y: 700.0, width: 200.0, height: 20.0 },
        font_size: Some(12.0),
        align: Some(TextAlign::Center),
    }
}

fn checkbox_widget(name: &str) -> FormWidget {
    FormWidget {
        name: name.to_owned(),
        kind: FieldKind::Checkbox,
        page_index: 0,
        rect: PdfRect { x: 50.0, y: 50.0, width: 10.0, height: 10.0 },
        font_size: None,
        align: None,
    }
}

fn acroform(doc: &Document) -> &Dictionary {
    let catalog_id = doc.trailer.get(b"Root").and_then(Object::as_reference).unwrap();
    let catalog = doc.get_object(catalog_id).and_then(Object::as_dict).unwrap();
    let form_id = catalog.get(b"AcroForm").and_then(Object::as_reference).unwrap();
    doc.get_object(form_id).and_then(Object::as_dict).unwrap()
}

fn field_dicts(doc: &Document) -> Vec<&Dictionary> {
    acroform(doc)
        .get(b"Fields")
        .and_then(Object::as_array)
        .unwrap()
        .iter()
        .map(|o| doc.get_object(o.as_reference().unwrap()).and_then(Object::as_dict).unwrap())
        .collect()
}

fn name_of(dict: &Dictionary, key: &[u8]) -> Vec<u8> {
    dict.get(key).and_then(Object::as_name).unwrap().to_vec()
}

fn string_of(dict: &Dictionary, key: &[u8]) -> Vec<u8> {
    dict.get(key).and_then(Object::as_str).unwrap().to_vec()
}

fn annots_len(doc: &Document, page_index: usize) -> usize {
    let page_id = doc.get_pages().into_values().nth(page_index).unwrap();
    doc.get_object(page_id)
        .and_then(Object::as_dict)
        .and_then(|d| d.get(b"Annots"))
        .and_then(Object::as_array)
        .map_or(0, Vec::len)
}

// =============================================================
// Field dictionaries
// =============================================================

#[test]
fn text_field_carries_name_rect_font_and_quadding() {
    let out = LopdfFormGenerator.generate(&sample_pdf(&[(612, 792)], false), &[text_widget("full_name", 0)]).unwrap();
    let doc = Document::load_mem(&out).unwrap();
    let fields = field_dicts(&doc);
    assert_eq!(fields.len(), 1);
    let f = fields[0];
    assert_eq!(name_of(f, b"FT"), b"Tx");
    assert_eq!(name_of(f, b"Subtype"), b"Widget");
    assert_eq!(string_of(f, b"T"), b"full_name");
    assert_eq!(string_of(f, b"DA"), b"/Helv 12 Tf 0 g");
    assert_eq!(f.get(b"Q").and_then(Object::as_i64).unwrap(), 1);
    let rect: Vec<f32> = f
        .get(b"Rect")
        .and_then(Object::as_array)
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect();
    assert_eq!(rect, vec![100.0, 700.0, 300.0, 720.0]);
}

#[test]
fn checkbox_starts_off() {
    let out = LopdfFormGenerator.generate(&sample_pdf(&[(612, 792)], false), &[checkbox_widget("agree")]).unwrap();
    let doc = Document::load_mem(&out).unwrap();
    let f = field_dicts(&doc)[0];
    assert_eq!(name_of(f, b"FT"), b"Btn");
    assert_eq!(name_of(f, b"V"), b"Off");
    assert_eq!(name_of(f, b"AS"), b"Off");
}

#[test]
fn widgets_land_on_their_pages() {
    let widgets = [text_widget("a", 0), text_widget("b", 1), text_widget("c", 1)];
    let out = LopdfFormGenerator.generate(&sample_pdf(&[(612, 792), (612, 792)], false), &widgets).unwrap();
    let doc = Document::load_mem(&out).unwrap();
    assert_eq!(annots_len(&doc, 0), 1);
    assert_eq!(annots_len(&doc, 1), 2);
}

#[test]
fn missing_page_is_skipped() {
    let out = LopdfFormGenerator
        .generate(&sample_pdf(&[(612, 792)], false), &[text_widget("a", 0), text_widget("ghost", 4)])
        .unwrap();
    let doc = Document::load_mem(&out).unwrap();
    assert_eq!(field_dicts(&doc).len(), 1);
}

// =============================================================
// AcroForm dictionary
// =============================================================

#[test]
fn acroform_requests_appearances_and_font_resources() {
    let out = LopdfFormGenerator.generate(&sample_pdf(&[(612, 792)], false), &[text_widget("a", 0)]).unwrap();
    let doc = Document::load_mem(&out).unwrap();
    let form = acroform(&doc);
    assert!(form.get(b"NeedAppearances").and_then(Object::as_bool).unwrap());
    assert!(form.has(b"DR"));
    assert!(form.has(b"DA"));
}

#[test]
fn second_pass_extends_existing_acroform() {
    let first = LopdfFormGenerator.generate(&sample_pdf(&[(612, 792)], false), &[text_widget("a", 0)]).unwrap();
    let second = LopdfFormGenerator.generate(&first, &[checkbox_widget("b")]).unwrap();
    let doc = Document::load_mem(&second).unwrap();
    assert_eq!(field_dicts(&doc).len(), 2);
    assert_eq!(annots_len(&doc, 0), 2);
}

#[test]
fn unreadable_source_is_a_pdf_error() {
    let err = LopdfFormGenerator.generate(b"garbage bytes", &[]).unwrap_err();
    assert_eq!(err.error_code(), "E_GENERATE_PDF");
}

// =============================================================
// Through the validation gate
// =============================================================

#[test]
fn duplicate_names_never_reach_lopdf() {
    let fields = [
        FieldDefinition::text("dup", 1, 0.0, 0.0, 10.0, 10.0),
        FieldDefinition::text("dup", 1, 0.0, 20.0, 10.0, 10.0),
    ];
    let err = generate_form_pdf(&LopdfFormGenerator, b"%PDF-broken", &fields, 1).unwrap_err();
    assert!(matches!(err, GenerateError::Validation(_)));
}

#[test]
fn valid_fields_generate_a_loadable_pdf() {
    let fields = [
        FieldDefinition::text("name", 1, 72.0, 700.0, 200.0, 20.0),
        FieldDefinition::checkbox("agree", 1, 72.0, 650.0, 12.0),
    ];
    let out = generate_form_pdf(&LopdfFormGenerator, &sample_pdf(&[(612, 792)], false), &fields, 1).unwrap();
    assert!(out.starts_with(b"%PDF-"));
    let doc = Document::load_mem(&out).unwrap();
    assert_eq!(field_dicts(&doc).len(), 2);
}
