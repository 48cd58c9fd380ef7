use wasm_bindgen::prelude::*;

use crate::model::InterviewRecord;

#[wasm_bindgen]
pub fn render_pdf(json: &str) -> Result<Vec<u8>, JsValue> {
    crate::render_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render a record passed as a JS object instead of a JSON string.
#[wasm_bindgen]
pub fn render_record(record: JsValue) -> Result<Vec<u8>, JsValue> {
    let record: InterviewRecord = serde_wasm_bindgen::from_value(record)
        .map_err(|e| JsValue::from_str(&format!("Invalid interview record: {}", e)))?;
    crate::render_pdf(&record, &crate::model::PageGeometry::a4())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn report_file_name(json: &str) -> Result<String, JsValue> {
    let record: InterviewRecord =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(crate::export::report_file_name(&record))
}
