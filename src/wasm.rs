//! WASM bindings for tabspan
//!
//! This module provides JavaScript-accessible functions for HTML table to
//! WordprocessingML conversion.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::{GridOptions, WordmlOptions};

/// Conversion options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Pad short rows with vacant cells
    #[serde(default)]
    pub pad_short_rows: bool,
    /// Apply the 63-column limit of WordprocessingML consumers
    #[serde(default)]
    pub strict: bool,
    /// Indent the output
    #[serde(default)]
    pub pretty: bool,
    /// Style id written as w:tblStyle
    #[serde(default)]
    pub table_style: Option<String>,
    /// Width of every grid column in twentieths of a point
    #[serde(default)]
    pub grid_col_width: Option<u32>,
    /// Declare the w namespace on the table element
    #[serde(default)]
    pub declare_namespace: bool,
}

#[cfg(feature = "wasm")]
impl ConvertOptions {
    fn grid_options(&self) -> GridOptions {
        let base = if self.strict {
            GridOptions::strict()
        } else {
            GridOptions::default()
        };
        GridOptions {
            pad_short_rows: self.pad_short_rows || base.pad_short_rows,
            ..base
        }
    }

    fn wordml_options(&self) -> WordmlOptions {
        WordmlOptions {
            pretty: self.pretty,
            table_style: self.table_style.clone(),
            grid_col_width: self.grid_col_width,
            declare_namespace: self.declare_namespace,
        }
    }
}

/// Conversion result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ConvertResult {
    /// The converted output
    pub output: String,
    /// Whether the conversion was successful
    pub success: bool,
    /// Error message if conversion failed
    pub error: Option<String>,
    /// Structural warnings absorbed during conversion
    pub warnings: Vec<String>,
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert the first table of an HTML fragment to a WordprocessingML `w:tbl`
///
/// # Arguments
/// * `html` - HTML fragment
/// * `options` - `ConvertOptions` object, may be undefined
///
/// # Returns
/// `ConvertResult` object
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "normalizeHtmlTable")]
pub fn normalize_html_table_wasm(html: &str, options: JsValue) -> JsValue {
    let opts: ConvertOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();

    let result = match crate::convert_html_table(html, &opts.grid_options(), &opts.wordml_options())
    {
        Ok(output) => ConvertResult {
            warnings: output
                .diagnostics
                .diagnostics
                .iter()
                .map(|d| d.to_string())
                .collect(),
            output: output.content,
            success: true,
            error: None,
        },
        Err(err) => ConvertResult {
            output: String::new(),
            success: false,
            error: Some(err.to_string()),
            warnings: vec![],
        },
    };

    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Normalized grid of the first table as JSON-compatible rows
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "normalizeHtmlTableGrid")]
pub fn normalize_html_table_grid_wasm(html: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let opts: ConvertOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();
    let table = crate::normalize_html_table(html, &opts.grid_options())
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    serde_wasm_bindgen::to_value(&table.rows).map_err(JsValue::from)
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
