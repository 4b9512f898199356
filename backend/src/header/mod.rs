//! Header templater for LAS and ASCII output files.
//!
//! The LAS header is a static LAS 2.0 template with `XX` placeholders. Each
//! output file gets its own copy: well metadata is substituted field by
//! field, then the STEP line receives the file's depth step.

use chrono::Local;

use crate::models::HeaderFields;

/// Static LAS 2.0 header, ending with the `~A` data marker.
pub const LAS_HEADER_TEMPLATE: &str = include_str!("las_template.txt");

/// Placeholder substituted in template lines.
pub const PLACEHOLDER: &str = "XX";

/// Substituted values are left-aligned in a column this wide.
pub const FIELD_WIDTH: usize = 20;

/// Column titles of the ASCII banner line.
pub const ASCII_COLUMNS: [&str; 44] = [
    "Depth (m)", "  DVER (m)", "  BDIA (in)", "ROPA (m/h)", "  HKLA (t)", "  HKLX (t)",
    "  WOBA (t)", "TQA (kN.m)", "TQX (kN.m)", "RPMA (1/min)", "RPMB (1/min)", "SPPA (bar)",
    "  TVA (m3)", "MFIA (L/min)", "  MFOA (%)", "MDIA (g/cm3)", "MDOA (g/cm3)", "MTIA (degC)",
    "MTOA (degC)", "ECDT (g/cm3)", "  BDTI (h)", "  BDDI (m)", "BRVC (krev)", "  TCTI (h)",
    "FPPG (g/cm3)", "DXC (unitless)", "  GASX (%)", " HSX (ppm)", "MTHA (ppm)", "ETHA (ppm)",
    "PRPA (ppm)", "IBTA (ppm)", "NBTA (ppm)", "IPNA (ppm)", "NPNA (ppm)", "C1C2 (unitless)",
    "C1C3 (unitless)", "C1C4 (unitless)", "C1C5 (unitless)", "LITH (unitless)", "  CCAL (%)",
    "  CDOL (%)", "WLFL (Euc)", "WLCT (Euc)",
];

/// Header of every ASCII file: the tab-separated banner, a trailing tab and two blank lines.
pub fn ascii_header() -> String {
    format!("{}\t\n\n\n", ASCII_COLUMNS.join("\t"))
}

/// Left-align `value` in [`FIELD_WIDTH`] columns, or append one space if it is longer.
pub fn pad_value(value: &str) -> String {
    let len = value.chars().count();
    if len <= FIELD_WIDTH {
        format!("{:<w$}", value, w = FIELD_WIDTH)
    } else {
        format!("{} ", value)
    }
}

/// Depth as written in STRT/STOP: shortest round-trip form, always with a fraction.
pub fn format_depth(depth: f64) -> String {
    format!("{:?}", depth)
}

/// Today's date as `MM/DD/YYYY`.
pub fn today() -> String {
    Local::now().format("%m/%d/%Y").to_string()
}

/// A mutable copy of a header template, one line per entry (terminators kept).
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderTemplate {
    lines: Vec<String>,
}

impl HeaderTemplate {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    /// A fresh copy of the LAS template.
    pub fn las() -> Self {
        Self::parse(LAS_HEADER_TEMPLATE)
    }

    /// Substitute `value` on the first line whose whitespace-separated tokens include `field`.
    ///
    /// Only the first placeholder of that line is replaced and only that line
    /// is considered, even if it has no placeholder. Returns whether a line
    /// carried the field.
    pub fn fill_field(&mut self, field: &str, value: &str) -> bool {
        let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.split_whitespace().any(|token| token == field))
        else {
            return false;
        };
        *line = line.replacen(PLACEHOLDER, &pad_value(value), 1);
        true
    }

    /// Put the step, with one decimal, into every line starting with `STEP`.
    pub fn set_step(&mut self, step: f64) {
        let step = format!("{:.1}", step);
        for line in self.lines.iter_mut() {
            if line.trim_start().starts_with("STEP") {
                *line = line.replacen(PLACEHOLDER, &step, 1);
            }
        }
    }

    pub fn render(&self) -> String {
        self.lines.concat()
    }
}

/// Field token / value pairs, in substitution order.
///
/// `start` and `stop` are the first and last depth of the file's data; when
/// absent their placeholders stay untouched.
pub fn field_values(
    fields: &HeaderFields,
    start: Option<f64>,
    stop: Option<f64>,
) -> Vec<(&'static str, String)> {
    let mut values = vec![
        ("COMP", fields.company.clone()),
        ("WELL", fields.well.clone()),
    ];
    if let Some(start) = start {
        values.push(("STRT", format_depth(start)));
    }
    if let Some(stop) = stop {
        values.push(("STOP", format_depth(stop)));
    }
    values.extend([
        ("FLD", fields.field.clone()),
        ("RIGN", fields.rig.clone()),
        ("RIGTYP", fields.rig_type.clone()),
        (
            "CREA.",
            fields.creation_date.clone().unwrap_or_else(today),
        ),
    ]);
    values
}

/// Render the complete LAS header for one output file.
pub fn render_las_header(
    fields: &HeaderFields,
    start: Option<f64>,
    stop: Option<f64>,
    step: f64,
) -> String {
    let mut template = HeaderTemplate::las();
    for (field, value) in field_values(fields, start, stop) {
        template.fill_field(field, &value);
    }
    template.set_step(step);
    template.render()
}
