//! File comparison for `diff`.

use spoc::{PointColumns, SpocFile};

/// What parts of two files to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Header and point data.
    All,
    HeaderOnly,
    DataOnly,
    /// Only the listed columns: `x y z c p i r g b`, or `0`-`9` for extras.
    Fields(Vec<char>),
}

impl Scope {
    /// Parse a `--fields` argument such as `xyz0`.
    pub fn fields(spec: &str) -> Result<Self, String> {
        let fields: Vec<char> = spec.chars().collect();
        if let Some(bad) = fields.iter().find(|c| !"xyzcpirgb0123456789".contains(**c)) {
            return Err(format!("Unknown field specifier: {}", bad));
        }
        Ok(Scope::Fields(fields))
    }
}

/// Names of the parts that differ, empty if the files match.
///
/// The compression flag is a storage detail and never compared.
pub fn differences(a: &SpocFile, b: &SpocFile, scope: &Scope) -> Vec<String> {
    let mut out = Vec::new();

    if matches!(scope, Scope::All | Scope::HeaderOnly) {
        if a.major_version() != b.major_version() {
            out.push("major_version".to_string());
        }
        if a.minor_version() != b.minor_version() {
            out.push("minor_version".to_string());
        }
        if a.total_points() != b.total_points() {
            out.push("total_points".to_string());
        }
        if a.wkt() != b.wkt() {
            out.push("wkt".to_string());
        }
    }

    match scope {
        Scope::All | Scope::DataOnly => {
            let (ca, cb) = (a.columns(), b.columns());
            for field in "xyzcpirgb".chars() {
                if !column_eq(&ca, &cb, field) {
                    out.push(field.to_string());
                }
            }
            if ca.extra.len() != cb.extra.len() {
                out.push("extra_fields".to_string());
            } else {
                for (k, (ea, eb)) in ca.extra.iter().zip(&cb.extra).enumerate() {
                    if ea != eb {
                        out.push(format!("extra {}", k));
                    }
                }
            }
        }
        Scope::Fields(fields) => {
            let (ca, cb) = (a.columns(), b.columns());
            for &field in fields {
                let equal = match field.to_digit(10) {
                    // extras missing from either file are skipped
                    Some(k) => match (ca.extra.get(k as usize), cb.extra.get(k as usize)) {
                        (Some(ea), Some(eb)) => ea == eb,
                        _ => true,
                    },
                    None => column_eq(&ca, &cb, field),
                };
                if !equal {
                    out.push(field.to_string());
                }
            }
        }
        Scope::HeaderOnly => {}
    }
    out
}

fn column_eq(a: &PointColumns, b: &PointColumns, field: char) -> bool {
    match field {
        'x' => a.x == b.x,
        'y' => a.y == b.y,
        'z' => a.z == b.z,
        'c' => a.c == b.c,
        'p' => a.p == b.p,
        'i' => a.i == b.i,
        'r' => a.r == b.r,
        'g' => a.g == b.g,
        'b' => a.b == b.b,
        _ => true,
    }
}
