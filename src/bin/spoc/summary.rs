//! Per-column statistics for `info --summary`.

use std::cmp::Ordering;
use std::fmt::{Display, Write as _};
use std::ops::Sub;

use serde_json::{json, Value};
use spoc::PointColumns;

/// Range and quartiles of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary<T> {
    pub size: usize,
    pub range: T,
    /// q0 (min), q1, q2 (median), q3, q4 (max)
    pub quartiles: [T; 5],
}

impl<T> Summary<T>
where
    T: Copy + PartialOrd + Sub<Output = T>,
{
    /// Summarize `values`, or `None` if there are none.
    pub fn of(values: &[T]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let n = sorted.len();
        let quartiles = [sorted[0], sorted[n / 4], sorted[n / 2], sorted[3 * n / 4], sorted[n - 1]];
        Some(Self {
            size: n,
            range: quartiles[4] - quartiles[0],
            quartiles,
        })
    }
}

impl<T> Summary<T>
where
    T: Copy + Display + Into<Value>,
{
    fn to_json(&self) -> Value {
        let v = |t: T| -> Value { t.into() };
        let [q0, q1, q2, q3, q4] = self.quartiles;
        json!({
            "size": self.size,
            "range": v(self.range),
            "q0": v(q0),
            "q1": v(q1),
            "q2": v(q2),
            "q3": v(q3),
            "q4": v(q4),
        })
    }

    fn to_text(&self, label: &str) -> String {
        let [q0, q1, q2, q3, q4] = self.quartiles;
        format!(
            "{}\tsize={} range={:.3} q0={:.3} q1={:.3} q2={:.3} q3={:.3} q4={:.3}",
            label, self.size, self.range, q0, q1, q2, q3, q4
        )
    }
}

fn column_json<T>(values: &[T]) -> Value
where
    T: Copy + PartialOrd + Sub<Output = T> + Display + Into<Value>,
{
    match Summary::of(values) {
        Some(s) => s.to_json(),
        None => json!({ "size": 0 }),
    }
}

fn column_text<T>(out: &mut String, label: &str, values: &[T])
where
    T: Copy + PartialOrd + Sub<Output = T> + Display + Into<Value>,
{
    let line = match Summary::of(values) {
        Some(s) => s.to_text(label),
        None => format!("{}\tsize=0", label),
    };
    let _ = writeln!(out, "{}", line);
}

/// Summary of every column as a JSON object.
pub fn summary_json(cols: &PointColumns) -> Value {
    json!({
        "x": column_json(&cols.x),
        "y": column_json(&cols.y),
        "z": column_json(&cols.z),
        "c": column_json(&cols.c),
        "p": column_json(&cols.p),
        "i": column_json(&cols.i),
        "r": column_json(&cols.r),
        "g": column_json(&cols.g),
        "b": column_json(&cols.b),
        "extra": cols.extra.iter().map(|col| column_json(col)).collect::<Vec<_>>(),
    })
}

/// Summary of every column, one line each.
pub fn summary_text(cols: &PointColumns) -> String {
    let mut out = String::new();
    column_text(&mut out, "x", &cols.x);
    column_text(&mut out, "y", &cols.y);
    column_text(&mut out, "z", &cols.z);
    column_text(&mut out, "c", &cols.c);
    column_text(&mut out, "p", &cols.p);
    column_text(&mut out, "i", &cols.i);
    column_text(&mut out, "r", &cols.r);
    column_text(&mut out, "g", &cols.g);
    column_text(&mut out, "b", &cols.b);
    for (k, col) in cols.extra.iter().enumerate() {
        column_text(&mut out, &format!("extra {}", k), col);
    }
    out
}
