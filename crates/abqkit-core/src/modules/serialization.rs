use std::fs;
use std::path::Path;

/// Right-aligned fixed-point field, `%<width>.<precision>f`.
pub fn format_fixed_f64(value: f64, width: usize, precision: usize) -> String {
    format!(
        "{value:>width$.precision$}",
        width = width,
        precision = precision
    )
}

/// C `%.<precision>e`: mantissa plus a signed, at least two-digit exponent.
pub fn format_c_exponent(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite_text(value, false);
    }
    let scientific = format!("{value:.precision$e}");
    let (mantissa, exponent) = split_exponent(&scientific);
    join_exponent(mantissa, exponent, 'e')
}

/// C `%<width>G` with six significant digits.
pub fn format_c_general_upper(value: f64, width: usize) -> String {
    format!("{:>width$}", format_c_general(value, 6, true))
}

/// C `%g`/`%G`: the shorter of fixed and exponent notation for `precision`
/// significant digits, trailing zeros removed.
pub fn format_c_general(value: f64, precision: usize, uppercase: bool) -> String {
    if !value.is_finite() {
        return non_finite_text(value, uppercase);
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = split_exponent(&scientific);

    if exponent < -4 || exponent >= precision as i32 {
        let marker = if uppercase { 'E' } else { 'e' };
        join_exponent(trim_fraction_zeros(mantissa), exponent, marker)
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, normalize_text_artifact(content))
}

fn split_exponent(scientific: &str) -> (&str, i32) {
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse().unwrap_or(0)),
        None => (scientific, 0),
    }
}

fn join_exponent(mantissa: &str, exponent: i32, marker: char) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}{marker}{sign}{:02}", exponent.unsigned_abs())
}

fn trim_fraction_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn non_finite_text(value: f64, uppercase: bool) -> String {
    let text = if value.is_nan() {
        "nan"
    } else if value.is_sign_negative() {
        "-inf"
    } else {
        "inf"
    };
    if uppercase {
        text.to_ascii_uppercase()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        format_c_exponent, format_c_general, format_c_general_upper, format_fixed_f64,
        normalize_text_artifact, write_text_artifact,
    };
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fixed_width_float_formatting_is_deterministic() {
        assert_eq!(format_fixed_f64(1.23, 13, 5), "      1.23000");
        assert_eq!(format_fixed_f64(-40.5, 14, 6), "    -40.500000");
    }

    #[test]
    fn exponent_formatting_matches_c_layout() {
        assert_eq!(format_c_exponent(12345.0, 11), "1.23450000000e+04");
        assert_eq!(format_c_exponent(-0.00025, 3), "-2.500e-04");
        assert_eq!(format_c_exponent(0.0, 2), "0.00e+00");
        assert_eq!(format_c_exponent(1.0e120, 1), "1.0e+120");
    }

    #[test]
    fn general_formatting_switches_notation_like_c() {
        assert_eq!(format_c_general(100.0, 6, true), "100");
        assert_eq!(format_c_general(-1.5e6, 6, true), "-1.5E+06");
        assert_eq!(format_c_general(123456.0, 6, true), "123456");
        assert_eq!(format_c_general(1234567.0, 6, true), "1.23457E+06");
        assert_eq!(format_c_general(0.0001, 6, false), "0.0001");
        assert_eq!(format_c_general(0.00001, 6, false), "1e-05");
        assert_eq!(format_c_general(-2.5e-31, 6, true), "-2.5E-31");
        assert_eq!(format_c_general(0.0, 6, true), "0");
    }

    #[test]
    fn general_upper_pads_to_width() {
        assert_eq!(format_c_general_upper(-3.25e7, 18), "         -3.25E+07");
        assert_eq!(format_c_general_upper(42.0, 5), "   42");
    }

    #[test]
    fn normalize_text_artifact_uses_canonical_line_endings() {
        let normalized = normalize_text_artifact("alpha\r\nbeta\rgamma");
        assert_eq!(normalized, "alpha\nbeta\ngamma\n");
    }

    #[test]
    fn repeated_text_writes_produce_identical_bytes() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("nested/model.inp");
        let input = "*Heading\r\n** Job name: ori\r*Part, name=master";

        write_text_artifact(&path, input).expect("first write should succeed");
        let first = fs::read(&path).expect("artifact should be readable");

        write_text_artifact(&path, input).expect("second write should succeed");
        let second = fs::read(&path).expect("artifact should be readable");

        assert_eq!(first, second);
        assert_eq!(second, b"*Heading\n** Job name: ori\n*Part, name=master\n");
    }
}
