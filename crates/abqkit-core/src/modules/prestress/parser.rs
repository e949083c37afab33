use crate::common::config::ReportMode;
use crate::domain::{AbqError, ParserResult};

const PART_HEADER: &str = "FIELD OUTPUT REPORTED AT";
const CENTROIDAL_MARKER: &str = "CENTROIDAL";
const TRANSFORMED_MARKER: &str = "COORDINATE SYSTEM";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementStress {
    /// One stress component applied to all three normal directions.
    Isotropic(f64),
    /// S11, S22, S33.
    Principal([f64; 3]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementPrestress {
    pub part: String,
    pub element: u64,
    pub stress: ElementStress,
}

/// Reads element stresses from an Abaqus field-output report.
///
/// Blank lines are skipped, a `Field Output reported at ... <part>` line
/// opens a part, and every line starting with a digit is an element row.
pub fn parse_stress_report(source: &str, mode: ReportMode) -> ParserResult<Vec<ElementPrestress>> {
    let expected_columns = match mode {
        ReportMode::Flat | ReportMode::Curved => 2,
        ReportMode::Threedee => 4,
    };

    let mut stresses = Vec::new();
    let mut current_part: Option<&str> = None;
    let mut centroidal = false;
    let mut transformed = false;

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let upper = trimmed.to_ascii_uppercase();
        centroidal |= upper.contains(CENTROIDAL_MARKER);
        transformed |= upper.contains(TRANSFORMED_MARKER);

        if upper.starts_with(PART_HEADER) {
            current_part = trimmed.split_whitespace().last();
            continue;
        }

        if !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }

        let columns: Vec<&str> = trimmed.split_whitespace().collect();
        if columns.len() != expected_columns {
            return Err(AbqError::input_validation(
                "INPUT.REPORT_COLUMNS",
                format!(
                    "report line {} has {} columns, a {} report has {}; check the report type",
                    line_number,
                    columns.len(),
                    mode,
                    expected_columns
                ),
            ));
        }

        let part = current_part.ok_or_else(|| {
            AbqError::input_validation(
                "INPUT.REPORT_PART",
                format!(
                    "report line {} holds data before any '{}' header",
                    line_number, PART_HEADER
                ),
            )
        })?;

        let element = columns[0].parse::<u64>().map_err(|_| {
            AbqError::input_validation(
                "INPUT.REPORT_VALUE",
                format!(
                    "report line {}: element label '{}' is not an integer",
                    line_number, columns[0]
                ),
            )
        })?;
        let stress = match mode {
            ReportMode::Flat | ReportMode::Curved => {
                ElementStress::Isotropic(stress_value(columns[1], line_number)?)
            }
            ReportMode::Threedee => ElementStress::Principal([
                stress_value(columns[1], line_number)?,
                stress_value(columns[2], line_number)?,
                stress_value(columns[3], line_number)?,
            ]),
        };

        stresses.push(ElementPrestress {
            part: part.to_string(),
            element,
            stress,
        });
    }

    if matches!(mode, ReportMode::Curved | ReportMode::Threedee) && !centroidal {
        return Err(AbqError::input_validation(
            "INPUT.REPORT_POSITION",
            "stress report values are not element-centroidal",
        ));
    }
    if mode == ReportMode::Curved && !transformed {
        return Err(AbqError::input_validation(
            "INPUT.REPORT_COORDINATES",
            "stress report values are not in transformed coordinates",
        ));
    }

    Ok(stresses)
}

fn stress_value(text: &str, line_number: usize) -> ParserResult<f64> {
    text.parse::<f64>().map_err(|_| {
        AbqError::input_validation(
            "INPUT.REPORT_VALUE",
            format!(
                "report line {}: stress '{}' is not a number",
                line_number, text
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{ElementStress, parse_stress_report};
    use crate::common::config::ReportMode;

    const FLAT_REPORT: &str = "\
********************************************************************************
Field Output Report, written Tue Oct 15 10:12:44 2013

Source 1
---------

   ODB: /scratch/ori_ps0.odb
   Step: Step-1
   Frame: Increment      4: Step Time =    1.000

Loc 1 : Integration point values from source 1

Output sorted by column \"Element Label\".

Field Output reported at integration points for part: MASTER-1

   Element       S.S22
     Label      @Loc 1
-----------------------------------------------------
         1   -1.23456E+06
        12   -2.5E+03
";

    #[test]
    fn flat_report_yields_isotropic_rows() {
        let stresses = parse_stress_report(FLAT_REPORT, ReportMode::Flat).expect("report parses");
        assert_eq!(stresses.len(), 2);
        assert_eq!(stresses[0].part, "MASTER-1");
        assert_eq!(stresses[0].element, 1);
        assert_eq!(stresses[0].stress, ElementStress::Isotropic(-1.23456e6));
        assert_eq!(stresses[1].element, 12);
    }

    #[test]
    fn threedee_report_needs_four_columns_and_centroids() {
        let report = "\
Loc 1 : Centroidal values from source 1
Field Output reported at element centroids for part: MASTER-1
    7   -1.0E+03   -2.0E+03   -3.0E+03
";
        let stresses = parse_stress_report(report, ReportMode::Threedee).expect("report parses");
        assert_eq!(
            stresses[0].stress,
            ElementStress::Principal([-1.0e3, -2.0e3, -3.0e3])
        );

        let error = parse_stress_report(FLAT_REPORT, ReportMode::Threedee).expect_err("2 columns");
        assert_eq!(error.code(), "INPUT.REPORT_COLUMNS");
        assert!(error.message().contains("line 20"));
    }

    #[test]
    fn curved_report_checks_position_and_coordinates() {
        let centroidal_only = "\
Loc 1 : Centroidal values from source 1
Field Output reported at element centroids for part: MASTER-1
    3   -4.5E+05
";
        let error =
            parse_stress_report(centroidal_only, ReportMode::Curved).expect_err("not transformed");
        assert_eq!(error.code(), "INPUT.REPORT_COORDINATES");

        let error = parse_stress_report(FLAT_REPORT, ReportMode::Curved).expect_err("not centroidal");
        assert_eq!(error.code(), "INPUT.REPORT_POSITION");

        let transformed = format!("Values in coordinate system: CSYS-SPH\n{centroidal_only}");
        let stresses =
            parse_stress_report(&transformed, ReportMode::Curved).expect("report parses");
        assert_eq!(stresses[0].stress, ElementStress::Isotropic(-4.5e5));
    }

    #[test]
    fn data_before_part_header_is_rejected() {
        let error = parse_stress_report("  1  -2.0\n", ReportMode::Flat).expect_err("no part");
        assert_eq!(error.code(), "INPUT.REPORT_PART");
    }
}
